//! Error types for the physio_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for physio_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response was obtained from the server (connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status code
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A success response body did not match the expected record shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request rejected locally before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status code, if the server produced a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
