//! HTTP transport seam.
//!
//! The client builds [`ApiRequest`] values and hands them to a [`Transport`].
//! [`HttpTransport`] is the production implementation over a blocking
//! reqwest client; tests substitute a recording fake.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Url;

use crate::{Error, Result};

/// Header carrying the static API credential (`X-API-Key` on the wire;
/// header names are case-insensitive and stored lowercase)
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP verbs used by the API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the API base URL
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Unencoded path segments; the transport percent-encodes each one
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new<S: Into<String>>(method: Method, segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path for logging, e.g. `/prescriptions/abc`
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Raw response: status code plus body text
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever response the server produced
///
/// Implementations return `Error::Transport` only when no response was
/// obtained; non-success statuses are returned as ordinary responses.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).send(request)
    }
}

/// Blocking reqwest transport with the credential baked into default headers
pub struct HttpTransport {
    base_url: Url,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build the session once; it is reused for every call
    pub fn new(base_url: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Base URL must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| Error::Config("API key contains invalid header characters".into()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::blocking::Client::builder().default_headers(headers);
        // reqwest's blocking client applies a 30s default; None means no limit
        builder = builder.timeout(timeout);

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("Base URL '{}' cannot carry a path", self.base_url)))?;
            path.pop_if_empty();
            path.extend(&request.segments);
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(request)?;

        let mut builder = self.client.request(request.method.into(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_for_logging() {
        let request = ApiRequest::new(Method::Get, ["patients", "patient_456", "prescriptions"]);
        assert_eq!(request.path(), "/patients/patient_456/prescriptions");
    }

    #[test]
    fn test_url_keeps_base_path_and_encodes_segments() {
        let transport =
            HttpTransport::new("https://api.physioassist.com/v1/", "key", None).unwrap();
        let request = ApiRequest::new(Method::Get, ["templates", "a b/c"]);

        let url = transport.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.physioassist.com/v1/templates/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(matches!(
            HttpTransport::new("ftp://example.com", "key", None),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            HttpTransport::new("not a url", "key", None),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_rejects_api_key_with_newline() {
        assert!(matches!(
            HttpTransport::new("https://example.com", "bad\nkey", None),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(301, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
    }
}
