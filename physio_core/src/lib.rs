#![forbid(unsafe_code)]

//! Client library for the PhysioAssist prescription API.
//!
//! This crate provides:
//! - Domain records (exercise templates, prescriptions, library stats)
//! - Request builders for partial create/update payloads
//! - A transport seam with a blocking reqwest implementation
//! - The `PhysioClient` façade exposing one method per remote operation
//! - Configuration and logging setup shared by the binaries

pub mod types;
pub mod error;
pub mod request;
pub mod transport;
pub mod client;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use request::{NewPrescription, PrescriptionUpdate, TemplateDraft, TemplateQuery};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
pub use client::PhysioClient;
pub use config::Config;
