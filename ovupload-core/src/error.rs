//! Error types for ovupload-core.

use thiserror::Error;

/// Aggregated failure reported by the record-management service.
///
/// `details` carries the operation parameters and the collected service
/// errors. It never contains file content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}: {details}")]
pub struct ModuleError {
    pub message: String,
    pub details: String,
}

impl ModuleError {
    pub fn new(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: details.into(),
        }
    }
}

/// Failure of a file upload call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Network / TLS / connection failure before a response arrived.
    #[error("upload request failed: {0}")]
    Transport(String),

    /// The upload service answered with a non-success status.
    #[error("upload service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response whose body did not carry a file id.
    #[error("upload response could not be decoded: {0}")]
    Decode(String),
}

/// Failure of a module log sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("log request failed: {0}")]
    Transport(String),

    #[error("integration log returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}
