use std::path::PathBuf;

use thiserror::Error;

/// WhatsApp SDK error types
#[derive(Debug, Error)]
pub enum WhatsAppError {
    /// Connection, timeout or body-read failure reported by the transport.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status other than `200 OK`.
    #[error("request failed with status {status} {status_text}")]
    RequestFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("failed to decode response body ({body_len} bytes): {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body_len: usize,
    },

    #[error("failed to encode request payload: {0}")]
    Encoding(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The API answered `200 OK` with `{"success": false}`.
    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WhatsAppError {
    /// HTTP status code carried by a [`WhatsAppError::RequestFailed`].
    pub fn status(&self) -> Option<u16> {
        match self {
            WhatsAppError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn check_success(success: bool, operation: impl Into<String>) -> Result<(), Self> {
        if success {
            Ok(())
        } else {
            Err(WhatsAppError::OperationFailed(operation.into()))
        }
    }
}
