// Domain error types - every evaluation-path failure resolves to fail-open Allow

use thiserror::Error;

/// Main error type for the hookgate
#[derive(Error, Debug)]
pub enum GateError {
    /// Payload shape prevented evaluation. Caught at the router boundary
    /// and converted to an Allow decision with a diagnostic note.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Invalid configuration or pattern set (startup only, never per-request)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Reply construction failure (last-resort transport path)
    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl GateError {
    /// Get HTTP status code for this error
    ///
    /// `MalformedPayload` never surfaces as an HTTP error: the router
    /// converts it to a 200 Allow reply before the transport sees it.
    pub fn status_code(&self) -> u16 {
        match self {
            GateError::MalformedPayload(_) => 200,
            GateError::ConfigurationError(_) => 500,
            GateError::EncodingError(_) => 500,
        }
    }
}
