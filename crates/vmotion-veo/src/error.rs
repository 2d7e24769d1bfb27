//! Generation service error types.

use thiserror::Error;

use crate::types::ErrorEnvelope;

/// Result type for generation service calls.
pub type VeoResult<T> = Result<T, VeoError>;

/// Errors that can occur while talking to the generation service.
#[derive(Debug, Error)]
pub enum VeoError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid artifact locator: {0}")]
    InvalidLocator(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl VeoError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Build an error from a non-success HTTP response body.
    ///
    /// Uses the `error.message` of the standard Google error envelope when
    /// present, otherwise the raw body.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        let message = if message.is_empty() {
            format!("Generation service returned status {}", status)
        } else {
            message
        };

        Self::api(status, message)
    }

    /// HTTP status carried by the error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            VeoError::Api { status, .. } => Some(*status),
            VeoError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status_uses_envelope_message() {
        let body = r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#;
        let err = VeoError::from_http_status(404, body);
        assert_eq!(err.http_status(), Some(404));
        assert!(err.to_string().contains("Requested entity was not found."));
    }

    #[test]
    fn test_from_http_status_falls_back_to_body() {
        let err = VeoError::from_http_status(502, "upstream timeout\n");
        assert_eq!(err.to_string(), "upstream timeout (HTTP 502)");
    }

    #[test]
    fn test_from_http_status_empty_body() {
        let err = VeoError::from_http_status(500, "");
        assert_eq!(
            err.to_string(),
            "Generation service returned status 500 (HTTP 500)"
        );
    }
}
