//! Error types for the backend client.
//!
//! # Design
//! `Transport` covers "no response received" and never carries a status code.
//! Every response whose status is outside the endpoint's success-code set
//! lands in `HttpError` with the raw status and body, so the diagnostic the
//! caller sees is always `HTTP {status}: {body}`.

use thiserror::Error;

/// No response was received (connection refused, DNS failure, timeout, or the
/// dispatcher went away before the request ran).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Errors returned by the classifier and the typed parse methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Request failed or invalid response: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a status outside the endpoint's success set.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// The HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_embeds_status_and_body() {
        let err = ApiError::HttpError {
            status: 503,
            body: "{\"detail\":\"down\"}".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: {\"detail\":\"down\"}");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ApiError::from(TransportError::new("connection refused"));
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("Request failed"));
    }
}
