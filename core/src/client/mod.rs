//! Stateless request builder and response parser for the backend API.
//!
//! # Design
//! `SncClient` holds only a `BackendConfig` and carries no mutable state
//! between calls. Each endpoint has a `build_*` method producing a `Call`
//! (the operation plus its `HttpRequest`); the matching result comes from
//! `parse_operation` for generic endpoints or from a typed `parse_*` method.
//! The caller executes the HTTP round-trip in between, keeping this module
//! deterministic and free of I/O.
//!
//! Builders are grouped per resource in the submodules.

mod content;
mod detection;
mod device;
mod navigation;
mod session;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::config::BackendConfig;
use crate::error::ApiError;
use crate::http::{HttpOutcome, HttpRequest};
use crate::operation::Operation;
use crate::types::OperationResult;

/// Everything except RFC 3986 unreserved characters is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const EMPTY_OBJECT: &str = "{}";

/// A request ready to run, tagged with the operation that classifies its
/// response.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: Operation,
    pub request: HttpRequest,
}

/// Synchronous, stateless client for the Smart Navigation Cane and AR
/// content APIs.
#[derive(Debug, Clone, Default)]
pub struct SncClient {
    config: BackendConfig,
}

impl SncClient {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Classify a response for any operation into `(success, message)`.
    pub fn parse_operation(&self, operation: Operation, outcome: HttpOutcome) -> OperationResult {
        OperationResult::from_outcome(operation, outcome)
    }

    fn call(&self, operation: Operation, path: &str, body: Option<String>) -> Call {
        let url = format!("{}{path}", self.config.base_url());
        Call {
            operation,
            request: HttpRequest::json(operation.method(), url, body),
        }
    }

    /// GET/DELETE: no body.
    fn bodiless(&self, operation: Operation, path: &str) -> Call {
        self.call(operation, path, None)
    }

    /// POST endpoints whose parameters travel in the path or query still send `{}`.
    fn empty_post(&self, operation: Operation, path: &str) -> Call {
        self.call(operation, path, Some(EMPTY_OBJECT.to_string()))
    }

    fn json_call<T: Serialize>(&self, operation: Operation, path: &str, payload: &T) -> Result<Call, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.call(operation, path, Some(body)))
    }
}

pub(crate) fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse};

    #[test]
    fn query_values_keep_unreserved_characters() {
        assert_eq!(encode_query_value("battery low"), "battery%20low");
        assert_eq!(encode_query_value("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_query_value("x&y=z/"), "x%26y%3Dz%2F");
    }

    #[test]
    fn every_request_carries_json_content_type() {
        let client = SncClient::default();
        let call = client.build_list_devices();
        assert_eq!(
            call.request.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert_eq!(call.request.method, HttpMethod::Get);
        assert!(call.request.body.is_none());
    }

    #[test]
    fn base_url_is_prefixed() {
        let client = SncClient::new(BackendConfig::new("http://10.0.0.2:8000/"));
        assert_eq!(client.build_check_health().request.url, "http://10.0.0.2:8000/health");
    }

    #[test]
    fn parse_operation_classifies() {
        let client = SncClient::default();
        let result = client.parse_operation(Operation::EndSession, Ok(HttpResponse::new(500, "boom")));
        assert!(!result.success);
        assert_eq!(result.message, "HTTP 500: boom");
    }
}
