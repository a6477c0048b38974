//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `SncClient` builds `HttpRequest`
//! values and the classifier consumes `HttpOutcome` values; whoever executes
//! the round-trip (the ureq transport, or an engine host through the C ABI)
//! sits in between.
//!
//! All fields use owned types so values can cross thread and FFI boundaries
//! without lifetime concerns.

use crate::error::TransportError;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute: the base URL is resolved when the request is built,
/// so a request keeps its target even if the configuration changes later.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub(crate) fn json(method: HttpMethod, url: String, body: Option<String>) -> Self {
        Self {
            method,
            url,
            headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
            body,
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// What a transport hands back for one request: either a response with any
/// status code, or no response at all.
pub type HttpOutcome = Result<HttpResponse, TransportError>;
