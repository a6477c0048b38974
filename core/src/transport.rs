//! Executing an `HttpRequest` against the network.
//!
//! A transport turns one request into one `HttpOutcome`. Status codes are
//! never errors at this layer: 4xx/5xx come back as `Ok(HttpResponse)` so
//! the classifier alone decides success. Only "no response" is an `Err`.

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpOutcome, HttpRequest, HttpResponse};

/// Anything able to perform a blocking HTTP round-trip.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: &HttpRequest) -> HttpOutcome;
}

/// `ureq`-backed transport. No explicit timeout and no retry.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> HttpOutcome {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(url), headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(url), headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.as_str().to_string(), value)
            })
            .collect();
        // Only I/O failures while reading count as "no response"; the body is
        // decoded leniently and is not size-capped.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| TransportError::new(format!("reading response body: {e}")))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use crate::types::OperationResult;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    #[test]
    fn unreachable_host_is_a_transport_failure() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/health"),
            headers: Vec::new(),
            body: None,
        };
        assert!(UreqTransport::new().execute(&request).is_err());
    }

    /// Serve exactly one connection with a raw HTTP response.
    fn serve_once(response: Vec<u8>) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(&response).unwrap();
        });
        addr
    }

    fn raw_response(status_line: &str, extra_headers: &str, body: &[u8]) -> Vec<u8> {
        let mut raw = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\n{extra_headers}Connection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        raw.extend_from_slice(body);
        raw
    }

    fn get(addr: std::net::SocketAddr, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}{path}"),
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn non_utf8_error_body_keeps_its_status() {
        let addr = serve_once(raw_response("500 Internal Server Error", "", b"er\xff\xfer"));
        let outcome = UreqTransport::new().execute(&get(addr, "/api/device/list"));

        let response = outcome.clone().unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "er\u{FFFD}\u{FFFD}r");

        let result = OperationResult::from_outcome(Operation::ListDevices, outcome);
        assert!(!result.success);
        assert_eq!(result.message, "HTTP 500: er\u{FFFD}\u{FFFD}r");
    }

    #[test]
    fn non_utf8_success_body_is_still_success() {
        let addr = serve_once(raw_response("200 OK", "", b"\xff\xfe"));
        let outcome = UreqTransport::new().execute(&get(addr, "/health"));

        let result = OperationResult::from_outcome(Operation::CheckHealth, outcome);
        assert!(result.success);
        assert_eq!(result.message, "Request successful");
    }

    #[test]
    fn response_headers_are_kept() {
        let addr = serve_once(raw_response("200 OK", "X-Cane-Id: cane-01\r\n", b"{}"));
        let response = UreqTransport::new().execute(&get(addr, "/health")).unwrap();
        assert!(response
            .headers
            .iter()
            .any(|(name, value)| name == "x-cane-id" && value == "cane-01"));
    }
}
