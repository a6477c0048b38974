//! Client core for the Smart Navigation Cane and AR content backend.
//!
//! # Overview
//! Builds `HttpRequest` values for every backend endpoint and classifies the
//! responses against one declarative success-code table (host-does-IO
//! pattern). A host either runs the round-trip itself (an engine plugin
//! through the C ABI) or hands calls to `Dispatcher`, which runs them on a
//! worker pool over the ureq transport.
//!
//! # Design
//! - `SncClient` is stateless; it holds only a `BackendConfig`.
//! - Each endpoint is split into `build_*` (produces a `Call`) and a parse
//!   step (`parse_operation` or a typed `parse_*`), so the I/O boundary is
//!   explicit.
//! - Status handling lives in `operation`: one table, one classifier.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod operation;
pub mod transport;
pub mod types;

pub use client::{Call, SncClient};
pub use config::{BackendConfig, DispatcherConfig};
pub use dispatcher::{Dispatcher, IntoCall, Pending};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpOutcome, HttpRequest, HttpResponse};
pub use operation::{classify, Operation};
pub use transport::{Transport, UreqTransport};
pub use types::{
    ArContent, DetectedObject, DeviceRegistration, GpsLocation, NavigationInstruction, NewArContent,
    ObstacleReport, OperationResult, StartRoute,
};
