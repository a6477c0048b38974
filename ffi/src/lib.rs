//! C-ABI wrapper around `snc-core`.
//!
//! # Overview
//! Exposes every backend endpoint through `extern "C"` functions so an engine
//! host that owns the HTTP stack can build requests and classify or parse the
//! responses without linking Rust's threading or serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `snc_build_*` mirrors the core builders 1:1. Each request carries the
//!   `FfiOperation` it was built for; the host hands that tag back to
//!   `snc_classify` along with the response.
//! - `snc_parse_latest_detection` and `snc_parse_update_location` return a
//!   single `FfiSncResult` envelope with `FfiDataTag` + `void* data`.
//! - The C caller owns all returned pointers and must call the matching
//!   `snc_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use snc_core::{BackendConfig, Call, NewArContent, ObstacleReport, OperationResult, SncClient};

use types::*;

/// Borrow a C string argument. Null and invalid UTF-8 yield `None`.
fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// Shared body of every `snc_build_*` function. Returns null when `client`
/// is null, when `build` rejects its arguments, or on panic.
fn build_request<F>(client: *const FfiSncClient, build: F) -> *mut FfiHttpRequest
where
    F: FnOnce(&SncClient) -> Option<Call>,
{
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return ptr::null_mut();
        }
        let client = unsafe { &*client };
        match build(&client.inner) {
            Some(call) => FfiHttpRequest::from_call(call),
            None => ptr::null_mut(),
        }
    }))
    .unwrap_or(ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_url`. A trailing `/` is stripped;
/// no other validation is applied.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `snc_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn snc_client_new(base_url: *const c_char) -> *mut FfiSncClient {
    catch_unwind(|| {
        let Some(url) = str_arg(base_url) else {
            return ptr::null_mut();
        };
        let client = SncClient::new(BackendConfig::new(url));
        Box::into_raw(Box::new(FfiSncClient { inner: client }))
    })
    .unwrap_or(ptr::null_mut())
}

/// Point the client at a different backend. Requests built before the call
/// keep their URL.
///
/// Returns false if either argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn snc_client_set_base_url(client: *mut FfiSncClient, base_url: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        let Some(url) = str_arg(base_url) else {
            return false;
        };
        let client = unsafe { &mut *client };
        client.inner = SncClient::new(BackendConfig::new(url));
        true
    }))
    .unwrap_or(false)
}

/// Free a client created by `snc_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn snc_client_free(client: *mut FfiSncClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// `GET /api/detection/latest`. Parse the response with
/// `snc_parse_latest_detection`.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_latest_detection(client: *const FfiSncClient) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_latest_detection()))
}

/// `GET /api/detection/{frame_id}`. Returns null if `frame_id` is null.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_detection_frame(
    client: *const FfiSncClient,
    frame_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_detection_frame(str_arg(frame_id)?)))
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_detection_stream_status(client: *const FfiSncClient) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_detection_stream_status()))
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// `POST /api/navigation/start-route` with both locations in the body.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_start_navigation(
    client: *const FfiSncClient,
    origin: FfiGpsLocation,
    destination: FfiGpsLocation,
) -> *mut FfiHttpRequest {
    build_request(client, |c| c.build_start_navigation(origin.into(), destination.into()).ok())
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_route_status(
    client: *const FfiSncClient,
    route_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_route_status(str_arg(route_id)?)))
}

/// `PUT /api/navigation/route/{route_id}/update-location`. Parse the
/// response with `snc_parse_update_location`.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_update_location(
    client: *const FfiSncClient,
    route_id: *const c_char,
    location: FfiGpsLocation,
) -> *mut FfiHttpRequest {
    build_request(client, |c| c.build_update_location(str_arg(route_id)?, location.into()).ok())
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_end_navigation(
    client: *const FfiSncClient,
    route_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_end_navigation(str_arg(route_id)?)))
}

/// `POST /api/navigation/obstacle-alert`. All three strings are required.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_report_obstacle(
    client: *const FfiSncClient,
    alert_type: *const c_char,
    severity: *const c_char,
    description: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| {
        let report = ObstacleReport {
            alert_type: str_arg(alert_type)?.to_string(),
            severity: str_arg(severity)?.to_string(),
            description: str_arg(description)?.to_string(),
        };
        c.build_report_obstacle(&report).ok()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_active_obstacles(client: *const FfiSncClient) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_active_obstacles()))
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_register_device(
    client: *const FfiSncClient,
    device_id: *const c_char,
    device_type: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| {
        c.build_register_device(str_arg(device_id)?, str_arg(device_type)?).ok()
    })
}

/// `POST /api/device/heartbeat/{device_id}?battery_level=N.N`.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_device_heartbeat(
    client: *const FfiSncClient,
    device_id: *const c_char,
    battery_level: f32,
) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_device_heartbeat(str_arg(device_id)?, battery_level)))
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_device_status(
    client: *const FfiSncClient,
    device_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_device_status(str_arg(device_id)?)))
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_list_devices(client: *const FfiSncClient) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_list_devices()))
}

/// `POST /api/device/{device_id}/error`. The message is percent-encoded
/// into the query string.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_report_device_error(
    client: *const FfiSncClient,
    device_id: *const c_char,
    error_message: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| {
        Some(c.build_report_device_error(str_arg(device_id)?, str_arg(error_message)?))
    })
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_start_session(
    client: *const FfiSncClient,
    user_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_start_session(str_arg(user_id)?)))
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_end_session(
    client: *const FfiSncClient,
    session_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_end_session(str_arg(session_id)?)))
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_add_device_to_session(
    client: *const FfiSncClient,
    session_id: *const c_char,
    device_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| {
        Some(c.build_add_device_to_session(str_arg(session_id)?, str_arg(device_id)?))
    })
}

// ---------------------------------------------------------------------------
// AR content
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_check_health(client: *const FfiSncClient) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_check_health()))
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_list_content(client: *const FfiSncClient) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_list_content()))
}

#[unsafe(no_mangle)]
pub extern "C" fn snc_build_get_content(client: *const FfiSncClient, id: i32) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_get_content(id)))
}

/// `POST /api/content`. `description` and `content_type` may be null and
/// are then sent as empty strings.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_create_content(
    client: *const FfiSncClient,
    name: *const c_char,
    description: *const c_char,
    content_type: *const c_char,
) -> *mut FfiHttpRequest {
    build_request(client, |c| {
        let input = NewArContent {
            name: str_arg(name)?.to_string(),
            description: str_arg(description).unwrap_or_default().to_string(),
            content_type: str_arg(content_type).unwrap_or_default().to_string(),
        };
        c.build_create_content(&input).ok()
    })
}

/// `DELETE /api/content/{id}`. Both 200 and 204 classify as success.
#[unsafe(no_mangle)]
pub extern "C" fn snc_build_delete_content(client: *const FfiSncClient, id: i32) -> *mut FfiHttpRequest {
    build_request(client, |c| Some(c.build_delete_content(id)))
}

// ---------------------------------------------------------------------------
// Classification and parsing
// ---------------------------------------------------------------------------

/// Classify the outcome of a request into `(success, message)`.
///
/// `operation` is the `FfiOperation` value from the request. Never returns
/// null; unknown operations and a null `response` produce a failed result.
/// Free the result with `snc_free_operation_result`.
#[unsafe(no_mangle)]
pub extern "C" fn snc_classify(operation: u32, response: *const FfiHttpResponse) -> *mut FfiOperationResult {
    catch_unwind(|| {
        let Some(operation) = operation_from_raw(operation) else {
            return FfiOperationResult::failure(&format!("unknown operation: {operation}"));
        };
        if response.is_null() {
            return FfiOperationResult::failure("null argument: response");
        }
        let outcome = unsafe { &*response }.to_outcome();
        let status = outcome.as_ref().map(|r| r.status).unwrap_or(0);
        FfiOperationResult::new(OperationResult::from_outcome(operation, outcome), status)
    })
    .unwrap_or_else(|_| FfiOperationResult::failure("panic in snc_classify"))
}

/// Parse the response of a latest-detection request.
///
/// Returns a result with `data_tag = DetectionList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn snc_parse_latest_detection(
    client: *const FfiSncClient,
    response: *const FfiHttpResponse,
) -> *mut FfiSncResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiSncResult::null_arg("client");
        }
        if response.is_null() {
            return FfiSncResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let outcome = unsafe { &*response }.to_outcome();
        match client.inner.parse_latest_detection(outcome) {
            Ok(objects) => FfiSncResult::ok_detections(objects),
            Err(e) => FfiSncResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiSncResult::panic("panic in snc_parse_latest_detection"))
}

/// Parse the response of an update-location request. Only status 200 is
/// accepted.
///
/// Returns a result with `data_tag = Instruction` on success.
#[unsafe(no_mangle)]
pub extern "C" fn snc_parse_update_location(
    client: *const FfiSncClient,
    response: *const FfiHttpResponse,
) -> *mut FfiSncResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiSncResult::null_arg("client");
        }
        if response.is_null() {
            return FfiSncResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let outcome = unsafe { &*response }.to_outcome();
        match client.inner.parse_update_location(outcome) {
            Ok(instruction) => FfiSncResult::ok_instruction(instruction),
            Err(e) => FfiSncResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiSncResult::panic("panic in snc_parse_update_location"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `snc_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn snc_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        for header in unsafe { from_raw_parts(req.headers, req.headers_len) } {
            free_c_string(header.key);
            free_c_string(header.value);
        }
    });
}

/// Free an `FfiOperationResult` returned by `snc_classify`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn snc_free_operation_result(result: *mut FfiOperationResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.message);
    });
}

/// Free an `FfiSncResult` returned by any `snc_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn snc_free_result(result: *mut FfiSncResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::DetectionList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiDetectionList) };
                for object in unsafe { from_raw_parts(list.items, list.len) } {
                    object.free_fields();
                }
            }
            FfiDataTag::Instruction => {
                let instruction = unsafe { Box::from_raw(result.data as *mut FfiNavigationInstruction) };
                free_c_string(instruction.instruction);
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn snc_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
