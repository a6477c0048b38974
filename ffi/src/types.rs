//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Values coming in from C are plain
//! integers and are range-checked before they become Rust enums. Conversion
//! functions live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CString, c_void};
use std::os::raw::c_char;

use snc_core::{
    ApiError, DetectedObject, HttpMethod, HttpOutcome, HttpResponse, NavigationInstruction, Operation,
    OperationResult, SncClient, TransportError,
};

/// Opaque handle to an `SncClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiSncClient {
    pub(crate) inner: SncClient,
}

/// Copy a Rust string into a heap-allocated C string. Interior NUL bytes
/// are dropped.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    let c = CString::new(s).unwrap_or_else(|err| {
        let mut bytes = err.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c.into_raw()
}

/// Release a string produced by `to_c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Hand a vector to C as `(pointer, len)`; an empty vector becomes null.
pub(crate) fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let mut items = items.into_boxed_slice();
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

/// Reclaim a vector handed out by `into_raw_parts`.
pub(crate) unsafe fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Logical backend call a request was built for. Pass it back to
/// `snc_classify` together with the response.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiOperation {
    LatestDetection = 0,
    DetectionFrame = 1,
    DetectionStreamStatus = 2,
    StartNavigation = 3,
    RouteStatus = 4,
    UpdateLocation = 5,
    EndNavigation = 6,
    ReportObstacle = 7,
    ActiveObstacles = 8,
    RegisterDevice = 9,
    DeviceHeartbeat = 10,
    DeviceStatus = 11,
    ListDevices = 12,
    ReportDeviceError = 13,
    StartSession = 14,
    EndSession = 15,
    AddDeviceToSession = 16,
    CheckHealth = 17,
    ListContent = 18,
    GetContent = 19,
    CreateContent = 20,
    DeleteContent = 21,
}

impl From<Operation> for FfiOperation {
    fn from(op: Operation) -> Self {
        match op {
            Operation::LatestDetection => FfiOperation::LatestDetection,
            Operation::DetectionFrame => FfiOperation::DetectionFrame,
            Operation::DetectionStreamStatus => FfiOperation::DetectionStreamStatus,
            Operation::StartNavigation => FfiOperation::StartNavigation,
            Operation::RouteStatus => FfiOperation::RouteStatus,
            Operation::UpdateLocation => FfiOperation::UpdateLocation,
            Operation::EndNavigation => FfiOperation::EndNavigation,
            Operation::ReportObstacle => FfiOperation::ReportObstacle,
            Operation::ActiveObstacles => FfiOperation::ActiveObstacles,
            Operation::RegisterDevice => FfiOperation::RegisterDevice,
            Operation::DeviceHeartbeat => FfiOperation::DeviceHeartbeat,
            Operation::DeviceStatus => FfiOperation::DeviceStatus,
            Operation::ListDevices => FfiOperation::ListDevices,
            Operation::ReportDeviceError => FfiOperation::ReportDeviceError,
            Operation::StartSession => FfiOperation::StartSession,
            Operation::EndSession => FfiOperation::EndSession,
            Operation::AddDeviceToSession => FfiOperation::AddDeviceToSession,
            Operation::CheckHealth => FfiOperation::CheckHealth,
            Operation::ListContent => FfiOperation::ListContent,
            Operation::GetContent => FfiOperation::GetContent,
            Operation::CreateContent => FfiOperation::CreateContent,
            Operation::DeleteContent => FfiOperation::DeleteContent,
        }
    }
}

/// Map a raw `FfiOperation` discriminant received from C back to the core
/// operation. Unknown values yield `None`.
pub(crate) fn operation_from_raw(raw: u32) -> Option<Operation> {
    Operation::ALL
        .into_iter()
        .find(|op| FfiOperation::from(*op) as u32 == raw)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A latitude/longitude pair passed by value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FfiGpsLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<FfiGpsLocation> for snc_core::GpsLocation {
    fn from(location: FfiGpsLocation) -> Self {
        snc_core::GpsLocation::new(location.latitude, location.longitude)
    }
}

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `snc_build_*` functions. The C caller executes the request and
/// passes the outcome back through `snc_classify` or a `snc_parse_*`
/// function. `body` is null for GET and DELETE.
#[repr(C)]
pub struct FfiHttpRequest {
    pub operation: FfiOperation,
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `Call` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_call(call: snc_core::Call) -> *mut Self {
        let request = call.request;
        let headers: Vec<FfiHeader> = request
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: to_c_string(k),
                value: to_c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            operation: call.operation.into(),
            method: request.method.into(),
            url: to_c_string(request.url),
            headers,
            headers_len,
            body: request.body.map(to_c_string).unwrap_or(std::ptr::null_mut()),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// The outcome of executing a request, constructed by the C caller.
///
/// When `transport_succeeded` is false no response was received: `status`
/// is ignored and `body` may carry a description of the failure. The FFI
/// layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub transport_succeeded: bool,
    pub status: u16,
    pub body: *const c_char,
}

impl FfiHttpResponse {
    pub(crate) fn to_outcome(&self) -> HttpOutcome {
        let body = if self.body.is_null() {
            String::new()
        } else {
            unsafe { std::ffi::CStr::from_ptr(self.body) }
                .to_string_lossy()
                .into_owned()
        };
        if self.transport_succeeded {
            Ok(HttpResponse::new(self.status, body))
        } else if body.is_empty() {
            Err(TransportError::new("no response received"))
        } else {
            Err(TransportError::new(body))
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// `(success, message)` for any operation, plus the HTTP status when a
/// response was received (0 otherwise).
#[repr(C)]
pub struct FfiOperationResult {
    pub success: bool,
    pub status: u16,
    pub message: *mut c_char,
}

impl FfiOperationResult {
    pub(crate) fn new(result: OperationResult, status: u16) -> *mut Self {
        Box::into_raw(Box::new(FfiOperationResult {
            success: result.success,
            status,
            message: to_c_string(result.message),
        }))
    }

    pub(crate) fn failure(message: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiOperationResult {
            success: false,
            status: 0,
            message: to_c_string(message.to_string()),
        }))
    }
}

/// Error codes returned in `FfiSncResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
}

/// Tag that tells `snc_free_result` what `FfiSncResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    DetectionList = 1,
    Instruction = 2,
}

/// A detected object exposed to C. Position coordinates are strings and
/// empty when the backend sent none.
#[repr(C)]
pub struct FfiDetectedObject {
    pub object_id: *mut c_char,
    pub label: *mut c_char,
    pub confidence: f32,
    pub distance: f32,
    pub position_x: *mut c_char,
    pub position_y: *mut c_char,
}

impl From<DetectedObject> for FfiDetectedObject {
    fn from(object: DetectedObject) -> Self {
        FfiDetectedObject {
            object_id: to_c_string(object.object_id),
            label: to_c_string(object.label),
            confidence: object.confidence,
            distance: object.distance,
            position_x: to_c_string(object.position_x),
            position_y: to_c_string(object.position_y),
        }
    }
}

impl FfiDetectedObject {
    pub(crate) fn free_fields(&self) {
        free_c_string(self.object_id);
        free_c_string(self.label);
        free_c_string(self.position_x);
        free_c_string(self.position_y);
    }
}

/// Objects of the latest detection frame.
#[repr(C)]
pub struct FfiDetectionList {
    pub items: *mut FfiDetectedObject,
    pub len: u32,
}

/// Next step of an active route.
#[repr(C)]
pub struct FfiNavigationInstruction {
    pub instruction: *mut c_char,
    pub distance_meters: f32,
    pub duration_seconds: i32,
}

/// Result envelope for the typed parse functions.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiSncResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiSncResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiSncResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn error(error_code: FfiErrorCode, http_status: u16, message: String) -> *mut Self {
        Box::into_raw(Box::new(FfiSncResult {
            error_code,
            error_message: to_c_string(message),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn ok_detections(objects: Vec<DetectedObject>) -> *mut Self {
        let items: Vec<FfiDetectedObject> = objects.into_iter().map(FfiDetectedObject::from).collect();
        let (items, len) = into_raw_parts(items);
        let list = Box::new(FfiDetectionList { items, len });
        Self::ok(FfiDataTag::DetectionList, Box::into_raw(list) as *mut c_void)
    }

    pub(crate) fn ok_instruction(instruction: NavigationInstruction) -> *mut Self {
        let ffi = Box::new(FfiNavigationInstruction {
            instruction: to_c_string(instruction.instruction),
            distance_meters: instruction.distance_meters,
            duration_seconds: instruction.duration_seconds,
        });
        Self::ok(FfiDataTag::Instruction, Box::into_raw(ffi) as *mut c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::HttpError { .. } => FfiErrorCode::Http,
            ApiError::DeserializationError(_) => FfiErrorCode::Deserialization,
            ApiError::SerializationError(_) => FfiErrorCode::Serialization,
        };
        Self::error(code, err.status().unwrap_or(0), err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
