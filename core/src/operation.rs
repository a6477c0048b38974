//! The endpoint table and the shared response classifier.
//!
//! # Design
//! Every endpoint the client can call is an `Operation`. Its HTTP method and
//! its success-code set are declared here once, and `classify` is the only
//! place that turns an `HttpOutcome` into success or failure. Endpoint
//! callers never inspect status codes themselves.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpOutcome, HttpResponse};
use crate::types::OperationResult;

/// One logical backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Detection
    LatestDetection,
    DetectionFrame,
    DetectionStreamStatus,
    // Navigation
    StartNavigation,
    RouteStatus,
    UpdateLocation,
    EndNavigation,
    ReportObstacle,
    ActiveObstacles,
    // Device
    RegisterDevice,
    DeviceHeartbeat,
    DeviceStatus,
    ListDevices,
    ReportDeviceError,
    // Session
    StartSession,
    EndSession,
    AddDeviceToSession,
    // AR content
    CheckHealth,
    ListContent,
    GetContent,
    CreateContent,
    DeleteContent,
}

impl Operation {
    pub const ALL: [Operation; 22] = [
        Operation::LatestDetection,
        Operation::DetectionFrame,
        Operation::DetectionStreamStatus,
        Operation::StartNavigation,
        Operation::RouteStatus,
        Operation::UpdateLocation,
        Operation::EndNavigation,
        Operation::ReportObstacle,
        Operation::ActiveObstacles,
        Operation::RegisterDevice,
        Operation::DeviceHeartbeat,
        Operation::DeviceStatus,
        Operation::ListDevices,
        Operation::ReportDeviceError,
        Operation::StartSession,
        Operation::EndSession,
        Operation::AddDeviceToSession,
        Operation::CheckHealth,
        Operation::ListContent,
        Operation::GetContent,
        Operation::CreateContent,
        Operation::DeleteContent,
    ];

    pub fn method(self) -> HttpMethod {
        use Operation::*;
        match self {
            LatestDetection | DetectionFrame | DetectionStreamStatus | RouteStatus
            | ActiveObstacles | DeviceStatus | ListDevices | CheckHealth | ListContent
            | GetContent => HttpMethod::Get,
            StartNavigation | EndNavigation | ReportObstacle | RegisterDevice
            | DeviceHeartbeat | ReportDeviceError | StartSession | EndSession
            | AddDeviceToSession | CreateContent => HttpMethod::Post,
            UpdateLocation => HttpMethod::Put,
            DeleteContent => HttpMethod::Delete,
        }
    }

    /// Status codes this operation treats as success.
    pub fn accepted_statuses(self) -> &'static [u16] {
        match self.method() {
            HttpMethod::Get | HttpMethod::Post => &[200, 201],
            HttpMethod::Put => &[200],
            HttpMethod::Delete => &[200, 204],
        }
    }

    pub fn accepts(self, status: u16) -> bool {
        self.accepted_statuses().contains(&status)
    }

    /// Message reported with a successful outcome.
    pub fn success_message(self) -> &'static str {
        match self.method() {
            HttpMethod::Get => "Request successful",
            HttpMethod::Post => "Operation successful",
            HttpMethod::Put => "Update successful",
            HttpMethod::Delete => "Deletion successful",
        }
    }

    /// Stable snake_case name, used in logs and test vectors.
    pub fn name(self) -> &'static str {
        use Operation::*;
        match self {
            LatestDetection => "latest_detection",
            DetectionFrame => "detection_frame",
            DetectionStreamStatus => "detection_stream_status",
            StartNavigation => "start_navigation",
            RouteStatus => "route_status",
            UpdateLocation => "update_location",
            EndNavigation => "end_navigation",
            ReportObstacle => "report_obstacle",
            ActiveObstacles => "active_obstacles",
            RegisterDevice => "register_device",
            DeviceHeartbeat => "device_heartbeat",
            DeviceStatus => "device_status",
            ListDevices => "list_devices",
            ReportDeviceError => "report_device_error",
            StartSession => "start_session",
            EndSession => "end_session",
            AddDeviceToSession => "add_device_to_session",
            CheckHealth => "check_health",
            ListContent => "list_content",
            GetContent => "get_content",
            CreateContent => "create_content",
            DeleteContent => "delete_content",
        }
    }

    pub fn from_name(name: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// Check an outcome against the operation's success-code set and hand back
/// the response on success.
pub fn classify(operation: Operation, outcome: HttpOutcome) -> Result<HttpResponse, ApiError> {
    let response = outcome?;
    if operation.accepts(response.status) {
        return Ok(response);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body,
    })
}

impl OperationResult {
    /// Classify an outcome and flatten it into `(success, message)`.
    pub fn from_outcome(operation: Operation, outcome: HttpOutcome) -> Self {
        classify(operation, outcome)
            .map(|_| operation.success_message().to_string())
            .into()
    }
}

impl From<Result<String, ApiError>> for OperationResult {
    fn from(result: Result<String, ApiError>) -> Self {
        match result {
            Ok(message) => OperationResult {
                success: true,
                message,
            },
            Err(err) => OperationResult {
                success: false,
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;

    fn respond(status: u16, body: &str) -> HttpOutcome {
        Ok(HttpResponse::new(status, body))
    }

    #[test]
    fn transport_failure_fails_for_every_operation() {
        for op in Operation::ALL {
            let result = OperationResult::from_outcome(op, Err(TransportError::new("refused")));
            assert!(!result.success, "{}", op.name());
            assert!(!result.message.is_empty(), "{}", op.name());
        }
    }

    #[test]
    fn get_and_post_accept_200_and_201() {
        for op in Operation::ALL {
            if !matches!(op.method(), HttpMethod::Get | HttpMethod::Post) {
                continue;
            }
            assert!(OperationResult::from_outcome(op, respond(200, "")).success);
            assert!(OperationResult::from_outcome(op, respond(201, "")).success);
            let failed = OperationResult::from_outcome(op, respond(204, "nothing"));
            assert!(!failed.success, "{}", op.name());
            assert_eq!(failed.message, "HTTP 204: nothing");
        }
    }

    #[test]
    fn update_location_accepts_only_200() {
        let op = Operation::UpdateLocation;
        assert!(OperationResult::from_outcome(op, respond(200, "")).success);
        assert!(!OperationResult::from_outcome(op, respond(201, "")).success);
        assert!(!OperationResult::from_outcome(op, respond(204, "")).success);
    }

    #[test]
    fn delete_content_accepts_200_and_204() {
        let op = Operation::DeleteContent;
        let ok = OperationResult::from_outcome(op, respond(204, ""));
        assert!(ok.success);
        assert_eq!(ok.message, "Deletion successful");
        assert!(OperationResult::from_outcome(op, respond(200, "")).success);
        assert!(!OperationResult::from_outcome(op, respond(201, "")).success);
    }

    #[test]
    fn success_messages_follow_the_method() {
        let post = OperationResult::from_outcome(Operation::StartNavigation, respond(201, "{}"));
        assert_eq!(post.message, "Operation successful");
        let get = OperationResult::from_outcome(Operation::ListDevices, respond(200, "[]"));
        assert_eq!(get.message, "Request successful");
        let put = OperationResult::from_outcome(Operation::UpdateLocation, respond(200, "{}"));
        assert_eq!(put.message, "Update successful");
    }

    #[test]
    fn http_error_message_embeds_raw_body() {
        let result = OperationResult::from_outcome(
            Operation::DeviceStatus,
            respond(404, r#"{"detail":"Device dev9 not registered"}"#),
        );
        assert!(!result.success);
        assert_eq!(result.message, r#"HTTP 404: {"detail":"Device dev9 not registered"}"#);
    }

    #[test]
    fn names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name("teleport"), None);
    }
}
