use super::{encode_query_value, Call, SncClient};
use crate::error::ApiError;
use crate::operation::Operation;
use crate::types::DeviceRegistration;

impl SncClient {
    pub fn build_register_device(&self, device_id: &str, device_type: &str) -> Result<Call, ApiError> {
        let payload = DeviceRegistration {
            device_id: device_id.to_string(),
            device_type: device_type.to_string(),
        };
        self.json_call(Operation::RegisterDevice, "/api/device/register", &payload)
    }

    /// Battery level travels as a query parameter with one decimal place.
    pub fn build_device_heartbeat(&self, device_id: &str, battery_level: f32) -> Call {
        self.empty_post(
            Operation::DeviceHeartbeat,
            &format!("/api/device/heartbeat/{device_id}?battery_level={battery_level:.1}"),
        )
    }

    pub fn build_device_status(&self, device_id: &str) -> Call {
        self.bodiless(Operation::DeviceStatus, &format!("/api/device/{device_id}"))
    }

    pub fn build_list_devices(&self) -> Call {
        self.bodiless(Operation::ListDevices, "/api/device/list")
    }

    pub fn build_report_device_error(&self, device_id: &str, error_message: &str) -> Call {
        self.empty_post(
            Operation::ReportDeviceError,
            &format!(
                "/api/device/{device_id}/error?error_message={}",
                encode_query_value(error_message)
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{HttpMethod, HttpResponse};
    use crate::{Operation, SncClient};

    #[test]
    fn build_register_device_body() {
        let call = SncClient::default().build_register_device("cane-01", "arduino").unwrap();
        assert_eq!(call.request.method, HttpMethod::Post);
        assert_eq!(call.request.url, "http://localhost:8000/api/device/register");
        let body: serde_json::Value = serde_json::from_str(call.request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"device_id": "cane-01", "device_type": "arduino"}));
    }

    #[test]
    fn build_device_heartbeat_formats_battery() {
        let call = SncClient::default().build_device_heartbeat("cam-2", 42.0);
        assert_eq!(
            call.request.url,
            "http://localhost:8000/api/device/heartbeat/cam-2?battery_level=42.0"
        );
        assert_eq!(call.request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn build_report_device_error_encodes_message() {
        let call = SncClient::default().build_report_device_error("dev1", "battery low");
        assert_eq!(call.operation, Operation::ReportDeviceError);
        assert_eq!(call.request.method, HttpMethod::Post);
        assert_eq!(
            call.request.url,
            "http://localhost:8000/api/device/dev1/error?error_message=battery%20low"
        );
        assert_eq!(call.request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn report_device_error_failure_embeds_status_and_body() {
        let client = SncClient::default();
        let call = client.build_report_device_error("dev1", "battery low");
        let result = client.parse_operation(
            call.operation,
            Ok(HttpResponse::new(404, r#"{"detail":"Device dev1 not registered"}"#)),
        );
        assert!(!result.success);
        assert!(result.message.contains("404"));
        assert!(result.message.contains("Device dev1 not registered"));
    }

    #[test]
    fn build_status_and_list() {
        let client = SncClient::default();
        assert_eq!(
            client.build_device_status("cane-01").request.url,
            "http://localhost:8000/api/device/cane-01"
        );
        assert_eq!(client.build_list_devices().request.url, "http://localhost:8000/api/device/list");
    }
}
