use super::{Call, SncClient};
use crate::error::ApiError;
use crate::http::HttpOutcome;
use crate::operation::{classify, Operation};
use crate::types::{GpsLocation, NavigationInstruction, ObstacleReport, StartRoute, WireLocationUpdate};

impl SncClient {
    pub fn build_start_navigation(&self, origin: GpsLocation, destination: GpsLocation) -> Result<Call, ApiError> {
        let payload = StartRoute { origin, destination };
        self.json_call(Operation::StartNavigation, "/api/navigation/start-route", &payload)
    }

    pub fn build_route_status(&self, route_id: &str) -> Call {
        self.bodiless(Operation::RouteStatus, &format!("/api/navigation/route/{route_id}"))
    }

    pub fn build_update_location(&self, route_id: &str, current: GpsLocation) -> Result<Call, ApiError> {
        self.json_call(
            Operation::UpdateLocation,
            &format!("/api/navigation/route/{route_id}/update-location"),
            &current,
        )
    }

    pub fn build_end_navigation(&self, route_id: &str) -> Call {
        self.empty_post(Operation::EndNavigation, &format!("/api/navigation/route/{route_id}/end"))
    }

    pub fn build_report_obstacle(&self, report: &ObstacleReport) -> Result<Call, ApiError> {
        self.json_call(Operation::ReportObstacle, "/api/navigation/obstacle-alert", report)
    }

    pub fn build_active_obstacles(&self) -> Call {
        self.bodiless(Operation::ActiveObstacles, "/api/navigation/obstacles")
    }

    /// Next instruction after a location update. Only 200 counts as success.
    pub fn parse_update_location(&self, outcome: HttpOutcome) -> Result<NavigationInstruction, ApiError> {
        let response = classify(Operation::UpdateLocation, outcome)?;
        let update: WireLocationUpdate =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Ok(update.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{HttpMethod, HttpResponse};
    use crate::types::DEFAULT_INSTRUCTION;
    use crate::{ApiError, GpsLocation, ObstacleReport, Operation, SncClient};

    fn body_json(call: &crate::Call) -> serde_json::Value {
        serde_json::from_str(call.request.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_start_navigation_produces_nested_body() {
        let call = SncClient::default()
            .build_start_navigation(GpsLocation::new(1.0, 2.0), GpsLocation::new(3.0, 4.0))
            .unwrap();
        assert_eq!(call.operation, Operation::StartNavigation);
        assert_eq!(call.request.method, HttpMethod::Post);
        assert_eq!(call.request.url, "http://localhost:8000/api/navigation/start-route");
        assert_eq!(
            body_json(&call),
            serde_json::json!({
                "origin": {"latitude": 1.0, "longitude": 2.0},
                "destination": {"latitude": 3.0, "longitude": 4.0}
            })
        );
    }

    #[test]
    fn build_update_location_is_put() {
        let call = SncClient::default()
            .build_update_location("route_3", GpsLocation::new(51.5, -0.12))
            .unwrap();
        assert_eq!(call.request.method, HttpMethod::Put);
        assert_eq!(
            call.request.url,
            "http://localhost:8000/api/navigation/route/route_3/update-location"
        );
        assert_eq!(body_json(&call), serde_json::json!({"latitude": 51.5, "longitude": -0.12}));
    }

    #[test]
    fn build_end_navigation_sends_empty_object() {
        let call = SncClient::default().build_end_navigation("route_3");
        assert_eq!(call.request.url, "http://localhost:8000/api/navigation/route/route_3/end");
        assert_eq!(call.request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn build_report_obstacle_uses_snake_case() {
        let report = ObstacleReport {
            alert_type: "pothole".to_string(),
            severity: "high".to_string(),
            description: "Open drain ahead".to_string(),
        };
        let call = SncClient::default().build_report_obstacle(&report).unwrap();
        let body = body_json(&call);
        assert_eq!(body["alert_type"], "pothole");
        assert_eq!(body["severity"], "high");
        assert_eq!(body["description"], "Open drain ahead");
    }

    #[test]
    fn build_status_and_obstacle_queries() {
        let client = SncClient::default();
        assert_eq!(
            client.build_route_status("route_1").request.url,
            "http://localhost:8000/api/navigation/route/route_1"
        );
        assert_eq!(
            client.build_active_obstacles().request.url,
            "http://localhost:8000/api/navigation/obstacles"
        );
    }

    #[test]
    fn parse_update_location_reads_instruction() {
        let body = r#"{"route_id":"route_1","current_instruction":"Turn right onto Market Avenue","step_number":2,"distance_remaining":1150,"duration_remaining":870,"status":"active"}"#;
        let instruction = SncClient::default()
            .parse_update_location(Ok(HttpResponse::new(200, body)))
            .unwrap();
        assert_eq!(instruction.instruction, "Turn right onto Market Avenue");
        assert_eq!(instruction.distance_meters, 1150.0);
        assert_eq!(instruction.duration_seconds, 870);
    }

    #[test]
    fn parse_update_location_falls_back_to_default_instruction() {
        let instruction = SncClient::default()
            .parse_update_location(Ok(HttpResponse::new(200, "{}")))
            .unwrap();
        assert_eq!(instruction.instruction, DEFAULT_INSTRUCTION);
    }

    #[test]
    fn parse_update_location_rejects_201() {
        let err = SncClient::default()
            .parse_update_location(Ok(HttpResponse::new(201, "{}")))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 201, .. }));
    }
}
