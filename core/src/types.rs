//! Domain DTOs for the Smart Navigation Cane and AR content APIs.
//!
//! # Design
//! Request payloads serialize to the backend's snake_case field names.
//! Result types (`DetectedObject`, `NavigationInstruction`, `ArContent`) are
//! what callers receive; the private `Wire*` types describe the response
//! bodies and tolerate missing fields, so a sparse response still parses.

use serde::{Deserialize, Serialize};

/// Fallback instruction when an update-location response carries none.
pub const DEFAULT_INSTRUCTION: &str = "Continue to next waypoint";

/// A latitude/longitude pair as sent to the navigation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Request payload for starting a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartRoute {
    pub origin: GpsLocation,
    pub destination: GpsLocation,
}

/// Request payload for reporting an obstacle or hazard on the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleReport {
    pub alert_type: String,
    pub severity: String,
    pub description: String,
}

/// Request payload for registering a cane, camera or phone with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    pub device_id: String,
    pub device_type: String,
}

/// Request payload for creating AR content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArContent {
    pub name: String,
    pub description: String,
    pub content_type: String,
}

/// Flattened outcome of a generic endpoint: a canned success message, or a
/// diagnostic describing the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

/// An object reported by the camera detection pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectedObject {
    pub object_id: String,
    pub label: String,
    pub confidence: f32,
    /// Meters; `0.0` when the backend gave no estimate.
    pub distance: f32,
    pub position_x: String,
    pub position_y: String,
}

/// Next step of an active route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationInstruction {
    pub instruction: String,
    pub distance_meters: f32,
    pub duration_seconds: i32,
}

/// A stored piece of AR content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArContent {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct WireDetectionFrame {
    #[serde(default)]
    pub objects: Vec<WireDetectedObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDetectedObject {
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confidence: f32,
    pub distance: Option<f32>,
    pub position: Option<WirePosition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePosition {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl From<WireDetectedObject> for DetectedObject {
    fn from(wire: WireDetectedObject) -> Self {
        let (x, y) = match wire.position {
            Some(p) => (p.x, p.y),
            None => (None, None),
        };
        DetectedObject {
            object_id: wire.object_id,
            label: wire.label,
            confidence: wire.confidence,
            distance: wire.distance.unwrap_or(0.0),
            position_x: x.map(|v| v.to_string()).unwrap_or_default(),
            position_y: y.map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLocationUpdate {
    pub current_instruction: Option<String>,
    #[serde(default)]
    pub distance_remaining: f32,
    #[serde(default)]
    pub duration_remaining: i32,
}

impl From<WireLocationUpdate> for NavigationInstruction {
    fn from(wire: WireLocationUpdate) -> Self {
        NavigationInstruction {
            instruction: wire
                .current_instruction
                .unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string()),
            distance_meters: wire.distance_remaining,
            duration_seconds: wire.duration_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_route_serializes_nested_locations() {
        let body = StartRoute {
            origin: GpsLocation::new(1.0, 2.0),
            destination: GpsLocation::new(3.0, 4.0),
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["origin"]["latitude"], 1.0);
        assert_eq!(json["destination"]["longitude"], 4.0);
    }

    #[test]
    fn detected_object_without_position_or_distance() {
        let wire: WireDetectedObject =
            serde_json::from_str(r#"{"object_id":"o1","label":"curb","confidence":0.9}"#).unwrap();
        let object = DetectedObject::from(wire);
        assert_eq!(object.label, "curb");
        assert_eq!(object.distance, 0.0);
        assert!(object.position_x.is_empty());
        assert!(object.position_y.is_empty());
    }

    #[test]
    fn detected_object_position_becomes_strings() {
        let wire: WireDetectedObject = serde_json::from_str(
            r#"{"object_id":"o2","label":"person","confidence":0.5,"distance":2.5,"position":{"x":120,"y":64.5}}"#,
        )
        .unwrap();
        let object = DetectedObject::from(wire);
        assert_eq!(object.distance, 2.5);
        assert_eq!(object.position_x, "120");
        assert_eq!(object.position_y, "64.5");
    }

    #[test]
    fn location_update_defaults_instruction() {
        let wire: WireLocationUpdate = serde_json::from_str(r#"{"distance_remaining":50}"#).unwrap();
        let instruction = NavigationInstruction::from(wire);
        assert_eq!(instruction.instruction, DEFAULT_INSTRUCTION);
        assert_eq!(instruction.distance_meters, 50.0);
        assert_eq!(instruction.duration_seconds, 0);
    }
}
