//! Records kept by the mock backend and the payloads it accepts.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GpsLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DetectedObject {
    pub object_id: String,
    pub label: String,
    pub confidence: f32,
    pub distance: Option<f32>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DetectionFrame {
    pub frame_id: String,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
}

#[derive(Deserialize)]
pub struct StartRoute {
    pub origin: GpsLocation,
    pub destination: GpsLocation,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub route_id: String,
    pub origin: GpsLocation,
    pub destination: GpsLocation,
    pub current_location: Option<GpsLocation>,
    pub instructions: Vec<String>,
    pub distance_remaining: f32,
    pub duration_remaining: i32,
    pub current_step: usize,
    pub status: String,
}

#[derive(Deserialize)]
pub struct ObstacleReport {
    pub alert_type: String,
    pub severity: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObstacleAlert {
    pub alert_id: String,
    pub alert_type: String,
    pub severity: String,
    pub description: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct DeviceRegistration {
    pub device_id: String,
    pub device_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    pub device_type: String,
    pub connectivity: String,
    pub battery_level: f32,
    pub errors: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: Option<String>,
    pub active_devices: Vec<String>,
    pub navigation_mode: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct NewArContent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ArContent {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub content_type: String,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct HeartbeatQuery {
    pub battery_level: Option<f32>,
}

#[derive(Deserialize)]
pub struct DeviceErrorQuery {
    pub error_message: String,
}

#[derive(Deserialize)]
pub struct StartSessionQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct AddDeviceQuery {
    pub device_id: String,
}
