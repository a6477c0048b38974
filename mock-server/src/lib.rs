pub mod models;

use std::{collections::BTreeMap, collections::HashMap, sync::Arc, time::SystemTime};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

use models::*;

const ROUTE_INSTRUCTIONS: [&str; 4] = [
    "Head north on Main Street for 500 meters",
    "Turn right onto Market Avenue",
    "Continue for 300 meters to destination",
    "Destination is on your left",
];
const ROUTE_DISTANCE_M: f32 = 1200.0;
const ROUTE_DURATION_S: i32 = 900;

#[derive(Default)]
pub struct Backend {
    frames: Vec<DetectionFrame>,
    routes: Vec<Route>,
    alerts: Vec<ObstacleAlert>,
    devices: HashMap<String, Device>,
    sessions: Vec<Session>,
    contents: BTreeMap<i32, ArContent>,
    next_route: u32,
    next_alert: u32,
    next_session: u32,
    next_content: i32,
}

pub type Db = Arc<RwLock<Backend>>;

type Reply<T> = Result<T, (StatusCode, Json<Value>)>;

fn not_found(detail: String) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": detail })))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::default()));
    Router::new()
        .route("/health", get(health))
        .route("/api/detection/latest", get(latest_detection))
        .route("/api/detection/process", post(process_detection))
        .route("/api/detection/stream/latest", get(detection_stream))
        .route("/api/detection/{frame_id}", get(detection_frame))
        .route("/api/navigation/start-route", post(start_route))
        .route("/api/navigation/route/{route_id}", get(route_status))
        .route("/api/navigation/route/{route_id}/update-location", put(update_location))
        .route("/api/navigation/route/{route_id}/end", post(end_route))
        .route("/api/navigation/obstacle-alert", post(report_obstacle))
        .route("/api/navigation/obstacles", get(active_obstacles))
        .route("/api/device/register", post(register_device))
        .route("/api/device/heartbeat/{device_id}", post(heartbeat))
        .route("/api/device/list", get(list_devices))
        .route("/api/device/{device_id}", get(device_status))
        .route("/api/device/{device_id}/error", post(device_error))
        .route("/api/session/start", post(start_session))
        .route("/api/session/{session_id}/end", post(end_session))
        .route("/api/session/{session_id}/add-device", post(add_device_to_session))
        .route("/api/content", get(list_content).post(create_content))
        .route("/api/content/{id}", get(get_content).delete(delete_content))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "version": "1.0.0" }))
}

// --- detection ---

async fn latest_detection(State(db): State<Db>) -> Reply<Json<DetectionFrame>> {
    let backend = db.read().await;
    backend
        .frames
        .last()
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("No detection results available".to_string()))
}

async fn process_detection(State(db): State<Db>, Json(frame): Json<DetectionFrame>) -> Json<DetectionFrame> {
    tracing::info!(frame_id = %frame.frame_id, objects = frame.objects.len(), "stored detection frame");
    db.write().await.frames.push(frame.clone());
    Json(frame)
}

async fn detection_stream(State(db): State<Db>) -> Json<Value> {
    let backend = db.read().await;
    match backend.frames.last() {
        None => Json(json!({ "status": "no_data", "message": "No detection data available yet" })),
        Some(latest) => Json(json!({
            "status": "active",
            "latest_frame_id": latest.frame_id,
            "object_count": latest.objects.len(),
        })),
    }
}

async fn detection_frame(State(db): State<Db>, Path(frame_id): Path<String>) -> Reply<Json<DetectionFrame>> {
    let backend = db.read().await;
    backend
        .frames
        .iter()
        .find(|f| f.frame_id == frame_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("Frame {frame_id} not found")))
}

// --- navigation ---

async fn start_route(State(db): State<Db>, Json(input): Json<StartRoute>) -> (StatusCode, Json<Value>) {
    let mut backend = db.write().await;
    backend.next_route += 1;
    let route = Route {
        route_id: format!("route_{}", backend.next_route),
        origin: input.origin,
        destination: input.destination,
        current_location: None,
        instructions: ROUTE_INSTRUCTIONS.iter().map(|s| s.to_string()).collect(),
        distance_remaining: ROUTE_DISTANCE_M,
        duration_remaining: ROUTE_DURATION_S,
        current_step: 0,
        status: "active".to_string(),
    };
    tracing::info!(route_id = %route.route_id, "route started");
    let reply = json!({
        "route_id": route.route_id,
        "status": "started",
        "total_distance": route.distance_remaining,
        "estimated_duration": route.duration_remaining,
        "instructions": route.instructions,
    });
    backend.routes.push(route);
    (StatusCode::CREATED, Json(reply))
}

async fn route_status(State(db): State<Db>, Path(route_id): Path<String>) -> Reply<Json<Route>> {
    let backend = db.read().await;
    backend
        .routes
        .iter()
        .find(|r| r.route_id == route_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("Route {route_id} not found")))
}

async fn update_location(
    State(db): State<Db>,
    Path(route_id): Path<String>,
    Json(location): Json<GpsLocation>,
) -> Reply<Json<Value>> {
    let mut backend = db.write().await;
    let route = backend
        .routes
        .iter_mut()
        .find(|r| r.route_id == route_id)
        .ok_or_else(|| not_found(format!("Route {route_id} not found")))?;

    route.current_location = Some(location);
    route.distance_remaining = (route.distance_remaining - 50.0).max(0.0);
    route.duration_remaining = (route.duration_remaining - 30).max(0);
    if route.distance_remaining < 100.0 && route.current_step + 1 < route.instructions.len() {
        route.current_step += 1;
    }
    if route.distance_remaining == 0.0 {
        route.status = "completed".to_string();
    }

    Ok(Json(json!({
        "route_id": route.route_id,
        "current_instruction": route.instructions[route.current_step],
        "step_number": route.current_step + 1,
        "total_steps": route.instructions.len(),
        "distance_remaining": route.distance_remaining,
        "duration_remaining": route.duration_remaining,
        "status": route.status,
    })))
}

async fn end_route(State(db): State<Db>, Path(route_id): Path<String>) -> Reply<Json<Value>> {
    let mut backend = db.write().await;
    let route = backend
        .routes
        .iter_mut()
        .find(|r| r.route_id == route_id)
        .ok_or_else(|| not_found(format!("Route {route_id} not found")))?;
    route.status = "completed".to_string();
    Ok(Json(json!({
        "route_id": route.route_id,
        "status": "completed",
        "message": "Route navigation completed",
    })))
}

async fn report_obstacle(
    State(db): State<Db>,
    Json(report): Json<ObstacleReport>,
) -> (StatusCode, Json<ObstacleAlert>) {
    let mut backend = db.write().await;
    backend.next_alert += 1;
    let alert = ObstacleAlert {
        alert_id: format!("alert_{}", backend.next_alert),
        alert_type: report.alert_type,
        severity: report.severity,
        description: report.description,
        status: "active".to_string(),
    };
    tracing::info!(alert_id = %alert.alert_id, severity = %alert.severity, "obstacle reported");
    backend.alerts.push(alert.clone());
    (StatusCode::CREATED, Json(alert))
}

async fn active_obstacles(State(db): State<Db>) -> Json<Vec<ObstacleAlert>> {
    let backend = db.read().await;
    Json(backend.alerts.iter().filter(|a| a.status == "active").cloned().collect())
}

// --- devices ---

async fn register_device(
    State(db): State<Db>,
    Json(input): Json<DeviceRegistration>,
) -> (StatusCode, Json<Value>) {
    let device = Device {
        device_id: input.device_id.clone(),
        device_type: input.device_type,
        connectivity: "online".to_string(),
        battery_level: 100.0,
        errors: Vec::new(),
    };
    tracing::info!(device_id = %device.device_id, device_type = %device.device_type, "device registered");
    db.write().await.devices.insert(device.device_id.clone(), device);
    (
        StatusCode::CREATED,
        Json(json!({
            "status": "registered",
            "device_id": input.device_id,
            "message": format!("Device {} registered successfully", input.device_id),
        })),
    )
}

async fn heartbeat(
    State(db): State<Db>,
    Path(device_id): Path<String>,
    Query(query): Query<HeartbeatQuery>,
) -> Reply<Json<Value>> {
    let mut backend = db.write().await;
    let device = backend
        .devices
        .get_mut(&device_id)
        .ok_or_else(|| not_found(format!("Device {device_id} not registered")))?;
    device.connectivity = "online".to_string();
    if let Some(level) = query.battery_level {
        device.battery_level = level;
    }
    Ok(Json(json!({ "status": "acknowledged", "device_id": device_id })))
}

async fn list_devices(State(db): State<Db>) -> Json<Vec<Device>> {
    let backend = db.read().await;
    let mut devices: Vec<Device> = backend.devices.values().cloned().collect();
    devices.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    Json(devices)
}

async fn device_status(State(db): State<Db>, Path(device_id): Path<String>) -> Reply<Json<Device>> {
    let backend = db.read().await;
    backend
        .devices
        .get(&device_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("Device {device_id} not registered")))
}

async fn device_error(
    State(db): State<Db>,
    Path(device_id): Path<String>,
    Query(query): Query<DeviceErrorQuery>,
) -> Reply<Json<Value>> {
    let mut backend = db.write().await;
    let device = backend
        .devices
        .get_mut(&device_id)
        .ok_or_else(|| not_found(format!("Device {device_id} not registered")))?;
    if !device.errors.contains(&query.error_message) {
        device.errors.push(query.error_message.clone());
    }
    tracing::warn!(device_id = %device_id, error = %query.error_message, "device error reported");
    Ok(Json(json!({
        "status": "error_recorded",
        "device_id": device_id,
        "error": query.error_message,
    })))
}

// --- sessions ---

async fn start_session(
    State(db): State<Db>,
    Query(query): Query<StartSessionQuery>,
) -> (StatusCode, Json<Session>) {
    let mut backend = db.write().await;
    backend.next_session += 1;
    let session = Session {
        session_id: format!("session_{}", backend.next_session),
        user_id: query.user_id,
        active_devices: Vec::new(),
        navigation_mode: "idle".to_string(),
        status: "active".to_string(),
    };
    backend.sessions.push(session.clone());
    (StatusCode::CREATED, Json(session))
}

async fn end_session(State(db): State<Db>, Path(session_id): Path<String>) -> Reply<Json<Session>> {
    let mut backend = db.write().await;
    let session = backend
        .sessions
        .iter_mut()
        .find(|s| s.session_id == session_id)
        .ok_or_else(|| not_found(format!("Session {session_id} not found")))?;
    session.status = "completed".to_string();
    Ok(Json(session.clone()))
}

async fn add_device_to_session(
    State(db): State<Db>,
    Path(session_id): Path<String>,
    Query(query): Query<AddDeviceQuery>,
) -> Reply<Json<Session>> {
    let mut backend = db.write().await;
    let known = backend.devices.contains_key(&query.device_id);
    let session = backend
        .sessions
        .iter_mut()
        .find(|s| s.session_id == session_id)
        .ok_or_else(|| not_found(format!("Session {session_id} not found")))?;
    if known && !session.active_devices.contains(&query.device_id) {
        session.active_devices.push(query.device_id);
    }
    Ok(Json(session.clone()))
}

// --- AR content ---

async fn list_content(State(db): State<Db>) -> Json<Vec<ArContent>> {
    let backend = db.read().await;
    Json(backend.contents.values().cloned().collect())
}

async fn create_content(
    State(db): State<Db>,
    Json(input): Json<NewArContent>,
) -> (StatusCode, Json<ArContent>) {
    let mut backend = db.write().await;
    backend.next_content += 1;
    let created_at = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let content = ArContent {
        id: backend.next_content,
        name: input.name,
        description: input.description,
        content_type: input.content_type,
        created_at: created_at.to_string(),
    };
    backend.contents.insert(content.id, content.clone());
    (StatusCode::CREATED, Json(content))
}

async fn get_content(State(db): State<Db>, Path(id): Path<i32>) -> Reply<Json<ArContent>> {
    let backend = db.read().await;
    backend
        .contents
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("Content {id} not found")))
}

async fn delete_content(State(db): State<Db>, Path(id): Path<i32>) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut backend = db.write().await;
    backend
        .contents
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found(format!("Content {id} not found")))
}
