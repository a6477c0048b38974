use super::{Call, SncClient};
use crate::error::ApiError;
use crate::http::HttpOutcome;
use crate::operation::{classify, Operation};
use crate::types::{DetectedObject, WireDetectionFrame};

impl SncClient {
    pub fn build_latest_detection(&self) -> Call {
        self.bodiless(Operation::LatestDetection, "/api/detection/latest")
    }

    pub fn build_detection_frame(&self, frame_id: &str) -> Call {
        self.bodiless(Operation::DetectionFrame, &format!("/api/detection/{frame_id}"))
    }

    pub fn build_detection_stream_status(&self) -> Call {
        self.bodiless(Operation::DetectionStreamStatus, "/api/detection/stream/latest")
    }

    /// Objects of the latest detection frame. A frame without an `objects`
    /// array yields an empty list.
    pub fn parse_latest_detection(&self, outcome: HttpOutcome) -> Result<Vec<DetectedObject>, ApiError> {
        let response = classify(Operation::LatestDetection, outcome)?;
        let frame: WireDetectionFrame =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Ok(frame.objects.into_iter().map(DetectedObject::from).collect())
    }
}
