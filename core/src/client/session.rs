use super::{encode_query_value, Call, SncClient};
use crate::operation::Operation;

impl SncClient {
    pub fn build_start_session(&self, user_id: &str) -> Call {
        self.empty_post(
            Operation::StartSession,
            &format!("/api/session/start?user_id={}", encode_query_value(user_id)),
        )
    }

    pub fn build_end_session(&self, session_id: &str) -> Call {
        self.empty_post(Operation::EndSession, &format!("/api/session/{session_id}/end"))
    }

    pub fn build_add_device_to_session(&self, session_id: &str, device_id: &str) -> Call {
        self.empty_post(
            Operation::AddDeviceToSession,
            &format!(
                "/api/session/{session_id}/add-device?device_id={}",
                encode_query_value(device_id)
            ),
        )
    }
}
