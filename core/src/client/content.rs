use super::{Call, SncClient};
use crate::error::ApiError;
use crate::http::HttpOutcome;
use crate::operation::{classify, Operation};
use crate::types::{ArContent, NewArContent};

impl SncClient {
    pub fn build_check_health(&self) -> Call {
        self.bodiless(Operation::CheckHealth, "/health")
    }

    pub fn build_list_content(&self) -> Call {
        self.bodiless(Operation::ListContent, "/api/content")
    }

    pub fn build_get_content(&self, id: i32) -> Call {
        self.bodiless(Operation::GetContent, &format!("/api/content/{id}"))
    }

    pub fn build_create_content(&self, input: &NewArContent) -> Result<Call, ApiError> {
        self.json_call(Operation::CreateContent, "/api/content", input)
    }

    pub fn build_delete_content(&self, id: i32) -> Call {
        self.bodiless(Operation::DeleteContent, &format!("/api/content/{id}"))
    }

    pub fn parse_list_content(&self, outcome: HttpOutcome) -> Result<Vec<ArContent>, ApiError> {
        let response = classify(Operation::ListContent, outcome)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_get_content(&self, outcome: HttpOutcome) -> Result<ArContent, ApiError> {
        let response = classify(Operation::GetContent, outcome)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}
