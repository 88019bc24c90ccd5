use serde::{Deserialize, Serialize};

use peer_match::{ConnectionAnalysis, ConnectionRecommendation};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUserRequest {
    pub user_id: Option<String>,
}

impl ApiUserRequest {
    pub fn user_id(&self) -> Result<String, String> {
        let user_id = self.user_id.as_deref().unwrap_or_default().trim();
        if user_id.is_empty() {
            return Err("userId is required".to_string());
        }
        Ok(user_id.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecommendationResponse {
    pub success: bool,
    pub recommendations: Vec<ConnectionRecommendation>,
    pub total_evaluated: usize,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalysisResponse {
    pub success: bool,
    pub analysis: ConnectionAnalysis,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
