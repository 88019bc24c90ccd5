pub mod analysis;
pub mod config;
pub mod engine;
pub mod insight;
pub mod scoring;
pub mod store;
pub mod themes;
pub mod user;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

pub use analysis::{analyze_connection_success, ConnectionAnalysis};
pub use engine::RecommendationEngine;
pub use user::{ExperienceLevel, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    UrgentSupport,
    PeerBuddy,
    Mentor,
    ResearchPartner,
}

impl RecommendationType {
    pub fn label(self) -> &'static str {
        match self {
            RecommendationType::UrgentSupport => "urgent_support",
            RecommendationType::PeerBuddy => "peer_buddy",
            RecommendationType::Mentor => "mentor",
            RecommendationType::ResearchPartner => "research_partner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    Struggling,
    #[default]
    Stable,
    Improving,
}

impl EmotionalState {
    pub fn label(self) -> &'static str {
        match self {
            EmotionalState::Struggling => "struggling",
            EmotionalState::Stable => "stable",
            EmotionalState::Improving => "improving",
        }
    }
}

/// Per-request signals about the requesting user. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationContext {
    pub recent_symptom_change: bool,
    pub emotional_state: EmotionalState,
    pub support_needs: Vec<String>,
    pub timestamp: i64,
    pub previous_connections: HashSet<String>,
}

/// The five sub-scores behind a compatibility score, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityBreakdown {
    pub symptom_overlap: f64,
    pub interest_alignment: f64,
    pub communication_match: f64,
    pub experience_match: f64,
    pub activity_match: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecommendation {
    pub user_id: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub compatibility: CompatibilityBreakdown,
    pub recommendation_type: RecommendationType,
    pub confidence: f64,
    pub ai_insight: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub from_user_id: String,
    pub to_user_id: String,
    pub connection_type: String,
    pub status: ConnectionStatus,
    pub created_at: i64,
}

pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(1.0)
}

pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(100.0)
}

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_handle_nan_and_bounds() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp_score(120.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
    }

    #[test]
    fn recommendation_type_serializes_snake_case() {
        let json = serde_json::to_string(&RecommendationType::UrgentSupport).unwrap();
        assert_eq!(json, "\"urgent_support\"");
        assert_eq!(RecommendationType::ResearchPartner.label(), "research_partner");
    }
}
