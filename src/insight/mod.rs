pub mod decode;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::themes::{extract_themes, theme_labels};
use crate::user::UserProfile;
use crate::RecommendationContext;

pub use decode::decode_adjustment;
pub use prompt::{system_prompt, user_prompt};

pub const MIN_FACTOR: f64 = 0.8;
pub const MAX_FACTOR: f64 = 1.2;
pub const FALLBACK_CONFIDENCE: f64 = 65.0;
pub const FALLBACK_INSIGHT: &str =
    "You share similar health experiences and could offer each other meaningful support.";

/// Model-produced nudge to a deterministic compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub insight: String,
    pub adjustment_factor: f64,
    pub confidence: f64,
    #[serde(default)]
    pub fallback: bool,
}

impl Adjustment {
    pub fn fallback() -> Self {
        Self {
            insight: FALLBACK_INSIGHT.to_string(),
            adjustment_factor: 1.0,
            confidence: FALLBACK_CONFIDENCE,
            fallback: true,
        }
    }

    pub fn bounded_factor(&self) -> f64 {
        if self.adjustment_factor.is_nan() {
            return 1.0;
        }
        self.adjustment_factor.max(MIN_FACTOR).min(MAX_FACTOR)
    }
}

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("insight provider not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("timed out after {0} ms")]
    Timeout(u64),
}

/// Everything the model sees about one requester/candidate pair.
#[derive(Debug, Clone, Serialize)]
pub struct InsightRequest {
    pub candidate_id: String,
    pub user_symptoms: Vec<String>,
    pub candidate_symptoms: Vec<String>,
    pub user_themes: Vec<String>,
    pub candidate_themes: Vec<String>,
    pub user_experience: String,
    pub candidate_experience: String,
    pub user_support: Vec<String>,
    pub candidate_support: Vec<String>,
    pub user_communication: String,
    pub candidate_communication: String,
    pub recent_symptom_change: bool,
    pub emotional_state: String,
    pub support_needs: Vec<String>,
    pub base_score: f64,
}

impl InsightRequest {
    pub fn new(
        user: &UserProfile,
        candidate: &UserProfile,
        context: &RecommendationContext,
        base_score: f64,
    ) -> Self {
        let themes_of = |profile: &UserProfile| -> Vec<String> {
            theme_labels(&extract_themes(profile.journal_texts()))
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        Self {
            candidate_id: candidate.user_id.clone(),
            user_symptoms: user.symptoms.clone(),
            candidate_symptoms: candidate.symptoms.clone(),
            user_themes: themes_of(user),
            candidate_themes: themes_of(candidate),
            user_experience: user.experience_level().to_string(),
            candidate_experience: candidate.experience_level().to_string(),
            user_support: user.preferences.support_types.clone(),
            candidate_support: candidate.preferences.support_types.clone(),
            user_communication: user.preferences.communication_style.clone(),
            candidate_communication: candidate.preferences.communication_style.clone(),
            recent_symptom_change: context.recent_symptom_change,
            emotional_state: context.emotional_state.label().to_string(),
            support_needs: context.support_needs.clone(),
            base_score,
        }
    }
}

/// A generative backend that can comment on, and nudge, a match.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn adjust(&self, request: &InsightRequest) -> Result<Adjustment, InsightError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_factor_clamps_extremes() {
        let mut adjustment = Adjustment::fallback();
        adjustment.adjustment_factor = 3.0;
        assert_eq!(adjustment.bounded_factor(), MAX_FACTOR);
        adjustment.adjustment_factor = 0.1;
        assert_eq!(adjustment.bounded_factor(), MIN_FACTOR);
        adjustment.adjustment_factor = f64::NAN;
        assert_eq!(adjustment.bounded_factor(), 1.0);
    }

    #[test]
    fn fallback_is_neutral_with_reduced_confidence() {
        let fallback = Adjustment::fallback();
        assert_eq!(fallback.adjustment_factor, 1.0);
        assert!(!fallback.insight.is_empty());
        assert!((60.0..=70.0).contains(&fallback.confidence));
        assert!(fallback.fallback);
    }
}
