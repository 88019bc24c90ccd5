use std::cmp::Ordering;

use crate::insight::Adjustment;
use crate::scoring::{classify, generate_reasons, CompatibilityScorer};
use crate::user::UserProfile;
use crate::{clamp_score, CompatibilityBreakdown, ConnectionRecommendation, RecommendationType};

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub user_id: String,
    pub breakdown: CompatibilityBreakdown,
    pub base_score: f64,
    pub recommendation_type: RecommendationType,
    pub reasons: Vec<String>,
    pub adjustment: Adjustment,
    pub score: f64,
}

impl ScoredCandidate {
    /// Applies the model adjustment; the factor is bounded before use.
    pub fn apply(&mut self, adjustment: Adjustment) {
        self.score = clamp_score(self.base_score * adjustment.bounded_factor());
        self.adjustment = adjustment;
    }

    pub fn into_recommendation(self) -> ConnectionRecommendation {
        ConnectionRecommendation {
            user_id: self.user_id,
            score: self.score,
            reasons: self.reasons,
            compatibility: self.breakdown,
            recommendation_type: self.recommendation_type,
            confidence: self.adjustment.confidence,
            ai_insight: self.adjustment.insight,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    scorer: CompatibilityScorer,
}

impl ScoringPipeline {
    pub fn new(scorer: CompatibilityScorer) -> Self {
        Self { scorer }
    }

    /// Deterministic part of the score, before any model adjustment.
    pub fn score_candidate(&self, user: &UserProfile, candidate: &UserProfile) -> ScoredCandidate {
        let breakdown = self.scorer.breakdown(user, candidate);
        let base_score = self.scorer.score(&breakdown);
        ScoredCandidate {
            user_id: candidate.user_id.clone(),
            breakdown,
            base_score,
            recommendation_type: classify(user, candidate),
            reasons: generate_reasons(user, candidate, &breakdown),
            adjustment: Adjustment::fallback(),
            score: base_score,
        }
    }

    /// Stable descending sort by final score, truncated to `top_k`.
    pub fn rank(
        &self,
        mut candidates: Vec<ScoredCandidate>,
        top_k: usize,
    ) -> Vec<ConnectionRecommendation> {
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates.truncate(top_k);
        candidates
            .into_iter()
            .map(ScoredCandidate::into_recommendation)
            .collect()
    }
}
