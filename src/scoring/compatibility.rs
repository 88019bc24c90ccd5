use std::collections::HashSet;

use crate::user::{ExperienceLevel, UserProfile};
use crate::{clamp01, CompatibilityBreakdown};

/// Relative weight of each sub-score in the base compatibility score.
///
/// The defaults are a fixed product decision; symptom overlap dominates and
/// activity only breaks near-ties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompatibilityWeights {
    pub symptom_overlap: f64,
    pub interest_alignment: f64,
    pub communication_match: f64,
    pub experience_match: f64,
    pub activity_match: f64,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            symptom_overlap: 0.35,
            interest_alignment: 0.25,
            communication_match: 0.15,
            experience_match: 0.15,
            activity_match: 0.10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompatibilityScorer {
    weights: CompatibilityWeights,
}

impl CompatibilityScorer {
    pub fn new(weights: CompatibilityWeights) -> Self {
        Self { weights }
    }

    pub fn breakdown(&self, user: &UserProfile, candidate: &UserProfile) -> CompatibilityBreakdown {
        CompatibilityBreakdown {
            symptom_overlap: symptom_overlap(&user.symptoms, &candidate.symptoms),
            interest_alignment: interest_alignment(
                &user.preferences.interests,
                &candidate.preferences.interests,
            ),
            communication_match: communication_match(
                &user.preferences.communication_style,
                &candidate.preferences.communication_style,
            ),
            experience_match: experience_match(
                user.experience_level(),
                candidate.experience_level(),
            ),
            activity_match: activity_match(
                user.activity.engagement_score,
                candidate.activity.engagement_score,
            ),
        }
    }

    /// Base score in `[0, 100]`.
    pub fn score(&self, breakdown: &CompatibilityBreakdown) -> f64 {
        let weighted = breakdown.symptom_overlap * self.weights.symptom_overlap
            + breakdown.interest_alignment * self.weights.interest_alignment
            + breakdown.communication_match * self.weights.communication_match
            + breakdown.experience_match * self.weights.experience_match
            + breakdown.activity_match * self.weights.activity_match;
        (weighted * 100.0).max(0.0).min(100.0)
    }
}

pub fn symptom_overlap(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let shared = set_a.intersection(&set_b).count();
    let denominator = set_a.len().max(set_b.len()).max(1);
    clamp01(shared as f64 / denominator as f64)
}

/// Share of the requester's interests that the candidate also lists.
pub fn interest_alignment(user: &[String], candidate: &[String]) -> f64 {
    let set_user: HashSet<&str> = user.iter().map(String::as_str).collect();
    let set_candidate: HashSet<&str> = candidate.iter().map(String::as_str).collect();
    let shared = set_user.intersection(&set_candidate).count();
    clamp01(shared as f64 / set_user.len().max(1) as f64)
}

pub fn communication_match(a: &str, b: &str) -> f64 {
    if a == b {
        1.0
    } else {
        0.5
    }
}

pub fn experience_match(a: &ExperienceLevel, b: &ExperienceLevel) -> f64 {
    match (a.rank(), b.rank()) {
        (Some(x), Some(y)) => match x.abs_diff(y) {
            0 => 1.0,
            1 => 0.7,
            _ => 0.4,
        },
        _ => 0.5,
    }
}

pub fn activity_match(a: f64, b: f64) -> f64 {
    clamp01(1.0 - (a - b).abs() / 100.0)
}
