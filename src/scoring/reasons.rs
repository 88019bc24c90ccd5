use crate::user::UserProfile;
use crate::CompatibilityBreakdown;

pub const MAX_REASONS: usize = 4;

/// Human-readable justifications for a match, strongest signal first.
pub fn generate_reasons(
    user: &UserProfile,
    candidate: &UserProfile,
    breakdown: &CompatibilityBreakdown,
) -> Vec<String> {
    let mut reasons = Vec::with_capacity(MAX_REASONS);

    if breakdown.symptom_overlap > 0.6 {
        reasons.push(format!(
            "{}% symptom overlap - similar experiences",
            (breakdown.symptom_overlap * 100.0).round() as i64
        ));
    }
    if breakdown.interest_alignment > 0.5 {
        reasons.push("Shared interests and hobbies".to_string());
    }
    if breakdown.communication_match == 1.0 {
        reasons.push("Compatible communication styles".to_string());
    }
    if breakdown.experience_match > 0.7 {
        reasons.push("Similar stage in their health journey".to_string());
    }
    if candidate.activity.response_rate > 0.8 {
        reasons.push("Highly responsive community member".to_string());
    }

    let shared_support = user
        .preferences
        .support_types
        .iter()
        .find(|support| candidate.preferences.support_types.contains(support));
    if let Some(support) = shared_support {
        reasons.push(format!("Both value {}", support.to_lowercase()));
    }

    reasons.truncate(MAX_REASONS);
    reasons
}
