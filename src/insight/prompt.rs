use crate::format_float;
use crate::insight::InsightRequest;

pub fn system_prompt() -> String {
    let prompt = r#"You assess how well two members of a patient community could support each other.
Return a single JSON object with these fields:
- insight (one or two warm, specific sentences addressed to the requesting member)
- adjustmentFactor (0.8..1.2; 1.0 leaves the compatibility score unchanged)
- confidence (0..100)
Rules:
- Output JSON only, no markdown or commentary.
- Never give medical advice or mention diagnoses not listed.
- Raise the factor when the candidate can meet the member's current support needs.
"#;
    prompt.to_string()
}

pub fn user_prompt(request: &InsightRequest) -> String {
    format!(
        "Requesting member:\n\
         - symptoms: {}\n\
         - journal themes: {}\n\
         - experience level: {}\n\
         - support preferences: {}\n\
         - communication style: {}\n\
         Candidate peer:\n\
         - symptoms: {}\n\
         - journal themes: {}\n\
         - experience level: {}\n\
         - support preferences: {}\n\
         - communication style: {}\n\
         Current context:\n\
         - recent symptom change: {}\n\
         - emotional state: {}\n\
         - current support needs: {}\n\
         Deterministic compatibility score: {}/100",
        join_or_none(&request.user_symptoms),
        join_or_none(&request.user_themes),
        or_unknown(&request.user_experience),
        join_or_none(&request.user_support),
        or_unknown(&request.user_communication),
        join_or_none(&request.candidate_symptoms),
        join_or_none(&request.candidate_themes),
        or_unknown(&request.candidate_experience),
        join_or_none(&request.candidate_support),
        or_unknown(&request.candidate_communication),
        if request.recent_symptom_change { "yes" } else { "no" },
        request.emotional_state,
        join_or_none(&request.support_needs),
        format_float(request.base_score, 1),
    )
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none listed".to_string()
    } else {
        values.join(", ")
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "unknown"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{EntryKind, ExperienceLevel, ProfileEntry, UserProfile};
    use crate::{EmotionalState, RecommendationContext};

    #[test]
    fn prompt_embeds_both_profiles_and_context() {
        let mut user = UserProfile::new("me");
        user.symptoms = vec!["itching".to_string(), "fatigue".to_string()];
        user.demographics.experience_level = ExperienceLevel::NewlyDiagnosed;
        user.recent_entries = vec![ProfileEntry {
            kind: EntryKind::Journal,
            text: "Couldn't sleep again".to_string(),
            created_at: 0,
        }];
        let mut candidate = UserProfile::new("peer");
        candidate.symptoms = vec!["itching".to_string()];
        candidate.preferences.communication_style = "casual".to_string();

        let context = RecommendationContext {
            recent_symptom_change: true,
            emotional_state: EmotionalState::Struggling,
            support_needs: vec!["Sleep strategies".to_string()],
            ..RecommendationContext::default()
        };

        let prompt = user_prompt(&InsightRequest::new(&user, &candidate, &context, 72.5));
        assert!(prompt.contains("symptoms: itching, fatigue"));
        assert!(prompt.contains("journal themes: sleep issues"));
        assert!(prompt.contains("journal themes: general wellness"));
        assert!(prompt.contains("experience level: newly_diagnosed"));
        assert!(prompt.contains("experience level: unknown"));
        assert!(prompt.contains("recent symptom change: yes"));
        assert!(prompt.contains("emotional state: struggling"));
        assert!(prompt.contains("current support needs: Sleep strategies"));
        assert!(prompt.contains("72.5/100"));
    }
}
