use crate::user::{ExperienceLevel, UserProfile};
use crate::RecommendationType;

const URGENT_SUPPORT_TYPES: [&str; 2] = ["Crisis support", "Emotional support"];
const RESEARCH_INTEREST: &str = "Research participation";

/// Assigns a match type. Rules are checked in order and the first hit wins.
pub fn classify(user: &UserProfile, candidate: &UserProfile) -> RecommendationType {
    let wants_urgent = user
        .preferences
        .support_types
        .iter()
        .any(|support| URGENT_SUPPORT_TYPES.contains(&support.as_str()));
    if wants_urgent {
        return RecommendationType::UrgentSupport;
    }

    if *user.experience_level() == ExperienceLevel::NewlyDiagnosed
        && *candidate.experience_level() == ExperienceLevel::LongTerm
    {
        return RecommendationType::Mentor;
    }

    let shares_research = |profile: &UserProfile| {
        profile
            .preferences
            .interests
            .iter()
            .any(|interest| interest == RESEARCH_INTEREST)
    };
    if shares_research(user) && shares_research(candidate) {
        return RecommendationType::ResearchPartner;
    }

    RecommendationType::PeerBuddy
}
