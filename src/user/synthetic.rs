use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::user::context::engagement_score;
use crate::user::profile::{
    ActivityMetrics, Demographics, EntryKind, ExperienceLevel, Preferences, PrivacyLevel,
    ProfileEntry, UserProfile,
};
use crate::{ConnectionRequest, ConnectionStatus};

const HOUR_MS: i64 = 60 * 60 * 1000;
const MAX_ENTRIES: usize = 12;

const SYMPTOMS: [&str; 10] = [
    "itching",
    "fatigue",
    "brain fog",
    "joint pain",
    "insomnia",
    "rash",
    "nausea",
    "headache",
    "anxiety",
    "dry skin",
];

const INTERESTS: [&str; 8] = [
    "Research participation",
    "Nutrition",
    "Mindfulness",
    "Exercise",
    "Art therapy",
    "Advocacy",
    "Gardening",
    "Reading",
];

const SUPPORT_TYPES: [&str; 6] = [
    "Emotional support",
    "Crisis support",
    "Treatment experience sharing",
    "Pain management tips",
    "Sleep strategies",
    "Practical advice",
];

const STYLES: [&str; 4] = ["casual", "supportive", "direct", "detailed"];

const JOURNAL_LINES: [&str; 8] = [
    "Pain was worse today, hard to focus",
    "Started a new medication this week",
    "Couldn't sleep, feeling exhausted",
    "Good day overall, grateful for the sunshine",
    "Stress at work is making the itching flare",
    "Talked with my doctor about treatment options",
    "Feeling hopeful, some real progress",
    "Overwhelmed and a bit alone lately",
];

const LOCATIONS: [&str; 5] = ["Minneapolis", "Austin", "Leeds", "Toronto", "Melbourne"];

/// Builds a deterministic demo community for local runs.
pub fn generate_community(count: usize, seed: u64, now: i64) -> Vec<UserProfile> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|idx| generate_profile(&mut rng, idx, now))
        .collect()
}

/// Random connection history between the generated users.
pub fn generate_connections(
    profiles: &[UserProfile],
    seed: u64,
    now: i64,
) -> Vec<ConnectionRequest> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let types = ["peer_buddy", "mentor", "research_partner", "urgent_support"];
    let mut requests = Vec::new();

    if profiles.len() < 2 {
        return requests;
    }

    for from in profiles {
        let attempts = rng.gen_range(0..4);
        for _ in 0..attempts {
            let Some(to) = profiles.choose(&mut rng) else {
                continue;
            };
            if to.user_id == from.user_id {
                continue;
            }
            let status = match rng.gen_range(0..10) {
                0..=4 => ConnectionStatus::Accepted,
                5..=7 => ConnectionStatus::Declined,
                _ => ConnectionStatus::Pending,
            };
            requests.push(ConnectionRequest {
                from_user_id: from.user_id.clone(),
                to_user_id: to.user_id.clone(),
                connection_type: types[rng.gen_range(0..types.len())].to_string(),
                status,
                created_at: now - rng.gen_range(1..24 * 60) * HOUR_MS,
            });
        }
    }

    requests
}

fn generate_profile(rng: &mut StdRng, idx: usize, now: i64) -> UserProfile {
    let experience_level = match rng.gen_range(0..3) {
        0 => ExperienceLevel::NewlyDiagnosed,
        1 => ExperienceLevel::Experienced,
        _ => ExperienceLevel::LongTerm,
    };

    let symptoms = sample(rng, &SYMPTOMS, 1, 4);
    let entry_count = rng.gen_range(0..=MAX_ENTRIES);
    let mut recent_entries = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        let created_at = now - rng.gen_range(1..24 * 40) * HOUR_MS;
        let entry = if rng.gen_bool(0.5) {
            ProfileEntry {
                kind: EntryKind::Journal,
                text: JOURNAL_LINES[rng.gen_range(0..JOURNAL_LINES.len())].to_string(),
                created_at,
            }
        } else {
            ProfileEntry {
                kind: EntryKind::Symptom,
                text: symptoms[rng.gen_range(0..symptoms.len())].clone(),
                created_at,
            }
        };
        recent_entries.push(entry);
    }

    let privacy_level = if rng.gen_bool(0.1) {
        PrivacyLevel::Private
    } else {
        PrivacyLevel::Community
    };

    let engagement = engagement_score(&recent_entries, now);
    let last_active = recent_entries
        .iter()
        .map(|entry| entry.created_at)
        .max()
        .unwrap_or(now - 60 * 24 * HOUR_MS);

    UserProfile {
        user_id: format!("user_{:03}", idx),
        display_name: format!("Member {}", idx + 1),
        symptoms,
        recent_entries,
        demographics: Demographics {
            age: Some(rng.gen_range(18..80)),
            location: Some(LOCATIONS[rng.gen_range(0..LOCATIONS.len())].to_string()),
            experience_level,
        },
        preferences: Preferences {
            support_types: sample(rng, &SUPPORT_TYPES, 0, 3),
            interests: sample(rng, &INTERESTS, 1, 4),
            communication_style: STYLES[rng.gen_range(0..STYLES.len())].to_string(),
            privacy_level,
        },
        activity: ActivityMetrics {
            last_active,
            engagement_score: engagement,
            response_rate: (rng.gen::<f64>() * 100.0).round() / 100.0,
        },
    }
}

fn sample(rng: &mut StdRng, pool: &[&str], min: usize, max: usize) -> Vec<String> {
    let amount = rng.gen_range(min..=max).min(pool.len());
    pool.choose_multiple(rng, amount)
        .map(|value| value.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let first = generate_community(5, 7, 1_700_000_000_000);
        let second = generate_community(5, 7, 1_700_000_000_000);
        let ids: Vec<_> = first.iter().map(|p| p.user_id.clone()).collect();
        assert_eq!(ids, vec!["user_000", "user_001", "user_002", "user_003", "user_004"]);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.symptoms, b.symptoms);
            assert_eq!(a.preferences.interests, b.preferences.interests);
        }
    }

    #[test]
    fn generated_metrics_stay_in_range() {
        for profile in generate_community(20, 3, 1_700_000_000_000) {
            assert!(!profile.symptoms.is_empty());
            assert!((0.0..=100.0).contains(&profile.activity.engagement_score));
            assert!((0.0..=1.0).contains(&profile.activity.response_rate));
        }
    }

    #[test]
    fn connections_never_target_self() {
        let profiles = generate_community(10, 11, 1_700_000_000_000);
        for request in generate_connections(&profiles, 11, 1_700_000_000_000) {
            assert_ne!(request.from_user_id, request.to_user_id);
        }
    }
}
