use std::collections::HashSet;

use crate::themes::{extract_themes, JournalTheme};
use crate::user::profile::{EntryKind, ProfileEntry, UserProfile};
use crate::{EmotionalState, RecommendationContext};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const SYMPTOM_CHANGE_WINDOW_DAYS: i64 = 7;
const MOOD_WINDOW_DAYS: i64 = 14;
const ENGAGEMENT_WINDOW_DAYS: i64 = 30;
const ENGAGEMENT_POINTS_PER_ENTRY: f64 = 5.0;

const NEGATIVE_MOOD_WORDS: [&str; 9] = [
    "struggling",
    "hopeless",
    "worse",
    "alone",
    "overwhelmed",
    "sad",
    "depressed",
    "can't cope",
    "flare",
];

const POSITIVE_MOOD_WORDS: [&str; 7] = [
    "better",
    "improving",
    "hopeful",
    "good day",
    "grateful",
    "progress",
    "relief",
];

pub fn build_context(
    profile: &UserProfile,
    previous_connections: HashSet<String>,
    now: i64,
) -> RecommendationContext {
    let recent_symptom_change = entries_since(&profile.recent_entries, now, SYMPTOM_CHANGE_WINDOW_DAYS)
        .any(|entry| entry.kind == EntryKind::Symptom);

    let recent_journal: Vec<&str> = entries_since(&profile.recent_entries, now, MOOD_WINDOW_DAYS)
        .filter(|entry| entry.kind == EntryKind::Journal)
        .map(|entry| entry.text.as_str())
        .collect();
    let emotional_state = classify_mood(&recent_journal);

    let themes = extract_themes(profile.journal_texts());
    let support_needs = derive_support_needs(&themes, emotional_state);

    RecommendationContext {
        recent_symptom_change,
        emotional_state,
        support_needs,
        timestamp: now,
        previous_connections,
    }
}

pub fn classify_mood(texts: &[&str]) -> EmotionalState {
    let mut negative = 0usize;
    let mut positive = 0usize;
    for text in texts {
        let lowered = text.to_lowercase();
        negative += NEGATIVE_MOOD_WORDS
            .iter()
            .filter(|word| lowered.contains(*word))
            .count();
        positive += POSITIVE_MOOD_WORDS
            .iter()
            .filter(|word| lowered.contains(*word))
            .count();
    }

    if negative > positive {
        EmotionalState::Struggling
    } else if positive > negative {
        EmotionalState::Improving
    } else {
        EmotionalState::Stable
    }
}

pub fn derive_support_needs(themes: &[JournalTheme], state: EmotionalState) -> Vec<String> {
    let mut needs: Vec<String> = Vec::new();
    for need in themes.iter().filter_map(|theme| theme.support_need()) {
        if !needs.iter().any(|existing| existing == need) {
            needs.push(need.to_string());
        }
    }
    if state == EmotionalState::Struggling {
        needs.push("Crisis support".to_string());
    }
    needs
}

/// Activity proxy in `[0, 100]` from entries logged over the last 30 days.
pub fn engagement_score(entries: &[ProfileEntry], now: i64) -> f64 {
    let count = entries_since(entries, now, ENGAGEMENT_WINDOW_DAYS).count();
    (count as f64 * ENGAGEMENT_POINTS_PER_ENTRY).min(100.0)
}

fn entries_since(
    entries: &[ProfileEntry],
    now: i64,
    days: i64,
) -> impl Iterator<Item = &ProfileEntry> {
    let cutoff = now - days * DAY_MS;
    entries
        .iter()
        .filter(move |entry| entry.created_at >= cutoff && entry.created_at <= now)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn entry(kind: EntryKind, text: &str, days_ago: i64) -> ProfileEntry {
        ProfileEntry {
            kind,
            text: text.to_string(),
            created_at: NOW - days_ago * DAY_MS,
        }
    }

    #[test]
    fn detects_recent_symptom_change() {
        let mut profile = UserProfile::new("u1");
        profile.recent_entries = vec![entry(EntryKind::Symptom, "itching", 3)];
        assert!(build_context(&profile, HashSet::new(), NOW).recent_symptom_change);

        profile.recent_entries = vec![entry(EntryKind::Symptom, "itching", 10)];
        assert!(!build_context(&profile, HashSet::new(), NOW).recent_symptom_change);
    }

    #[test]
    fn struggling_journal_adds_crisis_support() {
        let mut profile = UserProfile::new("u1");
        profile.recent_entries = vec![
            entry(EntryKind::Journal, "Feeling hopeless and alone, the pain is worse", 1),
            entry(EntryKind::Journal, "A little better after resting", 2),
        ];
        let context = build_context(&profile, HashSet::new(), NOW);
        assert_eq!(context.emotional_state, EmotionalState::Struggling);
        assert_eq!(
            context.support_needs,
            vec!["Pain management tips".to_string(), "Crisis support".to_string()]
        );
    }

    #[test]
    fn balanced_mood_is_stable() {
        assert_eq!(classify_mood(&["better today", "but worse tonight"]), EmotionalState::Stable);
        assert_eq!(classify_mood(&[]), EmotionalState::Stable);
        assert_eq!(classify_mood(&["real progress, hopeful"]), EmotionalState::Improving);
    }

    #[test]
    fn engagement_score_counts_last_thirty_days_and_caps() {
        let entries: Vec<ProfileEntry> = (0..25)
            .map(|day| entry(EntryKind::Journal, "note", day))
            .collect();
        assert_eq!(engagement_score(&entries, NOW), 100.0);

        let sparse = vec![
            entry(EntryKind::Journal, "note", 1),
            entry(EntryKind::Symptom, "fatigue", 45),
        ];
        assert_eq!(engagement_score(&sparse, NOW), 5.0);
    }
}
