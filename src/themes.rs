use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalTheme {
    PainManagement,
    StressCoping,
    SleepIssues,
    TreatmentTracking,
    GeneralWellness,
}

impl JournalTheme {
    pub fn label(self) -> &'static str {
        match self {
            JournalTheme::PainManagement => "pain management",
            JournalTheme::StressCoping => "stress coping",
            JournalTheme::SleepIssues => "sleep issues",
            JournalTheme::TreatmentTracking => "treatment tracking",
            JournalTheme::GeneralWellness => "general wellness",
        }
    }

    /// Support need a user with this theme is likely to have.
    pub fn support_need(self) -> Option<&'static str> {
        match self {
            JournalTheme::PainManagement => Some("Pain management tips"),
            JournalTheme::StressCoping => Some("Emotional support"),
            JournalTheme::SleepIssues => Some("Sleep strategies"),
            JournalTheme::TreatmentTracking => Some("Treatment experience sharing"),
            JournalTheme::GeneralWellness => None,
        }
    }
}

const TAXONOMY: [(JournalTheme, &[&str]); 4] = [
    (JournalTheme::PainManagement, &["pain", "ache", "hurt", "sore"]),
    (
        JournalTheme::StressCoping,
        &["stress", "anxious", "anxiety", "overwhelm", "worry"],
    ),
    (
        JournalTheme::SleepIssues,
        &["sleep", "insomnia", "tired", "exhausted"],
    ),
    (
        JournalTheme::TreatmentTracking,
        &["medication", "treatment", "doctor", "therapy", "dose"],
    ),
];

/// Matches entry text against the theme taxonomy.
///
/// Themes come back deduplicated in taxonomy order. When nothing matches,
/// the result is `[GeneralWellness]`, so it is never empty.
pub fn extract_themes<'a, I>(entries: I) -> Vec<JournalTheme>
where
    I: IntoIterator<Item = &'a str>,
{
    let corpus: Vec<String> = entries.into_iter().map(|text| text.to_lowercase()).collect();

    let mut themes: Vec<JournalTheme> = TAXONOMY
        .iter()
        .filter(|(_, keywords)| {
            corpus
                .iter()
                .any(|text| keywords.iter().any(|keyword| text.contains(keyword)))
        })
        .map(|(theme, _)| *theme)
        .collect();

    if themes.is_empty() {
        themes.push(JournalTheme::GeneralWellness);
    }
    themes
}

pub fn theme_labels(themes: &[JournalTheme]) -> Vec<&'static str> {
    themes.iter().map(|theme| theme.label()).collect()
}
