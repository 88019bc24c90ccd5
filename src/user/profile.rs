use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    pub symptoms: Vec<String>,
    pub recent_entries: Vec<ProfileEntry>,
    pub demographics: Demographics,
    pub preferences: Preferences,
    pub activity: ActivityMetrics,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn experience_level(&self) -> &ExperienceLevel {
        &self.demographics.experience_level
    }

    pub fn journal_texts(&self) -> impl Iterator<Item = &str> {
        self.recent_entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Journal)
            .map(|entry| entry.text.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Symptom,
    Journal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    pub kind: EntryKind,
    pub text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Demographics {
    pub age: Option<u32>,
    pub location: Option<String>,
    pub experience_level: ExperienceLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    Public,
    #[default]
    Community,
    Private,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub support_types: Vec<String>,
    pub interests: Vec<String>,
    pub communication_style: String,
    pub privacy_level: PrivacyLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityMetrics {
    pub last_active: i64,
    pub engagement_score: f64,
    pub response_rate: f64,
}

/// How long someone has lived with their condition.
///
/// Levels outside the known three are kept verbatim so they round-trip
/// through storage, but they never rank against the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExperienceLevel {
    NewlyDiagnosed,
    Experienced,
    LongTerm,
    Unknown(String),
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        ExperienceLevel::Unknown(String::new())
    }
}

impl ExperienceLevel {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "newly_diagnosed" | "new" => ExperienceLevel::NewlyDiagnosed,
            "experienced" | "few_years" | "some_experience" => ExperienceLevel::Experienced,
            "long_term" | "veteran" => ExperienceLevel::LongTerm,
            _ => ExperienceLevel::Unknown(value.to_string()),
        }
    }

    pub fn rank(&self) -> Option<usize> {
        match self {
            ExperienceLevel::NewlyDiagnosed => Some(0),
            ExperienceLevel::Experienced => Some(1),
            ExperienceLevel::LongTerm => Some(2),
            ExperienceLevel::Unknown(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ExperienceLevel::NewlyDiagnosed => "newly_diagnosed",
            ExperienceLevel::Experienced => "experienced",
            ExperienceLevel::LongTerm => "long_term",
            ExperienceLevel::Unknown(value) => value.as_str(),
        }
    }
}

impl From<String> for ExperienceLevel {
    fn from(value: String) -> Self {
        ExperienceLevel::parse(&value)
    }
}

impl From<ExperienceLevel> for String {
    fn from(value: ExperienceLevel) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        if label.is_empty() {
            f.write_str("unknown")
        } else {
            f.write_str(label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_level_round_trips_unknown_values() {
        let level: ExperienceLevel = serde_json::from_str("\"decades\"").unwrap();
        assert_eq!(level, ExperienceLevel::Unknown("decades".to_string()));
        assert_eq!(level.rank(), None);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"decades\"");
    }

    #[test]
    fn profile_deserializes_with_missing_sections() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"userId":"u1","symptoms":["fatigue"],"demographics":{"experienceLevel":"long_term"}}"#,
        )
        .unwrap();
        assert_eq!(profile.user_id, "u1");
        assert_eq!(profile.experience_level(), &ExperienceLevel::LongTerm);
        assert!(profile.preferences.interests.is_empty());
        assert_eq!(profile.preferences.privacy_level, PrivacyLevel::Community);
    }
}
