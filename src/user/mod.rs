pub mod context;
pub mod profile;
pub mod synthetic;

pub use context::{build_context, engagement_score};
pub use profile::{
    ActivityMetrics, Demographics, EntryKind, ExperienceLevel, Preferences, PrivacyLevel,
    ProfileEntry, UserProfile,
};
pub use synthetic::{generate_community, generate_connections};
