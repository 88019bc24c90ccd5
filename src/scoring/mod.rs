pub mod classifier;
pub mod compatibility;
pub mod pipeline;
pub mod reasons;

pub use classifier::classify;
pub use compatibility::{CompatibilityScorer, CompatibilityWeights};
pub use pipeline::{ScoredCandidate, ScoringPipeline, DEFAULT_TOP_K};
pub use reasons::{generate_reasons, MAX_REASONS};
