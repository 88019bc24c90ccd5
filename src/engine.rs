use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::insight::{Adjustment, InsightError, InsightProvider, InsightRequest};
use crate::scoring::{
    CompatibilityScorer, CompatibilityWeights, ScoredCandidate, ScoringPipeline, DEFAULT_TOP_K,
};
use crate::store::CommunityStore;
use crate::user::{build_context, UserProfile};
use crate::{now_ms, ConnectionRecommendation, RecommendationContext};

/// Result of a store-backed recommendation run.
#[derive(Debug, Clone, Default)]
pub struct RecommendationOutcome {
    pub recommendations: Vec<ConnectionRecommendation>,
    pub total_evaluated: usize,
}

#[derive(Clone)]
pub struct RecommendationEngine {
    pipeline: ScoringPipeline,
    provider: Option<Arc<dyn InsightProvider>>,
    insight_timeout: Duration,
    top_k: usize,
    max_candidates: usize,
}

impl RecommendationEngine {
    pub fn new(provider: Option<Arc<dyn InsightProvider>>) -> Self {
        Self::from_config(&EngineConfig::default(), provider)
    }

    pub fn from_config(config: &EngineConfig, provider: Option<Arc<dyn InsightProvider>>) -> Self {
        Self {
            pipeline: ScoringPipeline::new(CompatibilityScorer::new(
                CompatibilityWeights::default(),
            )),
            provider,
            insight_timeout: Duration::from_millis(config.llm.timeout_ms),
            top_k: config.engine.top_k.min(DEFAULT_TOP_K),
            max_candidates: config.engine.max_candidates,
        }
    }

    pub fn with_insight_timeout(mut self, timeout: Duration) -> Self {
        self.insight_timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|provider| provider.name())
    }

    /// Scores, adjusts and ranks `candidates` for `user`.
    ///
    /// At most `max_candidates` eligible peers are scored, in input order.
    /// Never fails: a candidate whose model call errors or times out keeps
    /// its deterministic score with a fallback insight. Dropping the returned
    /// future aborts every in-flight model call.
    pub async fn generate_recommendations(
        &self,
        user: &UserProfile,
        candidates: &[UserProfile],
        context: &RecommendationContext,
    ) -> Vec<ConnectionRecommendation> {
        let eligible: Vec<&UserProfile> = candidates
            .iter()
            .filter(|candidate| candidate.user_id != user.user_id)
            .filter(|candidate| !context.previous_connections.contains(&candidate.user_id))
            .take(self.max_candidates)
            .collect();

        let mut scored: Vec<ScoredCandidate> = eligible
            .iter()
            .map(|candidate| self.pipeline.score_candidate(user, candidate))
            .collect();

        for candidate in &scored {
            debug!(
                candidate = %candidate.user_id,
                base_score = candidate.base_score,
                kind = candidate.recommendation_type.label(),
                "scored candidate"
            );
        }

        match &self.provider {
            Some(provider) => {
                self.adjust_all(provider, user, &eligible, context, &mut scored)
                    .await
            }
            None if !scored.is_empty() => {
                debug!(error = %InsightError::NotConfigured, "using fallback insights");
            }
            None => {}
        }

        self.pipeline.rank(scored, self.top_k)
    }

    async fn adjust_all(
        &self,
        provider: &Arc<dyn InsightProvider>,
        user: &UserProfile,
        eligible: &[&UserProfile],
        context: &RecommendationContext,
        scored: &mut [ScoredCandidate],
    ) {
        let timeout = self.insight_timeout;
        let mut tasks = JoinSet::new();

        for (idx, candidate) in eligible.iter().enumerate() {
            let request = InsightRequest::new(user, candidate, context, scored[idx].base_score);
            // Stays in place if the task never reports back.
            scored[idx].apply(Adjustment::fallback());
            let provider = Arc::clone(provider);
            tasks.spawn(async move {
                let result = match tokio::time::timeout(timeout, provider.adjust(&request)).await {
                    Ok(result) => result,
                    Err(_) => Err(InsightError::Timeout(timeout.as_millis() as u64)),
                };
                (idx, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, Ok(adjustment))) => scored[idx].apply(adjustment),
                Ok((idx, Err(err))) => {
                    warn!(
                        candidate = %scored[idx].user_id,
                        provider = provider.name(),
                        error = %err,
                        "insight adjustment failed; using fallback"
                    );
                    scored[idx].apply(Adjustment::fallback());
                }
                Err(err) => warn!(error = %err, "insight task did not complete"),
            }
        }
    }

    /// Loads `user_id` and its candidate pool from the store and recommends.
    ///
    /// Store failures degrade to an empty outcome.
    pub async fn recommend_for_user(
        &self,
        store: &CommunityStore,
        user_id: &str,
    ) -> RecommendationOutcome {
        let user = match store.get_profile(user_id).await {
            Ok(user) => user,
            Err(err) => {
                warn!(user_id, error = %err, "could not load requesting profile");
                return RecommendationOutcome::default();
            }
        };

        let previous: HashSet<String> = store
            .connections_from(user_id)
            .await
            .into_iter()
            .map(|request| request.to_user_id)
            .collect();
        let context = build_context(&user, previous, now_ms());
        let candidates = store
            .candidates_for(user_id, &context.previous_connections, self.max_candidates)
            .await;

        let recommendations = self
            .generate_recommendations(&user, &candidates, &context)
            .await;
        info!(
            user_id,
            evaluated = candidates.len(),
            returned = recommendations.len(),
            emotional_state = context.emotional_state.label(),
            "generated peer recommendations"
        );

        RecommendationOutcome {
            recommendations,
            total_evaluated: candidates.len(),
        }
    }
}
