use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};
use tracing::debug;

use peer_match::config::LlmSection;
use peer_match::insight::{
    decode_adjustment, system_prompt, user_prompt, Adjustment, InsightError, InsightProvider,
    InsightRequest,
};

/// OpenAI-compatible chat-completions client.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f64,
}

impl LlmClient {
    /// Returns `None` when `LLM_API_KEY` is unset.
    pub fn from_env(model_override: Option<String>, settings: &LlmSection) -> Option<Self> {
        let api_key = env::var("LLM_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty())?;
        let api_base =
            env::var("LLM_API_BASE").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = model_override
            .or_else(|| env::var("LLM_MODEL").ok())
            .unwrap_or_else(|| "gpt-4o-mini".to_string());
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .ok()?;
        Some(Self {
            client,
            api_key,
            api_base,
            model,
            temperature: settings.temperature,
        })
    }

    async fn complete(&self, prompt: String) -> Result<String, InsightError> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| InsightError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| InsightError::Decode(format!("chat response: {}", err)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| InsightError::Decode("response missing choices".to_string()))
    }
}

#[async_trait]
impl InsightProvider for LlmClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn adjust(&self, request: &InsightRequest) -> Result<Adjustment, InsightError> {
        let started = Instant::now();
        let content = self.complete(user_prompt(request)).await?;
        debug!(
            candidate = %request.candidate_id,
            latency_ms = started.elapsed().as_millis() as u64,
            "received insight response"
        );
        decode_adjustment(&content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}
