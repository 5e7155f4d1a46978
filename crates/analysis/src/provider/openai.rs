use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::prompt::{SYSTEM_PROMPT, comparison_prompt};
use super::{DiffOutcome, SemanticDiffProvider};
use crate::error::{AnalysisError, AnalysisResult};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completion backed reading error classifier.
pub struct OpenAiDiffProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

impl ChatResponse {
    fn into_outcome(self) -> AnalysisResult<DiffOutcome> {
        let usage_tokens = self.usage.map(|u| u.total_tokens).unwrap_or(0);
        let diff_text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AnalysisError::CompletionFailed("response content is empty".to_string()))?;

        Ok(DiffOutcome {
            diff_text,
            usage_tokens,
        })
    }
}

impl OpenAiDiffProvider {
    pub fn new(api_key: &str, base_url: Option<&str>, model: &str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl SemanticDiffProvider for OpenAiDiffProvider {
    async fn compare(&self, reference: &str, transcribed: &str) -> AnalysisResult<DiffOutcome> {
        let prompt = comparison_prompt(reference, transcribed);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::CompletionFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(%status, %body, "Chat completion call failed");
            return Err(AnalysisError::CompletionFailed(format!("HTTP {status}: {body}")));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::CompletionFailed(format!("invalid completion response: {e}")))?;
        let outcome = body.into_outcome()?;

        info!(
            model = %self.model,
            usage_tokens = outcome.usage_tokens,
            "Semantic diff received"
        );
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
