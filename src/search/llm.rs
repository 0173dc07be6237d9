use crate::config::LlmConfig;
use crate::search::llm_error::LlmError;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

/// A hosted chat model: system prompt and user text in, raw reply text out.
pub trait LanguageModel: Send + Sync {
    fn complete(&self, system_prompt: &str, user_query: &str) -> Result<String, LlmError>;
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChatModel {
    client: reqwest::blocking::Client,
    cfg: LlmConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiChatModel {
    pub fn new(cfg: LlmConfig) -> Result<Self, LlmError> {
        if cfg.api_key.trim().is_empty() {
            return Err(LlmError::Config("missing API key".into()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self { client, cfg })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.cfg.base_url.trim_end_matches('/'))
    }
}

impl LanguageModel for OpenAiChatModel {
    fn complete(&self, system_prompt: &str, user_query: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": self.cfg.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_query }
            ],
            "temperature": self.cfg.temperature,
            "max_tokens": self.cfg.max_tokens
        });

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.cfg.api_key)
            .json(&body)
            .send()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::UnexpectedShape(e.to_string()))?;

        tracing::debug!(
            model = %self.cfg.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat completion returned"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::UnexpectedShape("no message content in choices".into()))
    }
}
