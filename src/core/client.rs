//! Upstream chat-completion client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::config::RelayConfig;
use crate::core::errors::{RelayError, Result};
use crate::core::models::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, TranslationResult,
};

/// Anything that can turn a word into Chinook Jargon
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a single, already validated word
    async fn translate(&self, word: &str) -> Result<TranslationResult>;
}

/// Build the instruction sent to the model
pub fn build_prompt(word: &str) -> String {
    format!(
        "Translate \"{word}\" to Chinook Jargon. If no direct translation exists, provide a related word or explanation."
    )
}

/// Async client for an OpenAI-compatible chat-completion endpoint
#[derive(Debug, Clone)]
pub struct AsyncTranslator {
    client: reqwest::Client,
    config: Arc<RelayConfig>,
}

impl AsyncTranslator {
    /// Create a new async translator
    pub fn new(config: RelayConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| RelayError::ConfigError {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        Self::new(RelayConfig::from_env()?)
    }

    fn completion_request(&self, word: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(build_prompt(word))],
            max_tokens: self.config.max_tokens,
        }
    }

    /// Send actual HTTP request
    async fn send_request(&self, word: &str) -> Result<TranslationResult> {
        let body = self.completion_request(word);

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RelayError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let parsed: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| RelayError::InvalidResponseError {
                    message: e.to_string(),
                })?;

        let translation = parsed
            .first_content()
            .ok_or_else(|| RelayError::InvalidResponseError {
                message: "No translation in response".to_string(),
            })?
            .to_string();

        Ok(TranslationResult { translation })
    }
}

#[async_trait]
impl Translator for AsyncTranslator {
    async fn translate(&self, word: &str) -> Result<TranslationResult> {
        debug!("Requesting translation for {:?} from {}", word, self.config.model);

        // Single attempt; the caller sees the first failure.
        match self.send_request(word).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Upstream translation failed: {}", e);
                Err(e)
            }
        }
    }
}
