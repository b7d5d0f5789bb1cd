//! Core data models for translation

use serde::{Deserialize, Serialize};

/// Incoming translation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Word or phrase to translate
    #[serde(rename = "inputWord", default, skip_serializing_if = "Option::is_none")]
    pub input_word: Option<String>,
}

impl TranslationRequest {
    /// Create a request for a single word
    pub fn new(input_word: impl Into<String>) -> Self {
        Self {
            input_word: Some(input_word.into()),
        }
    }

    /// The trimmed word, or `None` when absent or blank
    pub fn word(&self) -> Option<&str> {
        self.input_word
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }
}

/// Translation result returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Upstream-generated text
    pub translation: String,
}

/// A single role/content message in a chat completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role, e.g. `user`
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A `user` message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body sent to the upstream chat-completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Upstream chat-completion response, reduced to the fields the relay reads
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One generated choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Generated message
    pub message: ChatChoiceMessage,
}

/// Message of a generated choice; content may be null upstream
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    /// Generated text
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}
