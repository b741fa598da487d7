//! Model trait for abstracting LLM backends
//!
//! The agent only talks to a model through [`LlmModel`], so any backend
//! (hosted API, local server, scripted stand-in) can be plugged in.

use async_trait::async_trait;

use crate::core::{Content, Result};

/// Request sent to a model backend
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Model identifier from the agent descriptor
    pub model: String,
    /// Instruction text governing model behavior
    pub system_instruction: Option<String>,
    /// Conversation so far, oldest first, ending with the new user message
    pub contents: Vec<Content>,
}

impl LlmRequest {
    /// The most recent user message, if any
    pub fn last_user_content(&self) -> Option<&Content> {
        self.contents
            .iter()
            .rev()
            .find(|c| c.role == crate::core::Role::User)
    }
}

/// Response from a model backend
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated content; `None` when the model produced nothing
    pub content: Option<Content>,
    /// Model that generated the response
    pub model: String,
}

impl LlmResponse {
    pub fn text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            content: Some(Content::model_text(text)),
            model: model.into(),
        }
    }
}

/// Trait for model backends
#[async_trait]
pub trait LlmModel: Send + Sync {
    /// Generate a response for the request
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Get the backend name
    fn name(&self) -> &str;
}
