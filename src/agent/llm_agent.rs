//! LLM agent descriptor
//!
//! Binds a model identifier to a name, description and instruction.

use serde::{Deserialize, Serialize};

use crate::core::AgentConfig;

/// A configured agent; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmAgent {
    model: String,
    name: String,
    description: String,
    instruction: String,
}

impl LlmAgent {
    pub fn new(
        model: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
        }
    }

    /// Build the descriptor from agent settings
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.model.clone(),
            config.name.clone(),
            config.description.clone(),
            config.instruction.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

impl From<&AgentConfig> for LlmAgent {
    fn from(config: &AgentConfig) -> Self {
        Self::from_config(config)
    }
}
