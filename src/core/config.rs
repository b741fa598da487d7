//! Configuration management for the math solver
//!
//! Supports a `.env` file, environment variables and a TOML config file.
//! The resulting [`Config`] is handed to the agent explicitly; nothing is
//! read from the process environment after construction.
//!
//! Config file location: ~/.config/mathsolver/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{MathSolverError, Result};

/// Main configuration for the math solver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Agent descriptor settings
    #[serde(default)]
    pub agent: AgentConfig,
    /// Session settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Settings used to build the LLM agent descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier handed to the model backend
    pub model: String,
    /// Agent name, also used as the application name for sessions
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Instruction sent to the model with every request
    pub instruction: String,
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// User id every session is created under
    pub user_id: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: env::var("MATHSOLVER_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash-latest".to_string()),
            name: "maths_solver_agent".to_string(),
            description: "Solves mathematical expressions and returns the result".to_string(),
            instruction: env::var("MATHSOLVER_INSTRUCTION")
                .unwrap_or_else(|_| "Reply with the calculated output.".to_string()),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: env::var("MATHSOLVER_USER_ID")
                .unwrap_or_else(|_| "math_solver_user".to_string()),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathsolver")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from `.env`, the config file and defaults
    /// Priority: config file > env vars > defaults
    pub fn load() -> Self {
        // Model credentials live in .env next to the process
        let _ = dotenvy::dotenv();

        match Self::load_from_path(Self::config_file()) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MathSolverError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MathSolverError::config(format!("Failed to parse config: {}", e)))
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| MathSolverError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_toml_string()?)?;

        Ok(())
    }
}
