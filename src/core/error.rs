//! Custom error types for the math solver
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for math solver operations
#[derive(Error, Debug)]
pub enum MathSolverError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model backend errors
    #[error("Model error: {0}")]
    Model(String),

    /// Session lookup failed
    #[error("Session not found: {app_name}/{user_id}/{session_id}")]
    SessionNotFound {
        app_name: String,
        user_id: String,
        session_id: String,
    },

    /// Session id already taken
    #[error("Session already exists: {app_name}/{user_id}/{session_id}")]
    SessionExists {
        app_name: String,
        user_id: String,
        session_id: String,
    },

    /// Artifact (or artifact version) missing
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience Result type for math solver operations
pub type Result<T> = std::result::Result<T, MathSolverError>;

impl MathSolverError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn session_not_found(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self::SessionNotFound {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }

    /// Wrap an error with additional context
    pub fn with_context<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_message() {
        let err = MathSolverError::session_not_found("app", "user", "s1");
        assert_eq!(err.to_string(), "Session not found: app/user/s1");
    }

    #[test]
    fn test_with_context_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = MathSolverError::with_context("reading config", io);
        assert_eq!(err.to_string(), "reading config: missing");
        assert!(std::error::Error::source(&err).is_some());
    }
}
