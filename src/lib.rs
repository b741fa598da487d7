//! Mathsolver - LLM agent for mathematical expressions
//!
//! A small agent that forwards a query and a session id into a runner and
//! relays the model's final reply.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Model backend abstraction
//! - **Services**: Session, memory and artifact capabilities with in-memory implementations
//! - **Agent**: Agent descriptor, runner and the `MathSolverAgent` component
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mathsolver::{LlmModel, MathSolverAgent};
//!
//! async fn solve(model: Arc<dyn LlmModel>) -> mathsolver::Result<()> {
//!     let agent = MathSolverAgent::new(model);
//!     let answer = agent.invoke("2+2", "session-1").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod core;
pub mod llm;
pub mod services;

// Re-export commonly used items
pub use agent::{AgentRunner, LlmAgent, MathSolverAgent, Runner};
pub use crate::core::{Config, MathSolverError, Result, TaskUpdate};
pub use llm::{LlmModel, LlmRequest, LlmResponse};
pub use services::Services;
