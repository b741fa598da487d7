//! LLM module - model backend abstraction

pub mod traits;

pub use traits::{LlmModel, LlmRequest, LlmResponse};
