//! Agent module - descriptor, runner and the math solver component

pub mod llm_agent;
pub mod math_solver;
pub mod runner;

pub use llm_agent::LlmAgent;
pub use math_solver::{completion_update, final_text, MathSolverAgent, RESULT_PREFIX};
pub use runner::{AgentRunner, EventStream, Runner};
