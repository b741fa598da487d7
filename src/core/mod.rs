//! Core module - shared infrastructure for the math solver
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the crate.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AgentConfig, Config, SessionConfig};
pub use error::{MathSolverError, Result};
pub use types::*;
