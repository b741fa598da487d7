//! Services module - session, memory and artifact capabilities
//!
//! Each capability is a trait so persistent backends can replace the
//! in-memory ones without touching the agent.

pub mod artifact;
pub mod memory;
pub mod session;

use std::sync::Arc;

pub use artifact::{ArtifactScope, ArtifactService, InMemoryArtifactService};
pub use memory::{InMemoryMemoryService, MemoryEntry, MemoryService};
pub use session::{InMemorySessionService, Session, SessionService, SessionState};

/// The three services a runner is bound to
#[derive(Clone)]
pub struct Services {
    pub sessions: Arc<dyn SessionService>,
    pub memory: Arc<dyn MemoryService>,
    pub artifacts: Arc<dyn ArtifactService>,
}

impl Services {
    /// Fresh in-memory instances of all three services
    pub fn in_memory() -> Self {
        Self {
            sessions: Arc::new(InMemorySessionService::new()),
            memory: Arc::new(InMemoryMemoryService::new()),
            artifacts: Arc::new(InMemoryArtifactService::new()),
        }
    }

    /// Replace the session service
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionService>) -> Self {
        self.sessions = sessions;
        self
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::in_memory()
    }
}
