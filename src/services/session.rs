//! Session service
//!
//! Sessions are keyed by application name, user id and session id. The
//! in-memory implementation hands out clones, so a returned [`Session`] is a
//! snapshot and never aliases stored state.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::{Event, MathSolverError, Result};

/// Session state mapping
pub type SessionState = HashMap<String, serde_json::Value>;

/// A conversation context and its event history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub app_name: String,
    pub user_id: String,
    pub state: SessionState,
    pub events: Vec<Event>,
    pub last_update_time: DateTime<Utc>,
}

/// Capability for storing sessions
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Fetch a session, `None` if it does not exist
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<Session>>;

    /// Create a session; a random id is generated only when `session_id` is `None`,
    /// any given id (blank or padded included) is stored verbatim
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        state: SessionState,
        session_id: Option<&str>,
    ) -> Result<Session>;

    /// List a user's sessions (without events)
    async fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>>;

    /// Delete a session; deleting a missing session is a no-op
    async fn delete_session(&self, app_name: &str, user_id: &str, session_id: &str) -> Result<()>;

    /// Append an event to a session's history
    async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        event: Event,
    ) -> Result<Event>;
}

type SessionKey = (String, String, String);

fn key(app_name: &str, user_id: &str, session_id: &str) -> SessionKey {
    (
        app_name.to_string(),
        user_id.to_string(),
        session_id.to_string(),
    )
}

/// Session service backed by a process-local map
#[derive(Debug, Default)]
pub struct InMemorySessionService {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions across all apps and users
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&key(app_name, user_id, session_id)).cloned())
    }

    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        state: SessionState,
        session_id: Option<&str>,
    ) -> Result<Session> {
        let id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut sessions = self.sessions.write().await;
        let session_key = key(app_name, user_id, &id);
        if sessions.contains_key(&session_key) {
            return Err(MathSolverError::SessionExists {
                app_name: app_name.to_string(),
                user_id: user_id.to_string(),
                session_id: id,
            });
        }

        let session = Session {
            id,
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            state,
            events: Vec::new(),
            last_update_time: Utc::now(),
        };
        sessions.insert(session_key, session.clone());
        tracing::debug!("Created session {}/{}/{}", app_name, user_id, session.id);

        Ok(session)
    }

    async fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        let mut listed: Vec<Session> = sessions
            .values()
            .filter(|s| s.app_name == app_name && s.user_id == user_id)
            .map(|s| Session {
                events: Vec::new(),
                ..s.clone()
            })
            .collect();
        listed.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(listed)
    }

    async fn delete_session(&self, app_name: &str, user_id: &str, session_id: &str) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(&key(app_name, user_id, session_id));
        Ok(())
    }

    async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        event: Event,
    ) -> Result<Event> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&key(app_name, user_id, session_id))
            .ok_or_else(|| MathSolverError::session_not_found(app_name, user_id, session_id))?;

        session.last_update_time = event.timestamp;
        session.events.push(event.clone());
        Ok(event)
    }
}
