//! Memory service
//!
//! Long-term recall across sessions. The in-memory implementation does plain
//! keyword matching over archived event text.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::{Content, Event, Result};
use crate::services::session::Session;

/// A remembered piece of conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub session_id: String,
    pub author: String,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

/// Capability for archiving and searching past sessions
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Archive every text-bearing event of the session
    async fn add_session_to_memory(&self, session: &Session) -> Result<()>;

    /// Find remembered entries relevant to the query
    async fn search_memory(
        &self,
        app_name: &str,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<MemoryEntry>>;
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Memory service backed by a process-local map
#[derive(Debug, Default)]
pub struct InMemoryMemoryService {
    // (app, user) -> session id -> events
    entries: RwLock<HashMap<(String, String), HashMap<String, Vec<Event>>>>,
}

impl InMemoryMemoryService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryService for InMemoryMemoryService {
    async fn add_session_to_memory(&self, session: &Session) -> Result<()> {
        let events: Vec<Event> = session
            .events
            .iter()
            .filter(|e| !e.text().is_empty())
            .cloned()
            .collect();

        tracing::debug!(
            "Archiving {} events from session {}",
            events.len(),
            session.id
        );

        // Re-archiving a session replaces its previous snapshot
        self.entries
            .write()
            .await
            .entry((session.app_name.clone(), session.user_id.clone()))
            .or_default()
            .insert(session.id.clone(), events);

        Ok(())
    }

    async fn search_memory(
        &self,
        app_name: &str,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<MemoryEntry>> {
        let query_words = words(query);
        if query_words.is_empty() {
            return Ok(Vec::new());
        }

        let entries = self.entries.read().await;
        let Some(by_session) = entries.get(&(app_name.to_string(), user_id.to_string())) else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for (session_id, events) in by_session {
            for event in events {
                let Some(content) = &event.content else {
                    continue;
                };
                if words(&content.joined_text()).is_disjoint(&query_words) {
                    continue;
                }
                found.push(MemoryEntry {
                    session_id: session_id.clone(),
                    author: event.author.clone(),
                    content: content.clone(),
                    timestamp: event.timestamp,
                });
            }
        }
        found.sort_by_key(|e| e.timestamp);
        Ok(found)
    }
}
