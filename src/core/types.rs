//! Shared types used across the math solver modules
//!
//! Contains role-tagged message content, runner events and the streamed
//! task update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content types the agent accepts
pub const SUPPORTED_CONTENT_TYPES: &[&str] = &["text", "text/plain"];

/// Role of a content author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// Raw bytes with a mime type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// A single piece of a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    /// Create a text part
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Create a binary part
    pub fn from_bytes(data: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }

    /// Text of this part, if present and non-empty
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// A role-tagged message made of parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// Single-part user message
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::from_text(text)])
    }

    /// Single-part model message
    pub fn model_text(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::from_text(text)])
    }

    /// Newline-joined text of all non-empty text parts
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::non_empty_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A unit of output produced by the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// Shared by every event of one `run` call
    pub invocation_id: String,
    /// `user` or the agent name
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(
        invocation_id: impl Into<String>,
        author: impl Into<String>,
        content: Option<Content>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            invocation_id: invocation_id.into(),
            author: author.into(),
            content,
            timestamp: Utc::now(),
        }
    }

    /// Joined text of the event content, empty when there is none
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(Content::joined_text)
            .unwrap_or_default()
    }
}

/// Message yielded by the streaming call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub is_task_complete: bool,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_text_skips_empty_parts() {
        let content = Content::new(
            Role::Model,
            vec![
                Part::from_text("4"),
                Part::from_text(""),
                Part::from_bytes(vec![1, 2], "image/png"),
                Part::from_text("2"),
            ],
        );
        assert_eq!(content.joined_text(), "4\n2");
    }

    #[test]
    fn test_event_without_content_has_empty_text() {
        let event = Event::new("inv", "agent", None);
        assert_eq!(event.text(), "");
    }

    #[test]
    fn test_task_update_serialization() {
        let update = TaskUpdate {
            is_task_complete: true,
            content: "The result is: 4".to_string(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["is_task_complete"], true);
        assert_eq!(json["content"], "The result is: 4");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Content::user_text("2+2")).unwrap();
        assert!(json.contains("\"role\":\"user\""));
    }
}
