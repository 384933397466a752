use serde::{Deserialize, Serialize};
use crate::message::Message;

/// Placeholder title until one is auto-derived from the first user turn.
pub const PLACEHOLDER_TITLE: &str = "New Chat";

/// A persisted conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: String,
    pub updated_at: String,
}

impl ChatSession {
    /// A fresh empty session with the placeholder title.
    pub fn new() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: PLACEHOLDER_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. Called on every mutation of `messages` or `title`.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
