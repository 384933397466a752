//! Session repository — synchronizes the session collection to storage.
//!
//! The backing store is a local keyed blob, so calls carry no network
//! latency and no retry/timeout handling. Corruption fails soft: an
//! unreadable blob reads as "no sessions on record".

use std::rc::Rc;
use chat_types::{session::ChatSession, Result};
use crate::ports::StoragePort;

const SESSIONS_KEY_PREFIX: &str = "chat_sessions";

fn sessions_key(user_id: &str) -> String {
    format!("{}_{}", SESSIONS_KEY_PREFIX, user_id)
}

/// Persists a user's full session collection as one serialized blob.
#[derive(Clone)]
pub struct SessionRepository {
    storage: Rc<dyn StoragePort>,
}

impl SessionRepository {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    /// Load the user's sessions, newest-first. Missing or malformed data
    /// reads as an empty collection, never an error.
    pub async fn load(&self, user_id: &str) -> Vec<ChatSession> {
        let blob = match self.storage.get(&sessions_key(user_id)).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("session read failed for user {}: {}", user_id, e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&blob) {
            Ok(sessions) => sessions,
            Err(e) => {
                log::warn!("discarding malformed session data for user {}: {}", user_id, e);
                Vec::new()
            }
        }
    }

    /// Replace the full persisted collection for the user.
    pub async fn save(&self, user_id: &str, sessions: &[ChatSession]) -> Result<()> {
        let blob = serde_json::to_vec(sessions)?;
        self.storage.set(&sessions_key(user_id), &blob).await
    }

    /// Replace the entry with a matching id, or prepend it if absent.
    pub async fn upsert(&self, user_id: &str, session: &ChatSession) -> Result<()> {
        let mut sessions = self.load(user_id).await;
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(slot) => *slot = session.clone(),
            None => sessions.insert(0, session.clone()),
        }
        self.save(user_id, &sessions).await
    }

    /// Delete one session by id.
    pub async fn remove(&self, user_id: &str, session_id: &str) -> Result<()> {
        let mut sessions = self.load(user_id).await;
        sessions.retain(|s| s.id != session_id);
        self.save(user_id, &sessions).await
    }
}
