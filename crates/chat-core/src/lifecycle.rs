//! Session lifecycle — creation, selection, deletion, clearing.
//!
//! Keeps the invariant that a signed-in user always has at least one
//! session: zero-session states (first load, last deletion) self-heal by
//! auto-creating an empty one.

use chat_types::{event::ChatEvent, session::ChatSession};

use crate::orchestrator::ConversationOrchestrator;
use crate::reducer::{apply_update, SessionUpdate};

impl ConversationOrchestrator {
    /// Load the user's sessions from the repository and pick the initial
    /// selection, creating an empty session when none are on record.
    pub async fn load(&self) {
        let user_id = self.inner.borrow().user.id.clone();
        let sessions = self.repo.load(&user_id).await;
        {
            let mut inner = self.inner.borrow_mut();
            inner.active_id = sessions.first().map(|s| s.id.clone());
            inner.sessions = sessions;
        }
        if self.inner.borrow().sessions.is_empty() {
            self.create_session().await;
        } else {
            self.event_bus.emit(ChatEvent::SessionsChanged);
        }
    }

    /// New empty session with a placeholder title, prepended and selected.
    /// Always succeeds.
    pub async fn create_session(&self) -> ChatSession {
        let session = ChatSession::new();
        {
            let mut inner = self.inner.borrow_mut();
            inner.sessions.insert(0, session.clone());
            inner.active_id = Some(session.id.clone());
        }
        self.persist_all().await;
        self.event_bus.emit(ChatEvent::SessionsChanged);
        session
    }

    /// Remove a session from memory and store. A generation in flight for
    /// it is not cancelled; its late completion is dropped harmlessly.
    pub async fn delete_session(&self, session_id: &str) {
        let (user_id, was_active, next_active) = {
            let mut inner = self.inner.borrow_mut();
            inner.sessions.retain(|s| s.id != session_id);
            let was_active = inner.active_id.as_deref() == Some(session_id);
            let next_active = inner.sessions.first().map(|s| s.id.clone());
            if was_active {
                inner.active_id = next_active.clone();
            }
            (inner.user.id.clone(), was_active, next_active)
        };

        if let Err(e) = self.repo.remove(&user_id, session_id).await {
            log::warn!("failed to delete session {} from storage: {}", session_id, e);
        }

        if was_active && next_active.is_none() {
            self.create_session().await;
        } else {
            self.event_bus.emit(ChatEvent::SessionsChanged);
        }
    }

    /// Truncate a session's messages. The derived title is kept.
    pub async fn clear_chat(&self, session_id: &str) {
        let applied = apply_update(
            &mut self.inner.borrow_mut().sessions,
            session_id,
            SessionUpdate::ClearMessages,
        );
        if applied {
            self.persist_all().await;
            self.event_bus.emit(ChatEvent::SessionsChanged);
        }
    }

    /// Pure selection change, no persistence. Returns false for an
    /// unknown id.
    pub fn select_session(&self, session_id: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.sessions.iter().any(|s| s.id == session_id) {
            inner.active_id = Some(session_id.to_string());
            true
        } else {
            false
        }
    }
}
