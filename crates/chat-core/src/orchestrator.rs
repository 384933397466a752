//! Conversation orchestrator — owns the turn-taking protocol.
//!
//! `send_message` runs one exchange:
//! 1. Append and persist the user turn (durable before generation starts)
//! 2. On a session's first turn, derive a title as a concurrent side task
//! 3. Drive the completion stream into the streaming state
//! 4. Reconcile the final model turn (or a synthetic error turn) and persist
//! 5. Always return the status to Idle and clear the streaming buffer
//!
//! All shared state lives behind one `Rc<RefCell<..>>` and every mutation
//! goes through the reducer against the latest state, so the title patch,
//! the model-turn append, and user actions on other sessions interleave
//! without clobbering each other. RefCell borrows are never held across
//! an await.

use std::cell::RefCell;
use std::rc::Rc;

use futures::StreamExt;

use chat_types::{
    event::ChatEvent,
    message::Message,
    session::ChatSession,
    user::User,
    ChatError, Result,
};

use crate::event_bus::EventBus;
use crate::ports::{GenerationPort, StreamEvent};
use crate::reducer::{apply_update, SessionUpdate};
use crate::repository::SessionRepository;
use crate::streaming::StreamingState;

/// Shown in place of a real model turn when the stream fails.
pub const GENERATION_ERROR_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please check your API key or connection.";

/// Single-flight gate: at most one streaming generation per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    Generating { session_id: String },
}

pub(crate) struct Inner {
    pub(crate) user: User,
    pub(crate) sessions: Vec<ChatSession>,
    pub(crate) active_id: Option<String>,
    pub(crate) status: GenerationStatus,
    pub(crate) streaming: StreamingState,
}

/// Clone-cheap handle over the orchestrator state.
#[derive(Clone)]
pub struct ConversationOrchestrator {
    pub(crate) inner: Rc<RefCell<Inner>>,
    pub(crate) repo: SessionRepository,
    llm: Rc<dyn GenerationPort>,
    pub(crate) event_bus: EventBus,
}

impl ConversationOrchestrator {
    pub fn new(
        user: User,
        repo: SessionRepository,
        llm: Rc<dyn GenerationPort>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                user,
                sessions: Vec::new(),
                active_id: None,
                status: GenerationStatus::Idle,
                streaming: StreamingState::new(),
            })),
            repo,
            llm,
            event_bus,
        }
    }

    /// Swap the generation adapter, e.g. after a settings change.
    /// In-flight exchanges keep the adapter they started with.
    pub fn set_generation_port(&mut self, llm: Rc<dyn GenerationPort>) {
        self.llm = llm;
    }

    // ─── Read accessors (cloned snapshots for rendering) ─────

    pub fn user(&self) -> User {
        self.inner.borrow().user.clone()
    }

    pub fn sessions(&self) -> Vec<ChatSession> {
        self.inner.borrow().sessions.clone()
    }

    pub fn active_session_id(&self) -> Option<String> {
        self.inner.borrow().active_id.clone()
    }

    pub fn active_session(&self) -> Option<ChatSession> {
        let inner = self.inner.borrow();
        let id = inner.active_id.as_deref()?;
        inner.sessions.iter().find(|s| s.id == id).cloned()
    }

    pub fn status(&self) -> GenerationStatus {
        self.inner.borrow().status.clone()
    }

    pub fn is_generating(&self) -> bool {
        !matches!(self.inner.borrow().status, GenerationStatus::Idle)
    }

    /// Latest cumulative partial response, empty while waiting for the
    /// first chunk. Meaningful only while `is_generating()`.
    pub fn streaming_text(&self) -> String {
        self.inner.borrow().streaming.text().to_string()
    }

    // ─── The turn-taking protocol ────────────────────────────

    /// Run one exchange against `session_id`. Rejects blank input, unknown
    /// sessions, and re-entry while a generation is in flight; all later
    /// failures degrade into a synthetic model turn instead of an error.
    pub async fn send_message(&self, session_id: &str, content: &str) -> Result<()> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::Validation("Message must not be empty".to_string()));
        }

        // Step 1: append the user turn and capture the snapshots the rest
        // of the exchange is computed against.
        let (history, base, first_turn) = {
            let mut inner = self.inner.borrow_mut();
            if inner.status != GenerationStatus::Idle {
                return Err(ChatError::Busy);
            }
            let Some(session) = inner.sessions.iter().find(|s| s.id == session_id) else {
                return Err(ChatError::SessionNotFound(session_id.to_string()));
            };
            let history = session.messages.clone();
            let first_turn = history.is_empty();

            let user_message = Message::user(content);
            apply_update(
                &mut inner.sessions,
                session_id,
                SessionUpdate::AppendUserMessage(user_message),
            );
            let base = inner
                .sessions
                .iter()
                .find(|s| s.id == session_id)
                .map(|s| s.messages.clone())
                .unwrap_or_default();

            inner.status = GenerationStatus::Generating {
                session_id: session_id.to_string(),
            };
            inner.streaming.begin();
            (history, base, first_turn)
        };

        self.event_bus.emit(ChatEvent::GenerationStarted {
            session_id: session_id.to_string(),
        });

        // The user turn must be externally visible before generation begins.
        self.persist_all().await;

        let title_task = self.derive_title(session_id, content, first_turn);
        let stream_task = self.run_stream(session_id, history, content, base);

        // Both sides apply their update the moment it resolves; the join
        // only keeps the borrowed inputs alive until the slower one lands.
        futures::join!(title_task, stream_task);

        Ok(())
    }

    /// Best-effort title derivation, triggered only by the 0→1 transition.
    /// Failure is swallowed: the placeholder title stays.
    async fn derive_title(&self, session_id: &str, seed: &str, first_turn: bool) {
        if !first_turn {
            return;
        }
        match self.llm.generate_title(seed).await {
            Ok(title) => {
                let applied = apply_update(
                    &mut self.inner.borrow_mut().sessions,
                    session_id,
                    SessionUpdate::SetTitle(title.clone()),
                );
                if !applied {
                    return; // session deleted while the title was in flight
                }
                self.event_bus.emit(ChatEvent::TitleUpdated {
                    session_id: session_id.to_string(),
                    title,
                });
                // Targeted write: only this session's entry changes.
                let (user_id, patched) = {
                    let inner = self.inner.borrow();
                    let patched = inner.sessions.iter().find(|s| s.id == session_id).cloned();
                    (inner.user.id.clone(), patched)
                };
                if let Some(session) = patched {
                    if let Err(e) = self.repo.upsert(&user_id, &session).await {
                        log::warn!("failed to persist title for session {}: {}", session_id, e);
                    }
                }
            }
            Err(e) => {
                log::warn!("title generation failed for session {}: {}", session_id, e);
            }
        }
    }

    /// Drive the completion stream to its end and reconcile the model turn.
    async fn run_stream(
        &self,
        session_id: &str,
        history: Vec<Message>,
        content: &str,
        base: Vec<Message>,
    ) {
        let mut stream = self.llm.stream_completion(history, content);
        let mut final_text: Option<String> = None;
        let mut failure: Option<String> = None;

        while let Some(event) = stream.next().await {
            match event {
                StreamEvent::Chunk(text) => {
                    self.inner.borrow_mut().streaming.replace(text.clone());
                    self.event_bus.emit(ChatEvent::StreamChunk {
                        session_id: session_id.to_string(),
                        text,
                    });
                }
                StreamEvent::Done { text } => {
                    final_text = Some(text);
                }
                StreamEvent::Error(message) => {
                    failure = Some(message);
                    break;
                }
            }
        }

        let outcome = match (final_text, failure) {
            (Some(text), None) => Ok(text),
            (_, Some(message)) => Err(message),
            // A stream that ends without Done is a transport failure too.
            (None, None) => Err("stream ended without completing".to_string()),
        };

        match outcome {
            Ok(text) => {
                let applied = apply_update(
                    &mut self.inner.borrow_mut().sessions,
                    session_id,
                    SessionUpdate::AppendModelMessage {
                        base,
                        message: Message::model(text),
                    },
                );
                if applied {
                    self.persist_all().await;
                } else {
                    log::debug!("discarding completion for deleted session {}", session_id);
                }
                self.event_bus.emit(ChatEvent::GenerationComplete {
                    session_id: session_id.to_string(),
                });
            }
            Err(message) => {
                log::warn!("generation failed for session {}: {}", session_id, message);
                let applied = apply_update(
                    &mut self.inner.borrow_mut().sessions,
                    session_id,
                    SessionUpdate::AppendModelMessage {
                        base,
                        message: Message::model(GENERATION_ERROR_REPLY),
                    },
                );
                if applied {
                    self.persist_all().await;
                }
                self.event_bus.emit(ChatEvent::GenerationFailed {
                    session_id: session_id.to_string(),
                    message,
                });
            }
        }

        // Finally-semantics: every exit path releases the single-flight
        // gate and clears the presentation buffer.
        let mut inner = self.inner.borrow_mut();
        inner.status = GenerationStatus::Idle;
        inner.streaming.reset();
    }

    /// Write the full in-memory collection back through the repository.
    /// Storage failures degrade (the in-memory state stays authoritative).
    pub(crate) async fn persist_all(&self) {
        let (user_id, snapshot) = {
            let inner = self.inner.borrow();
            (inner.user.id.clone(), inner.sessions.clone())
        };
        if let Err(e) = self.repo.save(&user_id, &snapshot).await {
            log::warn!("failed to persist sessions for user {}: {}", user_id, e);
        }
    }
}
