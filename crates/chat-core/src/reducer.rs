//! Field-level merge of session updates.
//!
//! Three async activities (persistence, streaming generation, title
//! derivation) may read-modify-write the same session in any order.
//! Expressing every mutation as a `SessionUpdate` applied against the
//! *latest* in-memory state makes the ordering invariant a pure-function
//! property: no update may regress another update that causally
//! preceded it.

use chat_types::message::Message;
use chat_types::session::ChatSession;

/// One mutation of a session, keyed by session id at the apply site.
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// Append a user turn to the current message list.
    AppendUserMessage(Message),
    /// Append the model turn. `base` is the message list as it stood when
    /// the generation started (the user turn included); the result is
    /// exactly `base + [message]` so a concurrent title patch can never
    /// leak messages in or out of the exchange.
    AppendModelMessage { base: Vec<Message>, message: Message },
    /// Patch only the title; messages appended since the title was
    /// requested survive.
    SetTitle(String),
    /// Truncate the message list. The title is kept.
    ClearMessages,
}

/// Apply `update` to the session with `session_id` in `sessions`.
///
/// Returns `false` when no such session exists — late callbacks for a
/// since-deleted session are dropped rather than resurrecting it.
pub fn apply_update(
    sessions: &mut Vec<ChatSession>,
    session_id: &str,
    update: SessionUpdate,
) -> bool {
    let Some(session) = sessions.iter_mut().find(|s| s.id == session_id) else {
        log::debug!("dropping update for unknown session {}", session_id);
        return false;
    };

    match update {
        SessionUpdate::AppendUserMessage(message) => {
            session.messages.push(message);
        }
        SessionUpdate::AppendModelMessage { base, message } => {
            session.messages = base;
            session.messages.push(message);
        }
        SessionUpdate::SetTitle(title) => {
            session.title = title;
        }
        SessionUpdate::ClearMessages => {
            session.messages.clear();
        }
    }
    session.touch();
    true
}
