use serde::{Deserialize, Serialize};

/// Events emitted by the conversation orchestrator.
/// The UI drains these each frame for reactive updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A streaming generation started for a session
    GenerationStarted { session_id: String },

    /// The cumulative response text so far (replaces, never appends)
    StreamChunk { session_id: String, text: String },

    /// The model turn was appended and persisted
    GenerationComplete { session_id: String },

    /// The stream failed; a synthetic model turn was appended instead
    GenerationFailed { session_id: String, message: String },

    /// An auto-derived title landed for a session
    TitleUpdated { session_id: String, title: String },

    /// The session collection changed (create/delete/clear/load)
    SessionsChanged,
}
