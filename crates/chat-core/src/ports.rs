//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! Implementations live in `chat-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use chat_types::{message::Message, Result};

// ─── Generation Port ─────────────────────────────────────────

/// One frame of a streaming completion. Chunks carry the *cumulative*
/// text received so far, not deltas; the sequence is monotonically
/// non-shrinking and ends in either `Done` or `Error`.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// The full partial response so far
    Chunk(String),
    /// Stream finished; `text` is the final cumulative response
    Done { text: String },
    /// Transport or API failure; terminates the stream
    Error(String),
}

#[async_trait(?Send)]
pub trait GenerationPort {
    /// Streaming completion over the session's prior turns plus the new
    /// user utterance. Persona and temperature are fixed configuration
    /// of the adapter, not caller-supplied.
    fn stream_completion(
        &self,
        history: Vec<Message>,
        new_user_text: &str,
    ) -> Pin<Box<dyn Stream<Item = StreamEvent>>>;

    /// One-shot short title (≈5 words) derived from the first user turn,
    /// stripped of quote characters. Adapters substitute a default rather
    /// than failing where they can; callers must still swallow errors.
    async fn generate_title(&self, seed_text: &str) -> Result<String>;
}

// ─── Storage Port ────────────────────────────────────────────

/// Keyed blob storage. No cross-call atomicity: every write is a full
/// overwrite of the value and concurrent writers are last-write-wins.
#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// List keys with a given prefix
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
