//! Browser platform adapters.
//!
//! Implements the `chat-core` port traits on top of browser APIs:
//! Gemini over `fetch`, and localStorage-backed persistence with an
//! in-memory fallback.

pub mod llm;
pub mod storage;

pub use llm::GeminiClient;
pub use storage::{auto_detect_storage, LocalStorage, MemoryStorage};
