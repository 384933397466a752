//! Transient "response so far" state. Never persisted.
//!
//! While a generation is active, `text` holds the latest cumulative
//! snapshot from the stream; an empty text with `active` set means
//! "waiting for the first chunk", which is distinct from idle.

#[derive(Debug, Default)]
pub struct StreamingState {
    text: String,
    active: bool,
}

impl StreamingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of a generation: clear the buffer and mark active.
    pub fn begin(&mut self) {
        self.text.clear();
        self.active = true;
    }

    /// Replace (not append) the buffer with the latest cumulative text.
    pub fn replace(&mut self, text: String) {
        self.text = text;
    }

    /// End of a generation, success or failure: clear and deactivate.
    pub fn reset(&mut self) {
        self.text.clear();
        self.active = false;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
