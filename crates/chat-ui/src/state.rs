//! UI-level state that drives rendering.
//! This is a read-only projection of the orchestrator state, updated
//! each frame by draining the EventBus; the session list itself is
//! re-read from the orchestrator every frame.

use chat_types::event::ChatEvent;

/// State visible to UI panels
pub struct UiState {
    /// Cumulative partial response being streamed
    pub streaming_text: String,
    /// Whether a generation is in flight
    pub is_generating: bool,
    /// Status line text
    pub status_text: String,
    /// Input field content
    pub input_text: String,
    /// Whether the settings panel is open
    pub show_settings: bool,
    /// Whether the session sidebar is open (collapsible on small screens)
    pub sidebar_open: bool,
    /// Auth form fields
    pub username_input: String,
    pub password_input: String,
    /// Last auth failure shown above the form
    pub auth_error: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            streaming_text: String::new(),
            is_generating: false,
            status_text: "Ready".to_string(),
            input_text: String::new(),
            show_settings: false,
            sidebar_open: true,
            username_input: String::new(),
            password_input: String::new(),
            auth_error: None,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::GenerationStarted { .. } => {
                    self.is_generating = true;
                    self.streaming_text.clear();
                    self.status_text = "Generating...".to_string();
                }
                ChatEvent::StreamChunk { text, .. } => {
                    // cumulative snapshot, not a delta
                    self.streaming_text = text;
                }
                ChatEvent::GenerationComplete { .. } => {
                    self.is_generating = false;
                    self.streaming_text.clear();
                    self.status_text = "Ready".to_string();
                }
                ChatEvent::GenerationFailed { message, .. } => {
                    self.is_generating = false;
                    self.streaming_text.clear();
                    self.status_text = format!("Error: {}", message);
                }
                ChatEvent::TitleUpdated { .. } | ChatEvent::SessionsChanged => {
                    // session snapshots are re-read each frame
                }
            }
        }
    }

    /// Reset the auth form, e.g. when switching between login and register
    pub fn clear_auth_form(&mut self) {
        self.username_input.clear();
        self.password_input.clear();
        self.auth_error = None;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
