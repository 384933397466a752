//! Main egui application — routes between auth and chat views and
//! bridges UI actions into the orchestrator's async operations.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

use chat_core::auth::AuthService;
use chat_core::event_bus::EventBus;
use chat_core::orchestrator::ConversationOrchestrator;
use chat_core::ports::StoragePort;
use chat_core::repository::SessionRepository;
use chat_platform::llm::GeminiClient;
use chat_platform::storage::auto_detect_storage;
use chat_types::config::ChatConfig;
use chat_types::user::User;
use chat_types::{ChatError, Result};
use chat_ui::panels::{auth, chat, settings, sidebar};
use chat_ui::state::UiState;
use chat_ui::theme;

const CONFIG_STORAGE_KEY: &str = "chat_config";

/// Which screen is showing
#[derive(PartialEq)]
enum View {
    Login,
    Register,
    Chat,
}

/// The main application state
pub struct ChatApp {
    ui_state: UiState,
    config: ChatConfig,
    event_bus: EventBus,
    storage: Rc<dyn StoragePort>,
    auth: AuthService,
    orchestrator: Option<ConversationOrchestrator>,
    view: View,
    first_frame: bool,
    save_feedback: Option<settings::SaveFeedback>,
    // Slots filled by async tasks, consumed on the next frame
    restored_config: Rc<RefCell<Option<ChatConfig>>>,
    restored_user: Rc<RefCell<Option<User>>>,
    auth_result: Rc<RefCell<Option<Result<User>>>>,
}

impl ChatApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let storage = auto_detect_storage();
        let auth = AuthService::new(storage.clone());

        let app = Self {
            ui_state: UiState::new(),
            config: ChatConfig::default(),
            event_bus: EventBus::new(),
            storage: storage.clone(),
            auth: auth.clone(),
            orchestrator: None,
            view: View::Login,
            first_frame: true,
            save_feedback: None,
            restored_config: Rc::new(RefCell::new(None)),
            restored_user: Rc::new(RefCell::new(None)),
            auth_result: Rc::new(RefCell::new(None)),
        };

        Self::restore_config(storage, app.restored_config.clone());
        Self::restore_session_user(auth, app.restored_user.clone());

        app
    }

    /// Restore config from storage (async)
    fn restore_config(storage: Rc<dyn StoragePort>, slot: Rc<RefCell<Option<ChatConfig>>>) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Ok(Some(data)) = storage.get(CONFIG_STORAGE_KEY).await {
                if let Ok(config) = serde_json::from_slice::<ChatConfig>(&data) {
                    *slot.borrow_mut() = Some(config);
                    log::info!("Config restored from storage");
                }
            }
        });
    }

    /// Restore the signed-in user from storage (async); lands the app
    /// straight in the chat view when a session user exists.
    fn restore_session_user(auth: AuthService, slot: Rc<RefCell<Option<User>>>) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(user) = auth.current_user().await {
                log::info!("Restored signed-in user {}", user.username);
                *slot.borrow_mut() = Some(user);
            }
        });
    }

    /// Save config to storage (async, fire-and-forget)
    fn save_config(storage: Rc<dyn StoragePort>, config: &ChatConfig) {
        if let Ok(json) = serde_json::to_vec(config) {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = storage.set(CONFIG_STORAGE_KEY, &json).await;
                log::info!("Config saved to storage");
            });
        }
    }

    /// Build the orchestrator for `user` and load their sessions.
    fn start_chat(&mut self, user: User, ctx: &egui::Context) {
        let llm = Rc::new(GeminiClient::new(self.config.generation.clone()));
        let repo = SessionRepository::new(self.storage.clone());
        let orchestrator =
            ConversationOrchestrator::new(user, repo, llm, self.event_bus.clone());

        {
            let orchestrator = orchestrator.clone();
            let ctx = ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                orchestrator.load().await;
                ctx.request_repaint();
            });
        }

        self.orchestrator = Some(orchestrator);
        self.ui_state.clear_auth_form();
        self.view = View::Chat;
    }

    fn rebuild_llm(&mut self) {
        if let Some(ref mut orchestrator) = self.orchestrator {
            orchestrator
                .set_generation_port(Rc::new(GeminiClient::new(self.config.generation.clone())));
        }
    }

    /// Consume the one-shot slots async tasks may have filled.
    fn poll_async_slots(&mut self, ctx: &egui::Context) {
        let restored_config = self.restored_config.borrow_mut().take();
        if let Some(config) = restored_config {
            self.config = config;
            self.rebuild_llm();
        }
        let restored_user = self.restored_user.borrow_mut().take();
        if let Some(user) = restored_user {
            if self.view != View::Chat {
                self.start_chat(user, ctx);
            }
        }
        let auth_result = self.auth_result.borrow_mut().take();
        if let Some(result) = auth_result {
            match result {
                Ok(user) => self.start_chat(user, ctx),
                Err(e) => self.ui_state.auth_error = Some(e.to_string()),
            }
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        self.poll_async_slots(ctx);

        // Drain events from the orchestrator
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        if self.ui_state.is_generating {
            ctx.request_repaint();
        }

        match self.view {
            View::Login => {
                CentralPanel::default().show(ctx, |_ui| {});
                match auth::login_panel(ctx, &mut self.ui_state) {
                    auth::AuthAction::Login { username, password } => {
                        self.dispatch_login(username, password, ctx)
                    }
                    auth::AuthAction::SwitchToRegister => {
                        self.ui_state.clear_auth_form();
                        self.view = View::Register;
                    }
                    _ => {}
                }
            }
            View::Register => {
                CentralPanel::default().show(ctx, |_ui| {});
                match auth::register_panel(ctx, &mut self.ui_state) {
                    auth::AuthAction::Register { username, password } => {
                        self.dispatch_register(username, password, ctx)
                    }
                    auth::AuthAction::SwitchToLogin => {
                        self.ui_state.clear_auth_form();
                        self.view = View::Login;
                    }
                    _ => {}
                }
            }
            View::Chat => self.show_chat(ctx),
        }
    }
}

impl ChatApp {
    fn show_chat(&mut self, ctx: &egui::Context) {
        let Some(orchestrator) = self.orchestrator.clone() else {
            return;
        };

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(self.ui_state.sidebar_open, "☰")
                    .clicked()
                {
                    self.ui_state.sidebar_open = !self.ui_state.sidebar_open;
                }
                ui.label(
                    RichText::new("Gemini Chat")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(format!("Model: {}", self.config.generation.model))
                        .color(theme::TEXT_SECONDARY)
                        .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                });
            });
        });

        // ── Session sidebar ──────────────────────────────────
        if self.ui_state.sidebar_open {
            let sessions = orchestrator.sessions();
            let active_id = orchestrator.active_session_id();
            let username = orchestrator.user().username;

            SidePanel::left("session_sidebar")
                .min_width(200.0)
                .max_width(280.0)
                .show(ctx, |ui| {
                    match sidebar::sidebar_panel(
                        ui,
                        &sessions,
                        active_id.as_deref(),
                        &username,
                    ) {
                        sidebar::SidebarAction::NewChat => {
                            self.dispatch_new_chat(&orchestrator, ctx)
                        }
                        sidebar::SidebarAction::Select(id) => {
                            orchestrator.select_session(&id);
                        }
                        sidebar::SidebarAction::Delete(id) => {
                            self.dispatch_delete(&orchestrator, id, ctx)
                        }
                        sidebar::SidebarAction::OpenSettings => {
                            self.ui_state.show_settings = true;
                        }
                        sidebar::SidebarAction::Logout => self.dispatch_logout(ctx),
                        sidebar::SidebarAction::None => {}
                    }
                });
        }

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    match settings::settings_panel(
                        ui,
                        &mut self.config.generation,
                        self.save_feedback.as_ref(),
                    ) {
                        settings::SettingsAction::Changed => {
                            self.rebuild_llm();
                            Self::save_config(self.storage.clone(), &self.config);
                        }
                        settings::SettingsAction::SaveClicked => {
                            self.rebuild_llm();
                            Self::save_config(self.storage.clone(), &self.config);
                            self.save_feedback = Some(settings::SaveFeedback {
                                message: "Saved".to_string(),
                                success: true,
                            });
                        }
                        settings::SettingsAction::None => {}
                    }
                });
        } else {
            self.save_feedback = None;
        }

        // ── Main content ─────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            let session = orchestrator.active_session();
            match chat::chat_panel(ui, &mut self.ui_state, session.as_ref()) {
                chat::ChatAction::Send(text) => self.dispatch_send(&orchestrator, text, ctx),
                chat::ChatAction::ClearChat => self.dispatch_clear(&orchestrator, ctx),
                chat::ChatAction::None => {}
            }
        });
    }

    // ─── Async dispatch ──────────────────────────────────────

    fn dispatch_login(&self, username: String, password: String, ctx: &egui::Context) {
        let auth = self.auth.clone();
        let slot = self.auth_result.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            *slot.borrow_mut() = Some(auth.login(&username, &password).await);
            ctx.request_repaint();
        });
    }

    fn dispatch_register(&self, username: String, password: String, ctx: &egui::Context) {
        let auth = self.auth.clone();
        let slot = self.auth_result.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            *slot.borrow_mut() = Some(auth.register(&username, &password).await);
            ctx.request_repaint();
        });
    }

    fn dispatch_send(&self, orchestrator: &ConversationOrchestrator, text: String, ctx: &egui::Context) {
        let Some(session_id) = orchestrator.active_session_id() else {
            return;
        };
        let orchestrator = orchestrator.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match orchestrator.send_message(&session_id, &text).await {
                Ok(()) => {}
                Err(ChatError::Busy) => log::debug!("send ignored: generation in flight"),
                Err(e) => log::error!("send failed: {}", e),
            }
            ctx.request_repaint();
        });
    }

    fn dispatch_new_chat(&self, orchestrator: &ConversationOrchestrator, ctx: &egui::Context) {
        let orchestrator = orchestrator.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            orchestrator.create_session().await;
            ctx.request_repaint();
        });
    }

    fn dispatch_delete(
        &self,
        orchestrator: &ConversationOrchestrator,
        session_id: String,
        ctx: &egui::Context,
    ) {
        let orchestrator = orchestrator.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            orchestrator.delete_session(&session_id).await;
            ctx.request_repaint();
        });
    }

    fn dispatch_clear(&self, orchestrator: &ConversationOrchestrator, ctx: &egui::Context) {
        let Some(session_id) = orchestrator.active_session_id() else {
            return;
        };
        let orchestrator = orchestrator.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            orchestrator.clear_chat(&session_id).await;
            ctx.request_repaint();
        });
    }

    fn dispatch_logout(&mut self, ctx: &egui::Context) {
        let auth = self.auth.clone();
        let ctx_clone = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = auth.logout().await {
                log::warn!("logout failed: {}", e);
            }
            ctx_clone.request_repaint();
        });
        self.orchestrator = None;
        self.ui_state = UiState::new();
        self.view = View::Login;
    }
}
