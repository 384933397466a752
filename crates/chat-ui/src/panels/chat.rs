//! Chat panel — displays the active session's transcript and input field.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};

use chat_types::message::{Message, Role};
use chat_types::session::ChatSession;

use crate::state::UiState;
use crate::theme::*;

/// What the caller should do after rendering the chat panel
pub enum ChatAction {
    None,
    Send(String),
    ClearChat,
}

pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    session: Option<&ChatSession>,
) -> ChatAction {
    let mut action = ChatAction::None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    let title = session.map(|s| s.title.as_str()).unwrap_or("Chat");
                    ui.heading(RichText::new(title).color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.is_generating { WARNING } else { SUCCESS };
                        ui.label(
                            RichText::new(&state.status_text)
                                .color(status_color)
                                .small(),
                        );
                        let has_messages =
                            session.map(|s| !s.messages.is_empty()).unwrap_or(false);
                        if has_messages
                            && !state.is_generating
                            && ui
                                .link(RichText::new("Clear").color(TEXT_SECONDARY).small())
                                .clicked()
                        {
                            action = ChatAction::ClearChat;
                        }
                    });
                });

                ui.separator();

                // Transcript
                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if let Some(session) = session {
                            for message in &session.messages {
                                render_message(ui, message);
                                ui.add_space(4.0);
                            }
                        }

                        // In-flight response, replaced wholesale per chunk
                        if state.is_generating {
                            egui::Frame::default()
                                .fill(BG_SECONDARY)
                                .corner_radius(PANEL_ROUNDING)
                                .inner_margin(8.0)
                                .show(ui, |ui| {
                                    ui.label(
                                        RichText::new("Gemini").color(SUCCESS).strong().small(),
                                    );
                                    if !state.streaming_text.is_empty() {
                                        ui.label(
                                            RichText::new(&state.streaming_text)
                                                .color(TEXT_PRIMARY),
                                        );
                                    }
                                    ui.label(RichText::new("▌").color(ACCENT).strong());
                                });
                        }
                    });

                ui.add_space(8.0);

                // Input area
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text("Type a message...")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));

                    let response = ui.add(input);

                    let send_enabled =
                        !state.input_text.trim().is_empty() && !state.is_generating;
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click
                    if (response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        && send_enabled)
                        || send_btn.clicked()
                    {
                        let text = state.input_text.trim().to_string();
                        action = ChatAction::Send(text);
                        state.input_text.clear();
                        response.request_focus();
                    }
                });
            });
        });

    action
}

fn render_message(ui: &mut egui::Ui, message: &Message) {
    let (label, label_color) = match message.role {
        Role::User => ("You", ACCENT),
        Role::Model => ("Gemini", SUCCESS),
    };

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(label).color(label_color).strong().small());
            ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
        });
}
