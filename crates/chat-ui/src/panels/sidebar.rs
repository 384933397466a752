//! Session sidebar — session list, new chat, settings, and logout.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};

use chat_types::session::ChatSession;

use crate::theme::*;

/// What the caller should do after rendering the sidebar
pub enum SidebarAction {
    None,
    NewChat,
    Select(String),
    Delete(String),
    OpenSettings,
    Logout,
}

pub fn sidebar_panel(
    ui: &mut egui::Ui,
    sessions: &[ChatSession],
    active_id: Option<&str>,
    username: &str,
) -> SidebarAction {
    let mut action = SidebarAction::None;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                if ui
                    .add(
                        egui::Button::new(RichText::new("+ New Chat").color(TEXT_PRIMARY).strong())
                            .fill(ACCENT)
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(ui.available_width(), 28.0)),
                    )
                    .clicked()
                {
                    action = SidebarAction::NewChat;
                }

                ui.add_space(8.0);
                ui.separator();

                let footer_height = 70.0;
                ScrollArea::vertical()
                    .max_height(ui.available_height() - footer_height)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for session in sessions {
                            let selected = active_id == Some(session.id.as_str());
                            ui.horizontal(|ui| {
                                let fill = if selected { BG_SURFACE } else { BG_SECONDARY };
                                let title_color =
                                    if selected { TEXT_PRIMARY } else { TEXT_SECONDARY };
                                let entry = ui.add(
                                    egui::Button::new(
                                        RichText::new(&session.title).color(title_color),
                                    )
                                    .fill(fill)
                                    .corner_radius(PANEL_ROUNDING)
                                    .min_size(Vec2::new(ui.available_width() - 28.0, 24.0)),
                                );
                                if entry.clicked() {
                                    action = SidebarAction::Select(session.id.clone());
                                }
                                if ui
                                    .add(
                                        egui::Button::new(RichText::new("✕").color(ERROR).small())
                                            .fill(fill)
                                            .corner_radius(PANEL_ROUNDING),
                                    )
                                    .on_hover_text("Delete chat")
                                    .clicked()
                                {
                                    action = SidebarAction::Delete(session.id.clone());
                                }
                            });
                        }
                    });

                ui.with_layout(Layout::bottom_up(Align::Min), |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(username).color(TEXT_PRIMARY).strong());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if ui
                                .link(RichText::new("Logout").color(TEXT_SECONDARY).small())
                                .clicked()
                            {
                                action = SidebarAction::Logout;
                            }
                            if ui
                                .link(RichText::new("Settings").color(TEXT_SECONDARY).small())
                                .clicked()
                            {
                                action = SidebarAction::OpenSettings;
                            }
                        });
                    });
                    ui.separator();
                });
            });
        });

    action
}
