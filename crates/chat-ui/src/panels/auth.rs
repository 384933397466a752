//! Login and register forms.

use egui::{self, Align2, RichText, Vec2};

use crate::state::UiState;
use crate::theme::*;

/// What the caller should do after rendering an auth form
pub enum AuthAction {
    None,
    Login { username: String, password: String },
    Register { username: String, password: String },
    SwitchToRegister,
    SwitchToLogin,
}

pub fn login_panel(ctx: &egui::Context, state: &mut UiState) -> AuthAction {
    auth_form(ctx, state, false)
}

pub fn register_panel(ctx: &egui::Context, state: &mut UiState) -> AuthAction {
    auth_form(ctx, state, true)
}

fn auth_form(ctx: &egui::Context, state: &mut UiState, registering: bool) -> AuthAction {
    let mut action = AuthAction::None;
    let title = if registering { "Create Account" } else { "Welcome Back" };
    let submit_label = if registering { "Register" } else { "Login" };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .fixed_size(Vec2::new(300.0, 0.0))
        .show(ctx, |ui| {
            if let Some(ref error) = state.auth_error {
                ui.label(RichText::new(error).color(ERROR).small());
                ui.add_space(4.0);
            }

            ui.label(RichText::new("Username").color(TEXT_SECONDARY).small());
            ui.text_edit_singleline(&mut state.username_input);
            ui.add_space(4.0);

            ui.label(RichText::new("Password").color(TEXT_SECONDARY).small());
            let password_edit =
                egui::TextEdit::singleline(&mut state.password_input).password(true);
            let password_response = ui.add(password_edit);
            ui.add_space(8.0);

            let submit = ui
                .add(
                    egui::Button::new(RichText::new(submit_label).color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(280.0, 28.0)),
                )
                .clicked()
                || (password_response.lost_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter)));

            if submit {
                let username = state.username_input.trim().to_string();
                let password = state.password_input.clone();
                action = if registering {
                    AuthAction::Register { username, password }
                } else {
                    AuthAction::Login { username, password }
                };
            }

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let (hint, link) = if registering {
                    ("Already have an account?", "Login instead")
                } else {
                    ("New here?", "Register instead")
                };
                ui.label(RichText::new(hint).color(TEXT_SECONDARY).small());
                if ui.link(RichText::new(link).color(ACCENT).small()).clicked() {
                    action = if registering {
                        AuthAction::SwitchToLogin
                    } else {
                        AuthAction::SwitchToRegister
                    };
                }
            });
        });

    action
}
