//! egui front end.
//!
//! Each frame: expire the notice, draw the state, collect the commands the
//! widgets produced, then dispatch them in order. The two text fields are
//! edit buffers owned here; state only sees their contents through commands.

use std::time::Instant;

use crate::state::{AppState, Command, NoticeKind, PendingConfirmation, Transition};
use crate::store::KeyValueStore;
use crate::tasks::TaskId;
use crate::theme::Palette;

pub struct TaskApp<S: KeyValueStore> {
    state: AppState<S>,
    input_text: String,
    filter_text: String,
}

impl<S: KeyValueStore> TaskApp<S> {
    pub fn new(state: AppState<S>) -> Self {
        let filter_text = state.filter().to_string();
        Self {
            state,
            input_text: String::new(),
            filter_text,
        }
    }

    fn render_header(&self, ui: &mut egui::Ui, palette: &Palette, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Task List")
                    .color(palette.accent)
                    .size(22.0)
                    .strong(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let icon = self.state.theme().icon;
                let button = egui::Button::new(egui::RichText::new(icon.glyph()).size(18.0))
                    .frame(false);
                if ui
                    .add(button)
                    .on_hover_text("Toggle theme")
                    .clicked()
                {
                    commands.push(Command::ToggleTheme);
                }
            });
        });
    }

    fn render_add_form(&mut self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input_text)
                    .hint_text("New task")
                    .desired_width(ui.available_width() - 60.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add").clicked() || submitted {
                commands.push(Command::Add(self.input_text.clone()));
                response.request_focus();
            }
        });
    }

    fn render_filter(&mut self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            ui.label("🔍");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.filter_text)
                    .hint_text("Filter tasks...")
                    .desired_width(ui.available_width()),
            );
            if response.changed() {
                commands.push(Command::SetFilter(self.filter_text.clone()));
            }
        });
    }

    fn render_task_list(&self, ui: &mut egui::Ui, palette: &Palette, commands: &mut Vec<Command>) {
        if self.state.tasks().is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(egui::RichText::new("No tasks yet.").color(palette.muted));
            });
            return;
        }

        // Collect first so the scroll closure doesn't hold the state borrow.
        let rows: Vec<(TaskId, String)> = self
            .state
            .visible()
            .map(|task| (task.id, task.text.clone()))
            .collect();

        if rows.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(egui::RichText::new("No matching tasks.").color(palette.muted));
            });
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .max_height(ui.available_height() - 60.0)
            .show(ui, |ui| {
                for (id, text) in rows {
                    egui::Frame::none()
                        .stroke(egui::Stroke::new(1.0, palette.border))
                        .inner_margin(egui::Margin::same(6.0))
                        .outer_margin(egui::Margin::symmetric(0.0, 1.0))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(text).color(palette.foreground));
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        let delete = egui::Button::new(
                                            egui::RichText::new("🗑").color(palette.danger),
                                        )
                                        .frame(false);
                                        if ui.add(delete).on_hover_text("Delete task").clicked() {
                                            commands.push(Command::RequestRemove(id));
                                        }
                                    },
                                );
                            });
                        });
                }
            });
    }

    fn render_notice(&self, ui: &mut egui::Ui, palette: &Palette) {
        let Some(notice) = self.state.notice() else {
            return;
        };
        let color = match notice.kind {
            NoticeKind::Success => palette.success,
            NoticeKind::Warning => palette.warning,
            NoticeKind::Danger => palette.danger,
        };
        egui::Frame::none()
            .fill(color.gamma_multiply(0.25))
            .stroke(egui::Stroke::new(1.0, color))
            .inner_margin(egui::Margin::same(6.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(&notice.message).color(color).strong());
            });
    }

    fn render_confirmation(
        &self,
        ctx: &egui::Context,
        pending: PendingConfirmation,
        commands: &mut Vec<Command>,
    ) {
        egui::Window::new("Confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(pending.prompt());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        commands.push(Command::Confirm);
                    }
                    if ui.button("Cancel").clicked() {
                        commands.push(Command::Decline);
                    }
                });
            });

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Enter) {
                commands.push(Command::Confirm);
            } else if i.key_pressed(egui::Key::Escape) {
                commands.push(Command::Decline);
            }
        });
    }
}

impl<S: KeyValueStore> eframe::App for TaskApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.state.expire_notice(now);
        if let Some(deadline) = self.state.notice_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        let palette = self.state.theme().palette();
        ctx.set_style(palette.apply(&ctx.style()));

        let mut commands = Vec::new();
        let pending = self.state.pending();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(palette.background).inner_margin(16.0))
            .show(ctx, |ui| {
                ui.add_enabled_ui(pending.is_none(), |ui| {
                    ui.vertical(|ui| {
                        ui.spacing_mut().item_spacing.y = 8.0;

                        self.render_header(ui, &palette, &mut commands);
                        ui.separator();
                        self.render_notice(ui, &palette);
                        self.render_add_form(ui, &mut commands);
                        self.render_filter(ui, &mut commands);
                        ui.separator();
                        self.render_task_list(ui, &palette, &mut commands);
                        ui.separator();

                        if ui.button("Clear tasks").clicked() {
                            commands.push(Command::RequestClear);
                        }
                    });
                });
            });

        if let Some(pending) = pending {
            self.render_confirmation(ctx, pending, &mut commands);
        }

        if !commands.is_empty() {
            for command in commands {
                let is_add = matches!(command, Command::Add(_));
                if self.state.dispatch(command, now) == Transition::Changed && is_add {
                    self.input_text.clear();
                }
            }
            ctx.request_repaint();
        }
    }
}
