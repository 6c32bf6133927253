//! egui overlay: control buttons, a stats readout and dismissable notices.

use egui::{Align2, Color32, Frame, RichText};

/// Something the user asked for through the overlay or a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    TogglePlan,
    Export,
    Reload,
}

/// Pending user-visible messages, oldest first.
#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<String>,
}

impl Notices {
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        // The same failure on every reload should not stack up.
        if !self.items.contains(&message) {
            self.items.push(message);
        }
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

/// What the stats readout shows.
#[derive(Debug, Clone, Default)]
pub struct HudStats {
    pub triangles: usize,
    pub skipped_triangles: usize,
    pub loading: bool,
    pub source: String,
}

pub fn draw_controls(ctx: &egui::Context, show_plan: bool, can_reload: bool) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::Area::new(egui::Id::new("controls"))
        .anchor(Align2::RIGHT_TOP, [-12.0, 12.0])
        .show(ctx, |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    let label = if show_plan { "Hide Plan" } else { "Show Plan" };
                    if ui.button(label).clicked() {
                        actions.push(UiAction::TogglePlan);
                    }
                    if ui.button("Export OBJ").clicked() {
                        actions.push(UiAction::Export);
                    }
                    if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                        actions.push(UiAction::Reload);
                    }
                });
            });
        });

    actions
}

pub fn draw_hud(ctx: &egui::Context, stats: &HudStats) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(Align2::LEFT_TOP, [12.0, 12.0])
        .show(ctx, |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new(&stats.source).strong());
                if stats.loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading model...");
                    });
                } else {
                    ui.label(format!("Triangles: {}", stats.triangles));
                    if stats.skipped_triangles > 0 {
                        ui.label(format!("Skipped: {}", stats.skipped_triangles));
                    }
                }
                ui.small("Drag: orbit | Wheel: zoom | R: reset | P: plan | E: export | L: reload");
            });
        });
}

pub fn draw_notices(ctx: &egui::Context, notices: &mut Notices) {
    if notices.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notices"))
        .anchor(Align2::LEFT_BOTTOM, [12.0, -12.0])
        .show(ctx, |ui| {
            ui.set_max_width(520.0);
            for (i, message) in notices.iter().enumerate() {
                Frame::none()
                    .fill(Color32::from_black_alpha(178))
                    .rounding(6.0)
                    .inner_margin(egui::Margin::symmetric(12.0, 10.0))
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(
                                RichText::new(message)
                                    .color(Color32::from_rgb(0xf2, 0xb8, 0xb5))
                                    .size(12.0),
                            );
                            if ui.small_button("x").clicked() {
                                dismissed = Some(i);
                            }
                        });
                    });
                ui.add_space(4.0);
            }
        });

    if let Some(i) = dismissed {
        notices.dismiss(i);
    }
}
