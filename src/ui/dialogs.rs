use eframe::egui::{self, Align2, RichText, Ui};

use crate::data::loader::Delimiter;
use crate::plot::plan::{SelectionMode, ValidationPolicy, XAxisPolicy};
use crate::settings::Settings;
use crate::state::{AppState, NoticeLevel};

// ---------------------------------------------------------------------------
// Notification window
// ---------------------------------------------------------------------------

/// Show the pending notification until the user presses OK (or Enter).
pub fn notification_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(note) = &state.notification else {
        return;
    };

    let mut dismissed = ctx.input(|i| i.key_pressed(egui::Key::Enter));
    egui::Window::new(note.title.as_str())
        .id(egui::Id::new("notification"))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            let color = match note.level {
                NoticeLevel::Info => ui.visuals().text_color(),
                NoticeLevel::Warning => ui.visuals().warn_fg_color,
                NoticeLevel::Error => ui.visuals().error_fg_color,
            };
            ui.label(RichText::new(&note.message).color(color));
            ui.add_space(8.0);
            ui.vertical_centered(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed {
        state.dismiss_notification();
    }
}

// ---------------------------------------------------------------------------
// Settings window
// ---------------------------------------------------------------------------

pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings;
    egui::Window::new("Settings")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui: &mut Ui| {
            let s = &mut state.settings;

            ui.strong("Column selection");
            ui.radio_value(&mut s.selection_mode, SelectionMode::List, "Pick from list");
            ui.radio_value(&mut s.selection_mode, SelectionMode::Text, "Type names, comma separated");
            ui.separator();

            ui.strong("Check selected columns against");
            ui.radio_value(&mut s.validation_policy, ValidationPolicy::AllTables, "Every loaded file");
            ui.radio_value(&mut s.validation_policy, ValidationPolicy::FirstTable, "First file only");
            ui.separator();

            ui.strong("Text x column for Line / Bar");
            ui.radio_value(&mut s.x_axis_policy, XAxisPolicy::NumericOnly, "Ignore, plot against row index");
            ui.radio_value(&mut s.x_axis_policy, XAxisPolicy::AlwaysHonor, "Use as categories");
            ui.separator();

            ui.strong("Delimiter (applies to the next load)");
            egui::ComboBox::from_id_salt("delimiter")
                .selected_text(s.delimiter.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for d in Delimiter::ALL {
                        ui.selectable_value(&mut s.delimiter, d, d.label());
                    }
                });
            ui.separator();

            ui.add(egui::Slider::new(&mut s.line_width, 0.5..=5.0).text("Line width"));
            ui.add(egui::Slider::new(&mut s.marker_radius, 1.0..=10.0).text("Marker radius"));
            ui.add(egui::DragValue::new(&mut s.preview_rows).range(10..=10_000).prefix("Preview rows: "));
            ui.separator();

            if ui.button("Restore defaults").clicked() {
                *s = Settings::default();
            }
        });
    state.show_settings = open;
}
