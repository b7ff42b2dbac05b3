use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::plot::plan::{ChartKind, SelectionMode};
use crate::state::{AppState, Phase};

// ---------------------------------------------------------------------------
// Left side panel – files, graph type, columns
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    if ui.button("Load CSV Files").clicked() {
        open_file_dialog(state);
    }
    ui.add_space(6.0);

    ui.strong("Loaded Files:");
    if state.loaded.is_empty() {
        ui.label("None");
    }
    let mut preview = state.preview_file;
    for (i, table) in state.loaded.tables().iter().enumerate() {
        ui.selectable_value(&mut preview, i, format!("{}. {}", i + 1, table.display_name()))
            .on_hover_text(table.source().display().to_string());
    }
    state.preview_file = preview;
    ui.separator();

    ui.strong("Select Graph Type:");
    egui::ComboBox::from_id_salt("graph_type")
        .selected_text(state.chart_kind.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut state.chart_kind, kind, kind.to_string());
            }
        });
    ui.separator();

    ui.strong("Select Columns:");
    match state.settings.selection_mode {
        SelectionMode::List => column_list(ui, state),
        SelectionMode::Text => column_entry(ui, state),
    }
    ui.add_space(6.0);

    if ui.button("Plot Graph").clicked() {
        state.plot();
    }
}

/// Multi-select list of the first table's columns.  The first picked column
/// is marked as the x axis once a second one is picked.
fn column_list(ui: &mut Ui, state: &mut AppState) {
    let columns = state.loaded.column_names();
    if columns.is_empty() {
        ui.label("Load files to see their columns.");
        return;
    }
    let multi = state.selected_columns.len() > 1;

    ScrollArea::vertical()
        .max_height(260.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for col in &columns {
                let rank = state.selection_rank(col);
                let text = match rank {
                    Some(1) if multi => format!("{col}   [x]"),
                    Some(n) => format!("{col}   [{n}]"),
                    None => col.clone(),
                };
                if ui.selectable_label(rank.is_some(), text).clicked() {
                    state.toggle_column(col);
                }
            }
        });

    if !state.selected_columns.is_empty() && ui.small_button("Clear selection").clicked() {
        state.selected_columns.clear();
    }
}

/// Free-text, comma-separated column entry.
fn column_entry(ui: &mut Ui, state: &mut AppState) {
    ui.add(
        egui::TextEdit::singleline(&mut state.column_entry)
            .hint_text("e.g. Date, Price")
            .desired_width(f32::INFINITY),
    );
    let columns = state.loaded.column_names();
    if !columns.is_empty() {
        ui.label(
            RichText::new(format!("Available columns: {}", columns.join(", ")))
                .small()
                .weak(),
        );
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.loaded.is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                state.clear();
                ui.close_menu();
            }
        });
        ui.menu_button("View", |ui: &mut Ui| {
            if ui.button("Settings…").clicked() {
                state.show_settings = true;
                ui.close_menu();
            }
        });

        ui.separator();

        let status = match state.phase {
            Phase::Idle => "No files loaded".to_string(),
            Phase::FilesLoaded => format!("{} files loaded", state.loaded.len()),
            Phase::PlotSucceeded => match &state.chart {
                Some(chart) => format!("{} chart, {} series", chart.kind, chart.series.len()),
                None => String::new(),
            },
            Phase::PlotFailed => "Last plot failed".to_string(),
        };
        ui.label(status);
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open CSV files")
        .add_filter("CSV files", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("All files", &["*"])
        .pick_files();

    if let Some(paths) = files {
        state.load_paths(paths);
    }
}
