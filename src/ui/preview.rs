use eframe::egui::{RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::state::AppState;

/// Tabular preview of the file picked in the side panel.
pub fn data_preview(ui: &mut Ui, state: &AppState) {
    let Some(table) = state.loaded.get(state.preview_file) else {
        ui.label("No data loaded.");
        return;
    };
    let rows = table.n_rows().min(state.settings.preview_rows);

    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("File {}:", state.preview_file + 1));
        ui.label(table.to_string());
        if rows < table.n_rows() {
            ui.label(RichText::new(format!("showing first {rows} rows")).weak());
        }
    });

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        ui.push_id(("preview", state.preview_file), |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .columns(TableColumn::auto().at_least(60.0), table.n_cols())
                .header(20.0, |mut header| {
                    for col in table.columns() {
                        header.col(|ui: &mut Ui| {
                            let kind = if col.is_numeric() { "num" } else { "text" };
                            ui.strong(&col.name).on_hover_text(kind);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows, |mut row| {
                        let r = row.index();
                        for col in table.columns() {
                            row.col(|ui: &mut Ui| {
                                ui.label(col.data.display(r));
                            });
                        }
                    });
                });
        });
    });
}
