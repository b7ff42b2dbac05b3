use std::path::PathBuf;

use eframe::egui;

use crate::settings::Settings;
use crate::state::AppState;
use crate::ui::{dialogs, panels, plot, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CsvGraphApp {
    pub state: AppState,
}

impl CsvGraphApp {
    /// Restore settings and load any files passed on the command line.
    pub fn new(cc: &eframe::CreationContext<'_>, initial_files: Vec<PathBuf>) -> Self {
        let mut state = AppState::new(Settings::load(cc.storage));
        state.load_paths(initial_files);
        Self { state }
    }
}

impl eframe::App for CsvGraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Files dropped onto the window replace the loaded set.
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        self.state.load_paths(dropped);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: files, graph type, columns ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: data preview ----
        egui::TopBottomPanel::bottom("preview_panel")
            .resizable(true)
            .default_height(180.0)
            .show_animated(ctx, !self.state.loaded.is_empty(), |ui| {
                preview::data_preview(ui, &self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_plot(ui, &self.state);
        });

        dialogs::settings_window(ctx, &mut self.state);
        dialogs::notification_window(ctx, &mut self.state);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.state.settings.save(storage);
    }
}
