mod app;
mod color;
mod data;
mod error;
mod plot;
mod settings;
mod state;
mod ui;

use std::path::PathBuf;

use app::CsvGraphApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let initial_files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CSV Graph Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(CsvGraphApp::new(cc, initial_files)))),
    )
}
