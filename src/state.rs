use std::path::PathBuf;

use crate::data::loader::load_files;
use crate::data::model::LoadedSet;
use crate::error::{ErrorClass, PlotError};
use crate::plot::chart::{Chart, build_chart};
use crate::plot::plan::{ChartKind, PlotPlan, SelectionMode, parse_column_list, validate_columns};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A modal message waiting to be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&PlotError> for Notification {
    fn from(err: &PlotError) -> Self {
        let level = match err.class() {
            ErrorClass::UserInput => NoticeLevel::Warning,
            ErrorClass::DataShape | ErrorClass::Render => NoticeLevel::Error,
        };
        Notification::new(level, err.title(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Where the last action left the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FilesLoaded,
    PlotSucceeded,
    PlotFailed,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Tables from the last successful load (empty until then).
    pub loaded: LoadedSet,

    pub chart_kind: ChartKind,

    /// List-mode selection in click order.
    pub selected_columns: Vec<String>,

    /// Text-mode entry, comma separated.
    pub column_entry: String,

    /// Last successfully built chart.
    pub chart: Option<Chart>,

    /// Bumped on every new chart so the plot view re-fits its bounds.
    pub chart_generation: u64,

    pub notification: Option<Notification>,

    pub settings: Settings,

    pub phase: Phase,

    /// Index of the table shown in the data preview.
    pub preview_file: usize,

    pub show_settings: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            loaded: LoadedSet::default(),
            chart_kind: ChartKind::default(),
            selected_columns: Vec::new(),
            column_entry: String::new(),
            chart: None,
            chart_generation: 0,
            notification: None,
            settings,
            phase: Phase::Idle,
            preview_file: 0,
            show_settings: false,
        }
    }

    /// Replace the loaded tables with `paths`.  An empty list is a no-op
    /// (cancelled dialog); a failing file leaves everything as it was.
    pub fn load_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        match load_files(&paths, self.settings.delimiter) {
            Ok(loaded) => {
                log::info!(
                    "Loaded {} files with columns {:?}",
                    loaded.len(),
                    loaded.column_names()
                );
                self.notification = Some(Notification::new(
                    NoticeLevel::Info,
                    "Files Loaded",
                    format!("Loaded {} files successfully.", loaded.len()),
                ));
                self.loaded = loaded;
                self.selected_columns.clear();
                self.preview_file = 0;
                self.phase = Phase::FilesLoaded;
            }
            Err(e) => {
                log::error!("{e:#}");
                self.notification = Some(Notification::new(
                    NoticeLevel::Error,
                    "Load Error",
                    format!("{e:#}"),
                ));
            }
        }
    }

    /// Drop every loaded table and the chart.
    pub fn clear(&mut self) {
        self.loaded = LoadedSet::default();
        self.selected_columns.clear();
        self.chart = None;
        self.preview_file = 0;
        self.phase = Phase::Idle;
    }

    /// Add `name` to the end of the list selection, or remove it.
    pub fn toggle_column(&mut self, name: &str) {
        if let Some(pos) = self.selected_columns.iter().position(|c| c == name) {
            self.selected_columns.remove(pos);
        } else {
            self.selected_columns.push(name.to_string());
        }
    }

    /// 1-based position of `name` in the list selection.
    pub fn selection_rank(&self, name: &str) -> Option<usize> {
        self.selected_columns
            .iter()
            .position(|c| c == name)
            .map(|i| i + 1)
    }

    /// The current selection according to the selection mode.
    pub fn selection(&self) -> Vec<String> {
        match self.settings.selection_mode {
            SelectionMode::List => self.selected_columns.clone(),
            SelectionMode::Text => parse_column_list(&self.column_entry),
        }
    }

    /// Run one plot action.  On success the new chart replaces the old one;
    /// on failure the old chart stays and the error is shown.
    pub fn plot(&mut self) {
        match self.try_plot() {
            Ok(chart) => {
                log::info!(
                    "Plotted {} series as {} chart",
                    chart.series.len(),
                    chart.kind
                );
                for series in chart.series.iter().filter(|s| s.is_all_missing()) {
                    log::warn!("'{}' has no numeric values", series.label);
                }
                self.chart = Some(chart);
                self.chart_generation += 1;
                self.phase = Phase::PlotSucceeded;
            }
            Err(e) => {
                match e.class() {
                    ErrorClass::UserInput => log::warn!("{e}"),
                    _ => log::error!("{e}"),
                }
                self.notification = Some(Notification::from(&e));
                self.phase = Phase::PlotFailed;
            }
        }
    }

    fn try_plot(&mut self) -> Result<Chart, PlotError> {
        if self.loaded.is_empty() {
            return Err(PlotError::NoFilesLoaded);
        }
        let plan = PlotPlan::from_selection(self.chart_kind, &self.selection())?;
        validate_columns(&self.loaded, &plan, self.settings.validation_policy)?;
        build_chart(&mut self.loaded, &plan, self.settings.x_axis_policy)
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::plan::ValidationPolicy;
    use std::fs;
    use tempfile::TempDir;

    fn write_files(dir: &TempDir, files: &[(&str, &str)]) -> Vec<PathBuf> {
        files
            .iter()
            .map(|(name, body)| {
                let path = dir.path().join(name);
                fs::write(&path, body).unwrap();
                path
            })
            .collect()
    }

    fn loaded_state(dir: &TempDir) -> AppState {
        let paths = write_files(
            dir,
            &[
                ("a.csv", "Date,Price\n2024-01-01,10\n2024-01-02,11\n"),
                ("b.csv", "Date,Price\n2024-01-01,20\n2024-01-02,21\n"),
            ],
        );
        let mut state = AppState::default();
        state.load_paths(paths);
        state
    }

    fn labels(state: &AppState) -> Vec<String> {
        state
            .chart
            .as_ref()
            .map(|c| c.series.iter().map(|s| s.label.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn plot_without_files_mutates_nothing() {
        let mut state = AppState::default();
        state.toggle_column("Price");
        state.plot();

        assert!(state.chart.is_none());
        assert!(state.loaded.is_empty());
        assert_eq!(state.notification.unwrap().title, "No Files Loaded");
    }

    #[test]
    fn load_reports_count_and_offers_first_table_columns() {
        let dir = TempDir::new().unwrap();
        let state = loaded_state(&dir);

        assert_eq!(state.phase, Phase::FilesLoaded);
        assert_eq!(state.loaded.column_names(), vec!["Date", "Price"]);
        assert_eq!(
            state.notification.unwrap().message,
            "Loaded 2 files successfully."
        );
    }

    #[test]
    fn date_price_line_plots_both_files_against_index() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded_state(&dir);
        state.toggle_column("Date");
        state.toggle_column("Price");
        state.plot();

        assert_eq!(state.phase, Phase::PlotSucceeded);
        assert_eq!(labels(&state), vec!["Price (File 1)", "Price (File 2)"]);
        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.x_label, "Row index");
        assert_eq!(chart.series[1].points, vec![[0.0, 20.0], [1.0, 21.0]]);
    }

    #[test]
    fn click_order_decides_the_x_column() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded_state(&dir);
        state.toggle_column("Price");
        state.toggle_column("Date");
        assert_eq!(state.selection_rank("Date"), Some(2));
        state.plot();

        assert_eq!(labels(&state), vec!["Date (File 1)", "Date (File 2)"]);
        assert!(state.chart.as_ref().unwrap().series[0].is_all_missing());
    }

    #[test]
    fn failed_plot_keeps_previous_chart() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded_state(&dir);
        state.toggle_column("Price");
        state.plot();
        let before = state.chart.clone();

        state.chart_kind = ChartKind::Scatter;
        state.plot();

        assert_eq!(state.phase, Phase::PlotFailed);
        assert_eq!(state.chart, before);
        let note = state.notification.unwrap();
        assert_eq!(note.title, "Scatter Plot Error");
        assert_eq!(note.level, NoticeLevel::Warning);
    }

    #[test]
    fn text_entry_is_checked_against_every_file() {
        let dir = TempDir::new().unwrap();
        let paths = write_files(
            &dir,
            &[("a.csv", "x,y\n1,2\n"), ("b.csv", "x,z\n1,2\n")],
        );
        let mut state = AppState::default();
        state.settings.selection_mode = SelectionMode::Text;
        state.load_paths(paths);
        state.column_entry = "x, y".into();
        state.plot();

        let note = state.notification.unwrap();
        assert_eq!(note.message, "Column 'y' does not exist in file 2.");
        assert_eq!(note.level, NoticeLevel::Error);
        assert!(state.chart.is_none());
    }

    #[test]
    fn first_table_policy_reports_render_error_for_later_file() {
        let dir = TempDir::new().unwrap();
        let paths = write_files(
            &dir,
            &[("a.csv", "x,y\n1,2\n"), ("b.csv", "x,z\n1,2\n")],
        );
        let mut state = AppState::default();
        state.settings.validation_policy = ValidationPolicy::FirstTable;
        state.load_paths(paths);
        state.toggle_column("y");
        state.plot();

        assert_eq!(
            state.notification.unwrap().message,
            "Failed to plot y in file 2.\nError: column not found"
        );
    }

    #[test]
    fn failed_load_keeps_previous_tables() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded_state(&dir);
        state.toggle_column("Price");

        state.load_paths(vec![dir.path().join("nope.csv")]);

        assert_eq!(state.loaded.len(), 2);
        assert_eq!(state.selected_columns, vec!["Price"]);
        assert_eq!(state.notification.unwrap().title, "Load Error");
    }

    #[test]
    fn new_load_replaces_tables_and_clears_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded_state(&dir);
        state.toggle_column("Price");
        let paths = write_files(&dir, &[("c.csv", "k\n1\n")]);
        state.load_paths(paths);

        assert_eq!(state.loaded.len(), 1);
        assert!(state.selected_columns.is_empty());
        assert_eq!(state.loaded.column_names(), vec!["k"]);
    }

    #[test]
    fn toggling_twice_deselects() {
        let mut state = AppState::default();
        state.toggle_column("a");
        state.toggle_column("b");
        state.toggle_column("a");
        assert_eq!(state.selected_columns, vec!["b"]);
        assert_eq!(state.selection_rank("a"), None);
    }
}
