use serde::{Deserialize, Serialize};

use crate::data::loader::Delimiter;
use crate::plot::plan::{SelectionMode, ValidationPolicy, XAxisPolicy};

/// Key under which [`Settings`] are kept in eframe storage.
pub const STORAGE_KEY: &str = "csv_graph_viewer.settings";

/// User-adjustable behaviour, persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub selection_mode: SelectionMode,
    pub validation_policy: ValidationPolicy,
    pub x_axis_policy: XAxisPolicy,
    pub delimiter: Delimiter,
    pub line_width: f32,
    pub marker_radius: f32,
    /// Rows shown in the data preview.
    pub preview_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::List,
            validation_policy: ValidationPolicy::AllTables,
            x_axis_policy: XAxisPolicy::NumericOnly,
            delimiter: Delimiter::Auto,
            line_width: 1.5,
            marker_radius: 3.0,
            preview_rows: 200,
        }
    }
}

impl Settings {
    /// Restore saved settings, falling back to defaults.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|s| eframe::get_value(s, STORAGE_KEY))
            .unwrap_or_default()
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, STORAGE_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_in_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{"x_axis_policy": "AlwaysHonor", "preview_rows": 10}"#).unwrap();
        assert_eq!(s.x_axis_policy, XAxisPolicy::AlwaysHonor);
        assert_eq!(s.preview_rows, 10);
        assert_eq!(s.validation_policy, ValidationPolicy::AllTables);
        assert_eq!(s.delimiter, Delimiter::Auto);
    }

    #[test]
    fn missing_storage_gives_defaults() {
        assert_eq!(Settings::load(None), Settings::default());
    }
}
