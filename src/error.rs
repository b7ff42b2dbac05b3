use thiserror::Error;

/// Broad category of a [`PlotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Nothing usable was selected.
    UserInput,
    /// A selected column is absent from a loaded table.
    DataShape,
    /// A series could not be drawn.
    Render,
}

/// Everything that can abort a plot action.  Each variant is shown to the
/// user as a notification; the `Display` text is the message body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlotError {
    #[error("Please load CSV files first.")]
    NoFilesLoaded,

    #[error("Please select at least one column to plot.")]
    NoColumnsSelected,

    #[error("Scatter plot requires at least two columns: an x-axis and a y-axis.")]
    ScatterNeedsTwoColumns,

    /// `file` is 1-based.
    #[error("Column '{column}' does not exist in file {file}.")]
    MissingColumn { column: String, file: usize },

    /// `file` is 1-based.
    #[error("Failed to plot {column} in file {file}.\nError: {reason}")]
    Render {
        column: String,
        file: usize,
        reason: String,
    },
}

impl PlotError {
    pub fn title(&self) -> &'static str {
        match self {
            PlotError::NoFilesLoaded => "No Files Loaded",
            PlotError::NoColumnsSelected => "No Columns Selected",
            PlotError::ScatterNeedsTwoColumns => "Scatter Plot Error",
            PlotError::MissingColumn { .. } | PlotError::Render { .. } => "Error",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            PlotError::NoFilesLoaded
            | PlotError::NoColumnsSelected
            | PlotError::ScatterNeedsTwoColumns => ErrorClass::UserInput,
            PlotError::MissingColumn { .. } => ErrorClass::DataShape,
            PlotError::Render { .. } => ErrorClass::Render,
        }
    }
}
