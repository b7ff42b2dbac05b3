use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// ColumnData – the values of one column
// ---------------------------------------------------------------------------

/// Column storage.  Missing cells are `None` in both variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Numeric(_))
    }

    /// Numeric values, `None` for text columns.
    pub fn numbers(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Human-readable cell for the preview table.
    pub fn display(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) => match v.get(row).copied().flatten() {
                Some(n) => format_number(n),
                None => "NaN".to_string(),
            },
            ColumnData::Text(v) => match v.get(row) {
                Some(Some(s)) => s.clone(),
                _ => "NaN".to_string(),
            },
        }
    }

    /// Cell as a category label, `None` when missing.
    pub fn label(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(format_number),
            ColumnData::Text(v) => v.get(row).cloned().flatten(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.data.is_numeric()
    }
}

// ---------------------------------------------------------------------------
// Table – one loaded file
// ---------------------------------------------------------------------------

/// A parsed file: ordered, named columns of equal length.
#[derive(Debug, Clone)]
pub struct Table {
    source: PathBuf,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, rejecting ragged columns.
    pub fn new(source: impl Into<PathBuf>, columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.data.len() != n_rows) {
            bail!(
                "column '{}' has {} values, expected {n_rows}",
                bad.name,
                bad.data.len()
            );
        }
        Ok(Self {
            source: source.into(),
            columns,
            n_rows,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File name shown in the UI (falls back to the full path).
    pub fn display_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} rows × {} columns)",
            self.display_name(),
            self.n_rows,
            self.columns.len()
        )
    }
}

// ---------------------------------------------------------------------------
// LoadedSet – every table opened by the last load action
// ---------------------------------------------------------------------------

/// Tables index-aligned with the paths the user opened.
#[derive(Debug, Clone, Default)]
pub struct LoadedSet {
    tables: Vec<Table>,
}

impl LoadedSet {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut [Table] {
        &mut self.tables
    }

    pub fn first(&self) -> Option<&Table> {
        self.tables.first()
    }

    pub fn get(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }

    /// Column names offered for selection: those of the first table.
    pub fn column_names(&self) -> Vec<String> {
        self.first().map(Table::column_names).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rejects_ragged_columns() {
        let cols = vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::numeric("b", vec![Some(1.0)]),
        ];
        let err = Table::new("t.csv", cols).unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn display_formats_integers_and_missing() {
        let data = ColumnData::Numeric(vec![Some(3.0), Some(2.5), None]);
        assert_eq!(data.display(0), "3");
        assert_eq!(data.display(1), "2.5");
        assert_eq!(data.display(2), "NaN");
        assert_eq!(data.label(2), None);
    }

    #[test]
    fn loaded_set_offers_first_table_columns() {
        let a = Table::new("a.csv", vec![Column::numeric("x", vec![]), Column::numeric("y", vec![])]).unwrap();
        let b = Table::new("b.csv", vec![Column::numeric("z", vec![])]).unwrap();
        let set = LoadedSet::new(vec![a, b]);
        assert_eq!(set.column_names(), vec!["x", "y"]);
        assert_eq!(set.get(1).unwrap().display_name(), "b.csv");
    }
}
