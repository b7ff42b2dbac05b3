use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::model::LoadedSet;
use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Chart kind and policies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Bar, ChartKind::Scatter];
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Scatter => "Scatter",
        };
        write!(f, "{name}")
    }
}

/// How the user picks columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Multi-select list of the first table's columns, in click order.
    #[default]
    List,
    /// Comma-separated names typed by the user.
    Text,
}

/// Which tables the selected columns are checked against before plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationPolicy {
    #[default]
    AllTables,
    FirstTable,
}

/// Whether a text x column is honored for Line and Bar charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum XAxisPolicy {
    /// Text x columns fall back to plotting against the row index.
    #[default]
    NumericOnly,
    /// Text x columns are placed on a categorical axis.
    AlwaysHonor,
}

// ---------------------------------------------------------------------------
// Plot plan
// ---------------------------------------------------------------------------

/// Normalized plot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotPlan {
    pub kind: ChartKind,
    /// Set only when two or more columns were selected.
    pub x_column: Option<String>,
    /// Never empty; selection order.
    pub y_columns: Vec<String>,
}

impl PlotPlan {
    /// Derive x/y roles from a raw selection.
    pub fn from_selection(kind: ChartKind, selected: &[String]) -> Result<Self, PlotError> {
        let selected = dedup(selected);
        if selected.is_empty() {
            return Err(PlotError::NoColumnsSelected);
        }
        if kind == ChartKind::Scatter && selected.len() < 2 {
            return Err(PlotError::ScatterNeedsTwoColumns);
        }

        let mut y_columns = selected;
        let x_column = (y_columns.len() > 1).then(|| y_columns.remove(0));
        Ok(PlotPlan {
            kind,
            x_column,
            y_columns,
        })
    }

    /// Every column the plan touches, x first.
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.x_column.iter().chain(self.y_columns.iter())
    }
}

fn dedup(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

/// Split a comma-separated column entry: trimmed, blanks dropped, first
/// occurrence kept.
pub fn parse_column_list(text: &str) -> Vec<String> {
    let names: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    dedup(&names)
}

/// Check that the plan's columns exist where `policy` requires them.
///
/// Reports the first offender, columns in plan order, files in load order.
pub fn validate_columns(
    set: &LoadedSet,
    plan: &PlotPlan,
    policy: ValidationPolicy,
) -> Result<(), PlotError> {
    let checked = match policy {
        ValidationPolicy::AllTables => set.len(),
        ValidationPolicy::FirstTable => set.len().min(1),
    };
    for column in plan.columns() {
        for (i, table) in set.tables().iter().take(checked).enumerate() {
            if !table.has_column(column) {
                return Err(PlotError::MissingColumn {
                    column: column.clone(),
                    file: i + 1,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Table};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn table(cols: &[&str]) -> Table {
        Table::new(
            "t.csv",
            cols.iter().map(|c| Column::numeric(*c, vec![Some(1.0)])).collect(),
        )
        .unwrap()
    }

    #[test]
    fn single_column_has_no_x() {
        let plan = PlotPlan::from_selection(ChartKind::Line, &names(&["Price"])).unwrap();
        assert_eq!(plan.x_column, None);
        assert_eq!(plan.y_columns, names(&["Price"]));
    }

    #[test]
    fn first_of_many_becomes_x_and_leaves_y() {
        let plan =
            PlotPlan::from_selection(ChartKind::Bar, &names(&["Date", "Open", "Close"])).unwrap();
        assert_eq!(plan.x_column.as_deref(), Some("Date"));
        assert_eq!(plan.y_columns, names(&["Open", "Close"]));
        assert!(!plan.y_columns.contains(&"Date".to_string()));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = PlotPlan::from_selection(ChartKind::Line, &[]).unwrap_err();
        assert_eq!(err, PlotError::NoColumnsSelected);
    }

    #[test]
    fn scatter_needs_two_distinct_columns() {
        let err = PlotPlan::from_selection(ChartKind::Scatter, &names(&["a"])).unwrap_err();
        assert_eq!(err, PlotError::ScatterNeedsTwoColumns);

        let err = PlotPlan::from_selection(ChartKind::Scatter, &names(&["a", "a"])).unwrap_err();
        assert_eq!(err, PlotError::ScatterNeedsTwoColumns);
    }

    #[test]
    fn parses_free_text_entry() {
        assert_eq!(parse_column_list(" Date , Price,,Price , Vol"), names(&["Date", "Price", "Vol"]));
        assert!(parse_column_list(" , ").is_empty());
    }

    #[test]
    fn all_tables_policy_names_the_offending_file() {
        let set = LoadedSet::new(vec![table(&["Date", "Price"]), table(&["Date"])]);
        let plan = PlotPlan::from_selection(ChartKind::Line, &names(&["Date", "Price"])).unwrap();

        let err = validate_columns(&set, &plan, ValidationPolicy::AllTables).unwrap_err();
        assert_eq!(
            err,
            PlotError::MissingColumn {
                column: "Price".into(),
                file: 2
            }
        );
    }

    #[test]
    fn first_table_policy_ignores_later_tables() {
        let set = LoadedSet::new(vec![table(&["Date", "Price"]), table(&["Date"])]);
        let plan = PlotPlan::from_selection(ChartKind::Line, &names(&["Date", "Price"])).unwrap();
        assert!(validate_columns(&set, &plan, ValidationPolicy::FirstTable).is_ok());

        let plan = PlotPlan::from_selection(ChartKind::Line, &names(&["Volume"])).unwrap();
        let err = validate_columns(&set, &plan, ValidationPolicy::FirstTable).unwrap_err();
        assert_eq!(
            err,
            PlotError::MissingColumn {
                column: "Volume".into(),
                file: 1
            }
        );
    }
}
