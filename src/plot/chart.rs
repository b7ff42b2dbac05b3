use crate::data::coerce::{Coercion, coerce_numeric};
use crate::data::model::{ColumnData, LoadedSet, Table};
use crate::error::PlotError;

use super::plan::{ChartKind, PlotPlan, XAxisPolicy};

/// Share of one category slot occupied by a group of bars.
const BAR_GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Chart – a fully built draw list
// ---------------------------------------------------------------------------

/// One (file, y-column) series.  Missing values are stored as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

impl Series {
    /// Runs of consecutive points with both coordinates present.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        for p in &self.points {
            if is_present(p) {
                current.push(*p);
            } else if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }

    pub fn present_points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.points.iter().copied().filter(is_present)
    }

    pub fn is_all_missing(&self) -> bool {
        self.present_points().next().is_none()
    }
}

fn is_present(p: &[f64; 2]) -> bool {
    p[0].is_finite() && p[1].is_finite()
}

/// Everything needed to draw one plot action's result.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    /// Tick labels when the x axis is categorical; position `i` is label `i`.
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

/// Label of the category slot at `value`, if it falls exactly on one.
pub fn category_at(categories: &[String], value: f64) -> Option<&str> {
    if value.fract() != 0.0 || value < 0.0 {
        return None;
    }
    categories.get(value as usize).map(String::as_str)
}

/// Horizontal offset and width of bar series `index` out of `count`.
pub fn bar_layout(index: usize, count: usize) -> (f64, f64) {
    let width = BAR_GROUP_WIDTH / count.max(1) as f64;
    let offset = -BAR_GROUP_WIDTH / 2.0 + width * (index as f64 + 0.5);
    (offset, width)
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Category positions numbered in order of first appearance.
#[derive(Default)]
struct CategoryAxis {
    labels: Vec<String>,
}

impl CategoryAxis {
    fn position(&mut self, label: &str) -> f64 {
        let idx = match self.labels.iter().position(|l| l == label) {
            Some(i) => i,
            None => {
                self.labels.push(label.to_string());
                self.labels.len() - 1
            }
        };
        idx as f64
    }

    /// Tick label for bar slot `row`; the first table to label a row keeps it.
    fn label_row(&mut self, row: usize, label: &str) {
        if self.labels.len() <= row {
            self.labels.resize(row + 1, String::new());
        }
        if self.labels[row].is_empty() {
            self.labels[row] = label.to_string();
        }
    }
}

enum XValues {
    Index,
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    /// Bars at their row index, ticks labelled with the x value.
    RowLabels(Vec<Option<String>>),
}

fn render_error(column: &str, file: usize, reason: &str) -> PlotError {
    PlotError::Render {
        column: column.to_string(),
        file,
        reason: reason.to_string(),
    }
}

fn text_x_honored(kind: ChartKind, x_policy: XAxisPolicy) -> bool {
    kind == ChartKind::Scatter || x_policy == XAxisPolicy::AlwaysHonor
}

/// Line and scatter charts share one x scale across files: categorical as
/// soon as any table contributes an honored text x column, numeric otherwise.
fn categorical_axis(set: &LoadedSet, plan: &PlotPlan, x_policy: XAxisPolicy) -> bool {
    let Some(x_col) = &plan.x_column else {
        return false;
    };
    plan.kind != ChartKind::Bar
        && text_x_honored(plan.kind, x_policy)
        && set
            .tables()
            .iter()
            .any(|t| t.column(x_col).is_some_and(|c| !c.is_numeric()))
}

/// Build the draw list for `plan`: one series per table per y column.
///
/// Y columns are coerced to numeric in place.  The first series that cannot
/// be built aborts the whole chart; coercions done before that stay.
pub fn build_chart(
    set: &mut LoadedSet,
    plan: &PlotPlan,
    x_policy: XAxisPolicy,
) -> Result<Chart, PlotError> {
    let categorical = categorical_axis(set, plan, x_policy);
    let mut axis = CategoryAxis::default();
    let mut series = Vec::with_capacity(set.len() * plan.y_columns.len());
    let mut x_used = false;

    for (i, table) in set.tables_mut().iter_mut().enumerate() {
        let file = i + 1;
        for y_col in &plan.y_columns {
            let column = table
                .column_mut(y_col)
                .ok_or_else(|| render_error(y_col, file, "column not found"))?;
            if let Coercion::Converted { nulled } = coerce_numeric(column) {
                log::debug!("Coerced '{y_col}' in file {file} to numeric ({nulled} cells unparseable)");
            }
            let ys = column
                .data
                .numbers()
                .ok_or_else(|| render_error(y_col, file, "column is not numeric"))?
                .to_vec();

            let xs = x_values(table, plan, x_policy, categorical, file)?;
            x_used |= !matches!(xs, XValues::Index);

            let points = match xs {
                XValues::Index => ys
                    .iter()
                    .enumerate()
                    .map(|(row, y)| [row as f64, y.unwrap_or(f64::NAN)])
                    .collect(),
                XValues::Numeric(xv) => xv
                    .iter()
                    .zip(&ys)
                    .map(|(x, y)| [x.unwrap_or(f64::NAN), y.unwrap_or(f64::NAN)])
                    .collect(),
                XValues::Categorical(labels) => labels
                    .iter()
                    .zip(&ys)
                    .map(|(x, y)| {
                        let pos = x.as_deref().map_or(f64::NAN, |l| axis.position(l));
                        [pos, y.unwrap_or(f64::NAN)]
                    })
                    .collect(),
                XValues::RowLabels(labels) => labels
                    .iter()
                    .zip(&ys)
                    .enumerate()
                    .map(|(row, (x, y))| {
                        if let Some(l) = x {
                            axis.label_row(row, l);
                        }
                        [row as f64, y.unwrap_or(f64::NAN)]
                    })
                    .collect(),
            };

            series.push(Series {
                label: format!("{y_col} (File {file})"),
                points,
            });
        }
    }

    let x_label = match (&plan.x_column, x_used) {
        (Some(x), true) => x.clone(),
        _ => "Row index".to_string(),
    };

    Ok(Chart {
        kind: plan.kind,
        x_label,
        y_label: plan.y_columns.join(", "),
        categories: axis.labels,
        series,
    })
}

/// Resolve the x coordinates `table` contributes under `plan`.
///
/// Each bar keeps its own row slot.  A text x column is honored for scatter
/// plots and under [`XAxisPolicy::AlwaysHonor`]; otherwise the series falls
/// back to the row index.  On a `categorical` axis numeric x values become
/// category labels too.
fn x_values(
    table: &Table,
    plan: &PlotPlan,
    x_policy: XAxisPolicy,
    categorical: bool,
    file: usize,
) -> Result<XValues, PlotError> {
    let Some(x_col) = &plan.x_column else {
        return Ok(XValues::Index);
    };
    let column = table
        .column(x_col)
        .ok_or_else(|| render_error(x_col, file, "x column not found"))?;
    let labels = || -> Vec<Option<String>> {
        (0..table.n_rows()).map(|r| column.data.label(r)).collect()
    };

    let xs = match &column.data {
        ColumnData::Text(_) if !text_x_honored(plan.kind, x_policy) => {
            log::debug!("x column '{x_col}' in file {file} is not numeric; using row index");
            XValues::Index
        }
        _ if plan.kind == ChartKind::Bar => XValues::RowLabels(labels()),
        ColumnData::Numeric(v) if !categorical => XValues::Numeric(v.clone()),
        _ => XValues::Categorical(labels()),
    };
    Ok(xs)
}
