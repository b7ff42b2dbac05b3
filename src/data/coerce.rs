use super::model::{Column, ColumnData};

/// Cell tokens read as missing values.
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

pub fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

/// Parse a cell as a number, ignoring surrounding whitespace.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if is_missing(cell) {
        return None;
    }
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Outcome of [`coerce_numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    AlreadyNumeric,
    /// Text column rewritten as numbers; `nulled` cells did not parse.
    Converted { nulled: usize },
}

/// Turn a text column into a numeric one in place.
///
/// Present cells that do not parse become missing; nothing fails.
pub fn coerce_numeric(column: &mut Column) -> Coercion {
    let ColumnData::Text(values) = &column.data else {
        return Coercion::AlreadyNumeric;
    };

    let mut nulled = 0;
    let numbers: Vec<Option<f64>> = values
        .iter()
        .map(|cell| {
            let cell = cell.as_deref()?;
            let parsed = parse_number(cell);
            if parsed.is_none() && !is_missing(cell) {
                nulled += 1;
            }
            parsed
        })
        .collect();

    column.data = ColumnData::Numeric(numbers);
    Coercion::Converted { nulled }
}
