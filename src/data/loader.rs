use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::coerce::{is_missing, parse_number};
use super::model::{Column, LoadedSet, Table};

// ---------------------------------------------------------------------------
// Delimiter selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Delimiter {
    /// Tab for `.tsv`, otherwise sniffed from the header line.
    #[default]
    Auto,
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl Delimiter {
    pub const ALL: [Delimiter; 5] = [
        Delimiter::Auto,
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Tab,
        Delimiter::Pipe,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Delimiter::Auto => "Auto-detect",
            Delimiter::Comma => "Comma  ,",
            Delimiter::Semicolon => "Semicolon  ;",
            Delimiter::Tab => "Tab",
            Delimiter::Pipe => "Pipe  |",
        }
    }

    fn byte(self) -> Option<u8> {
        match self {
            Delimiter::Auto => None,
            Delimiter::Comma => Some(b','),
            Delimiter::Semicolon => Some(b';'),
            Delimiter::Tab => Some(b'\t'),
            Delimiter::Pipe => Some(b'|'),
        }
    }

    /// Concrete delimiter byte for `path`.
    fn resolve(self, path: &Path) -> Result<u8> {
        if let Some(b) = self.byte() {
            return Ok(b);
        }
        if extension(path) == "tsv" {
            return Ok(b'\t');
        }
        let file = File::open(path).context("opening file")?;
        let mut header = String::new();
        BufReader::new(file)
            .read_line(&mut header)
            .context("reading header line")?;
        Ok(sniff_delimiter(&header))
    }
}

/// Most frequent candidate delimiter in `line`; comma on ties or none.
fn sniff_delimiter(line: &str) -> u8 {
    let mut best = (b',', line.matches(',').count());
    for cand in [b';', b'\t', b'|'] {
        let n = line.bytes().filter(|&b| b == cand).count();
        if n > best.1 {
            best = (cand, n);
        }
    }
    best.0
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every path into one [`LoadedSet`].
///
/// All-or-nothing: the first failing file aborts the load and the error
/// names it.
pub fn load_files(paths: &[PathBuf], delimiter: Delimiter) -> Result<LoadedSet> {
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let table = load_file(path, delimiter)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        log::debug!("Parsed {table}");
        tables.push(table);
    }
    Ok(LoadedSet::new(tables))
}

/// Load a single table.  Dispatch by extension.
///
/// * `.json`           – records-oriented array of objects
/// * `.parquet`/`.pq`  – flat Parquet columns
/// * anything else     – delimited text with a header row
pub fn load_file(path: &Path, delimiter: Delimiter) -> Result<Table> {
    match extension(path).as_str() {
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        _ => load_delimited(path, delimiter),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: Delimiter) -> Result<Table> {
    let delim = delimiter.resolve(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .context("opening delimited file")?;

    let raw_headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.is_empty()) {
        bail!("no columns to parse from file");
    }
    let headers = normalise_headers(raw_headers);

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("record {}", row_no + 1))?;
        for (col, field) in cells.iter_mut().zip(record.iter()) {
            col.push((!is_missing(field)).then(|| field.to_string()));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();
    Table::new(path, columns)
}

/// Blank headers become `Unnamed: <i>`; repeats get `.1`, `.2`, … suffixes.
fn normalise_headers(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut n = 0;
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{base}.{n}");
        }
        out.push(candidate);
    }
    out
}

/// Numeric when every present cell parses; text otherwise.
fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => parse_number(s).map(Some),
        })
        .collect();

    match parsed {
        Some(numbers) => Column::numeric(name, numbers),
        None => Column::text(name, cells),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "2024-01-01", "Price": 10.5 },
///   { "Date": "2024-01-02", "Price": 11.0 }
/// ]
/// ```
///
/// Columns appear in first-seen key order; absent keys are missing cells.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    if names.is_empty() {
        bail!("no columns to parse from file");
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells = records
                .iter()
                .map(|rec| rec.get(&name).and_then(json_to_cell))
                .collect();
            infer_column(name, cells)
        })
        .collect();
    Table::new(path, columns)
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) if is_missing(s) => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

enum ColumnBuilder {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

/// Flat Parquet columns: numeric Arrow types load as numbers, everything
/// else through Arrow's display formatting.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let mut builders: Vec<ColumnBuilder> = schema
        .fields()
        .iter()
        .map(|f| {
            if f.data_type().is_numeric() {
                ColumnBuilder::Numeric(Vec::new())
            } else {
                ColumnBuilder::Text(Vec::new())
            }
        })
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (idx, builder) in builders.iter_mut().enumerate() {
            let col = batch.column(idx);
            match builder {
                ColumnBuilder::Numeric(values) => {
                    let cast = arrow::compute::cast(col, &DataType::Float64).with_context(
                        || format!("casting '{}' to float", schema.field(idx).name()),
                    )?;
                    values.extend(cast.as_primitive::<Float64Type>().iter());
                }
                ColumnBuilder::Text(values) => {
                    for row in 0..col.len() {
                        if col.is_null(row) {
                            values.push(None);
                        } else {
                            values.push(Some(array_value_to_string(col, row)?));
                        }
                    }
                }
            }
        }
    }

    let columns = schema
        .fields()
        .iter()
        .zip(builders)
        .map(|(field, builder)| match builder {
            ColumnBuilder::Numeric(v) => Column::numeric(field.name().clone(), v),
            ColumnBuilder::Text(v) => Column::text(field.name().clone(), v),
        })
        .collect();
    Table::new(path, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnData;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_preserving_column_order_and_types() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.csv", "Date,Price,Note\n2024-01-01,10.5,x\n2024-01-02,,y\n");
        let table = load_file(&path, Delimiter::Auto).unwrap();

        assert_eq!(table.column_names(), vec!["Date", "Price", "Note"]);
        assert_eq!(table.n_rows(), 2);
        assert!(!table.column("Date").unwrap().is_numeric());
        assert_eq!(
            table.column("Price").unwrap().data,
            ColumnData::Numeric(vec![Some(10.5), None])
        );
    }

    #[test]
    fn sniffs_semicolons_and_uses_tabs_for_tsv() {
        let dir = TempDir::new().unwrap();
        let semi = write(&dir, "s.csv", "a;b\n1;2\n");
        let tsv = write(&dir, "t.tsv", "a\tb\n1\t2\n");

        assert_eq!(load_file(&semi, Delimiter::Auto).unwrap().column_names(), vec!["a", "b"]);
        assert_eq!(load_file(&tsv, Delimiter::Auto).unwrap().column_names(), vec!["a", "b"]);
    }

    #[test]
    fn explicit_delimiter_overrides_sniffing() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "p.txt", "a|b,c\n1|2,3\n");
        let table = load_file(&path, Delimiter::Pipe).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b,c"]);
        assert!(!table.column("b,c").unwrap().is_numeric());
    }

    #[test]
    fn mangles_blank_and_duplicate_headers() {
        let headers = normalise_headers(vec!["x".into(), "".into(), "x".into(), "x".into()]);
        assert_eq!(headers, vec!["x", "Unnamed: 1", "x.1", "x.2"]);
    }

    #[test]
    fn ragged_row_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.csv", "a,b\n1,2\n3\n");
        assert!(load_file(&path, Delimiter::Auto).is_err());
    }

    #[test]
    fn empty_file_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.csv", "");
        assert!(load_file(&path, Delimiter::Auto).is_err());
    }

    #[test]
    fn one_bad_file_aborts_the_whole_load() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.csv", "a\n1\n");
        let missing = dir.path().join("missing.csv");

        let err = load_files(&[good, missing], Delimiter::Auto).unwrap_err();
        assert!(format!("{err:#}").contains("missing.csv"));
    }

    #[test]
    fn loads_json_records_in_key_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "r.json",
            r#"[{"b": 1, "a": "x"}, {"a": "y", "b": null, "c": 2.5}]"#,
        );
        let table = load_file(&path, Delimiter::Auto).unwrap();

        assert_eq!(table.column_names(), vec!["b", "a", "c"]);
        assert_eq!(table.column("b").unwrap().data, ColumnData::Numeric(vec![Some(1.0), None]));
        assert_eq!(table.column("c").unwrap().data, ColumnData::Numeric(vec![None, Some(2.5)]));
    }

    #[test]
    fn loads_parquet_columns() {
        use arrow::array::{Float64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;
        use std::sync::Arc;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("value", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("a"), None])),
                Arc::new(Float64Array::from(vec![Some(1.5), Some(2.0)])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path, Delimiter::Auto).unwrap();
        assert_eq!(table.column_names(), vec!["name", "value"]);
        assert_eq!(
            table.column("name").unwrap().data,
            ColumnData::Text(vec![Some("a".into()), None])
        );
        assert_eq!(
            table.column("value").unwrap().data,
            ColumnData::Numeric(vec![Some(1.5), Some(2.0)])
        );
    }
}
