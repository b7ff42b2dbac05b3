//! Writes a small set of sample files for trying out the viewer:
//! two CSVs sharing `Date,Price,Volume,Note`, one JSON and one Parquet file.
//!
//! Usage: `generate_sample [output_dir]` (default `samples`).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

/// Minimal deterministic PRNG (xorshift64*)
struct SimpleRng(u64);

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng(seed.max(1))
    }

    fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let v = self.0.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (v >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[-1, 1)`.
    fn signed(&mut self) -> f64 {
        self.next_f64() * 2.0 - 1.0
    }
}

struct Day {
    date: String,
    price: f64,
    volume: i64,
    note: &'static str,
}

/// Random-walk price series over `days` consecutive January/February dates.
fn price_walk(rng: &mut SimpleRng, start: f64, days: usize) -> Vec<Day> {
    let mut price = start;
    (0..days)
        .map(|i| {
            price = (price * (1.0 + 0.02 * rng.signed())).max(1.0);
            let (month, day) = if i < 31 { (1, i + 1) } else { (2, i - 30) };
            Day {
                date: format!("2024-{month:02}-{day:02}"),
                price: (price * 100.0).round() / 100.0,
                volume: 1000 + (rng.next_f64() * 9000.0) as i64,
                note: if i % 7 == 0 { "weekly close" } else { "" },
            }
        })
        .collect()
}

fn write_csv(path: &Path, days: &[Day]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["Date", "Price", "Volume", "Note"])?;
    for d in days {
        writer.write_record([
            d.date.clone(),
            d.price.to_string(),
            d.volume.to_string(),
            d.note.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, days: &[Day]) -> Result<()> {
    let records: Vec<_> = days
        .iter()
        .map(|d| json!({ "Date": d.date, "Price": d.price, "Volume": d.volume }))
        .collect();
    let text = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, text).context("writing JSON")?;
    Ok(())
}

fn write_parquet(path: &Path, days: &[Day]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Utf8, false),
        Field::new("Price", DataType::Float64, false),
        Field::new("Volume", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(days.iter().map(|d| d.date.as_str()))),
            Arc::new(Float64Array::from_iter_values(days.iter().map(|d| d.price))),
            Arc::new(Int64Array::from_iter_values(days.iter().map(|d| d.volume))),
        ],
    )?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "samples".to_string());
    let out_dir = Path::new(&out_dir);
    std::fs::create_dir_all(out_dir).context("creating output directory")?;

    let mut rng = SimpleRng::new(42);
    let days = 45;

    write_csv(&out_dir.join("prices_a.csv"), &price_walk(&mut rng, 100.0, days))?;
    write_csv(&out_dir.join("prices_b.csv"), &price_walk(&mut rng, 80.0, days))?;
    write_json(&out_dir.join("prices_c.json"), &price_walk(&mut rng, 120.0, days))?;
    write_parquet(&out_dir.join("prices_d.parquet"), &price_walk(&mut rng, 60.0, days))?;

    println!("Wrote 4 sample files ({days} rows each) to {}", out_dir.display());
    Ok(())
}
