/// Data layer: core types, loading, and numeric coercion.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse each file → Table, all files → LoadedSet
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   model   │  named columns, numeric or text cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  coerce   │  text column → numeric, unparseable cells → missing
///   └──────────┘
/// ```

pub mod coerce;
pub mod loader;
pub mod model;
