/// Plot layer: selection → plan → draw list.
///
/// ```text
///   selected columns + chart kind
///        │
///        ▼
///   ┌──────────┐
///   │   plan    │  x/y roles, column checks → PlotPlan
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  chart    │  coerce y columns, one series per (file, y) → Chart
///   └──────────┘
/// ```

pub mod chart;
pub mod plan;
