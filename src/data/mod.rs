/// Data layer: core types, loading, filtering, summarizing, export.
///
/// Architecture:
/// ```text
///  .csv / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns, row-major cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  age range + categorical predicates → subset Table
///   └──────────┘
///        │
///        ├──────────────────────────┐
///        ▼                          ▼
///   ┌──────────┐              ┌──────────┐
///   │ summary   │  y shares    │  export   │  Table → .xlsx bytes
///   └──────────┘              └──────────┘
/// ```
///
/// Every stage is a pure function; the whole chain re-runs on each filter
/// submission.
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
