/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .parquet        mono.json
///        │                           │
///        ▼                           ▼
///   ┌──────────┐               ┌──────────┐
///   │  loader   │  → Vec<Peak>  │  loader   │  → Vec<RawReferenceEntry>
///   └──────────┘               └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  intensity threshold + m/z window
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
