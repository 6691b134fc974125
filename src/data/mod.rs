/// Data layer: core types, loading, and querying.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  header mapping → RawRow → Observation (bad rows dropped)
///   └──────────┘
///        │            region: code → region lookup
///        ▼
///   ┌────────────────────┐
///   │ analysis::growth    │  Observation → GrowthObservation
///   └────────────────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │  query / filter   │  distinct years/countries/regions, filtered subsets
///   └──────────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
pub mod region;
