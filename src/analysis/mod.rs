//! Derived metrics over the frozen observation set.
//!
//! Every function here is pure: it borrows the growth set and returns a fresh
//! result, so the same snapshot can serve any number of year queries.

pub mod global;
pub mod growth;
pub mod lagging;
pub mod ranking;
pub mod series;

pub use global::{MetricsConfig, aggregate, aggregate_with};
pub use growth::{GroupKey, compute_growth, compute_growth_by};
pub use lagging::{LaggingConfig, detect_lagging};
pub use ranking::{RankOrder, digital_divide_ratio, rank_countries};
pub use series::{ChartRow, chart_countries, chart_rows, country_time_series};
