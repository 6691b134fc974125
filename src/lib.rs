//! `bandwidth-insights` library crate.
//!
//! Turns a table of international bandwidth per capita observations into
//! year-over-year growth, per-year global metrics, rankings and a list of
//! countries whose growth has stalled. The `bandwidth-insights` binary is a
//! thin command-line consumer; any other front-end drives the same API
//! through [`state::DashboardState`] or the free functions in [`analysis`].

pub mod analysis;
pub mod cli;
pub mod data;
pub mod error;
pub mod insights;
pub mod state;

pub use analysis::{MetricsConfig, aggregate, compute_growth, detect_lagging};
pub use data::filter::{FilterState, filter_subset};
pub use data::loader::{LoadOptions, load_observations};
pub use data::model::{GlobalMetrics, GrowthObservation, Observation};
pub use data::query::{list_countries, list_regions, list_years};
pub use error::LoadError;
