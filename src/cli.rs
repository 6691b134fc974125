//! Command-line consumer of the library: load a file, pick a year and a
//! selection, print the metrics and optionally export the insights.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::analysis::global::MetricsConfig;
use crate::analysis::lagging::LaggingConfig;
use crate::analysis::ranking::{RankOrder, rank_countries};
use crate::data::loader::{LoadOptions, load_observations};
use crate::data::region::RegionTable;
use crate::insights::{export_insights, render_insights};
use crate::state::DashboardState;

#[derive(Debug, Parser)]
#[command(name = "bandwidth-insights")]
#[command(about = "Growth, rankings and stagnation report for international bandwidth per capita")]
pub struct Args {
    /// Source file (.csv, .json or .parquet)
    pub file: PathBuf,

    /// Year to report on (default: most recent year in the data)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Restrict the filtered view to these countries (repeatable)
    #[arg(short, long = "country")]
    pub countries: Vec<String>,

    /// Restrict the filtered view to these regions (repeatable)
    #[arg(short, long = "region")]
    pub regions: Vec<String>,

    /// Length of the ranking lists
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Growth percentage at or below which a year counts as stagnant
    #[arg(long, default_value_t = 5.0)]
    pub threshold: f64,

    /// Consecutive stagnant years needed to flag a country
    #[arg(long, default_value_t = 3)]
    pub min_years: usize,

    /// JSON object mapping country codes to regions, replacing the built-in table
    #[arg(long)]
    pub regions_file: Option<PathBuf>,

    /// Directory to write bandwidth-insights-<year>.txt into
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Print the metrics as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            top_n: self.top,
            lagging: LaggingConfig {
                threshold: self.threshold,
                min_consecutive: self.min_years,
            },
        }
    }

    /// Apply `--year`, `--country` and `--region`. Repeated names select once.
    pub fn apply_selection(&self, state: &mut DashboardState) {
        if let Some(year) = self.year {
            state.set_year(year);
        }
        state.set_countries(self.countries.iter().cloned());
        state.set_regions(self.regions.iter().cloned());
    }
}

/// Run the report described by `args`.
pub fn run(args: Args) -> Result<()> {
    let mut options = LoadOptions::default();
    if let Some(path) = &args.regions_file {
        options.regions = RegionTable::from_json_file(path)?;
    }

    let observations = load_observations(&args.file, &options)
        .with_context(|| format!("loading {}", args.file.display()))?;

    let mut state = DashboardState::with_config(observations, args.metrics_config());
    args.apply_selection(&mut state);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state.metrics)?);
    } else {
        println!("{}", format_report(&state));
    }

    if let Some(dir) = &args.export {
        let path = export_insights(dir, state.metrics.year, &state.insights())
            .with_context(|| format!("exporting insights to {}", dir.display()))?;
        println!("Insights written to {}", path.display());
    }
    Ok(())
}

fn format_optional(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}{suffix}"))
}

/// Human-readable report for the selected year.
pub struct Report<'a>(pub &'a DashboardState);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let m = &state.metrics;

        writeln!(f, "Year {} ({} countries reporting)", m.year, m.country_count)?;
        writeln!(f, "  Global average:   {}", format_optional(m.global_average, " Kbps"))?;
        writeln!(f, "  Global YoY:       {}", format_optional(m.yoy_growth, "%"))?;

        writeln!(f, "\nTop countries")?;
        for (i, c) in m.top_countries.iter().enumerate() {
            writeln!(f, "  {:>2}. {:<32} {:>12.2}", i + 1, c.country, c.bandwidth)?;
        }

        let bottom = rank_countries(&state.growth, m.year, RankOrder::Bottom, m.top_countries.len().min(5));
        if !bottom.is_empty() {
            writeln!(f, "\nLowest bandwidth")?;
            for c in &bottom {
                writeln!(f, "  {:>2}. {:<32} {:>12.2}", c.rank, c.country, c.bandwidth)?;
            }
        }

        writeln!(f, "\nFastest growing")?;
        for (i, c) in m.fastest_growing.iter().enumerate() {
            writeln!(f, "  {:>2}. {:<32} {:>+11.2}%", i + 1, c.country, c.growth)?;
        }

        writeln!(f, "\nCritical lagging ({})", m.critical_lagging.len())?;
        for c in &m.critical_lagging {
            writeln!(f, "  {:<36} {} years", c.country, c.consecutive_years)?;
        }

        let filters = &state.filters;
        if !filters.selected_countries.is_empty() || !filters.selected_regions.is_empty() {
            writeln!(
                f,
                "\nSelection: {} observations match countries {:?} / regions {:?}",
                state.filtered_data().len(),
                filters.selected_countries,
                filters.selected_regions
            )?;
        }

        let insights = state.insights();
        if !insights.is_empty() {
            write!(f, "\n{}", render_insights(&insights))?;
        }
        Ok(())
    }
}

pub fn format_report(state: &DashboardState) -> String {
    Report(state).to_string()
}
