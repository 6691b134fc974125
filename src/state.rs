use crate::analysis::global::{MetricsConfig, aggregate_with};
use crate::analysis::growth::compute_growth;
use crate::analysis::series::{ChartRow, DEFAULT_CHART_COUNTRIES, chart_countries, chart_rows};
use crate::data::filter::FilterState;
use crate::data::model::{GlobalMetrics, GrowthObservation, Observation};
use crate::data::query::{list_countries, list_regions, list_years};
use crate::insights::{Insight, build_insights};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Growth is computed once when the dataset is set; changing the selection
/// only re-slices that set and recomputes the metrics of the selected year.
pub struct DashboardState {
    /// Observations as loaded.
    pub observations: Vec<Observation>,

    /// Growth-annotated observations (frozen after construction).
    pub growth: Vec<GrowthObservation>,

    /// Current selection.
    pub filters: FilterState,

    pub available_years: Vec<i32>,
    pub available_countries: Vec<String>,
    pub available_regions: Vec<String>,

    /// Metrics for `filters.selected_year` (cached).
    pub metrics: GlobalMetrics,

    pub config: MetricsConfig,
}

impl DashboardState {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self::with_config(observations, MetricsConfig::default())
    }

    /// Ingest a freshly loaded dataset and select its most recent year.
    pub fn with_config(observations: Vec<Observation>, config: MetricsConfig) -> Self {
        let growth = compute_growth(&observations);
        let available_years = list_years(&observations);
        let available_countries = list_countries(&observations);
        let available_regions = list_regions(&observations);

        let mut filters = FilterState::default();
        filters.reset(available_years.last().copied());
        let metrics = aggregate_with(&growth, filters.selected_year, &config);

        log::info!(
            "Dashboard ready: {} observations, {} countries, years {:?}..{:?}",
            observations.len(),
            available_countries.len(),
            available_years.first(),
            available_years.last()
        );

        Self {
            observations,
            growth,
            filters,
            available_years,
            available_countries,
            available_regions,
            metrics,
            config,
        }
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.available_years.last().copied()
    }

    /// Recompute `metrics` after a year change.
    pub fn refresh_metrics(&mut self) {
        self.metrics = aggregate_with(&self.growth, self.filters.selected_year, &self.config);
        log::debug!(
            "metrics recomputed for {}: {} countries",
            self.filters.selected_year,
            self.metrics.country_count
        );
    }

    pub fn set_year(&mut self, year: i32) {
        if self.filters.selected_year != year {
            self.filters.selected_year = year;
            self.refresh_metrics();
        }
    }

    /// Replace the whole selection at once.
    pub fn update_filters(&mut self, filters: FilterState) {
        let year_changed = filters.selected_year != self.filters.selected_year;
        self.filters = filters;
        if year_changed {
            self.refresh_metrics();
        }
    }

    pub fn toggle_country(&mut self, country: &str) {
        self.filters.toggle_country(country);
    }

    pub fn set_countries<I, S>(&mut self, countries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set_countries(countries);
    }

    pub fn set_regions<I, S>(&mut self, regions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set_regions(regions);
    }

    pub fn set_log_scale(&mut self, log_scale: bool) {
        self.filters.log_scale = log_scale;
    }

    /// Clear the selection and go back to the most recent year.
    pub fn reset_filters(&mut self) {
        let previous_year = self.filters.selected_year;
        self.filters.reset(self.latest_year());
        if self.filters.selected_year != previous_year {
            self.refresh_metrics();
        }
    }

    /// Growth observations passing the current country/region selection.
    pub fn filtered_data(&self) -> Vec<GrowthObservation> {
        self.growth
            .iter()
            .filter(|g| self.filters.matches(*g))
            .cloned()
            .collect()
    }

    /// Line chart rows for the current selection.
    pub fn chart(&self) -> Vec<ChartRow> {
        let countries = chart_countries(&self.growth, &self.filters, DEFAULT_CHART_COUNTRIES);
        if self.filters.selected_countries.is_empty() {
            chart_rows(&self.growth, &countries, self.filters.log_scale)
        } else {
            chart_rows(&self.filtered_data(), &countries, self.filters.log_scale)
        }
    }

    pub fn insights(&self) -> Vec<Insight> {
        build_insights(&self.metrics, &self.growth, &self.config.lagging)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::filter::DEFAULT_YEAR;
    use crate::data::model::fixtures::{obs, obs_in};

    fn sample() -> Vec<Observation> {
        vec![
            obs_in("Germany", 2019, 100.0, "Europe"),
            obs_in("Germany", 2020, 120.0, "Europe"),
            obs_in("Japan", 2019, 80.0, "Asia"),
            obs_in("Japan", 2020, 160.0, "Asia"),
            obs_in("Kenya", 2020, 4.0, "Africa"),
        ]
    }

    #[test]
    fn new_state_selects_latest_year() {
        let state = DashboardState::new(sample());

        assert_eq!(state.filters.selected_year, 2020);
        assert_eq!(state.metrics.year, 2020);
        assert_eq!(state.available_years, vec![2019, 2020]);
        assert_eq!(state.available_regions, vec!["Africa", "Asia", "Europe"]);
        assert_eq!(state.growth.len(), 5);
    }

    #[test]
    fn empty_dataset_falls_back_to_default_year() {
        let state = DashboardState::new(Vec::new());

        assert_eq!(state.filters.selected_year, DEFAULT_YEAR);
        assert_eq!(state.metrics.global_average, None);
        assert!(state.insights().is_empty());
    }

    #[test]
    fn set_year_recomputes_metrics_without_touching_growth() {
        // Arrange
        let mut state = DashboardState::new(sample());
        let growth_before = state.growth.clone();

        // Act
        state.set_year(2019);

        // Assert
        assert_eq!(state.metrics.year, 2019);
        assert_eq!(state.metrics.global_average, Some(90.0));
        assert_eq!(state.growth, growth_before);
    }

    #[test]
    fn filtered_data_applies_selection() {
        let mut state = DashboardState::new(sample());

        state.set_regions(["Asia", "Europe"]);
        assert_eq!(state.filtered_data().len(), 4);

        state.toggle_country("Japan");
        let countries: Vec<String> = state
            .filtered_data()
            .into_iter()
            .map(|g| g.observation.country)
            .collect();
        assert_eq!(countries, vec!["Japan", "Japan"]);
    }

    #[test]
    fn reset_filters_restores_latest_year() {
        let mut state = DashboardState::new(sample());
        state.set_year(2019);
        state.toggle_country("Kenya");
        state.set_log_scale(true);

        state.reset_filters();

        assert_eq!(state.filters, FilterState::for_year(2020));
        assert_eq!(state.metrics.year, 2020);
    }

    #[test]
    fn update_filters_refreshes_on_year_change() {
        let mut state = DashboardState::new(sample());
        let mut filters = state.filters.clone();
        filters.selected_year = 2019;

        state.update_filters(filters);

        assert_eq!(state.metrics.year, 2019);
    }

    #[test]
    fn chart_defaults_to_top_countries() {
        let state = DashboardState::new(sample());

        let rows = state.chart();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].values.len(), 3);
    }

    #[test]
    fn chart_follows_selection_and_log_scale() {
        let mut state = DashboardState::new(sample());
        state.toggle_country("Kenya");
        state.set_log_scale(true);

        let rows = state.chart();

        assert_eq!(rows.len(), 1);
        assert!((rows[0].values["Kenya"] - 5f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn latest_year_is_most_recent_observation() {
        let state = DashboardState::new(vec![obs("X", "X", 2001, 1.0)]);
        assert_eq!(state.latest_year(), Some(2001));
    }
}
