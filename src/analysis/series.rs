use std::collections::BTreeMap;

use serde::Serialize;

use super::ranking::{RankOrder, rank_countries};
use crate::data::filter::FilterState;
use crate::data::model::{CountryTimeSeries, GrowthObservation, SeriesPoint};

/// Countries charted when the selection is empty.
pub const DEFAULT_CHART_COUNTRIES: usize = 5;

/// One year of the line chart: country → plotted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub year: i32,
    pub values: BTreeMap<String, f64>,
}

/// Split the growth set into one year-ordered series per country, in order of
/// first appearance.
pub fn country_time_series(data: &[GrowthObservation]) -> Vec<CountryTimeSeries> {
    let mut out: Vec<CountryTimeSeries> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for g in data {
        let obs = &g.observation;
        let slot = *index.entry(obs.country.as_str()).or_insert_with(|| {
            out.push(CountryTimeSeries {
                country: obs.country.clone(),
                country_code: obs.country_code.clone(),
                points: Vec::new(),
            });
            out.len() - 1
        });
        out[slot].points.push(SeriesPoint {
            year: obs.year,
            bandwidth: obs.bandwidth,
            yoy_growth: g.yoy_growth,
        });
    }

    for series in &mut out {
        series.points.sort_by_key(|p| p.year);
    }
    out
}

/// Countries to chart: the explicit selection, or the best connected
/// countries of the selected year when nothing is selected.
pub fn chart_countries(data: &[GrowthObservation], filters: &FilterState, default_count: usize) -> Vec<String> {
    if !filters.selected_countries.is_empty() {
        return filters.selected_countries.clone();
    }
    rank_countries(data, filters.selected_year, RankOrder::Top, default_count)
        .into_iter()
        .map(|r| r.country)
        .collect()
}

/// Pivot the growth set into per-year rows for `countries`.
///
/// With `log_scale` each value is `log10(bandwidth + 1)`.
pub fn chart_rows(data: &[GrowthObservation], countries: &[String], log_scale: bool) -> Vec<ChartRow> {
    let mut years: BTreeMap<i32, BTreeMap<String, f64>> = BTreeMap::new();
    for g in data.iter().filter(|g| countries.contains(&g.observation.country)) {
        let value = if log_scale {
            (g.observation.bandwidth + 1.0).log10()
        } else {
            g.observation.bandwidth
        };
        years
            .entry(g.observation.year)
            .or_default()
            .insert(g.observation.country.clone(), value);
    }

    years
        .into_iter()
        .map(|(year, values)| ChartRow { year, values })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::analysis::growth::compute_growth;
    use crate::data::model::fixtures::obs;

    fn sample() -> Vec<GrowthObservation> {
        compute_growth(&[
            obs("B", "BBB", 2020, 99.0),
            obs("A", "AAA", 2020, 9.0),
            obs("B", "BBB", 2019, 9.0),
            obs("C", "CCC", 2020, 50.0),
        ])
    }

    #[test]
    fn time_series_groups_and_orders_by_year() {
        let series = country_time_series(&sample());

        assert_eq!(series.len(), 3);
        let b = series.iter().find(|s| s.country == "B").unwrap();
        assert_eq!(b.country_code, "BBB");
        let years: Vec<i32> = b.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2019, 2020]);
        assert_eq!(b.points[1].yoy_growth, Some(1000.0));
    }

    #[test]
    fn time_series_sorts_points_even_from_unsorted_input() {
        let data = vec![
            GrowthObservation::new(obs("A", "A", 2021, 3.0), None),
            GrowthObservation::new(obs("A", "A", 2019, 1.0), None),
        ];

        let series = country_time_series(&data);

        assert_eq!(series[0].points[0].year, 2019);
    }

    #[test]
    fn chart_countries_defaults_to_top_of_selected_year() {
        let mut filters = FilterState::for_year(2020);

        assert_eq!(chart_countries(&sample(), &filters, 2), vec!["B", "C"]);

        filters.toggle_country("A");
        assert_eq!(chart_countries(&sample(), &filters, 2), vec!["A"]);
    }

    #[test]
    fn chart_rows_pivot_by_year() {
        let rows = chart_rows(&sample(), &["B".to_string(), "A".to_string()], false);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2019);
        assert_eq!(rows[0].values.get("B"), Some(&9.0));
        assert_eq!(rows[1].values.len(), 2);
    }

    #[test]
    fn chart_rows_log_scale() {
        let rows = chart_rows(&sample(), &["B".to_string()], true);

        assert!((rows[0].values["B"] - 1.0).abs() < 1e-12);
        assert!((rows[1].values["B"] - 2.0).abs() < 1e-12);
    }
}
