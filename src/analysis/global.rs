use std::cmp::Ordering;

use super::growth::yoy_percent;
use super::lagging::{LaggingConfig, detect_lagging};
use crate::data::model::{CountryBandwidth, CountryGrowth, GlobalMetrics, GrowthObservation};

/// Knobs for [`aggregate_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsConfig {
    /// Length of the top-bandwidth and fastest-growing lists.
    pub top_n: usize,
    pub lagging: LaggingConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            lagging: LaggingConfig::default(),
        }
    }
}

/// Global metrics for `year` with the default configuration.
pub fn aggregate(data: &[GrowthObservation], year: i32) -> GlobalMetrics {
    aggregate_with(data, year, &MetricsConfig::default())
}

/// Global metrics for `year`.
///
/// A year without observations produces [`GlobalMetrics::empty`] with the
/// lagging list still filled in, since lagging detection looks at the whole
/// history up to `year`.
pub fn aggregate_with(data: &[GrowthObservation], year: i32, config: &MetricsConfig) -> GlobalMetrics {
    let year_data: Vec<&GrowthObservation> = data.iter().filter(|g| g.observation.year == year).collect();
    let critical_lagging = detect_lagging(data, year, &config.lagging);

    let Some(global_average) = mean_bandwidth(&year_data) else {
        log::debug!("no observations for {year}");
        return GlobalMetrics {
            critical_lagging,
            ..GlobalMetrics::empty(year)
        };
    };

    let prev_data: Vec<&GrowthObservation> = match year.checked_sub(1) {
        Some(prev_year) => data.iter().filter(|g| g.observation.year == prev_year).collect(),
        None => Vec::new(),
    };
    let yoy_growth = mean_bandwidth(&prev_data)
        .filter(|prev| *prev > 0.0)
        .map(|prev| yoy_percent(prev, global_average));

    let mut by_bandwidth = year_data.clone();
    // stable: ties keep the order of the growth set
    by_bandwidth.sort_by(|a, b| descending(a.observation.bandwidth, b.observation.bandwidth));
    let top_countries = by_bandwidth
        .iter()
        .take(config.top_n)
        .map(|g| CountryBandwidth {
            country: g.observation.country.clone(),
            bandwidth: g.observation.bandwidth,
        })
        .collect();

    let mut growing: Vec<(&GrowthObservation, f64)> = year_data
        .iter()
        .filter_map(|g| g.finite_growth().map(|growth| (*g, growth)))
        .collect();
    growing.sort_by(|a, b| descending(a.1, b.1));
    let fastest_growing = growing
        .into_iter()
        .take(config.top_n)
        .map(|(g, growth)| CountryGrowth {
            country: g.observation.country.clone(),
            growth,
        })
        .collect();

    GlobalMetrics {
        year,
        country_count: year_data.len(),
        global_average: Some(global_average),
        yoy_growth,
        top_countries,
        fastest_growing,
        critical_lagging,
    }
}

fn mean_bandwidth(data: &[&GrowthObservation]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let sum: f64 = data.iter().map(|g| g.observation.bandwidth).sum();
    Some(sum / data.len() as f64)
}

pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::analysis::growth::compute_growth;
    use crate::data::model::fixtures::obs;
    use crate::data::model::LaggingCountry;

    #[test]
    fn single_country_end_to_end() {
        // Arrange
        let growth = compute_growth(&[
            obs("A", "AAA", 2018, 100.0),
            obs("A", "AAA", 2019, 110.0),
            obs("A", "AAA", 2020, 121.0),
        ]);

        // Act
        let m = aggregate(&growth, 2020);

        // Assert
        assert_eq!(m.global_average, Some(121.0));
        assert_eq!(m.country_count, 1);
        assert!((m.yoy_growth.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(m.top_countries.len(), 1);
        assert_eq!(m.fastest_growing.len(), 1);
        assert!((m.fastest_growing[0].growth - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_data_returns_undefined_average() {
        let m = aggregate(&[], 2020);

        assert_eq!(m.global_average, None);
        assert_eq!(m.yoy_growth, None);
        assert!(m.top_countries.is_empty());
        assert!(m.fastest_growing.is_empty());
        assert!(m.critical_lagging.is_empty());
    }

    #[test]
    fn year_without_data_still_reports_lagging() {
        let growth = compute_growth(&[
            obs("A", "A", 2016, 100.0),
            obs("A", "A", 2017, 101.0),
            obs("A", "A", 2018, 102.0),
            obs("A", "A", 2019, 103.0),
        ]);

        let m = aggregate(&growth, 2021);

        assert!(m.is_empty());
        assert_eq!(
            m.critical_lagging,
            vec![LaggingCountry {
                country: "A".to_string(),
                consecutive_years: 3
            }]
        );
    }

    #[test]
    fn top_countries_sorted_and_capped_at_ten() {
        // Arrange
        let data: Vec<_> = (0..15)
            .map(|i| obs(&format!("C{i:02}"), "X", 2020, (i * 7 % 15) as f64))
            .collect();
        let growth = compute_growth(&data);

        // Act
        let m = aggregate(&growth, 2020);

        // Assert
        assert_eq!(m.top_countries.len(), 10);
        assert!(m
            .top_countries
            .windows(2)
            .all(|w| w[0].bandwidth >= w[1].bandwidth));
        assert_eq!(m.top_countries[0].bandwidth, 14.0);
    }

    #[test]
    fn bandwidth_ties_keep_growth_set_order() {
        // growth set is ordered by country name, so "Alpha" precedes "Beta"
        let growth = compute_growth(&[
            obs("Beta", "B", 2020, 50.0),
            obs("Alpha", "A", 2020, 50.0),
            obs("Gamma", "G", 2020, 80.0),
        ]);

        let m = aggregate(&growth, 2020);
        let names: Vec<&str> = m.top_countries.iter().map(|c| c.country.as_str()).collect();

        assert_eq!(names, vec!["Gamma", "Alpha", "Beta"]);
    }

    #[test]
    fn fastest_growing_skips_missing_and_non_finite_growth() {
        let growth = compute_growth(&[
            obs("Zero", "Z", 2019, 0.0),
            obs("Zero", "Z", 2020, 10.0),
            obs("New", "N", 2020, 10.0),
            obs("Slow", "S", 2019, 10.0),
            obs("Slow", "S", 2020, 11.0),
            obs("Fast", "F", 2019, 10.0),
            obs("Fast", "F", 2020, 30.0),
        ]);

        let m = aggregate(&growth, 2020);
        let names: Vec<&str> = m.fastest_growing.iter().map(|c| c.country.as_str()).collect();

        assert_eq!(names, vec!["Fast", "Slow"]);
    }

    #[test]
    fn global_growth_absent_without_previous_year_or_zero_average() {
        let only_current = compute_growth(&[obs("A", "A", 2020, 10.0)]);
        assert_eq!(aggregate(&only_current, 2020).yoy_growth, None);

        let zero_prev = compute_growth(&[obs("A", "A", 2019, 0.0), obs("A", "A", 2020, 10.0)]);
        assert_eq!(aggregate(&zero_prev, 2020).yoy_growth, None);
    }

    #[test]
    fn global_growth_uses_averages_of_both_years() {
        // 2019 avg = 15, 2020 avg = 30 (different country sets)
        let growth = compute_growth(&[
            obs("A", "A", 2019, 10.0),
            obs("B", "B", 2019, 20.0),
            obs("A", "A", 2020, 30.0),
        ]);

        let m = aggregate(&growth, 2020);

        assert_eq!(m.global_average, Some(30.0));
        assert_eq!(m.yoy_growth, Some(100.0));
    }

    #[test]
    fn custom_top_n() {
        let growth = compute_growth(&[obs("A", "A", 2020, 1.0), obs("B", "B", 2020, 2.0), obs("C", "C", 2020, 3.0)]);
        let config = MetricsConfig {
            top_n: 2,
            ..MetricsConfig::default()
        };

        let m = aggregate_with(&growth, 2020, &config);

        assert_eq!(m.top_countries.len(), 2);
        assert_eq!(m.top_countries[0].country, "C");
    }

    #[test]
    fn first_representable_year_has_no_previous_year() {
        let growth = compute_growth(&[obs("A", "A", i32::MIN, 1.0)]);

        let m = aggregate(&growth, i32::MIN);

        assert_eq!(m.global_average, Some(1.0));
        assert_eq!(m.yoy_growth, None);
    }
}
