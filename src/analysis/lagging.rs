use std::collections::BTreeMap;

use crate::data::model::{GrowthObservation, LaggingCountry};

/// Parameters for critical-lagging detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaggingConfig {
    /// Growth (percent) at or below which a year counts as stagnant.
    pub threshold: f64,
    /// Streak length required to flag a country.
    pub min_consecutive: usize,
}

impl Default for LaggingConfig {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            min_consecutive: 3,
        }
    }
}

/// Find countries whose growth stayed at or below `config.threshold` for at
/// least `config.min_consecutive` years, walking back from `cutoff_year`.
///
/// The streak starts at each country's most recent observation not after the
/// cutoff and ends at the first year with missing growth (including a gap or a
/// non-finite value) or growth above the threshold. Results are ordered by
/// streak length, longest first, then by country name.
pub fn detect_lagging(data: &[GrowthObservation], cutoff_year: i32, config: &LaggingConfig) -> Vec<LaggingCountry> {
    let mut by_country: BTreeMap<&str, Vec<&GrowthObservation>> = BTreeMap::new();
    for g in data.iter().filter(|g| g.observation.year <= cutoff_year) {
        by_country.entry(g.observation.country.as_str()).or_default().push(g);
    }

    let mut lagging: Vec<LaggingCountry> = by_country
        .into_iter()
        .filter_map(|(country, mut history)| {
            history.sort_by(|a, b| b.observation.year.cmp(&a.observation.year));
            let streak = history
                .iter()
                .take_while(|g| g.finite_growth().is_some_and(|growth| growth <= config.threshold))
                .count();
            (streak >= config.min_consecutive).then(|| LaggingCountry {
                country: country.to_string(),
                consecutive_years: streak,
            })
        })
        .collect();

    // stable: equal streaks stay in country order
    lagging.sort_by(|a, b| b.consecutive_years.cmp(&a.consecutive_years));
    lagging
}
