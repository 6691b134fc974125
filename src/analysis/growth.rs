use crate::data::model::{GrowthObservation, Observation};

/// Which field decides that two observations belong to the same country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupKey {
    /// Exact display name. Matches the historical behaviour of the dashboard.
    #[default]
    CountryName,
    /// Country code, robust against inconsistent display names.
    CountryCode,
}

impl GroupKey {
    fn of<'a>(&self, obs: &'a Observation) -> &'a str {
        match self {
            GroupKey::CountryName => &obs.country,
            GroupKey::CountryCode => &obs.country_code,
        }
    }
}

/// Percentage change from `prev` to `curr`.
///
/// A zero `prev` yields an infinite or NaN result rather than a panic.
pub fn yoy_percent(prev: f64, curr: f64) -> f64 {
    (curr - prev) / prev * 100.0
}

/// Annotate every observation with its year-over-year growth, grouping by
/// country name.
pub fn compute_growth(observations: &[Observation]) -> Vec<GrowthObservation> {
    compute_growth_by(observations, GroupKey::default())
}

/// Annotate every observation with its year-over-year growth.
///
/// Growth is only computed against the immediately preceding year; a gap in
/// a country's history leaves the later observation without growth. The
/// output is grouped by `key` (ascending) with each group in year order.
pub fn compute_growth_by(observations: &[Observation], key: GroupKey) -> Vec<GrowthObservation> {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    // stable: duplicates of (key, year) keep their input order
    sorted.sort_by(|a, b| key.of(a).cmp(key.of(b)).then(a.year.cmp(&b.year)));

    let mut out = Vec::with_capacity(sorted.len());
    for group in sorted.chunk_by(|a, b| key.of(a) == key.of(b)) {
        let mut prev: Option<&Observation> = None;
        for &curr in group {
            let yoy_growth = prev
                .filter(|p| p.year.checked_add(1) == Some(curr.year))
                .map(|p| yoy_percent(p.bandwidth, curr.bandwidth));
            out.push(GrowthObservation::new(curr.clone(), yoy_growth));
            prev = Some(curr);
        }
    }

    log::debug!(
        "computed growth for {} observations ({} with a previous year)",
        out.len(),
        out.iter().filter(|g| g.yoy_growth.is_some()).count()
    );
    out
}
