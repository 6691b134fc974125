use super::global::descending;
use crate::data::model::{GrowthObservation, RankedCountry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankOrder {
    /// Highest bandwidth first.
    #[default]
    Top,
    /// Lowest bandwidth first.
    Bottom,
}

/// Rank the countries reporting in `year` by bandwidth and keep `count`.
pub fn rank_countries(data: &[GrowthObservation], year: i32, order: RankOrder, count: usize) -> Vec<RankedCountry> {
    let mut year_data: Vec<&GrowthObservation> = data.iter().filter(|g| g.observation.year == year).collect();
    year_data.sort_by(|a, b| {
        let (a, b) = (a.observation.bandwidth, b.observation.bandwidth);
        match order {
            RankOrder::Top => descending(a, b),
            RankOrder::Bottom => descending(b, a),
        }
    });

    year_data
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, g)| RankedCountry {
            rank: i + 1,
            country: g.observation.country.clone(),
            bandwidth: g.observation.bandwidth,
        })
        .collect()
}

/// Ratio between the best and worst connected country in `year`.
///
/// `None` when the year has no data or the worst country reports zero.
pub fn digital_divide_ratio(data: &[GrowthObservation], year: i32) -> Option<f64> {
    let (min, max) = data
        .iter()
        .filter(|g| g.observation.year == year)
        .map(|g| g.observation.bandwidth)
        .fold(None, |acc: Option<(f64, f64)>, b| match acc {
            None => Some((b, b)),
            Some((lo, hi)) => Some((lo.min(b), hi.max(b))),
        })?;
    (min > 0.0).then(|| max / min)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::analysis::growth::compute_growth;
    use crate::data::model::fixtures::obs;

    fn sample() -> Vec<GrowthObservation> {
        compute_growth(&[
            obs("A", "A", 2020, 5.0),
            obs("B", "B", 2020, 50.0),
            obs("C", "C", 2020, 500.0),
            obs("D", "D", 2019, 9999.0),
        ])
    }

    #[test]
    fn top_ranking_is_descending_with_ranks() {
        let ranked = rank_countries(&sample(), 2020, RankOrder::Top, 2);

        assert_eq!(
            ranked,
            vec![
                RankedCountry {
                    rank: 1,
                    country: "C".to_string(),
                    bandwidth: 500.0
                },
                RankedCountry {
                    rank: 2,
                    country: "B".to_string(),
                    bandwidth: 50.0
                },
            ]
        );
    }

    #[test]
    fn bottom_ranking_is_ascending() {
        let ranked = rank_countries(&sample(), 2020, RankOrder::Bottom, 10);
        let names: Vec<&str> = ranked.iter().map(|r| r.country.as_str()).collect();

        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn divide_ratio_is_max_over_min() {
        assert_eq!(digital_divide_ratio(&sample(), 2020), Some(100.0));
        assert_eq!(digital_divide_ratio(&sample(), 2030), None);
    }

    #[test]
    fn divide_ratio_undefined_with_zero_minimum() {
        let data = compute_growth(&[obs("A", "A", 2020, 0.0), obs("B", "B", 2020, 3.0)]);
        assert_eq!(digital_divide_ratio(&data, 2020), None);
    }
}
