use serde::Serialize;

use super::model::Record;

/// Year used when the dataset offers none.
pub const DEFAULT_YEAR: i32 = 2020;

// ---------------------------------------------------------------------------
// Filter selection passed into every query
// ---------------------------------------------------------------------------

/// The consumer's current selection. An empty country or region list means
/// "no constraint" on that dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterState {
    pub selected_year: i32,
    /// Insertion-ordered, without duplicates.
    pub selected_countries: Vec<String>,
    pub selected_regions: Vec<String>,
    pub log_scale: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::for_year(DEFAULT_YEAR)
    }
}

impl FilterState {
    pub fn for_year(selected_year: i32) -> Self {
        Self {
            selected_year,
            selected_countries: Vec::new(),
            selected_regions: Vec::new(),
            log_scale: false,
        }
    }

    /// Add `country` if it is not selected, remove it otherwise.
    pub fn toggle_country(&mut self, country: &str) {
        if let Some(pos) = self.selected_countries.iter().position(|c| c == country) {
            self.selected_countries.remove(pos);
        } else {
            self.selected_countries.push(country.to_string());
        }
    }

    /// Replace the country selection, keeping first occurrences only.
    pub fn set_countries<I, S>(&mut self, countries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_countries.clear();
        for country in countries {
            let country = country.into();
            if !self.selected_countries.contains(&country) {
                self.selected_countries.push(country);
            }
        }
    }

    /// Replace the region selection, keeping first occurrences only.
    pub fn set_regions<I, S>(&mut self, regions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_regions.clear();
        for region in regions {
            let region = region.into();
            if !self.selected_regions.contains(&region) {
                self.selected_regions.push(region);
            }
        }
    }

    /// Clear every selection and jump to `latest_year`.
    pub fn reset(&mut self, latest_year: Option<i32>) {
        *self = Self::for_year(latest_year.unwrap_or(DEFAULT_YEAR));
    }

    /// Whether a record passes the country and region constraints.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        passes(record, &self.selected_countries, &self.selected_regions)
    }
}

// ---------------------------------------------------------------------------
// Filtered subset
// ---------------------------------------------------------------------------

fn passes<R: Record, S: AsRef<str>>(record: &R, countries: &[S], regions: &[S]) -> bool {
    let country_ok = countries.is_empty() || countries.iter().any(|c| c.as_ref() == record.country());
    // A record without a region never passes an active region filter.
    let region_ok = regions.is_empty()
        || record
            .region()
            .is_some_and(|r| regions.iter().any(|s| s.as_ref() == r));
    country_ok && region_ok
}

/// Records whose country is in `countries` (or `countries` is empty) and whose
/// region is in `regions` (or `regions` is empty). Input order is kept.
pub fn filter_subset<R, S>(data: &[R], countries: &[S], regions: &[S]) -> Vec<R>
where
    R: Record + Clone,
    S: AsRef<str>,
{
    data.iter()
        .filter(|record| passes(*record, countries, regions))
        .cloned()
        .collect()
}
