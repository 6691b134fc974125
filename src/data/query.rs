use std::collections::BTreeSet;

use super::model::Record;

// ---------------------------------------------------------------------------
// Distinct value enumeration for the filter widgets
// ---------------------------------------------------------------------------

/// Distinct years, ascending.
pub fn list_years<R: Record>(data: &[R]) -> Vec<i32> {
    let years: BTreeSet<i32> = data.iter().map(Record::year).collect();
    years.into_iter().collect()
}

/// Distinct country names, lexicographic.
pub fn list_countries<R: Record>(data: &[R]) -> Vec<String> {
    let countries: BTreeSet<&str> = data.iter().map(Record::country).collect();
    countries.into_iter().map(str::to_string).collect()
}

/// Distinct regions, lexicographic. Records without a region are skipped.
pub fn list_regions<R: Record>(data: &[R]) -> Vec<String> {
    let regions: BTreeSet<&str> = data.iter().filter_map(Record::region).collect();
    regions.into_iter().map(str::to_string).collect()
}
