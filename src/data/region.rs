use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

/// Region assigned to every country code missing from the table.
pub const OTHER_REGION: &str = "Other";

const BUILTIN_REGIONS: &[(&str, &str)] = &[
    ("USA", "Americas"),
    ("CAN", "Americas"),
    ("MEX", "Americas"),
    ("BRA", "Americas"),
    ("GBR", "Europe"),
    ("FRA", "Europe"),
    ("DEU", "Europe"),
    ("ITA", "Europe"),
    ("CHN", "Asia"),
    ("JPN", "Asia"),
    ("IND", "Asia"),
    ("KOR", "Asia"),
    ("AUS", "Oceania"),
    ("NZL", "Oceania"),
    ("ZAF", "Africa"),
    ("EGY", "Africa"),
    ("NGA", "Africa"),
    ("KEN", "Africa"),
];

// ---------------------------------------------------------------------------
// RegionTable – closed country code → region lookup
// ---------------------------------------------------------------------------

/// Static lookup from country code to region name.
///
/// The table is closed: it is never extended from the data being loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable {
    regions: BTreeMap<String, String>,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RegionTable {
    /// The hardcoded table covering the major economies of each continent.
    pub fn builtin() -> Self {
        let regions = BUILTIN_REGIONS
            .iter()
            .map(|(code, region)| (code.to_string(), region.to_string()))
            .collect();
        Self { regions }
    }

    pub fn from_map(regions: BTreeMap<String, String>) -> Self {
        Self { regions }
    }

    /// Replace the built-in table with a JSON object `{"CODE": "Region", ...}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading region table {}", path.display()))?;
        let regions: BTreeMap<String, String> =
            serde_json::from_str(&text).context("parsing region table JSON")?;
        if regions.is_empty() {
            log::warn!(
                "region table {} is empty, every country maps to {OTHER_REGION}",
                path.display()
            );
        }
        Ok(Self { regions })
    }

    /// Region for `code`, or [`OTHER_REGION`] when the code is unknown.
    pub fn resolve(&self, code: &str) -> &str {
        self.regions
            .get(code)
            .map(String::as_str)
            .unwrap_or(OTHER_REGION)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
