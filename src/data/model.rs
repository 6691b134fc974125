use serde::Serialize;

// ---------------------------------------------------------------------------
// Record – common read access for raw and growth-annotated observations
// ---------------------------------------------------------------------------

/// Read access shared by [`Observation`] and [`GrowthObservation`], so the
/// query helpers work on either side of the growth step.
pub trait Record {
    fn country(&self) -> &str;
    fn country_code(&self) -> &str;
    fn year(&self) -> i32;
    fn bandwidth(&self) -> f64;
    fn region(&self) -> Option<&str>;
}

// ---------------------------------------------------------------------------
// Observation – one parsed (country, year) row
// ---------------------------------------------------------------------------

/// One (country, year) bandwidth data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Display name (falls back to the code when the source has no label).
    pub country: String,
    pub country_code: String,
    pub year: i32,
    /// International bandwidth per capita (kbit/s). Always finite and >= 0.
    pub bandwidth: f64,
    pub region: Option<String>,
}

impl Record for Observation {
    fn country(&self) -> &str {
        &self.country
    }
    fn country_code(&self) -> &str {
        &self.country_code
    }
    fn year(&self) -> i32 {
        self.year
    }
    fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
    fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

// ---------------------------------------------------------------------------
// GrowthObservation – observation annotated with YoY growth
// ---------------------------------------------------------------------------

/// An [`Observation`] plus its year-over-year growth in percent.
///
/// `yoy_growth` is `Some` exactly when the same country has an observation for
/// `year - 1`. The stored value is the raw ratio and can be infinite or NaN if
/// the previous year reported zero bandwidth; use [`finite_growth`] whenever
/// the value feeds a ranking or a threshold.
///
/// [`finite_growth`]: GrowthObservation::finite_growth
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthObservation {
    #[serde(flatten)]
    pub observation: Observation,
    pub yoy_growth: Option<f64>,
}

impl GrowthObservation {
    pub fn new(observation: Observation, yoy_growth: Option<f64>) -> Self {
        Self {
            observation,
            yoy_growth,
        }
    }

    /// Growth with non-finite values treated as absent.
    pub fn finite_growth(&self) -> Option<f64> {
        self.yoy_growth.filter(|g| g.is_finite())
    }
}

impl Record for GrowthObservation {
    fn country(&self) -> &str {
        &self.observation.country
    }
    fn country_code(&self) -> &str {
        &self.observation.country_code
    }
    fn year(&self) -> i32 {
        self.observation.year
    }
    fn bandwidth(&self) -> f64 {
        self.observation.bandwidth
    }
    fn region(&self) -> Option<&str> {
        self.observation.region.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Per-year result rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryBandwidth {
    pub country: String,
    pub bandwidth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryGrowth {
    pub country: String,
    pub growth: f64,
}

/// A country whose growth stayed at or below the lagging threshold for
/// `consecutive_years` years in a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaggingCountry {
    pub country: String,
    pub consecutive_years: usize,
}

/// Global aggregates for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalMetrics {
    pub year: i32,
    /// Number of observations reported for `year`.
    pub country_count: usize,
    /// Mean bandwidth over `year`; `None` when the year has no observations.
    pub global_average: Option<f64>,
    /// Change of the global average against `year - 1`, in percent.
    pub yoy_growth: Option<f64>,
    pub top_countries: Vec<CountryBandwidth>,
    pub fastest_growing: Vec<CountryGrowth>,
    pub critical_lagging: Vec<LaggingCountry>,
}

impl GlobalMetrics {
    /// Metrics for a year with no observations.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            country_count: 0,
            global_average: None,
            yoy_growth: None,
            top_countries: Vec::new(),
            fastest_growing: Vec::new(),
            critical_lagging: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.country_count == 0
    }
}

// ---------------------------------------------------------------------------
// Series and rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub bandwidth: f64,
    pub yoy_growth: Option<f64>,
}

/// All observations of one country, ordered by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTimeSeries {
    pub country: String,
    pub country_code: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCountry {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub country: String,
    pub bandwidth: f64,
}
