//! Regional case statistics attached to a visit request

use serde::{Deserialize, Serialize};

/// Case counts for the administrative region around the requested location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCaseData {
    /// Region name as used by the statistics provider
    pub region_name: String,
    /// County label (e.g. "SK Berlin Mitte")
    pub county: String,
    /// Cumulative case count
    pub cases: u64,
    /// Cumulative death count
    pub deaths: u64,
    /// Cases of the last seven days per 100,000 residents
    pub cases_7_days_per_100k: f64,
}

impl RegionCaseData {
    /// Short one-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} ({}): {} cases, {} deaths, 7-day incidence {:.1}",
            self.region_name, self.county, self.cases, self.deaths, self.cases_7_days_per_100k
        )
    }
}
