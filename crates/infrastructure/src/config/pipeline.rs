//! Pipeline configuration: region table, filter, planner, output, logging.

use std::path::PathBuf;

use application::DEFAULT_HOURS_CONCURRENCY;
use domain::VisitFilter;
use domain::services::{STRICT_WINDOW, SUGGESTION_THRESHOLD};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Area lookup table location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionsConfig {
    /// CSV file linking Google place names to region keys
    #[serde(default = "default_area_table")]
    pub area_table: PathBuf,
}

fn default_area_table() -> PathBuf {
    PathBuf::from("data/areas_with_googlemaps_key.csv")
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            area_table: default_area_table(),
        }
    }
}

/// Time-window filter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Tolerance of the exact-match pass in HHMM units
    #[serde(default = "default_strict_window")]
    pub strict_window: i32,

    /// Exact matches below this count trigger suggestions
    #[serde(default = "default_suggestion_threshold")]
    pub suggestion_threshold: usize,
}

const fn default_strict_window() -> i32 {
    STRICT_WINDOW
}

const fn default_suggestion_threshold() -> usize {
    SUGGESTION_THRESHOLD
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            strict_window: default_strict_window(),
            suggestion_threshold: default_suggestion_threshold(),
        }
    }
}

impl FilterConfig {
    /// Build the filter engine
    #[must_use]
    pub fn to_filter(&self) -> VisitFilter {
        VisitFilter::new(self.strict_window, self.suggestion_threshold)
    }
}

/// Planner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Concurrent venue hours requests
    #[serde(default = "default_hours_concurrency")]
    pub hours_concurrency: usize,
}

const fn default_hours_concurrency() -> usize {
    DEFAULT_HOURS_CONCURRENCY
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            hours_concurrency: default_hours_concurrency(),
        }
    }
}

/// Artifact output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `map.html` and `schedule.svg`
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Whether to write artifacts at all
    #[serde(default = "default_true")]
    pub render: bool,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            render: true,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive (e.g. `"info,integration_foursquare=debug"`)
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}
