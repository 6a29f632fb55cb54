//! The user's visit request

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{GeoLocation, TimeOfDay};

/// Format of the visit datetime accepted from users
pub const VISIT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Largest number of venues a single search may request
pub const MAX_RESULT_LIMIT: u16 = 150;

/// Accepted alternatives to [`VISIT_DATETIME_FORMAT`]
const FALLBACK_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Parse a user-supplied visit datetime
///
/// # Errors
///
/// Returns `DomainError::InvalidDateTime` if the string matches none of the
/// accepted formats.
pub fn parse_visit_datetime(raw: &str) -> Result<NaiveDateTime, DomainError> {
    let raw = raw.trim();
    std::iter::once(VISIT_DATETIME_FORMAT)
        .chain(FALLBACK_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| DomainError::InvalidDateTime(raw.to_string()))
}

/// Parameters of one venue search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRequest {
    location: GeoLocation,
    query: String,
    radius_m: u32,
    visit_at: NaiveDateTime,
    limit: u16,
}

impl VisitRequest {
    /// Create a validated visit request
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a blank query, a zero radius
    /// or a limit outside `1..=150`.
    pub fn new(
        location: GeoLocation,
        query: impl Into<String>,
        radius_m: u32,
        visit_at: NaiveDateTime,
        limit: u16,
    ) -> Result<Self, DomainError> {
        let query = query.into().trim().to_string();
        if query.is_empty() {
            return Err(DomainError::ValidationError(
                "search query must not be empty".to_string(),
            ));
        }
        if radius_m == 0 {
            return Err(DomainError::ValidationError(
                "search radius must be greater than 0".to_string(),
            ));
        }
        if limit == 0 || limit > MAX_RESULT_LIMIT {
            return Err(DomainError::ValidationError(format!(
                "result limit must be between 1 and {MAX_RESULT_LIMIT}"
            )));
        }
        Ok(Self {
            location,
            query,
            radius_m,
            visit_at,
            limit,
        })
    }

    /// Build a request from raw user input, parsing coordinates and datetime
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if any field is invalid.
    pub fn from_raw(
        latitude: f64,
        longitude: f64,
        query: &str,
        radius_m: u32,
        visit_at: &str,
        limit: u16,
    ) -> Result<Self, DomainError> {
        let location = GeoLocation::new(latitude, longitude)?;
        let visit_at = parse_visit_datetime(visit_at)?;
        Self::new(location, query, radius_m, visit_at, limit)
    }

    /// Requested coordinate
    #[must_use]
    pub const fn location(&self) -> &GeoLocation {
        &self.location
    }

    /// Free-text search term
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Search radius in metres
    #[must_use]
    pub const fn radius_m(&self) -> u32 {
        self.radius_m
    }

    /// Requested visit date and time
    #[must_use]
    pub const fn visit_at(&self) -> NaiveDateTime {
        self.visit_at
    }

    /// Maximum number of venues to look up
    #[must_use]
    pub const fn limit(&self) -> u16 {
        self.limit
    }

    /// Weekday of the visit
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.visit_at.weekday()
    }

    /// Visit time of day in HHMM encoding
    #[must_use]
    pub fn visit_time(&self) -> TimeOfDay {
        TimeOfDay::from_time(self.visit_at.time())
    }
}
