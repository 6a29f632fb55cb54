//! Raw visit request as supplied by users
//!
//! Mirrors the JSON request document accepted by the CLI:
//!
//! ```json
//! {
//!   "lat": 52.52,
//!   "lng": 13.405,
//!   "search_input": "coffee",
//!   "search_radius": 1000,
//!   "datetime": "2020-11-20 13:00:00",
//!   "limit": 50
//! }
//! ```

use domain::VisitRequest;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Result cap used when the input does not name one
pub const DEFAULT_RESULT_LIMIT: u16 = 50;

const fn default_limit() -> u16 {
    DEFAULT_RESULT_LIMIT
}

/// Unvalidated visit request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRequestInput {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Free-text venue query
    pub search_input: String,
    /// Search radius in metres
    pub search_radius: u32,
    /// Visit datetime, `YYYY-MM-DD HH:MM:SS`
    pub datetime: String,
    /// Result cap
    #[serde(default = "default_limit")]
    pub limit: u16,
}

impl VisitRequestInput {
    /// Parse a JSON request document
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::InvalidRequest` for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, ApplicationError> {
        serde_json::from_str(raw).map_err(|e| ApplicationError::InvalidRequest(e.to_string()))
    }

    /// Validate into a domain request
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::InvalidRequest` if any field is invalid.
    pub fn validate(&self) -> Result<VisitRequest, ApplicationError> {
        Ok(VisitRequest::from_raw(
            self.lat,
            self.lng,
            &self.search_input,
            self.search_radius,
            &self.datetime,
            self.limit,
        )?)
    }
}
