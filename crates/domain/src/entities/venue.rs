//! Venue record returned by the venue search

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, VenueId};

/// Label used when the provider reports no category for a venue
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A candidate venue near the requested location
///
/// Created once by the venue lookup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    /// Provider identifier
    pub id: VenueId,
    /// Display name
    pub name: String,
    /// Venue coordinate
    pub location: GeoLocation,
    /// Distance from the query point in metres
    pub distance_m: u32,
    /// Primary category label
    pub category: String,
}

impl VenueRecord {
    /// Create a venue record
    #[must_use]
    pub fn new(
        id: VenueId,
        name: impl Into<String>,
        location: GeoLocation,
        distance_m: u32,
        category: impl Into<String>,
    ) -> Self {
        let category = category.into();
        Self {
            id,
            name: name.into(),
            location,
            distance_m,
            category: if category.trim().is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                category
            },
        }
    }
}
