//! Venue hours port

use async_trait::async_trait;
use domain::{VenueId, WeeklyHours};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for per-venue opening and popular hours
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VenueHoursPort: Send + Sync {
    /// Weekly hours of a venue
    ///
    /// Returns `Ok(None)` when the provider has no opening or no popular
    /// hours for the venue. That is expected and not an error.
    async fn weekly_hours(&self, venue: &VenueId) -> Result<Option<WeeklyHours>, ApplicationError>;
}
