//! Venue search port
//!
//! Finds candidate venues near a coordinate. Adapters in the infrastructure
//! layer implement this port on top of a venue provider API.

use async_trait::async_trait;
use domain::{VenueRecord, VisitRequest};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for venue search
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VenueSearchPort: Send + Sync {
    /// Search venues matching the request's query, radius and result cap
    ///
    /// Results are in the provider's relevance order.
    async fn search_venues(
        &self,
        request: &VisitRequest,
    ) -> Result<Vec<VenueRecord>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn VenueSearchPort>();
    }
}
