//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod credential_store_port;
mod region_port;
mod renderer_port;
mod request_history_port;
mod venue_hours_port;
mod venue_search_port;

#[cfg(test)]
pub use credential_store_port::MockCredentialStorePort;
pub use credential_store_port::CredentialStorePort;
#[cfg(test)]
pub use region_port::{MockCaseDataPort, MockRegionResolverPort};
pub use region_port::{CaseDataPort, RegionResolverPort, ResolvedRegion};
#[cfg(test)]
pub use renderer_port::MockResultRendererPort;
pub use renderer_port::ResultRendererPort;
#[cfg(test)]
pub use request_history_port::MockRequestHistoryPort;
pub use request_history_port::{RequestHistoryPort, StoredRequest};
#[cfg(test)]
pub use venue_hours_port::MockVenueHoursPort;
pub use venue_hours_port::VenueHoursPort;
#[cfg(test)]
pub use venue_search_port::MockVenueSearchPort;
pub use venue_search_port::VenueSearchPort;
