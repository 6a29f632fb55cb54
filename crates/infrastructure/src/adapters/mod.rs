//! Adapters implementing application ports on top of the integration
//! clients

mod foursquare_adapter;
mod region_adapter;

pub use foursquare_adapter::FoursquareAdapter;
pub use region_adapter::{CaseDataAdapter, RegionResolverAdapter};
