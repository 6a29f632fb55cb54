//! Region integration for quietspot
//!
//! Maps a coordinate to an administrative region and fetches regional case
//! statistics for it:
//!
//! - [`GoogleGeocodingClient`] reverse-geocodes a coordinate into the
//!   candidate place names ([`RegionNames`]) of its sublocality, locality and
//!   municipality.
//! - [`AreaTable`] is the precomputed CSV lookup table that links those
//!   names to the region keys of the statistics dataset.
//! - [`RkiCaseDataClient`] queries the RKI ArcGIS feature service for a
//!   region key.

mod area_table;
mod case_data;
mod config;
mod error;
mod geocoding;

pub use area_table::{AreaRow, AreaTable};
pub use case_data::{CaseDataClient, RkiCaseDataClient};
pub use config::{CaseDataConfig, GeocodingConfig};
pub use error::{AreaTableError, CaseDataError, GeocodingError};
pub use geocoding::{GoogleGeocodingClient, RegionNames, ReverseGeocoder};
