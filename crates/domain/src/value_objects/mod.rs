//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod time_of_day;
mod venue_id;

pub use geo_location::GeoLocation;
pub use time_of_day::{MAX_HHMM, TimeOfDay};
pub use venue_id::VenueId;
