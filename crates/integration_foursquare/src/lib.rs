//! Foursquare integration for quietspot
//!
//! Client for the [Foursquare Places v2](https://developer.foursquare.com) API:
//! venue search through `venues/explore` and weekly opening and popular
//! hours through `venues/{id}/hours`.
//!
//! # Architecture
//!
//! [`VenueClient`] defines the interface, implemented by
//! [`FoursquareVenueClient`]. Raw API payloads are deserialized into private
//! structs and normalized into domain types ([`domain::VenueRecord`],
//! [`domain::WeeklyHours`]) before they leave the crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_foursquare::{FoursquareConfig, FoursquareVenueClient, VenueClient};
//!
//! let config = FoursquareConfig {
//!     client_id: Some("id".into()),
//!     client_secret: Some("secret".into()),
//!     ..FoursquareConfig::default()
//! };
//! let client = FoursquareVenueClient::new(&config)?;
//! let venues = client.explore(&GeoLocation::berlin(), "coffee", 1000, 50).await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{FoursquareVenueClient, VenueClient};
pub use config::FoursquareConfig;
pub use error::FoursquareError;
