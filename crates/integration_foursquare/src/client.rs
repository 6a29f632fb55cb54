//! Foursquare Places v2 client
//!
//! Provides venue search and venue hours lookup using the
//! [api.foursquare.com/v2](https://api.foursquare.com/v2) endpoints.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoLocation, VenueId, VenueRecord, WeeklyHours};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::FoursquareConfig;
use crate::error::FoursquareError;
use crate::models::{
    RawExploreResponse, RawHoursResponse, venues_from_explore, weekly_hours_from_response,
};

/// Trait for venue provider clients
#[async_trait]
pub trait VenueClient: Send + Sync {
    /// Search venues near `center` matching `query`
    async fn explore(
        &self,
        center: &GeoLocation,
        query: &str,
        radius_m: u32,
        limit: u16,
    ) -> Result<Vec<VenueRecord>, FoursquareError>;

    /// Weekly opening and popular hours of a venue
    ///
    /// `Ok(None)` means the venue has no usable hours.
    async fn venue_hours(&self, venue: &VenueId) -> Result<Option<WeeklyHours>, FoursquareError>;
}

/// Foursquare client authenticating with a client id and secret
pub struct FoursquareVenueClient {
    client: Client,
    config: FoursquareConfig,
    client_id: String,
    client_secret: String,
}

impl fmt::Debug for FoursquareVenueClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoursquareVenueClient")
            .field("base_url", &self.config.base_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl FoursquareVenueClient {
    /// Create a new Foursquare client
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &FoursquareConfig) -> Result<Self, FoursquareError> {
        config
            .validate()
            .map_err(FoursquareError::ConfigurationError)?;

        let (Some(client_id), Some(client_secret)) = (
            config.client_id.clone().filter(|s| !s.is_empty()),
            config.client_secret.clone().filter(|s| !s.is_empty()),
        ) else {
            return Err(FoursquareError::ConfigurationError(
                "Foursquare client_id and client_secret are required".to_string(),
            ));
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("quietspot/1.0")
            .build()
            .map_err(|e| FoursquareError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            client_id,
            client_secret,
        })
    }

    fn auth_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("v", self.config.version_param()),
        ]
    }

    async fn get(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<Response, FoursquareError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FoursquareError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    FoursquareError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FoursquareError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if status.is_server_error() {
            return Err(FoursquareError::ServiceUnavailable(format!("HTTP {status}")));
        }

        Ok(response)
    }

    /// Read the body, then surface `meta` errors before HTTP status errors
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, FoursquareError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FoursquareError::ParseError(e.to_string()))?;

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                Err(FoursquareError::RequestFailed(format!("HTTP {status}")))
            },
            Err(e) => Err(FoursquareError::ParseError(e.to_string())),
        }
    }
}

#[async_trait]
impl VenueClient for FoursquareVenueClient {
    #[instrument(skip(self, center), fields(center = %center))]
    async fn explore(
        &self,
        center: &GeoLocation,
        query: &str,
        radius_m: u32,
        limit: u16,
    ) -> Result<Vec<VenueRecord>, FoursquareError> {
        let url = format!("{}/venues/explore", self.config.base_url);

        let mut params = self.auth_params();
        params.extend([
            ("ll", center.to_query_param()),
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("radius", radius_m.to_string()),
        ]);

        debug!(?url, "Exploring venues");

        let response = self.get(&url, &params).await?;
        let raw: RawExploreResponse = Self::parse(response).await?;
        raw.meta.check()?;

        let venues = venues_from_explore(raw, center, usize::from(limit));
        if venues.is_empty() {
            warn!(query, "No venues found");
        }

        debug!(count = venues.len(), "Venues found");
        Ok(venues)
    }

    #[instrument(skip(self, venue), fields(venue = %venue))]
    async fn venue_hours(&self, venue: &VenueId) -> Result<Option<WeeklyHours>, FoursquareError> {
        let url = format!("{}/venues/{}/hours", self.config.base_url, venue.as_str());

        let response = self.get(&url, &self.auth_params()).await?;
        let raw: RawHoursResponse = Self::parse(response).await?;
        raw.meta.check()?;

        let hours = weekly_hours_from_response(raw.response)?;
        debug!(
            days = hours.as_ref().map_or(0, WeeklyHours::known_days),
            "Venue hours normalized"
        );
        Ok(hours)
    }
}
