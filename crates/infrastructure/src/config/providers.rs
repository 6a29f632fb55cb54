//! External provider configuration: Foursquare, Google Geocoding, RKI.
//!
//! Secrets are held as [`SecretString`] and only exposed when the client
//! configuration of the integration crate is built.

use integration_foursquare::FoursquareConfig;
use integration_regions::{CaseDataConfig, GeocodingConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Foursquare venue API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct FoursquareAppConfig {
    /// API base URL
    #[serde(default = "default_foursquare_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// OAuth client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub client_secret: Option<SecretString>,

    /// Fixed API version date (`YYYYMMDD`); today when unset
    #[serde(default)]
    pub api_version: Option<String>,
}

impl std::fmt::Debug for FoursquareAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoursquareAppConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_version", &self.api_version)
            .finish()
    }
}

fn default_foursquare_base_url() -> String {
    FoursquareConfig::default().base_url
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for FoursquareAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_foursquare_base_url(),
            timeout_secs: default_timeout_secs(),
            client_id: None,
            client_secret: None,
            api_version: None,
        }
    }
}

impl FoursquareAppConfig {
    /// Whether both halves of the client credential are set
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.client_id.as_deref().is_some_and(|id| !id.is_empty())
            && self
                .client_secret
                .as_ref()
                .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// Client configuration for the integration crate
    #[must_use]
    pub fn to_client_config(&self) -> FoursquareConfig {
        FoursquareConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            client_id: self.client_id.clone(),
            client_secret: self
                .client_secret
                .as_ref()
                .map(|s| s.expose_secret().to_owned()),
            api_version: self.api_version.clone(),
        }
    }
}

/// Google Geocoding API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// API base URL
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for GeocodingAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAppConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn default_geocoding_base_url() -> String {
    GeocodingConfig::default().base_url
}

impl Default for GeocodingAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl GeocodingAppConfig {
    /// Whether an API key is set
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Client configuration for the integration crate
    #[must_use]
    pub fn to_client_config(&self) -> GeocodingConfig {
        GeocodingConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            api_key: self.api_key.as_ref().map(|k| k.expose_secret().to_owned()),
        }
    }
}

/// RKI case data service configuration
pub type CaseDataAppConfig = CaseDataConfig;
