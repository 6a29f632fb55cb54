//! Foursquare client configuration

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for the Foursquare Places v2 API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoursquareConfig {
    /// Base URL for the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// OAuth client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Fixed API version date (`YYYYMMDD`); today's date when unset
    #[serde(default)]
    pub api_version: Option<String>,
}

fn default_base_url() -> String {
    "https://api.foursquare.com/v2".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for FoursquareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            client_id: None,
            client_secret: None,
            api_version: None,
        }
    }
}

impl FoursquareConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            client_id: Some("test-client".to_string()),
            client_secret: Some("test-secret".to_string()),
            api_version: Some("20201120".to_string()),
        }
    }

    /// Whether both halves of the client credential are present
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.client_id.as_deref().is_some_and(|s| !s.is_empty())
            && self.client_secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Version parameter sent with every request
    #[must_use]
    pub fn version_param(&self) -> String {
        self.api_version
            .clone()
            .unwrap_or_else(|| version_for(Utc::now().date_naive()))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if let Some(version) = &self.api_version {
            if NaiveDate::parse_from_str(version, "%Y%m%d").is_err() {
                return Err(format!("api_version must be YYYYMMDD, got {version}"));
            }
        }

        Ok(())
    }
}

fn version_for(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FoursquareConfig::default();
        assert_eq!(config.base_url, "https://api.foursquare.com/v2");
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_testing_config() {
        let config = FoursquareConfig::for_testing("http://localhost:1234");
        assert!(config.has_credentials());
        assert_eq!(config.version_param(), "20201120");
    }

    #[test]
    fn test_empty_credentials_are_missing() {
        let config = FoursquareConfig {
            client_id: Some(String::new()),
            client_secret: Some("s".to_string()),
            ..Default::default()
        };
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_version_defaults_to_date() {
        let date = NaiveDate::from_ymd_opt(2020, 11, 5).unwrap();
        assert_eq!(version_for(date), "20201105");
        assert_eq!(FoursquareConfig::default().version_param().len(), 8);
    }

    #[test]
    fn test_validation() {
        assert!(FoursquareConfig::default().validate().is_ok());

        let config = FoursquareConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FoursquareConfig {
            api_version: Some("2020-11-20".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
