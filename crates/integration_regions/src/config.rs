//! Region service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Google Geocoding API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL for the Maps API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_geocoding_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl GeocodingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            api_key: Some("test-key".to_string()),
        }
    }
}

/// Configuration for the RKI case data feature service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDataConfig {
    /// Feature layer URL; `/query` is appended
    #[serde(default = "default_case_data_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_case_data_base_url() -> String {
    "https://services7.arcgis.com/mOBPykOjAyBO2ZKk/arcgis/rest/services/RKI_Landkreisdaten/FeatureServer/0"
        .to_string()
}

impl Default for CaseDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_case_data_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CaseDataConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoding_defaults() {
        let config = GeocodingConfig::default();
        assert_eq!(config.base_url, "https://maps.googleapis.com/maps/api");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_case_data_defaults() {
        let config = CaseDataConfig::default();
        assert!(config.base_url.contains("RKI_Landkreisdaten"));
        assert!(config.base_url.ends_with("FeatureServer/0"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: GeocodingConfig = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.timeout_secs, 10);
    }
}
