//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite database settings
//! - `providers`: Foursquare, Google Geocoding and RKI endpoints and secrets
//! - `pipeline`: area table, filter, planner, output and logging
//!
//! Values are read from an optional TOML file and overridden by environment
//! variables with the `QUIETSPOT` prefix and `__` as separator, e.g.
//! `QUIETSPOT__FOURSQUARE__CLIENT_ID`.

mod database;
mod pipeline;
mod providers;

use std::path::Path;

use application::ports::CredentialStorePort;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::retry::RetryConfig;

pub use database::DatabaseConfig;
pub use pipeline::{FilterConfig, LoggingConfig, OutputConfig, PlannerConfig, RegionsConfig};
pub use providers::{CaseDataAppConfig, FoursquareAppConfig, GeocodingAppConfig};

/// Provider name of stored Foursquare credentials
pub const FOURSQUARE_PROVIDER: &str = "foursquare";

/// Provider name of stored Google credentials
pub const GOOGLE_PROVIDER: &str = "google";

/// Configuration file looked up in the working directory (`quietspot.toml`)
const DEFAULT_CONFIG_FILE: &str = "quietspot";

/// Prefix of environment overrides
const ENV_PREFIX: &str = "QUIETSPOT";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Venue search and hours provider
    #[serde(default)]
    pub foursquare: FoursquareAppConfig,

    /// Reverse geocoding provider
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Regional case data provider
    #[serde(default)]
    pub case_data: CaseDataAppConfig,

    /// Area lookup table
    #[serde(default)]
    pub regions: RegionsConfig,

    /// Filter engine tuning
    #[serde(default)]
    pub filter: FilterConfig,

    /// Pipeline concurrency
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Retry policy for external service calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Rendered artifacts
    #[serde(default)]
    pub output: OutputConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Without `path`, `quietspot.toml` in the working directory is used if
    /// it exists. An explicit `path` must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong
    /// type.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: Self = config.try_deserialize()?;
        debug!(database = %app.database.path, "Configuration loaded");
        Ok(app)
    }

    /// Parse configuration from TOML text, without environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value has the
    /// wrong type.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns a message listing every invalid value.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.database.path.trim().is_empty() {
            problems.push("database.path must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            problems.push("database.max_connections must be at least 1".to_string());
        }
        if self.foursquare.timeout_secs == 0
            || self.geocoding.timeout_secs == 0
            || self.case_data.timeout_secs == 0
        {
            problems.push("timeout_secs must be at least 1".to_string());
        }
        if !(0..=2400).contains(&self.filter.strict_window) {
            problems.push("filter.strict_window must be between 0 and 2400".to_string());
        }
        if self.planner.hours_concurrency == 0 {
            problems.push("planner.hours_concurrency must be at least 1".to_string());
        }
        if let Err(e) = self.retry.validate() {
            problems.push(format!("retry: {e}"));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    /// Fill missing provider credentials from the credential store
    ///
    /// Values from the config file or environment are never overridden.
    /// Store failures are logged and leave the config unchanged.
    pub async fn resolve_credentials(&mut self, store: &dyn CredentialStorePort) {
        if !self.foursquare.has_credentials() {
            match store.latest_credential(FOURSQUARE_PROVIDER).await {
                Ok(Some(cred)) => {
                    if let (Some(id), Some(secret)) = (cred.client_id(), cred.client_secret()) {
                        self.foursquare.client_id = Some(id.to_owned());
                        self.foursquare.client_secret = Some(SecretString::from(secret.to_owned()));
                        debug!("Loaded foursquare credentials from store");
                    }
                },
                Ok(None) => debug!("No stored foursquare credentials"),
                Err(e) => warn!(error = %e, "Failed to resolve foursquare credentials"),
            }
        }

        if !self.geocoding.has_api_key() {
            match store.latest_credential(GOOGLE_PROVIDER).await {
                Ok(Some(cred)) => {
                    if let Some(key) = cred.api_key() {
                        self.geocoding.api_key = Some(SecretString::from(key.to_owned()));
                        debug!("Loaded google api key from store");
                    }
                },
                Ok(None) => debug!("No stored google api key"),
                Err(e) => warn!(error = %e, "Failed to resolve google credentials"),
            }
        }

        info!(
            foursquare = self.foursquare.has_credentials(),
            geocoding = self.geocoding.has_api_key(),
            "Credential resolution completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use application::ApplicationError;
    use async_trait::async_trait;
    use domain::ApiCredential;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.path, "quietspot.db");
        assert_eq!(config.planner.hours_concurrency, 4);
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn parses_toml_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            path = "/tmp/q.db"

            [foursquare]
            client_id = "abc"
            client_secret = "def"
            api_version = "20201120"

            [filter]
            strict_window = 100

            [output]
            directory = "artifacts"
            render = false

            [logging]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, "/tmp/q.db");
        assert!(config.foursquare.has_credentials());
        assert_eq!(config.filter.strict_window, 100);
        assert_eq!(config.filter.suggestion_threshold, 5);
        assert_eq!(config.output.directory, PathBuf::from("artifacts"));
        assert!(!config.output.render);
        assert!(config.logging.json);
        assert!(!config.geocoding.has_api_key());
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = AppConfig::default();
        config.planner.hours_concurrency = 0;
        config.filter.strict_window = -5;
        let err = config.validate().unwrap_err();
        assert!(err.contains("hours_concurrency"));
        assert!(err.contains("strict_window"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[planner]\nhours_concurrency = 8\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.planner.hours_concurrency, 8);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    struct FixedStore;

    #[async_trait]
    impl CredentialStorePort for FixedStore {
        async fn add_credential(&self, _: &ApiCredential) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn latest_credential(
            &self,
            provider: &str,
        ) -> Result<Option<ApiCredential>, ApplicationError> {
            Ok(match provider {
                FOURSQUARE_PROVIDER => Some(
                    ApiCredential::with_client_secret(FOURSQUARE_PROVIDER, "stored-id", "stored-secret")
                        .unwrap(),
                ),
                GOOGLE_PROVIDER => {
                    Some(ApiCredential::with_api_key(GOOGLE_PROVIDER, "stored-key").unwrap())
                },
                _ => None,
            })
        }
    }

    #[tokio::test]
    async fn resolve_fills_missing_credentials() {
        let mut config = AppConfig::default();
        config.resolve_credentials(&FixedStore).await;
        assert_eq!(config.foursquare.client_id.as_deref(), Some("stored-id"));
        assert!(config.geocoding.has_api_key());
    }

    #[tokio::test]
    async fn resolve_keeps_configured_credentials() {
        let mut config = AppConfig::from_toml_str(
            "[foursquare]\nclient_id = \"from-file\"\nclient_secret = \"x\"\n",
        )
        .unwrap();
        config.resolve_credentials(&FixedStore).await;
        assert_eq!(config.foursquare.client_id.as_deref(), Some("from-file"));
    }
}
