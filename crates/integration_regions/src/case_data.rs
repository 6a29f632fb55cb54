//! RKI case data client
//!
//! Queries the RKI district layer of the ArcGIS feature service by region
//! name (`GEN`).

use std::time::Duration;

use async_trait::async_trait;
use domain::RegionCaseData;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::CaseDataConfig;
use crate::error::CaseDataError;

const OUT_FIELDS: &str = "GEN,cases,deaths,county,cases7_per_100k,BEZ,BL";

/// Trait for regional case data clients
#[async_trait]
pub trait CaseDataClient: Send + Sync {
    /// Case data of the region named `region_key`
    async fn case_data(&self, region_key: &str) -> Result<RegionCaseData, CaseDataError>;
}

/// ArcGIS feature service client for RKI district data
#[derive(Debug)]
pub struct RkiCaseDataClient {
    client: Client,
    config: CaseDataConfig,
}

impl RkiCaseDataClient {
    /// Create a new case data client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &CaseDataConfig) -> Result<Self, CaseDataError> {
        if config.base_url.is_empty() {
            return Err(CaseDataError::ConfigurationError(
                "base_url must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("quietspot/1.0")
            .build()
            .map_err(|e| CaseDataError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// `where` clause selecting a region by name
    fn where_clause(region_key: &str) -> String {
        format!("GEN = '{}'", region_key.replace('\'', "''"))
    }

    fn parse_response(body: &str, region_key: &str) -> Result<RegionCaseData, CaseDataError> {
        let raw: RawQueryResponse =
            serde_json::from_str(body).map_err(|e| CaseDataError::ParseError(e.to_string()))?;

        if let Some(error) = raw.error {
            return Err(if error.code >= 500 {
                CaseDataError::ServiceUnavailable(error.message)
            } else {
                CaseDataError::RequestFailed(format!("{}: {}", error.code, error.message))
            });
        }

        let attributes = raw
            .features
            .into_iter()
            .next()
            .map(|f| f.attributes)
            .ok_or_else(|| CaseDataError::RegionNotFound(region_key.to_string()))?;

        Ok(RegionCaseData {
            region_name: attributes.r#gen,
            county: attributes.county.unwrap_or_default(),
            cases: attributes.cases.unwrap_or_default(),
            deaths: attributes.deaths.unwrap_or_default(),
            cases_7_days_per_100k: attributes.cases7_per_100k.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl CaseDataClient for RkiCaseDataClient {
    #[instrument(skip(self))]
    async fn case_data(&self, region_key: &str) -> Result<RegionCaseData, CaseDataError> {
        let url = format!("{}/query", self.config.base_url);
        let params = [
            ("where", Self::where_clause(region_key)),
            ("outFields", OUT_FIELDS.to_string()),
            ("f", "json".to_string()),
        ];

        debug!(?url, "Querying case data");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CaseDataError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    CaseDataError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(CaseDataError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(CaseDataError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CaseDataError::ParseError(e.to_string()))?;

        let data = Self::parse_response(&body, region_key)?;
        debug!(incidence = data.cases_7_days_per_100k, "Case data received");
        Ok(data)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawQueryResponse {
    #[serde(default)]
    features: Vec<RawFeature>,
    error: Option<RawError>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    attributes: RawAttributes,
}

#[derive(Debug, Deserialize)]
struct RawAttributes {
    #[serde(rename = "GEN")]
    r#gen: String,
    county: Option<String>,
    cases: Option<u64>,
    deaths: Option<u64>,
    cases7_per_100k: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    code: u16,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_clause_escapes_quotes() {
        assert_eq!(RkiCaseDataClient::where_clause("Berlin Mitte"), "GEN = 'Berlin Mitte'");
        assert_eq!(
            RkiCaseDataClient::where_clause("St. John's"),
            "GEN = 'St. John''s'"
        );
    }

    #[test]
    fn test_parse_first_feature() {
        let body = r#"{"features": [
            {"attributes": {"GEN": "Berlin Mitte", "cases": 12345, "deaths": 123,
                "county": "SK Berlin Mitte", "cases7_per_100k": 87.5,
                "BEZ": "Bezirk", "BL": "Berlin"}},
            {"attributes": {"GEN": "Berlin Mitte", "cases": 1}}
        ]}"#;
        let data = RkiCaseDataClient::parse_response(body, "Berlin Mitte").unwrap();
        assert_eq!(data.region_name, "Berlin Mitte");
        assert_eq!(data.county, "SK Berlin Mitte");
        assert_eq!(data.cases, 12345);
        assert_eq!(data.deaths, 123);
        assert!((data.cases_7_days_per_100k - 87.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_features() {
        let err = RkiCaseDataClient::parse_response(r#"{"features": []}"#, "Atlantis").unwrap_err();
        assert!(matches!(err, CaseDataError::RegionNotFound(ref k) if k == "Atlantis"));
    }

    #[test]
    fn test_arcgis_error_body() {
        let err = RkiCaseDataClient::parse_response(
            r#"{"error": {"code": 400, "message": "Invalid query parameters", "details": []}}"#,
            "x",
        )
        .unwrap_err();
        assert!(matches!(err, CaseDataError::RequestFailed(_)));
        assert!(!err.is_retryable());
    }
}
