//! Request history port
//!
//! Append-only record of user requests, their regional case data and the
//! venues each request produced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{RegionCaseData, VisitRequest};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;
use crate::report::VisitResultEntry;

/// A persisted request with its attached data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRequest {
    /// Row identifier
    pub id: i64,
    /// The request
    pub request: VisitRequest,
    /// When the request was recorded
    pub created_at: DateTime<Utc>,
    /// Case data, if the region was resolved
    pub case_data: Option<RegionCaseData>,
    /// Venues recorded for the request
    pub results: Vec<VisitResultEntry>,
}

/// Port for the request history store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RequestHistoryPort: Send + Sync {
    /// Record a request and return its identifier
    async fn record_request(&self, request: &VisitRequest) -> Result<i64, ApplicationError>;

    /// Attach case data to a recorded request
    async fn record_case_data(
        &self,
        request_id: i64,
        data: &RegionCaseData,
    ) -> Result<(), ApplicationError>;

    /// Attach filter results to a recorded request
    async fn record_results(
        &self,
        request_id: i64,
        results: &[VisitResultEntry],
    ) -> Result<(), ApplicationError>;

    /// Most recent requests, newest first
    async fn recent_requests(&self, limit: usize) -> Result<Vec<StoredRequest>, ApplicationError>;
}
