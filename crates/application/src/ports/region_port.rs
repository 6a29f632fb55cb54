//! Region resolution and regional case data ports
//!
//! A coordinate is first mapped to a region key, which then selects a row
//! in the regional statistics dataset.

use std::fmt;

use async_trait::async_trait;
use domain::{GeoLocation, RegionCaseData};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A region key from the area lookup table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedRegion {
    /// Region name as used by the statistics dataset
    pub key: String,
    /// Region kind (e.g. "Bezirk"), when the table lists one
    pub kind: Option<String>,
}

impl ResolvedRegion {
    /// Create a region key without a kind
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: None,
        }
    }

    /// Set the region kind
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

impl fmt::Display for ResolvedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{} ({kind})", self.key),
            None => f.write_str(&self.key),
        }
    }
}

/// Port for mapping coordinates to region keys
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegionResolverPort: Send + Sync {
    /// Resolve the region containing a coordinate
    ///
    /// Fails with `ApplicationError::RegionNotFound` if no known region
    /// matches.
    async fn resolve_region(
        &self,
        location: &GeoLocation,
    ) -> Result<ResolvedRegion, ApplicationError>;
}

/// Port for regional case statistics
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CaseDataPort: Send + Sync {
    /// Current case data for a region
    async fn fetch_case_data(
        &self,
        region: &ResolvedRegion,
    ) -> Result<RegionCaseData, ApplicationError>;
}
