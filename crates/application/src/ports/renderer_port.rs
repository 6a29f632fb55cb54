//! Result rendering port

use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;
use crate::report::VisitReport;

/// Port for turning a report into output artifacts
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResultRendererPort: Send + Sync {
    /// Render the report and return the written file paths
    async fn render(&self, report: &VisitReport) -> Result<Vec<PathBuf>, ApplicationError>;
}
