//! File renderer implementing `ResultRendererPort`

use std::path::{Path, PathBuf};

use application::ApplicationError;
use application::ports::ResultRendererPort;
use application::VisitReport;
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::templates::{MAP_TEMPLATE, SCHEDULE_TEMPLATE, TemplateEngine, TemplateError};
use super::views::{MapView, ScheduleView};

/// File name of the map page
pub const MAP_FILE: &str = "map.html";
/// File name of the schedule chart
pub const SCHEDULE_FILE: &str = "schedule.svg";

/// Writes `map.html` and `schedule.svg` into an output directory
#[derive(Debug, Clone)]
pub struct ArtifactRenderer {
    engine: TemplateEngine,
    output_dir: PathBuf,
}

impl ArtifactRenderer {
    /// Create a renderer writing into `output_dir`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Rendering` if the templates fail to compile.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ApplicationError> {
        Ok(Self {
            engine: TemplateEngine::new().map_err(map_error)?,
            output_dir: output_dir.into(),
        })
    }

    /// Output directory
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write(&self, file_name: &str, contents: String) -> Result<PathBuf, ApplicationError> {
        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| ApplicationError::Rendering(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "Artifact written");
        Ok(path)
    }
}

fn map_error(err: TemplateError) -> ApplicationError {
    ApplicationError::Rendering(err.to_string())
}

#[async_trait]
impl ResultRendererPort for ArtifactRenderer {
    #[instrument(skip(self, report), fields(request_id = report.request_id, dir = %self.output_dir.display()))]
    async fn render(&self, report: &VisitReport) -> Result<Vec<PathBuf>, ApplicationError> {
        let map = self
            .engine
            .render(MAP_TEMPLATE, &MapView::from_report(report))
            .map_err(map_error)?;
        let schedule = self
            .engine
            .render(SCHEDULE_TEMPLATE, &ScheduleView::from_report(report))
            .map_err(map_error)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                ApplicationError::Rendering(format!("{}: {e}", self.output_dir.display()))
            })?;

        Ok(vec![
            self.write(MAP_FILE, map).await?,
            self.write(SCHEDULE_FILE, schedule).await?,
        ])
    }
}
