//! Visit planner - the search pipeline
//!
//! Runs the stages of one search in order:
//!
//! 1. record the request
//! 2. resolve the region and attach case data (skipped if the region is unknown)
//! 3. search venues
//! 4. fetch weekly hours per venue, with bounded concurrency
//! 5. filter by opening and popular hours
//! 6. record the results
//! 7. render artifacts, when a renderer is configured

use std::{fmt, sync::Arc, time::Instant};

use domain::{HoursTable, RegionCaseData, VenueId, VenueRecord, VisitFilter, VisitRequest};
use futures::{StreamExt, stream};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{
        CaseDataPort, RegionResolverPort, RequestHistoryPort, ResultRendererPort, StoredRequest,
        VenueHoursPort, VenueSearchPort,
    },
    report::VisitReport,
};

/// Default number of hours lookups in flight
pub const DEFAULT_HOURS_CONCURRENCY: usize = 4;

/// Service orchestrating one venue search
pub struct VisitPlanner {
    venues: Arc<dyn VenueSearchPort>,
    hours: Arc<dyn VenueHoursPort>,
    regions: Arc<dyn RegionResolverPort>,
    case_data: Arc<dyn CaseDataPort>,
    history: Arc<dyn RequestHistoryPort>,
    renderer: Option<Arc<dyn ResultRendererPort>>,
    filter: VisitFilter,
    hours_concurrency: usize,
}

impl fmt::Debug for VisitPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitPlanner")
            .field("filter", &self.filter)
            .field("hours_concurrency", &self.hours_concurrency)
            .field("renders", &self.renderer.is_some())
            .finish_non_exhaustive()
    }
}

impl VisitPlanner {
    /// Create a planner with the default filter and no renderer
    pub fn new(
        venues: Arc<dyn VenueSearchPort>,
        hours: Arc<dyn VenueHoursPort>,
        regions: Arc<dyn RegionResolverPort>,
        case_data: Arc<dyn CaseDataPort>,
        history: Arc<dyn RequestHistoryPort>,
    ) -> Self {
        Self {
            venues,
            hours,
            regions,
            case_data,
            history,
            renderer: None,
            filter: VisitFilter::default(),
            hours_concurrency: DEFAULT_HOURS_CONCURRENCY,
        }
    }

    /// Render artifacts with the given renderer
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn ResultRendererPort>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Use a custom filter
    #[must_use]
    pub fn with_filter(mut self, filter: VisitFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Limit the number of concurrent hours lookups (at least one)
    #[must_use]
    pub fn with_hours_concurrency(mut self, limit: usize) -> Self {
        self.hours_concurrency = limit.max(1);
        self
    }

    /// Run the full pipeline for a validated request
    #[instrument(skip(self, request), fields(query = %request.query(), location = %request.location()))]
    pub async fn plan(&self, request: VisitRequest) -> Result<VisitReport, ApplicationError> {
        let start = Instant::now();

        let request_id = self.history.record_request(&request).await?;
        debug!(request_id, "Request recorded");

        let case_data = self.attach_case_data(request_id, &request).await?;

        let venues = self.venues.search_venues(&request).await?;
        debug!(count = venues.len(), "Venues found");

        let hours = self.collect_hours(&venues).await;

        let outcome =
            self.filter
                .evaluate(request.visit_at(), &hours, venues.iter().map(|v| &v.id));

        let mut report =
            VisitReport::assemble(request_id, request, &venues, &hours, &outcome, case_data);

        self.history
            .record_results(request_id, &report.result_entries())
            .await?;

        if let Some(renderer) = &self.renderer {
            report.artifacts = renderer.render(&report).await?;
        }

        info!(
            request_id,
            venues = report.venues_found,
            with_hours = report.venues_with_hours,
            exact = report.exact_matches.len(),
            suggestions = report.suggestions.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Visit planned"
        );

        Ok(report)
    }

    /// Recent requests from the history store
    pub async fn history(
        &self,
        limit: usize,
    ) -> Result<Vec<StoredRequest>, ApplicationError> {
        self.history.recent_requests(limit).await
    }

    async fn attach_case_data(
        &self,
        request_id: i64,
        request: &VisitRequest,
    ) -> Result<Option<RegionCaseData>, ApplicationError> {
        let region = match self.regions.resolve_region(request.location()).await {
            Ok(region) => region,
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Skipping case data");
                return Ok(None);
            },
            Err(e) => return Err(e),
        };
        debug!(region = %region, "Region resolved");

        let data = match self.case_data.fetch_case_data(&region).await {
            Ok(data) => data,
            Err(e) if e.is_recoverable() => {
                warn!(region = %region, error = %e, "No case data for region");
                return Ok(None);
            },
            Err(e) => return Err(e),
        };

        self.history.record_case_data(request_id, &data).await?;
        Ok(Some(data))
    }

    async fn collect_hours(&self, venues: &[VenueRecord]) -> HoursTable {
        let lookups: Vec<(VenueId, Result<_, ApplicationError>)> =
            stream::iter(venues.iter().map(|v| v.id.clone()))
                .map(|id| {
                    let port = Arc::clone(&self.hours);
                    async move {
                        let result = port.weekly_hours(&id).await;
                        (id, result)
                    }
                })
                .buffer_unordered(self.hours_concurrency)
                .collect()
                .await;

        let mut table = HoursTable::new();
        for (id, result) in lookups {
            match result {
                Ok(Some(week)) => table.insert(id, week),
                Ok(None) => debug!(venue = %id, "No usable hours"),
                Err(e) => warn!(venue = %id, error = %e, "Hours lookup failed"),
            }
        }
        table
    }
}
