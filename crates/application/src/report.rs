//! Result of one planned visit
//!
//! A [`VisitReport`] carries everything the presentation and rendering
//! layers need: the request, the matched venues with their hours on the
//! visit weekday, and the optional regional case data.

use std::fmt;
use std::path::PathBuf;

use domain::{
    DailyHours, FilterOutcome, HoursTable, RegionCaseData, VenueId, VenueRecord, VisitRequest,
};
use serde::{Deserialize, Serialize};

/// How a venue qualified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Open and uncrowded at the requested time
    Exact,
    /// Acceptable at a nearby time
    Suggestion,
}

impl MatchKind {
    /// Storage label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Suggestion => "suggestion",
        }
    }

    /// Parse a storage label
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "exact" => Some(Self::Exact),
            "suggestion" => Some(Self::Suggestion),
            _ => None,
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched venue with its hours on the visit weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueVisit {
    /// Venue data from the search
    pub venue: VenueRecord,
    /// Hours on the visit weekday
    pub hours: DailyHours,
    /// Exact match or suggestion
    pub kind: MatchKind,
}

/// One persisted result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitResultEntry {
    /// Venue identifier
    pub venue_id: VenueId,
    /// Venue name at the time of the search
    pub venue_name: String,
    /// Exact match or suggestion
    pub kind: MatchKind,
}

/// Outcome of a full search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitReport {
    /// Identifier of the persisted request
    pub request_id: i64,
    /// The request as validated
    pub request: VisitRequest,
    /// Exact matches in search relevance order
    pub exact_matches: Vec<VenueVisit>,
    /// Suggestions in search relevance order
    pub suggestions: Vec<VenueVisit>,
    /// Case data for the region, if it could be resolved
    pub case_data: Option<RegionCaseData>,
    /// Number of venues returned by the search
    pub venues_found: usize,
    /// Number of venues with usable hours
    pub venues_with_hours: usize,
    /// Files written by the renderer
    pub artifacts: Vec<PathBuf>,
}

impl VisitReport {
    /// Assemble a report from the pipeline stages
    ///
    /// Venues keep the order of `venues`; hours are taken for the visit
    /// weekday.
    #[must_use]
    pub fn assemble(
        request_id: i64,
        request: VisitRequest,
        venues: &[VenueRecord],
        hours: &HoursTable,
        outcome: &FilterOutcome,
        case_data: Option<RegionCaseData>,
    ) -> Self {
        let weekday = request.weekday();
        let pick = |kind: MatchKind| -> Vec<VenueVisit> {
            let mut seen = std::collections::BTreeSet::new();
            venues
                .iter()
                .filter(|v| match kind {
                    MatchKind::Exact => outcome.is_exact(&v.id),
                    MatchKind::Suggestion => outcome.is_suggestion(&v.id),
                })
                .filter(|v| seen.insert(v.id.clone()))
                .filter_map(|v| {
                    hours.day(&v.id, weekday).map(|h| VenueVisit {
                        venue: v.clone(),
                        hours: *h,
                        kind,
                    })
                })
                .collect()
        };

        Self {
            request_id,
            exact_matches: pick(MatchKind::Exact),
            suggestions: pick(MatchKind::Suggestion),
            case_data,
            venues_found: venues.len(),
            venues_with_hours: hours.len(),
            request,
            artifacts: Vec::new(),
        }
    }

    /// Exact matches followed by suggestions
    pub fn all_visits(&self) -> impl Iterator<Item = &VenueVisit> {
        self.exact_matches.iter().chain(&self.suggestions)
    }

    /// Rows to persist for this report
    #[must_use]
    pub fn result_entries(&self) -> Vec<VisitResultEntry> {
        self.all_visits()
            .map(|v| VisitResultEntry {
                venue_id: v.venue.id.clone(),
                venue_name: v.venue.name.clone(),
                kind: v.kind,
            })
            .collect()
    }

    /// Whether nothing matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact_matches.is_empty() && self.suggestions.is_empty()
    }
}
