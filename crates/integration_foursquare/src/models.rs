//! Raw API payloads and their normalization into domain types

use chrono::Weekday;
use domain::{DailyHours, GeoLocation, TimeOfDay, VenueId, VenueRecord, WeeklyHours};
use serde::Deserialize;
use tracing::warn;

use crate::error::FoursquareError;

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
pub(crate) struct RawMeta {
    pub code: u16,
    #[serde(rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(rename = "errorDetail")]
    pub error_detail: Option<String>,
}

impl RawMeta {
    /// Turn a non-200 meta block into an error
    pub(crate) fn check(&self) -> Result<(), FoursquareError> {
        match self.code {
            200 => Ok(()),
            429 => Err(FoursquareError::RateLimitExceeded {
                retry_after_secs: None,
            }),
            code if code >= 500 => Err(FoursquareError::ServiceUnavailable(format!(
                "meta.code {code}"
            ))),
            code => Err(FoursquareError::ApiError {
                code,
                detail: self
                    .error_detail
                    .clone()
                    .or_else(|| self.error_type.clone())
                    .unwrap_or_default(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawExploreResponse {
    pub meta: RawMeta,
    #[serde(default)]
    pub response: RawExploreBody,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawExploreBody {
    #[serde(default)]
    pub groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGroup {
    #[serde(default)]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawItem {
    pub venue: RawVenue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVenue {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLocation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCategory {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHoursResponse {
    pub meta: RawMeta,
    #[serde(default)]
    pub response: RawHoursBody,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawHoursBody {
    pub hours: Option<RawTimeframes>,
    pub popular: Option<RawTimeframes>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTimeframes {
    pub timeframes: Option<Vec<RawTimeframe>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTimeframe {
    #[serde(default)]
    pub days: Vec<u8>,
    #[serde(default)]
    pub open: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSegment {
    pub start: String,
    pub end: String,
}

// --- Normalization ---

/// Map a Foursquare day number (1 = Monday .. 7 = Sunday) to a weekday
pub(crate) const fn weekday_from_number(day: u8) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Convert explore results into venue records
///
/// Venues without id, name or coordinates are skipped. A missing distance is
/// computed from `center`; a missing category becomes "Uncategorized".
pub(crate) fn venues_from_explore(
    raw: RawExploreResponse,
    center: &GeoLocation,
    limit: usize,
) -> Vec<VenueRecord> {
    raw.response
        .groups
        .into_iter()
        .next()
        .map(|group| group.items)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| convert_venue(item.venue, center))
        .take(limit)
        .collect()
}

fn convert_venue(raw: RawVenue, center: &GeoLocation) -> Option<VenueRecord> {
    let Some(id) = raw.id.as_deref().and_then(|id| VenueId::new(id).ok()) else {
        warn!(name = ?raw.name, "Skipping venue without id");
        return None;
    };
    let Some(name) = raw.name.filter(|n| !n.trim().is_empty()) else {
        warn!(venue = %id, "Skipping venue without name");
        return None;
    };
    let location = raw.location.as_ref();
    let coordinates = location
        .and_then(|l| l.lat.zip(l.lng))
        .and_then(|(lat, lng)| GeoLocation::new(lat, lng).ok());
    let Some(coordinates) = coordinates else {
        warn!(venue = %id, "Skipping venue without valid coordinates");
        return None;
    };

    let distance = location
        .and_then(|l| l.distance)
        .unwrap_or_else(|| center.distance_m(&coordinates));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let distance_m = distance.max(0.0).round() as u32;

    let category = raw
        .categories
        .into_iter()
        .next()
        .and_then(|c| c.name)
        .unwrap_or_default();

    Some(VenueRecord::new(id, name, coordinates, distance_m, category))
}

type DaySegments = [Option<(TimeOfDay, TimeOfDay)>; 7];

/// Last listed segment per weekday
fn segments_by_day(frames: &[RawTimeframe]) -> Result<DaySegments, FoursquareError> {
    let mut slots: DaySegments = [None; 7];
    for frame in frames {
        let Some(segment) = frame.open.last() else {
            continue;
        };
        let start = parse_time(&segment.start)?;
        let end = parse_time(&segment.end)?;
        for day in &frame.days {
            match weekday_from_number(*day) {
                Some(weekday) => {
                    slots[weekday.num_days_from_monday() as usize] = Some((start, end));
                },
                None => warn!(day, "Ignoring unknown day number"),
            }
        }
    }
    Ok(slots)
}

fn parse_time(raw: &str) -> Result<TimeOfDay, FoursquareError> {
    TimeOfDay::parse_hhmm(raw).map_err(|e| FoursquareError::ParseError(e.to_string()))
}

/// Convert an hours response into weekly hours
///
/// Returns `Ok(None)` when the venue lacks opening hours or popular hours
/// altogether, or when no weekday has both.
pub(crate) fn weekly_hours_from_response(
    body: RawHoursBody,
) -> Result<Option<WeeklyHours>, FoursquareError> {
    let open_frames = body.hours.and_then(|h| h.timeframes).unwrap_or_default();
    let popular_frames = body.popular.and_then(|p| p.timeframes).unwrap_or_default();
    if open_frames.is_empty() || popular_frames.is_empty() {
        return Ok(None);
    }

    let open = segments_by_day(&open_frames)?;
    let popular = segments_by_day(&popular_frames)?;

    let mut week = WeeklyHours::new();
    for (index, weekday) in domain::WEEKDAYS.iter().enumerate() {
        if let (Some((open_at, close_at)), Some((busy_from, busy_to))) = (open[index], popular[index])
        {
            week.set(
                *weekday,
                DailyHours::new(open_at, close_at, busy_from, busy_to),
            );
        }
    }

    Ok((!week.is_empty()).then_some(week))
}
