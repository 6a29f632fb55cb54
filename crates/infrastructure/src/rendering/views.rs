//! View models for the map and schedule templates

use std::collections::BTreeSet;

use application::{MatchKind, VenueVisit, VisitReport};
use domain::{DailyHours, TimeOfDay};
use serde::Serialize;

/// Initial map zoom level
pub const MAP_ZOOM: u8 = 13;
/// Marker colour of exact matches
pub const EXACT_COLOR: &str = "#FF0000";
/// Marker colour of suggestions
pub const SUGGESTION_COLOR: &str = "#0000FF";

const LABEL_WIDTH: f64 = 220.0;
const HOUR_WIDTH: f64 = 24.0;
const ROW_HEIGHT: f64 = 32.0;
const BAR_HEIGHT: f64 = 22.0;
const PLOT_TOP: f64 = 36.0;
const LEGEND_WIDTH: f64 = 140.0;
const AXIS_SPACE: f64 = 48.0;

/// One map marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
    pub name: String,
    pub category: String,
    pub kind: MatchKind,
}

/// Map page centred on the request coordinate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub title: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    /// Exact matches in red, then suggestions in blue; no venue is drawn
    /// twice
    #[must_use]
    pub fn from_report(report: &VisitReport) -> Self {
        let location = report.request.location();
        let mut seen = BTreeSet::new();
        let markers = report
            .all_visits()
            .filter(|visit| seen.insert(&visit.venue.id))
            .map(|visit| MapMarker {
                lat: visit.venue.location.latitude(),
                lng: visit.venue.location.longitude(),
                color: match visit.kind {
                    MatchKind::Exact => EXACT_COLOR,
                    MatchKind::Suggestion => SUGGESTION_COLOR,
                },
                name: visit.venue.name.clone(),
                category: visit.venue.category.clone(),
                kind: visit.kind,
            })
            .collect();

        Self {
            title: format!("{} near {location}", report.request.query()),
            center_lat: location.latitude(),
            center_lng: location.longitude(),
            zoom: MAP_ZOOM,
            markers,
        }
    }
}

/// One venue row of the schedule chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub label: String,
    pub y: f64,
    pub label_y: f64,
    pub open_x: f64,
    pub open_width: f64,
    pub popular_x: f64,
    pub popular_width: f64,
}

/// Hour tick on the x axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub hour: u8,
    pub x: f64,
}

/// Daily schedule chart, one row per venue on a 0-24 h axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleView {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub plot_left: f64,
    pub plot_top: f64,
    pub plot_width: f64,
    pub bar_height: f64,
    pub axis_y: f64,
    pub legend_x: f64,
    pub visit_x: f64,
    pub rows: Vec<ScheduleRow>,
    pub ticks: Vec<AxisTick>,
}

/// Horizontal position of a fractional hour
fn hour_x(hours: f64) -> f64 {
    LABEL_WIDTH + hours.clamp(0.0, 24.0) * HOUR_WIDTH
}

/// Start and end of a band in fractional hours; a band that wraps past
/// midnight, or ends where it starts, is drawn to 24
fn band(start: TimeOfDay, end: TimeOfDay) -> (f64, f64) {
    let start = start.as_fractional_hours();
    let end = end.as_fractional_hours();
    if end <= start { (start, 24.0) } else { (start, end) }
}

impl ScheduleRow {
    #[allow(clippy::cast_precision_loss)]
    fn new(index: usize, visit: &VenueVisit) -> Self {
        let DailyHours {
            open,
            close,
            popular_start,
            popular_end,
        } = visit.hours;
        let (open_start, open_end) = band(open, close);
        let (popular_from, popular_to) = band(popular_start, popular_end);
        let y = (index as f64).mul_add(ROW_HEIGHT, PLOT_TOP);

        let label = match visit.kind {
            MatchKind::Exact => visit.venue.name.clone(),
            MatchKind::Suggestion => format!("{} (suggestion)", visit.venue.name),
        };

        Self {
            label,
            y,
            label_y: y + BAR_HEIGHT / 2.0 + 4.0,
            open_x: hour_x(open_start),
            open_width: (open_end - open_start) * HOUR_WIDTH,
            popular_x: hour_x(popular_from),
            popular_width: (popular_to - popular_from) * HOUR_WIDTH,
        }
    }
}

impl ScheduleView {
    /// Exact matches first, then suggestions
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_report(report: &VisitReport) -> Self {
        let rows: Vec<ScheduleRow> = report
            .all_visits()
            .enumerate()
            .map(|(i, visit)| ScheduleRow::new(i, visit))
            .collect();

        let plot_width = 24.0 * HOUR_WIDTH;
        let axis_y = (rows.len() as f64).mul_add(ROW_HEIGHT, PLOT_TOP);
        let ticks = (0..=24u8)
            .step_by(2)
            .map(|hour| AxisTick {
                hour,
                x: hour_x(f64::from(hour)),
            })
            .collect();

        Self {
            title: format!(
                "Overview for {}",
                report.request.visit_at().format("%A %Y-%m-%d %H:%M")
            ),
            width: LABEL_WIDTH + plot_width + LEGEND_WIDTH,
            height: axis_y + AXIS_SPACE,
            plot_left: LABEL_WIDTH,
            plot_top: PLOT_TOP,
            plot_width,
            bar_height: BAR_HEIGHT,
            axis_y,
            legend_x: LABEL_WIDTH + plot_width + 16.0,
            visit_x: hour_x(report.request.visit_time().as_fractional_hours()),
            rows,
            ticks,
        }
    }
}
