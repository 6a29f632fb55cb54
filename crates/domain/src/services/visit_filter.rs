//! Time-window filter and suggestion engine
//!
//! Decides which venues are open and not crowded around the requested visit
//! time. All comparisons happen on the HHMM integer scale used by
//! [`TimeOfDay`](crate::value_objects::TimeOfDay), so a window of `200`
//! means "two hours" and a relaxed window of `-2` means "two minutes
//! earlier".
//!
//! The visit time is encoded as `hour * 100 + minute`. Earlier versions of
//! this tool dropped the minutes and compared on the full hour only.
//!
//! # Predicate
//!
//! For target time `t` and window `w` a venue is acceptable when
//!
//! * it is open: `open <= t` and (`close >= t + w` or `close <= 300`);
//!   when `close < open` the venue closes after midnight and is also open
//!   for early-morning targets `t <= close`,
//! * it is not busy: `popular_start >= t + w` or `popular_end <= t`;
//!   a busy period running past midnight must be cleared on both sides.
//!   A busy period with equal start and end ("0000"-"2400") covers
//!   the whole day.
//!
//! # Suggestions
//!
//! When fewer than [`SUGGESTION_THRESHOLD`] venues pass with the strict
//! window, the predicate is re-run with each of [`RELAXED_WINDOWS`] and the
//! union of passing venues (minus the exact matches) becomes the
//! suggestions.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entities::{DailyHours, HoursTable, parse_visit_datetime};
use crate::errors::DomainError;
use crate::value_objects::{TimeOfDay, VenueId};

/// Tolerance used for exact matches (two hours)
pub const STRICT_WINDOW: i32 = 200;

/// Exact matches below this count trigger the suggestion pass
pub const SUGGESTION_THRESHOLD: usize = 5;

/// Windows tried by the suggestion pass, in evaluation order
pub const RELAXED_WINDOWS: [i32; 4] = [1, -1, 2, -2];

/// Closing times at or before 03:00 count as "open through the night"
pub const OVERNIGHT_CLOSE_CUTOFF: i32 = 300;

const DAY: i32 = 2400;

/// Venues accepted at the requested time and at nearby times
///
/// The two sets never share a venue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOutcome {
    exact_matches: BTreeSet<VenueId>,
    suggestions: BTreeSet<VenueId>,
}

impl FilterOutcome {
    /// Venues open and uncrowded at the requested time
    #[must_use]
    pub const fn exact_matches(&self) -> &BTreeSet<VenueId> {
        &self.exact_matches
    }

    /// Venues acceptable at a nearby time
    #[must_use]
    pub const fn suggestions(&self) -> &BTreeSet<VenueId> {
        &self.suggestions
    }

    /// Whether a venue is an exact match
    #[must_use]
    pub fn is_exact(&self, venue: &VenueId) -> bool {
        self.exact_matches.contains(venue)
    }

    /// Whether a venue is a suggestion
    #[must_use]
    pub fn is_suggestion(&self, venue: &VenueId) -> bool {
        self.suggestions.contains(venue)
    }

    /// Total number of venues in either set
    #[must_use]
    pub fn total(&self) -> usize {
        self.exact_matches.len() + self.suggestions.len()
    }

    /// Whether neither set contains anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Whether the venue is open at `t` and stays open for `window`
#[must_use]
pub fn is_open(hours: &DailyHours, t: i32, window: i32) -> bool {
    let open = hours.open.value();
    let close = hours.close.value();
    let overnight = close <= OVERNIGHT_CLOSE_CUTOFF;

    if hours.closes_after_midnight() {
        if t >= open {
            overnight || close + DAY >= t + window
        } else if t <= close {
            overnight || close >= t + window
        } else {
            false
        }
    } else {
        open <= t && (close >= t + window || overnight)
    }
}

/// Whether `[t, t + window]` stays clear of the venue's busy period
#[must_use]
pub fn is_uncrowded(hours: &DailyHours, t: i32, window: i32) -> bool {
    let start = hours.popular_start.value();
    let end = hours.popular_end.value();
    let clear = |s: i32, e: i32| s >= t + window || e <= t;

    if hours.popular_all_day() {
        false
    } else if hours.popular_wraps() {
        clear(start, end + DAY) && clear(start - DAY, end)
    } else {
        clear(start, end)
    }
}

/// Full predicate: open and not busy
#[must_use]
pub fn is_acceptable(hours: &DailyHours, t: i32, window: i32) -> bool {
    is_open(hours, t, window) && is_uncrowded(hours, t, window)
}

/// Filter engine with configurable window and threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitFilter {
    strict_window: i32,
    suggestion_threshold: usize,
    relaxed_windows: Vec<i32>,
}

impl Default for VisitFilter {
    fn default() -> Self {
        Self {
            strict_window: STRICT_WINDOW,
            suggestion_threshold: SUGGESTION_THRESHOLD,
            relaxed_windows: RELAXED_WINDOWS.to_vec(),
        }
    }
}

impl VisitFilter {
    /// Create a filter with a custom strict window and threshold
    #[must_use]
    pub fn new(strict_window: i32, suggestion_threshold: usize) -> Self {
        Self {
            strict_window,
            suggestion_threshold,
            ..Self::default()
        }
    }

    /// Replace the windows tried by the suggestion pass
    #[must_use]
    pub fn with_relaxed_windows(mut self, windows: impl Into<Vec<i32>>) -> Self {
        self.relaxed_windows = windows.into();
        self
    }

    /// Strict window in HHMM units
    #[must_use]
    pub const fn strict_window(&self) -> i32 {
        self.strict_window
    }

    /// Minimum number of exact matches that suppresses suggestions
    #[must_use]
    pub const fn suggestion_threshold(&self) -> usize {
        self.suggestion_threshold
    }

    /// Filter candidates for a visit at `visit_at`
    ///
    /// Candidates without hours for the visit weekday are skipped.
    pub fn evaluate<'a, I>(
        &self,
        visit_at: NaiveDateTime,
        hours: &HoursTable,
        candidates: I,
    ) -> FilterOutcome
    where
        I: IntoIterator<Item = &'a VenueId>,
    {
        let weekday = visit_at.weekday();
        let t = TimeOfDay::from_time(visit_at.time()).value();

        let eligible: Vec<(&VenueId, &DailyHours)> = candidates
            .into_iter()
            .filter_map(|id| hours.day(id, weekday).map(|day| (id, day)))
            .collect();

        let exact_matches = Self::passing(&eligible, t, self.strict_window);

        if exact_matches.len() >= self.suggestion_threshold {
            return FilterOutcome {
                exact_matches,
                suggestions: BTreeSet::new(),
            };
        }

        let mut suggestions = BTreeSet::new();
        for window in &self.relaxed_windows {
            suggestions.extend(Self::passing(&eligible, t, *window));
        }
        suggestions.retain(|id| !exact_matches.contains(id));

        FilterOutcome {
            exact_matches,
            suggestions,
        }
    }

    /// Parse a raw visit datetime, then filter
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateTime` if the datetime cannot be parsed;
    /// no filtering happens in that case.
    pub fn evaluate_raw<'a, I>(
        &self,
        visit_at: &str,
        hours: &HoursTable,
        candidates: I,
    ) -> Result<FilterOutcome, DomainError>
    where
        I: IntoIterator<Item = &'a VenueId>,
    {
        let visit_at = parse_visit_datetime(visit_at)?;
        Ok(self.evaluate(visit_at, hours, candidates))
    }

    fn passing(eligible: &[(&VenueId, &DailyHours)], t: i32, window: i32) -> BTreeSet<VenueId> {
        eligible
            .iter()
            .filter(|(_, day)| is_acceptable(day, t, window))
            .map(|(id, _)| (*id).clone())
            .collect()
    }
}
