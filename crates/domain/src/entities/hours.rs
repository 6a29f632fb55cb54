//! Opening and popular hours per venue and weekday

use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::value_objects::{TimeOfDay, VenueId};

/// Weekdays in table order (Monday first)
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Opening and popular hours of one venue on one weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHours {
    /// Opening time
    pub open: TimeOfDay,
    /// Closing time; earlier than `open` when the venue closes after midnight
    pub close: TimeOfDay,
    /// Start of the busy period
    pub popular_start: TimeOfDay,
    /// End of the busy period
    pub popular_end: TimeOfDay,
}

impl DailyHours {
    /// Create a daily hours entry
    #[must_use]
    pub const fn new(
        open: TimeOfDay,
        close: TimeOfDay,
        popular_start: TimeOfDay,
        popular_end: TimeOfDay,
    ) -> Self {
        Self {
            open,
            close,
            popular_start,
            popular_end,
        }
    }

    /// Whether closing time falls on the next calendar day
    #[must_use]
    pub fn closes_after_midnight(&self) -> bool {
        self.close < self.open
    }

    /// Whether the busy period runs past midnight
    #[must_use]
    pub fn popular_wraps(&self) -> bool {
        self.popular_end < self.popular_start
    }

    /// Whether the busy period covers the whole day
    ///
    /// A "0000"-"2400" segment normalizes to equal start and end.
    #[must_use]
    pub fn popular_all_day(&self) -> bool {
        self.popular_end == self.popular_start
    }
}

/// Hours of one venue for each weekday
///
/// A weekday without an entry means no usable data for that day; the venue
/// is never offered on such a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    days: [Option<DailyHours>; 7],
}

impl WeeklyHours {
    /// Empty week
    #[must_use]
    pub const fn new() -> Self {
        Self { days: [None; 7] }
    }

    /// The same hours on every weekday
    #[must_use]
    pub const fn uniform(hours: DailyHours) -> Self {
        Self {
            days: [Some(hours); 7],
        }
    }

    /// Set the hours for one weekday
    pub fn set(&mut self, weekday: Weekday, hours: DailyHours) {
        self.days[weekday.num_days_from_monday() as usize] = Some(hours);
    }

    /// Builder-style variant of [`WeeklyHours::set`]
    #[must_use]
    pub fn with_day(mut self, weekday: Weekday, hours: DailyHours) -> Self {
        self.set(weekday, hours);
        self
    }

    /// Hours for a weekday, if known
    #[must_use]
    pub fn get(&self, weekday: Weekday) -> Option<&DailyHours> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }

    /// Number of weekdays with data
    #[must_use]
    pub fn known_days(&self) -> usize {
        self.days.iter().filter(|d| d.is_some()).count()
    }

    /// Whether no weekday has data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known_days() == 0
    }

    /// Iterate over `(weekday, hours)` for the days with data
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DailyHours)> {
        WEEKDAYS
            .iter()
            .zip(self.days.iter())
            .filter_map(|(day, hours)| hours.as_ref().map(|h| (*day, h)))
    }
}

/// Weekly hours keyed by venue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursTable {
    venues: BTreeMap<VenueId, WeeklyHours>,
}

impl HoursTable {
    /// Empty table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            venues: BTreeMap::new(),
        }
    }

    /// Insert or replace the hours of a venue; weeks without any data are ignored
    pub fn insert(&mut self, venue: VenueId, hours: WeeklyHours) {
        if !hours.is_empty() {
            self.venues.insert(venue, hours);
        }
    }

    /// Weekly hours of a venue
    #[must_use]
    pub fn get(&self, venue: &VenueId) -> Option<&WeeklyHours> {
        self.venues.get(venue)
    }

    /// Hours of a venue on a given weekday
    #[must_use]
    pub fn day(&self, venue: &VenueId, weekday: Weekday) -> Option<&DailyHours> {
        self.venues.get(venue).and_then(|w| w.get(weekday))
    }

    /// Whether the table has data for a venue
    #[must_use]
    pub fn contains(&self, venue: &VenueId) -> bool {
        self.venues.contains_key(venue)
    }

    /// Number of venues in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// Iterate over venues in identifier order
    pub fn iter(&self) -> btree_map::Iter<'_, VenueId, WeeklyHours> {
        self.venues.iter()
    }
}

impl FromIterator<(VenueId, WeeklyHours)> for HoursTable {
    fn from_iter<I: IntoIterator<Item = (VenueId, WeeklyHours)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (venue, hours) in iter {
            table.insert(venue, hours);
        }
        table
    }
}

impl<'a> IntoIterator for &'a HoursTable {
    type Item = (&'a VenueId, &'a WeeklyHours);
    type IntoIter = btree_map::Iter<'a, VenueId, WeeklyHours>;

    fn into_iter(self) -> Self::IntoIter {
        self.venues.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(v: u16) -> TimeOfDay {
        TimeOfDay::from_hhmm(v).unwrap()
    }

    fn sample() -> DailyHours {
        DailyHours::new(t(900), t(2200), t(1200), t(1400))
    }

    #[test]
    fn wraparound_detection() {
        assert!(!sample().closes_after_midnight());
        assert!(DailyHours::new(t(2200), t(200), t(2300), t(100)).closes_after_midnight());
        assert!(DailyHours::new(t(2200), t(200), t(2300), t(100)).popular_wraps());
    }

    #[test]
    fn all_day_popular_detection() {
        assert!(!sample().popular_all_day());
        let busy = DailyHours::new(t(0), t(0), TimeOfDay::MIDNIGHT, TimeOfDay::MIDNIGHT);
        assert!(busy.popular_all_day());
        assert!(!busy.popular_wraps());
    }

    #[test]
    fn weekly_hours_by_weekday() {
        let week = WeeklyHours::new().with_day(Weekday::Wed, sample());
        assert_eq!(week.get(Weekday::Wed), Some(&sample()));
        assert!(week.get(Weekday::Thu).is_none());
        assert_eq!(week.known_days(), 1);
    }

    #[test]
    fn uniform_week_covers_all_days() {
        let week = WeeklyHours::uniform(sample());
        assert_eq!(week.known_days(), 7);
        let days: Vec<Weekday> = week.iter().map(|(d, _)| d).collect();
        assert_eq!(days, WEEKDAYS.to_vec());
    }

    #[test]
    fn table_ignores_empty_weeks() {
        let mut table = HoursTable::new();
        table.insert(VenueId::new("empty").unwrap(), WeeklyHours::new());
        assert!(table.is_empty());

        table.insert(VenueId::new("full").unwrap(), WeeklyHours::uniform(sample()));
        assert_eq!(table.len(), 1);
        assert!(table.contains(&VenueId::new("full").unwrap()));
    }

    #[test]
    fn table_day_lookup() {
        let id = VenueId::new("v").unwrap();
        let table: HoursTable = [(id.clone(), WeeklyHours::new().with_day(Weekday::Sun, sample()))]
            .into_iter()
            .collect();
        assert_eq!(table.day(&id, Weekday::Sun), Some(&sample()));
        assert!(table.day(&id, Weekday::Mon).is_none());
    }
}
