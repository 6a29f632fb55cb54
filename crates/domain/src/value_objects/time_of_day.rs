//! Time of day in HHMM integer encoding
//!
//! Venue providers report opening and popular hours as `"HHMM"` strings.
//! The whole crate works with the integer form of that encoding
//! (`930` = 09:30, `2200` = 22:00) because the filter windows are expressed
//! in the same units (e.g. "+200" means two hours later on the same scale).

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Largest valid encoded time (23:59)
pub const MAX_HHMM: u16 = 2359;

/// A time of day encoded as `hour * 100 + minute`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight (`0`)
    pub const MIDNIGHT: Self = Self(0);

    /// Create from an encoded value, validating range and minute part
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeOfDay` if the value exceeds 2359 or
    /// the minute part is 60 or more.
    pub fn from_hhmm(value: u16) -> Result<Self, DomainError> {
        if value > MAX_HHMM || value % 100 >= 60 {
            return Err(DomainError::InvalidTimeOfDay(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Create from hour and minute components
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeOfDay` if hour > 23 or minute > 59.
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::InvalidTimeOfDay(format!("{hour}:{minute}")));
        }
        Ok(Self(u16::from(hour) * 100 + u16::from(minute)))
    }

    /// Parse a provider string such as `"0930"`, `"2200"` or `"+0200"`
    ///
    /// A leading `+` marks a next-day time and is dropped; `"2400"` is
    /// normalized to midnight.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeOfDay` for non-numeric or out-of-range input.
    pub fn parse_hhmm(raw: &str) -> Result<Self, DomainError> {
        let digits = raw.trim().trim_start_matches('+');
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidTimeOfDay(raw.to_string()));
        }
        let value: u16 = digits
            .parse()
            .map_err(|_| DomainError::InvalidTimeOfDay(raw.to_string()))?;
        if value == 2400 {
            return Ok(Self::MIDNIGHT);
        }
        Self::from_hhmm(value)
    }

    /// Full-precision encoding of a clock time (`hour * 100 + minute`)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // hour <= 23 and minute <= 59
    pub fn from_time(time: NaiveTime) -> Self {
        Self(time.hour() as u16 * 100 + time.minute() as u16)
    }

    /// The raw encoded value
    #[must_use]
    pub const fn hhmm(self) -> u16 {
        self.0
    }

    /// The encoded value widened for window arithmetic
    #[must_use]
    pub fn value(self) -> i32 {
        i32::from(self.0)
    }

    /// Hour component
    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 100
    }

    /// Minute component
    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 100
    }

    /// Position on a 0–24 hour axis (`9:30` → `9.5`)
    #[must_use]
    pub fn as_fractional_hours(self) -> f64 {
        f64::from(self.hour()) + f64::from(self.minute()) / 60.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<u16> for TimeOfDay {
    type Error = DomainError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_hhmm(value)
    }
}

impl From<TimeOfDay> for u16 {
    fn from(t: TimeOfDay) -> Self {
        t.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_encodings() {
        assert_eq!(TimeOfDay::from_hhmm(0).unwrap().hhmm(), 0);
        assert_eq!(TimeOfDay::from_hhmm(930).unwrap().hhmm(), 930);
        assert_eq!(TimeOfDay::from_hhmm(2359).unwrap().hhmm(), 2359);
    }

    #[test]
    fn invalid_encodings() {
        assert!(TimeOfDay::from_hhmm(2400).is_err());
        assert!(TimeOfDay::from_hhmm(960).is_err());
        assert!(TimeOfDay::from_hhmm(9999).is_err());
    }

    #[test]
    fn from_time_keeps_minutes() {
        let t = NaiveTime::from_hms_opt(13, 45, 10).unwrap();
        assert_eq!(TimeOfDay::from_time(t).hhmm(), 1345);
    }

    #[test]
    fn parse_provider_strings() {
        assert_eq!(TimeOfDay::parse_hhmm("0930").unwrap().hhmm(), 930);
        assert_eq!(TimeOfDay::parse_hhmm("2200").unwrap().hhmm(), 2200);
        assert_eq!(TimeOfDay::parse_hhmm("+0200").unwrap().hhmm(), 200);
        assert_eq!(TimeOfDay::parse_hhmm("2400").unwrap(), TimeOfDay::MIDNIGHT);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TimeOfDay::parse_hhmm("").is_err());
        assert!(TimeOfDay::parse_hhmm("noon").is_err());
        assert!(TimeOfDay::parse_hhmm("-100").is_err());
        assert!(TimeOfDay::parse_hhmm("2500").is_err());
    }

    #[test]
    fn components_and_display() {
        let t = TimeOfDay::from_hm(9, 5).unwrap();
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "09:05");
        assert!((t.as_fractional_hours() - (9.0 + 5.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn ordering_follows_clock() {
        let early = TimeOfDay::from_hhmm(800).unwrap();
        let late = TimeOfDay::from_hhmm(2130).unwrap();
        assert!(early < late);
    }

    #[test]
    fn serde_validates() {
        let ok: TimeOfDay = serde_json::from_str("1230").unwrap();
        assert_eq!(ok.hhmm(), 1230);
        assert!(serde_json::from_str::<TimeOfDay>("1275").is_err());
    }
}
