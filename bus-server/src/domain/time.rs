//! Schedule template time handling.
//!
//! A bus's schedule is stored as times of day ("HH:MM"), not bound to any
//! calendar date; the same template repeats every day. Binding a template to
//! a concrete travel date, including overnight rollover, is the job of
//! [`crate::schedule`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Error returned when parsing an invalid time-of-day string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day: {reason}")]
pub struct InvalidTimeOfDay {
    reason: &'static str,
}

impl InvalidTimeOfDay {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock time of day from a schedule template.
///
/// # Examples
///
/// ```
/// use bus_server::domain::TimeOfDay;
///
/// let dep = TimeOfDay::parse_hhmm("08:30").unwrap();
/// assert_eq!(dep.to_string(), "08:30");
/// assert_eq!(dep.minutes_from_midnight(), 8 * 60 + 30);
///
/// // Invalid formats
/// assert!(TimeOfDay::parse_hhmm("0830").is_err());
/// assert!(TimeOfDay::parse_hhmm("8:30").is_err());
/// assert!(TimeOfDay::parse_hhmm("25:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Parse a time of day from strict "HH:MM" format.
    pub fn parse_hhmm(s: &str) -> Result<Self, InvalidTimeOfDay> {
        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(InvalidTimeOfDay::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(InvalidTimeOfDay::new("expected colon at position 2"));
        }

        let hour = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| InvalidTimeOfDay::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(InvalidTimeOfDay::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| InvalidTimeOfDay::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(InvalidTimeOfDay::new("minute must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| InvalidTimeOfDay::new("invalid time"))?;

        Ok(TimeOfDay(time))
    }

    /// Build from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, InvalidTimeOfDay> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeOfDay)
            .ok_or_else(|| InvalidTimeOfDay::new("hour or minute out of range"))
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Anchor this time of day on a calendar date.
    pub fn on_date(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = TimeOfDay::parse_hhmm("00:00").unwrap();
        assert_eq!(t.hour(), 0);
        assert_eq!(t.minute(), 0);

        let t = TimeOfDay::parse_hhmm("23:59").unwrap();
        assert_eq!(t.hour(), 23);
        assert_eq!(t.minute(), 59);

        let t = TimeOfDay::parse_hhmm("14:30").unwrap();
        assert_eq!(t.hour(), 14);
        assert_eq!(t.minute(), 30);
    }

    #[test]
    fn parse_invalid_format() {
        assert!(TimeOfDay::parse_hhmm("1430").is_err());
        assert!(TimeOfDay::parse_hhmm("14:3").is_err());
        assert!(TimeOfDay::parse_hhmm("14:300").is_err());
        assert!(TimeOfDay::parse_hhmm("14-30").is_err());
        assert!(TimeOfDay::parse_hhmm("14.30").is_err());
        assert!(TimeOfDay::parse_hhmm("ab:cd").is_err());
        assert!(TimeOfDay::parse_hhmm("1a:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(TimeOfDay::parse_hhmm("24:00").is_err());
        assert!(TimeOfDay::parse_hhmm("25:00").is_err());
        assert!(TimeOfDay::parse_hhmm("12:60").is_err());
        assert!(TimeOfDay::parse_hhmm("12:99").is_err());
    }

    #[test]
    fn display_format() {
        assert_eq!(TimeOfDay::parse_hhmm("00:00").unwrap().to_string(), "00:00");
        assert_eq!(TimeOfDay::parse_hhmm("09:05").unwrap().to_string(), "09:05");
        assert_eq!(TimeOfDay::parse_hhmm("23:59").unwrap().to_string(), "23:59");
    }

    #[test]
    fn minutes_from_midnight() {
        assert_eq!(
            TimeOfDay::parse_hhmm("00:00").unwrap().minutes_from_midnight(),
            0
        );
        assert_eq!(
            TimeOfDay::parse_hhmm("08:30").unwrap().minutes_from_midnight(),
            510
        );
        assert_eq!(
            TimeOfDay::parse_hhmm("23:59").unwrap().minutes_from_midnight(),
            1439
        );
    }

    #[test]
    fn on_date_combines() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let t = TimeOfDay::parse_hhmm("22:15").unwrap();
        let dt = t.on_date(date);
        assert_eq!(dt.date(), date);
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(22, 15, 0).unwrap());
    }

    #[test]
    fn ordering_by_clock() {
        let early = TimeOfDay::parse_hhmm("06:00").unwrap();
        let late = TimeOfDay::parse_hhmm("18:00").unwrap();
        assert!(early < late);
    }
}
