//! Clock and calendar primitives for weekly rostering.
//!
//! # Time Model
//!
//! Times of day are minutes since midnight (`Minutes`). Shifts that run
//! past midnight are expressed with `end < start`; duration and overlap
//! helpers normalize such ends by adding a day.
//!
//! Calendar dates use [`chrono::NaiveDate`]. A week is always anchored
//! to its Monday, and [`Day`] iterates Monday→Sunday in a fixed order —
//! every grouping in the engine relies on this for reproducibility.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes since midnight (0..1440 for same-day times).
pub type Minutes = i32;

/// Minutes in one day.
pub const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Error parsing a `"HH:MM"` time-of-day string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    /// The string is not of the form `"HH:MM"`.
    #[error("expected \"HH:MM\", got {0:?}")]
    Malformed(String),
    /// Hour or minute component out of range.
    #[error("time component out of range in {0:?}")]
    OutOfRange(String),
}

/// Parses a `"HH:MM"` string into minutes since midnight.
pub fn parse_hhmm(s: &str) -> Result<Minutes, TimeParseError> {
    let (h, m) = s
        .split_once(':')
        .ok_or_else(|| TimeParseError::Malformed(s.to_string()))?;
    let h: i32 = h
        .parse()
        .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
    let m: i32 = m
        .parse()
        .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return Err(TimeParseError::OutOfRange(s.to_string()));
    }
    Ok(h * 60 + m)
}

/// Formats minutes since midnight as `"HH:MM"`.
pub fn hhmm(minutes: Minutes) -> String {
    let m = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Formats minutes since midnight as a 12-hour label, e.g. `"9:00 AM"`.
///
/// Used for naming synthesized coverage shifts.
pub fn label_12h(minutes: Minutes) -> String {
    let m = minutes.rem_euclid(MINUTES_PER_DAY);
    let (hour, meridiem) = match m / 60 {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };
    format!("{}:{:02} {}", hour, m % 60, meridiem)
}

/// Shift length in hours, wrapping past midnight when `end < start`.
pub fn duration_hours(start: Minutes, end: Minutes) -> f64 {
    let mut span = end - start;
    if span < 0 {
        span += MINUTES_PER_DAY;
    }
    span as f64 / 60.0
}

/// End minute normalized onto the same axis as `start`.
///
/// An end at or before the start is taken to cross midnight.
#[inline]
pub fn normalized_end(start: Minutes, end: Minutes) -> Minutes {
    if end <= start {
        end + MINUTES_PER_DAY
    } else {
        end
    }
}

/// Whether `t` falls within the half-open range `[start, end)`.
///
/// Handles overnight ranges: with `end <= start` the range wraps.
pub fn in_range(t: Minutes, start: Minutes, end: Minutes) -> bool {
    if end <= start {
        t >= start || t < end
    } else {
        t >= start && t < end
    }
}

/// A half-open minute interval [start, end) on a single date's axis.
///
/// Ends are pre-normalized (an overnight end carries `+ MINUTES_PER_DAY`),
/// so plain comparisons are correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Interval start (inclusive).
    pub start_min: Minutes,
    /// Interval end (exclusive, normalized).
    pub end_min: Minutes,
}

impl TimeRange {
    /// Creates a range, normalizing an overnight end.
    pub fn new(start_min: Minutes, end_min: Minutes) -> Self {
        Self {
            start_min,
            end_min: normalized_end(start_min, end_min),
        }
    }

    /// Interval length in minutes.
    #[inline]
    pub fn duration_min(&self) -> Minutes {
        self.end_min - self.start_min
    }

    /// Whether two ranges overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

/// Day of the business week, Monday through Sunday.
///
/// Ordering and iteration are fixed Monday→Sunday; the engine depends
/// on this for deterministic output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days, Monday first.
    pub const WEEK: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Offset from Monday (0..=6).
    #[inline]
    pub fn offset(self) -> i64 {
        self as i64
    }

    /// Capitalized display name, e.g. `"Wednesday"`.
    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<chrono::Weekday> for Day {
    fn from(w: chrono::Weekday) -> Self {
        match w {
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
            chrono::Weekday::Sun => Day::Sunday,
        }
    }
}

/// The Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The calendar date of `day` within the week starting at `week_start`.
pub fn date_for(week_start: NaiveDate, day: Day) -> NaiveDate {
    week_start + Duration::days(day.offset())
}

/// The business-week day of a calendar date.
pub fn day_of(date: NaiveDate) -> Day {
    date.weekday().into()
}

/// Serde adapter: `Minutes` as an `"HH:MM"` string.
pub mod serde_hhmm {
    use super::{hhmm, parse_hhmm, Minutes};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Minutes, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hhmm(*v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Minutes, D::Error> {
        let raw = String::deserialize(d)?;
        parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: `Option<Minutes>` as an optional `"HH:MM"` string.
pub mod serde_hhmm_opt {
    use super::{hhmm, parse_hhmm, Minutes};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<Minutes>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(m) => s.serialize_some(&hhmm(*m)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Minutes>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| parse_hhmm(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("00:00"), Ok(0));
        assert_eq!(parse_hhmm("09:30"), Ok(570));
        assert_eq!(parse_hhmm("23:59"), Ok(1439));
        assert!(matches!(parse_hhmm("9.30"), Err(TimeParseError::Malformed(_))));
        assert!(matches!(parse_hhmm("24:00"), Err(TimeParseError::OutOfRange(_))));
        assert!(matches!(parse_hhmm("12:75"), Err(TimeParseError::OutOfRange(_))));
    }

    #[test]
    fn test_hhmm_roundtrip() {
        assert_eq!(hhmm(570), "09:30");
        assert_eq!(hhmm(0), "00:00");
        assert_eq!(hhmm(1439), "23:59");
    }

    #[test]
    fn test_label_12h() {
        assert_eq!(label_12h(0), "12:00 AM");
        assert_eq!(label_12h(540), "9:00 AM");
        assert_eq!(label_12h(720), "12:00 PM");
        assert_eq!(label_12h(1005), "4:45 PM");
    }

    #[test]
    fn test_duration_wraps_past_midnight() {
        assert!((duration_hours(540, 1020) - 8.0).abs() < 1e-10);
        // 22:00 → 02:00 is four hours, not negative
        assert!((duration_hours(1320, 120) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_in_range_half_open() {
        assert!(in_range(540, 540, 1020));
        assert!(!in_range(1020, 540, 1020));
        // Overnight range 22:00-02:00
        assert!(in_range(1380, 1320, 120));
        assert!(in_range(60, 1320, 120));
        assert!(!in_range(600, 1320, 120));
    }

    #[test]
    fn test_time_range_overlap() {
        let a = TimeRange::new(540, 1020);
        let b = TimeRange::new(900, 1200);
        assert!(a.overlaps(&b));
        let c = TimeRange::new(1020, 1200); // touching, not overlapping
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_week_anchor_normalization() {
        // 2024-03-14 is a Thursday
        let thursday = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let monday = monday_of(thursday);
        assert_eq!(monday, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(monday_of(monday), monday);
        assert_eq!(day_of(thursday), Day::Thursday);
        assert_eq!(date_for(monday, Day::Sunday), NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
    }

    #[test]
    fn test_day_week_order() {
        let labels: Vec<_> = Day::WEEK.iter().map(|d| d.label()).collect();
        assert_eq!(labels[0], "Monday");
        assert_eq!(labels[6], "Sunday");
        assert_eq!(Day::Wednesday.offset(), 2);
    }

    #[test]
    fn test_day_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Day::Wednesday).unwrap(), "\"wednesday\"");
        let d: Day = serde_json::from_str("\"friday\"").unwrap();
        assert_eq!(d, Day::Friday);
    }
}
