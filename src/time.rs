use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Time of day used when a medication has no usable start time.
pub const DEFAULT_START_TIME: TimeOfDay = TimeOfDay { hour: 8, minute: 0 };

/// A wall-clock time with minute precision.
///
/// Always valid (`hour < 24`, `minute < 60`). Displays and serializes as
/// zero-padded `HH:MM`, so ordering by value and ordering by the rendered
/// string agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    /// Returns `None` if the hour or minute is out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }

    /// Minutes since midnight.
    pub fn to_minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s).ok_or_else(|| Error::InvalidTime(s.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse time string in HH:MM format or named time (morning, noon, etc.)
/// Accepts flexible formats:
/// - Named times: "morning", "noon", "evening", etc.
/// - HH:MM format: "08:00", "8:00", "8:5" (with or without leading zeros)
/// - Hour only: "8", "08" (defaults to :00)
pub fn parse_time(time_str: &str) -> Option<TimeOfDay> {
    let trimmed = time_str.trim();

    let time_lower = trimmed.to_lowercase();
    let named_time = match time_lower.as_str() {
        "morning" | "breakfast" => Some((8, 0)),
        "midmorning" | "mid-morning" => Some((10, 0)),
        "noon" | "midday" | "lunch" => Some((12, 0)),
        "afternoon" => Some((15, 0)),
        "evening" | "dinner" => Some((18, 0)),
        "night" | "bedtime" => Some((21, 0)),
        "midnight" => Some((0, 0)),
        _ => None,
    };

    if let Some((hour, minute)) = named_time {
        return TimeOfDay::new(hour, minute);
    }

    if trimmed.contains(':') {
        return parse_clock(trimmed);
    }

    // "8" means "08:00"
    let hour = trimmed.parse::<u32>().ok()?;
    TimeOfDay::new(hour, 0)
}

/// Strict `HH:MM` (leading zeros optional), no names or bare hours.
pub fn parse_clock(time_str: &str) -> Option<TimeOfDay> {
    let (hour, minute) = time_str.trim().split_once(':')?;
    if minute.contains(':') {
        return None;
    }
    let hour = hour.trim().parse::<u32>().ok()?;
    let minute = minute.trim().parse::<u32>().ok()?;
    TimeOfDay::new(hour, minute)
}

/// Start time of a medication's daily schedule.
///
/// Only `HH:MM` is read here; the named times and bare hours that
/// [`parse_time`] takes from the command line are not. Missing or
/// unreadable values fall back to [`DEFAULT_START_TIME`].
pub fn parse_start_time(start_time: Option<&str>) -> TimeOfDay {
    start_time.and_then(parse_clock).unwrap_or(DEFAULT_START_TIME)
}

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Check if `now` is at or past `scheduled`, but by less than `window_minutes`.
///
/// `days_ago` is how many days before `now`'s date the dose is dated, so a
/// 23:50 dose from yesterday is still due at 00:10.
pub fn is_time_due(scheduled: TimeOfDay, days_ago: u32, now: NaiveTime, window_minutes: u32) -> bool {
    let now = days_ago
        .saturating_mul(MINUTES_PER_DAY)
        .saturating_add(TimeOfDay::from_naive_time(now).to_minutes());
    let scheduled = scheduled.to_minutes();
    now >= scheduled && now - scheduled < window_minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32, minute: u32) -> Option<TimeOfDay> {
        TimeOfDay::new(hour, minute)
    }

    #[test]
    fn test_parse_time_named() {
        assert_eq!(parse_time("morning"), t(8, 0));
        assert_eq!(parse_time("MORNING"), t(8, 0));
        assert_eq!(parse_time("noon"), t(12, 0));
        assert_eq!(parse_time("evening"), t(18, 0));
        assert_eq!(parse_time("bedtime"), t(21, 0));
        assert_eq!(parse_time("midnight"), t(0, 0));
        assert_eq!(parse_time("mid-morning"), t(10, 0));
    }

    #[test]
    fn test_parse_time_hhmm_format() {
        assert_eq!(parse_time("08:00"), t(8, 0));
        assert_eq!(parse_time("14:30"), t(14, 30));
        assert_eq!(parse_time("23:59"), t(23, 59));
        assert_eq!(parse_time("00:00"), t(0, 0));
        assert_eq!(parse_time("8:5"), t(8, 5));
        assert_eq!(parse_time("  14:30  "), t(14, 30));
    }

    #[test]
    fn test_parse_time_hour_only() {
        assert_eq!(parse_time("8"), t(8, 0));
        assert_eq!(parse_time("0"), t(0, 0));
        assert_eq!(parse_time(" 23 "), t(23, 0));
    }

    #[test]
    fn test_parse_time_invalid() {
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("24"), None);
        assert_eq!(parse_time("8:60"), None);
        assert_eq!(parse_time("garbage"), None);
        assert_eq!(parse_time("8:30:00"), None);
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time(":30"), None);
        assert_eq!(parse_time("8:"), None);
    }

    #[test]
    fn test_start_time_defaults() {
        assert_eq!(parse_start_time(None), DEFAULT_START_TIME);
        assert_eq!(parse_start_time(Some("")), DEFAULT_START_TIME);
        assert_eq!(parse_start_time(Some("25:00")), DEFAULT_START_TIME);
        assert_eq!(parse_start_time(Some("22:15")), TimeOfDay::new(22, 15).unwrap());
        assert_eq!(parse_start_time(Some("7:05")), TimeOfDay::new(7, 5).unwrap());
        // named times and bare hours are only for typed arguments
        assert_eq!(parse_start_time(Some("noon")), DEFAULT_START_TIME);
        assert_eq!(parse_start_time(Some("bedtime")), DEFAULT_START_TIME);
        assert_eq!(parse_start_time(Some("14")), DEFAULT_START_TIME);
        assert_eq!(DEFAULT_START_TIME.to_string(), "08:00");
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(TimeOfDay::new(2, 5).unwrap().to_string(), "02:05");
        assert_eq!(TimeOfDay::new(14, 0).unwrap().to_string(), "14:00");
    }

    #[test]
    fn test_order_matches_string_order() {
        let times = ["00:00", "02:30", "08:00", "09:59", "10:00", "23:59"];
        for pair in times.windows(2) {
            let a: TimeOfDay = pair[0].parse().unwrap();
            let b: TimeOfDay = pair[1].parse().unwrap();
            assert!(a < b);
            assert!(a.to_string() < b.to_string());
        }
    }

    #[test]
    fn test_serde_as_string() {
        let time = TimeOfDay::new(6, 30).unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"06:30\"");
        let back: TimeOfDay = serde_json::from_str("\"6:30\"").unwrap();
        assert_eq!(back, time);
        assert!(serde_json::from_str::<TimeOfDay>("\"99:00\"").is_err());
    }

    #[test]
    fn test_is_time_due() {
        let dose = TimeOfDay::new(8, 0).unwrap();
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert!(!is_time_due(dose, 0, at(7, 59), 30));
        assert!(is_time_due(dose, 0, at(8, 0), 30));
        assert!(is_time_due(dose, 0, at(8, 29), 30));
        assert!(!is_time_due(dose, 0, at(8, 30), 30));
        assert!(!is_time_due(dose, 0, at(20, 0), 30));
    }

    #[test]
    fn test_is_time_due_across_midnight() {
        let late = TimeOfDay::new(23, 45).unwrap();
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert!(is_time_due(late, 0, at(23, 59), 30));
        assert!(is_time_due(late, 1, at(0, 10), 30));
        assert!(!is_time_due(late, 1, at(0, 15), 30));
        assert!(!is_time_due(late, 0, at(0, 10), 30));
        assert!(!is_time_due(TimeOfDay::new(0, 5).unwrap(), 1, at(0, 10), 30));
    }
}
