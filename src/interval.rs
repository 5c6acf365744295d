use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Interval used when a frequency can't be read.
pub const DEFAULT_FREQUENCY_HOURS: u32 = 6;

/// Raw frequency as it arrives from the medication store: either a number of
/// hours or free text such as "every 8 hours" / "cada 6 horas".
///
/// Any other JSON value (`null`, booleans, objects) lands in `Other` so one
/// bad record doesn't make the whole file unreadable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Frequency {
    Hours(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Hours(DEFAULT_FREQUENCY_HOURS as f64)
    }
}

impl From<u32> for Frequency {
    fn from(hours: u32) -> Self {
        Frequency::Hours(hours as f64)
    }
}

impl From<&str> for Frequency {
    fn from(text: &str) -> Self {
        Frequency::Text(text.to_string())
    }
}

/// First run of digits in a free-text frequency.
static RE_HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Parse a medication frequency into the number of hours between doses.
///
/// Supported inputs:
/// - numbers: `6` -> 6, `8.5` -> 8 (fractional hours are floored)
/// - text: the first integer found is used, "every 8 hours" -> 8,
///   "cada 12 horas" -> 12, "q4h" -> 4
///
/// Anything unusable (no digits, zero, negative, below one hour, NaN,
/// overflow) falls back to [`DEFAULT_FREQUENCY_HOURS`], so the result is
/// always at least 1.
pub fn parse_frequency_hours(frequency: &Frequency) -> u32 {
    match frequency {
        Frequency::Hours(hours) => {
            if hours.is_finite() && *hours >= 1.0 && *hours <= u32::MAX as f64 {
                hours.floor() as u32
            } else {
                DEFAULT_FREQUENCY_HOURS
            }
        }
        Frequency::Text(text) => RE_HOURS
            .find(text)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_FREQUENCY_HOURS),
        Frequency::Other(_) => DEFAULT_FREQUENCY_HOURS,
    }
}
