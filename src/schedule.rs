//! Dose occurrences for a medication on a calendar date.
//!
//! A medication is taken at its start time and then every `frequency_hours`
//! until the end of the day; each day restarts at the start time. The first
//! dose that would fall past midnight is carried over to the next day as a
//! single "rollover" dose, provided the medication is still valid then.
//!
//! [`doses_on`] is what the week and timeline views use: it attributes
//! rollover doses to the day they actually happen on.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::medication::Medication;
use crate::time::TimeOfDay;

const HOURS_PER_DAY: u32 = 24;

/// One scheduled dose of one medication.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DoseOccurrence {
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub medication_id: u64,
    pub medication_name: String,
}

/// Whether `medication` applies on `date`.
///
/// Start and end dates are both inclusive; a missing bound is open.
pub fn is_valid_on(medication: &Medication, date: NaiveDate) -> bool {
    if medication.start_date.is_some_and(|start| date < start) {
        return false;
    }
    if medication.end_date.is_some_and(|end| date > end) {
        return false;
    }
    true
}

/// Doses produced by the schedule starting on `date`.
///
/// Returns the day's own doses in increasing time order, followed by at most
/// one rollover dose dated the day after. The caller is expected to have
/// checked [`is_valid_on`] for `date`.
pub fn generate_doses(medication: &Medication, date: NaiveDate) -> Vec<DoseOccurrence> {
    let start = medication.first_dose_time();
    let frequency = medication.frequency_hours();
    let minute = start.minute();

    let occurrence = |date: NaiveDate, hour: u32| -> Option<DoseOccurrence> {
        Some(DoseOccurrence {
            date,
            time: TimeOfDay::new(hour, minute)?,
            medication_id: medication.id,
            medication_name: medication.name.clone(),
        })
    };

    let mut doses = Vec::new();
    let mut hour = start.hour();
    while hour < HOURS_PER_DAY {
        doses.extend(occurrence(date, hour));
        hour = hour.saturating_add(frequency);
    }

    // Once-a-day (or rarer) schedules never roll over.
    if frequency >= HOURS_PER_DAY {
        return doses;
    }

    let rollover_hour = hour - HOURS_PER_DAY;
    if rollover_hour == start.hour() {
        // Same slot as the next day's own first dose.
        debug!(
            medication_id = medication.id,
            %date,
            "rollover coincides with next day's first dose"
        );
        return doses;
    }

    if let Some(next_day) = date.checked_add_days(Days::new(1)) {
        if is_valid_on(medication, next_day) {
            doses.extend(occurrence(next_day, rollover_hour));
        }
    }

    doses
}

/// Every dose `medication` contributes to `date`, ordered by time.
///
/// Combines the day's own schedule with a rollover dose carried over from
/// the previous day. Empty when the medication isn't valid on `date`.
pub fn doses_on(medication: &Medication, date: NaiveDate) -> Vec<DoseOccurrence> {
    if !is_valid_on(medication, date) {
        return Vec::new();
    }

    let mut doses: Vec<DoseOccurrence> = Vec::new();

    if let Some(previous_day) = date.checked_sub_days(Days::new(1)) {
        if is_valid_on(medication, previous_day) {
            doses.extend(
                generate_doses(medication, previous_day)
                    .into_iter()
                    .filter(|d| d.date == date),
            );
        }
    }

    doses.extend(
        generate_doses(medication, date)
            .into_iter()
            .filter(|d| d.date == date),
    );

    doses.sort_by_key(|d| d.time);
    doses
}
