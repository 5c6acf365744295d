//! Per-day agenda: every dose on one date, grouped by time of day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::medication::Medication;
use crate::schedule::doses_on;
use crate::time::TimeOfDay;

/// A medication as it appears at one slot of the timeline.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMedication {
    #[serde(flatten)]
    pub medication: Medication,
    pub display_time: TimeOfDay,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimeGroup {
    pub time: TimeOfDay,
    pub medications: Vec<ScheduledMedication>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub groups: Vec<TimeGroup>,
    /// Number of doses across all groups; a medication counts once per slot.
    pub total_doses: usize,
}

/// Group every dose on `target` by time.
///
/// Groups come out in ascending time order with one group per distinct time.
/// Within a group, medications keep the order of `medications`.
pub fn group_by_time(target: NaiveDate, medications: &[Medication]) -> Vec<TimeGroup> {
    let mut by_time: BTreeMap<TimeOfDay, Vec<ScheduledMedication>> = BTreeMap::new();

    for medication in medications {
        for dose in doses_on(medication, target) {
            by_time
                .entry(dose.time)
                .or_default()
                .push(ScheduledMedication {
                    medication: medication.clone(),
                    display_time: dose.time,
                });
        }
    }

    by_time
        .into_iter()
        .map(|(time, medications)| TimeGroup { time, medications })
        .collect()
}

pub fn build_day_schedule(target: NaiveDate, medications: &[Medication]) -> DaySchedule {
    let groups = group_by_time(target, medications);
    let total_doses = groups.iter().map(|g| g.medications.len()).sum();
    DaySchedule {
        date: target,
        groups,
        total_doses,
    }
}

/// The group at exactly `time` on `target`; empty if nothing is due then.
pub fn group_at(target: NaiveDate, time: TimeOfDay, medications: &[Medication]) -> TimeGroup {
    group_by_time(target, medications)
        .into_iter()
        .find(|g| g.time == time)
        .unwrap_or(TimeGroup {
            time,
            medications: Vec::new(),
        })
}
