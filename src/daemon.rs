use std::collections::HashSet;
use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveTime};
use notify_rust::Notification;
use tracing::{info, warn};

use crate::config::{POLL_INTERVAL_SECS, REMINDER_WINDOW_MINUTES};
use crate::database::load_medications;
use crate::medication::Medication;
use crate::time::{is_time_due, TimeOfDay};
use crate::timeline::group_by_time;

/// A dose that should be announced now.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub medication_id: u64,
    pub title: String,
}

/// `(medication_id, dose date, dose time)` of an announced dose.
pub type NotifiedKey = (u64, NaiveDate, TimeOfDay);

/// Doses that have just come due and haven't been announced.
///
/// Looks at `today` and, for doses late the evening before, at yesterday,
/// so a dose keeps its full reminder window across midnight. Medications
/// already marked consumed are skipped.
pub fn due_reminders(
    medications: &[Medication],
    today: NaiveDate,
    now: NaiveTime,
    notified: &HashSet<NotifiedKey>,
) -> Vec<Reminder> {
    let days = [(today.pred_opt(), 1), (Some(today), 0)];

    days.into_iter()
        .filter_map(|(date, days_ago)| date.map(|date| (date, days_ago)))
        .flat_map(|(date, days_ago)| {
            group_by_time(date, medications)
                .into_iter()
                .filter(move |group| {
                    is_time_due(group.time, days_ago, now, REMINDER_WINDOW_MINUTES)
                })
                .flat_map(|group| group.medications)
                .map(move |entry| (date, entry))
        })
        .filter(|(_, entry)| !entry.medication.consumed)
        .filter(|(date, entry)| !notified.contains(&(entry.medication.id, *date, entry.display_time)))
        .map(|(date, entry)| Reminder {
            date,
            time: entry.display_time,
            medication_id: entry.medication.id,
            title: entry.medication.display_name(),
        })
        .collect()
}

pub fn run_daemon(data_file: &Path) {
    info!(path = %data_file.display(), "daemon started, checking for dose reminders");
    println!("Daemon started. Checking for medication reminders...");
    println!("Press Ctrl+C to stop.");

    let mut notified: HashSet<NotifiedKey> = HashSet::new();
    let mut current_day = Local::now().date_naive();

    loop {
        let now = Local::now();
        let today = now.date_naive();

        if today != current_day {
            // yesterday's entries still guard its late doses
            let yesterday = today.pred_opt();
            notified.retain(|(_, date, _)| yesterday.map_or(true, |y| *date >= y));
            current_day = today;
            info!(%today, "new day, reminder state pruned");
        }

        // Reload every tick so edits made by the store are picked up.
        let meds = match load_medications(data_file) {
            Ok(meds) => meds,
            Err(e) => {
                warn!("skipping check: {}", e);
                thread::sleep(Duration::from_secs(POLL_INTERVAL_SECS));
                continue;
            }
        };

        for reminder in due_reminders(&meds, today, now.time(), &notified) {
            let result = Notification::new()
                .summary("Medication Reminder")
                .body(&format!(
                    "Time to take: {}\nScheduled for: {}",
                    reminder.title, reminder.time
                ))
                .icon("medication")
                .timeout(0) // Don't auto-dismiss
                .show();

            match result {
                Ok(_) => {
                    notified.insert((reminder.medication_id, reminder.date, reminder.time));
                    info!(
                        medication_id = reminder.medication_id,
                        time = %reminder.time,
                        "reminder sent: {}",
                        reminder.title
                    );
                }
                Err(e) => {
                    warn!(
                        medication_id = reminder.medication_id,
                        "failed to send notification for {}: {}",
                        reminder.title,
                        e
                    );
                }
            }
        }

        thread::sleep(Duration::from_secs(POLL_INTERVAL_SECS));
    }
}
