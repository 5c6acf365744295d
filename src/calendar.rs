//! Calendar views: a Monday-first week strip and a month grid.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::medication::Medication;
use crate::schedule::{doses_on, DoseOccurrence};

/// One day cell of a calendar view.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_number: u32,
    /// Short English weekday name, "Mon".."Sun"
    pub day_name: String,
    pub is_today: bool,
    /// False for days of a neighbouring month shown in the same strip
    pub is_current_month: bool,
    pub doses: Vec<DoseOccurrence>,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

pub fn previous_week(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(7)).unwrap_or(date)
}

pub fn next_week(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(7)).unwrap_or(date)
}

/// All doses on `date` across `medications`, in time order.
///
/// Medications keep their list order when two doses share a time.
fn doses_for_day(date: NaiveDate, medications: &[Medication]) -> Vec<DoseOccurrence> {
    let mut doses: Vec<DoseOccurrence> = medications
        .iter()
        .flat_map(|med| doses_on(med, date))
        .collect();
    doses.sort_by_key(|d| d.time);
    doses
}

fn calendar_day(
    date: NaiveDate,
    reference: NaiveDate,
    today: NaiveDate,
    medications: &[Medication],
) -> CalendarDay {
    CalendarDay {
        date,
        day_number: date.day(),
        day_name: date.format("%a").to_string(),
        is_today: date == today,
        is_current_month: date.month() == reference.month(),
        doses: doses_for_day(date, medications),
    }
}

/// The seven days (Monday to Sunday) of the week containing `reference`.
///
/// `today` only drives the `is_today` flag.
pub fn build_week(
    reference: NaiveDate,
    medications: &[Medication],
    today: NaiveDate,
) -> Vec<CalendarDay> {
    let monday = week_start(reference);
    monday
        .iter_days()
        .take(7)
        .map(|date| calendar_day(date, reference, today, medications))
        .collect()
}

/// A month laid out for a Sunday-first grid.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st (0 when the month starts on a Sunday)
    pub leading_days: u32,
    pub days: Vec<CalendarDay>,
}

pub fn build_month(reference: NaiveDate, medications: &[Medication], today: NaiveDate) -> MonthView {
    let first = reference.with_day(1).unwrap_or(reference);
    let days = first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .map(|date| calendar_day(date, reference, today, medications))
        .collect();

    MonthView {
        year: first.year(),
        month: first.month(),
        leading_days: first.weekday().num_days_from_sunday(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start() {
        // 2024-01-03 is a Wednesday
        assert_eq!(week_start(date(2024, 1, 3)), date(2024, 1, 1));
        assert_eq!(week_start(date(2024, 1, 1)), date(2024, 1, 1));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 1));
        assert_eq!(week_start(date(2024, 1, 8)), date(2024, 1, 8));
    }

    #[test]
    fn test_week_span_across_boundaries() {
        let references = [
            date(2024, 2, 29),
            date(2024, 3, 1),
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2020, 2, 29),
            date(2021, 1, 3),
            date(2024, 6, 15),
        ];
        for reference in references {
            let week = build_week(reference, &[], reference);
            assert_eq!(week.len(), 7);
            assert_eq!(week[0].date.weekday(), Weekday::Mon);
            assert_eq!(week[0].day_name, "Mon");
            assert_eq!(week[6].day_name, "Sun");
            for pair in week.windows(2) {
                assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
            }
            assert!(week.iter().any(|d| d.date == reference));
        }
    }

    #[test]
    fn test_week_flags() {
        // Wed 2024-01-31; the strip runs Mon 29 Jan .. Sun 4 Feb
        let reference = date(2024, 1, 31);
        let today = date(2024, 2, 2);
        let week = build_week(reference, &[], today);

        let numbers: Vec<u32> = week.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![29, 30, 31, 1, 2, 3, 4]);
        let in_month: Vec<bool> = week.iter().map(|d| d.is_current_month).collect();
        assert_eq!(in_month, vec![true, true, true, false, false, false, false]);
        let todays: Vec<NaiveDate> = week.iter().filter(|d| d.is_today).map(|d| d.date).collect();
        assert_eq!(todays, vec![today]);
    }

    #[test]
    fn test_week_attaches_rollover_to_following_day() {
        let med = Medication::new(1, "a", "22:00", 4)
            .with_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 3)));
        let week = build_week(date(2024, 1, 1), &[med], date(2024, 1, 1));

        let times = |i: usize| -> Vec<String> {
            week[i].doses.iter().map(|d| d.time.to_string()).collect()
        };
        assert_eq!(times(0), vec!["22:00"]);
        assert_eq!(times(1), vec!["02:00", "22:00"]);
        assert_eq!(times(2), vec!["02:00", "22:00"]);
        assert!(week[3].doses.is_empty());
        for day in &week {
            assert!(day.doses.iter().all(|d| d.date == day.date));
        }
    }

    #[test]
    fn test_week_orders_doses_across_medications() {
        let meds = vec![
            Medication::new(1, "b", "09:00", 24),
            Medication::new(2, "a", "08:00", 12),
            Medication::new(3, "c", "09:00", 24),
        ];
        let week = build_week(date(2024, 5, 8), &meds, date(2024, 5, 8));
        let day = &week[2];
        let order: Vec<(String, u64)> = day
            .doses
            .iter()
            .map(|d| (d.time.to_string(), d.medication_id))
            .collect();
        assert_eq!(
            order,
            vec![
                ("08:00".to_string(), 2),
                ("09:00".to_string(), 1),
                ("09:00".to_string(), 3),
                ("20:00".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_week_navigation() {
        assert_eq!(next_week(date(2024, 12, 30)), date(2025, 1, 6));
        assert_eq!(previous_week(date(2024, 3, 4)), date(2024, 2, 26));
    }

    #[test]
    fn test_build_month() {
        let view = build_month(date(2024, 2, 14), &[], date(2024, 2, 29));
        assert_eq!((view.year, view.month), (2024, 2));
        assert_eq!(view.days.len(), 29);
        // 2024-02-01 was a Thursday
        assert_eq!(view.leading_days, 4);
        assert!(view.days.iter().all(|d| d.is_current_month));
        assert!(view.days[28].is_today);

        let view = build_month(date(2023, 2, 1), &[], date(2024, 1, 1));
        assert_eq!(view.days.len(), 28);

        let view = build_month(date(2023, 12, 25), &[], date(2024, 1, 1));
        assert_eq!(view.days.len(), 31);
        assert_eq!(view.days[30].date, date(2023, 12, 31));
    }

    #[test]
    fn test_month_doses() {
        let med = Medication::new(1, "a", "08:00", 12)
            .with_dates(Some(date(2024, 4, 29)), Some(date(2024, 5, 2)));
        let view = build_month(date(2024, 4, 1), &[med], date(2024, 4, 1));
        let with_doses: Vec<u32> = view
            .days
            .iter()
            .filter(|d| !d.doses.is_empty())
            .map(|d| d.day_number)
            .collect();
        assert_eq!(with_doses, vec![29, 30]);
    }
}
