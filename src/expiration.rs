//! Expiration status of medications relative to a given "today".
//!
//! Every medication lands in exactly one of three buckets:
//!
//! - `active`: no end date, or more than [`EXPIRING_SOON_DAYS`] days left
//! - `expiring-soon`: end date in the future, at most [`EXPIRING_SOON_DAYS`] days away
//! - `expired`: end date is today or earlier
//!
//! All comparisons are date-only.

use std::cmp::Ordering;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::medication::Medication;

/// Days remaining at which an active medication starts counting as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 7;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ExpirationStatus {
    Active,
    ExpiringSoon,
    Expired,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub is_active: bool,
    pub is_expired: bool,
    pub expiration_status: ExpirationStatus,
    /// Whole days from today to the end date; negative once expired.
    pub days_until_expiration: Option<i64>,
}

/// Classify an end date against `today`.
pub fn classify(end_date: Option<NaiveDate>, today: NaiveDate) -> Classification {
    let Some(end) = end_date else {
        return Classification {
            is_active: true,
            is_expired: false,
            expiration_status: ExpirationStatus::Active,
            days_until_expiration: None,
        };
    };

    let days = (end - today).num_days();

    if end > today {
        let expiration_status = if (0..=EXPIRING_SOON_DAYS).contains(&days) {
            ExpirationStatus::ExpiringSoon
        } else {
            ExpirationStatus::Active
        };
        Classification {
            is_active: true,
            is_expired: false,
            expiration_status,
            days_until_expiration: Some(days),
        }
    } else {
        Classification {
            is_active: false,
            is_expired: true,
            expiration_status: ExpirationStatus::Expired,
            days_until_expiration: Some(days),
        }
    }
}

/// A medication with its derived scheduling and status fields.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedMedication {
    #[serde(flatten)]
    pub medication: Medication,
    pub frequency_hours: u32,
    pub display_name: String,
    #[serde(flatten)]
    pub classification: Classification,
}

impl AnnotatedMedication {
    pub fn annotate(medication: &Medication, today: NaiveDate) -> Self {
        Self {
            frequency_hours: medication.frequency_hours(),
            display_name: medication.display_name(),
            classification: classify(medication.end_date, today),
            medication: medication.clone(),
        }
    }

    pub fn status(&self) -> ExpirationStatus {
        self.classification.expiration_status
    }

    pub fn days_until_expiration(&self) -> Option<i64> {
        self.classification.days_until_expiration
    }
}

pub fn annotate_all(medications: &[Medication], today: NaiveDate) -> Vec<AnnotatedMedication> {
    medications
        .iter()
        .map(|m| AnnotatedMedication::annotate(m, today))
        .collect()
}

/// Medications sharing one expiration status.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatusGroup {
    pub status: ExpirationStatus,
    pub medications: Vec<AnnotatedMedication>,
    pub count: usize,
}

/// Groups medications as active, expiring soon, then expired.
///
/// Empty groups are left out; input order is kept inside each group.
pub fn group_by_status(medications: &[AnnotatedMedication]) -> Vec<StatusGroup> {
    [
        ExpirationStatus::Active,
        ExpirationStatus::ExpiringSoon,
        ExpirationStatus::Expired,
    ]
    .into_iter()
    .map(|status| {
        let members: Vec<AnnotatedMedication> = medications
            .iter()
            .filter(|m| m.status() == status)
            .cloned()
            .collect();
        StatusGroup {
            status,
            count: members.len(),
            medications: members,
        }
    })
    .filter(|group| group.count > 0)
    .collect()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MedicationStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub expiring_soon: usize,
}

/// Counts for a dashboard summary. `active` includes the expiring-soon ones.
pub fn stats(medications: &[AnnotatedMedication]) -> MedicationStats {
    MedicationStats {
        total: medications.len(),
        active: medications
            .iter()
            .filter(|m| m.classification.is_active)
            .count(),
        expired: medications
            .iter()
            .filter(|m| m.classification.is_expired)
            .count(),
        expiring_soon: medications
            .iter()
            .filter(|m| m.status() == ExpirationStatus::ExpiringSoon)
            .count(),
    }
}

/// Medications ending within the next `days` days (today excluded).
pub fn expiring_within(medications: &[AnnotatedMedication], days: i64) -> Vec<&AnnotatedMedication> {
    medications
        .iter()
        .filter(|m| matches!(m.days_until_expiration(), Some(d) if d > 0 && d <= days))
        .collect()
}

/// Case-insensitive substring match on name, dosage, color or display name.
pub fn matches_search(medication: &AnnotatedMedication, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    let med = &medication.medication;
    med.name.to_lowercase().contains(&term)
        || med.dosage_mg.to_string().contains(&term)
        || med.color.to_lowercase().contains(&term)
        || medication.display_name.to_lowercase().contains(&term)
}

/// Medications matching `term`; a blank term matches everything.
pub fn search<'a>(medications: &'a [AnnotatedMedication], term: &str) -> Vec<&'a AnnotatedMedication> {
    medications
        .iter()
        .filter(|m| matches_search(m, term))
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    Name,
    Dosage,
    Frequency,
    StartDate,
    EndDate,
    /// Days until expiration
    Expiration,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Missing values go last in either order.
fn compare_present<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
    }
}

/// Stable sort by one field. Names compare case-insensitively.
pub fn sort_by(medications: &mut [&AnnotatedMedication], field: SortField, order: SortOrder) {
    medications.sort_by(|a, b| match field {
        SortField::Name => compare_present(
            Some(a.medication.name.to_lowercase()),
            Some(b.medication.name.to_lowercase()),
            order,
        ),
        SortField::Dosage => compare_present(
            Some(a.medication.dosage_mg),
            Some(b.medication.dosage_mg),
            order,
        ),
        SortField::Frequency => {
            compare_present(Some(a.frequency_hours), Some(b.frequency_hours), order)
        }
        SortField::StartDate => {
            compare_present(a.medication.start_date, b.medication.start_date, order)
        }
        SortField::EndDate => compare_present(a.medication.end_date, b.medication.end_date, order),
        SortField::Expiration => {
            compare_present(a.days_until_expiration(), b.days_until_expiration(), order)
        }
    });
}
