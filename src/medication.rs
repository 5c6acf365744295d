use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::interval::{parse_frequency_hours, Frequency};
use crate::time::{parse_start_time, TimeOfDay};

/// A medication record as supplied by the medication store.
///
/// Read-only here: scheduling derives occurrences from it but never changes
/// it. Field names follow the store's JSON API; the original backend's
/// Spanish names are accepted too.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: u64,
    #[serde(alias = "nombre", default)]
    pub name: String,
    #[serde(alias = "cantidadMg", default)]
    pub dosage_mg: u32,
    /// Hours between doses, as a number or free text ("cada 6 horas")
    #[serde(alias = "frecuencia", default)]
    pub frequency: Frequency,
    /// First dose of each day, "HH:MM"
    #[serde(alias = "horaInicio", default)]
    pub start_time: Option<String>,
    #[serde(alias = "fechaInicio", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "fechaFin", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub consumed: bool,
}

impl Medication {
    /// Creates a medication with the given id and name, taken every
    /// `frequency_hours` from `start_time` each day, with no date bounds.
    pub fn new(id: u64, name: impl Into<String>, start_time: &str, frequency_hours: u32) -> Self {
        Self {
            id,
            name: name.into(),
            dosage_mg: 0,
            frequency: Frequency::from(frequency_hours),
            start_time: Some(start_time.to_string()),
            start_date: None,
            end_date: None,
            color: String::new(),
            consumed: false,
        }
    }

    pub fn with_dates(mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn with_dosage(mut self, dosage_mg: u32) -> Self {
        self.dosage_mg = dosage_mg;
        self
    }

    /// Hours between doses, always at least 1.
    pub fn frequency_hours(&self) -> u32 {
        parse_frequency_hours(&self.frequency)
    }

    /// Time of the first dose on each day.
    pub fn first_dose_time(&self) -> TimeOfDay {
        parse_start_time(self.start_time.as_deref())
    }

    /// Name and dosage for list views, e.g. "Ibuprofen - 400mg".
    pub fn display_name(&self) -> String {
        let name = if self.name.trim().is_empty() {
            "Unnamed medication"
        } else {
            self.name.as_str()
        };
        format!("{} - {}mg", name, self.dosage_mg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_record() {
        let json = r##"{
            "id": 7,
            "name": "Amoxicillin",
            "dosageMg": 500,
            "frequency": "cada 8 horas",
            "startTime": "07:30",
            "startDate": "2024-03-01",
            "endDate": "2024-03-10",
            "color": "#ff0000"
        }"##;
        let med: Medication = serde_json::from_str(json).unwrap();
        assert_eq!(med.id, 7);
        assert_eq!(med.frequency_hours(), 8);
        assert_eq!(med.first_dose_time().to_string(), "07:30");
        assert_eq!(med.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(med.end_date, NaiveDate::from_ymd_opt(2024, 3, 10));
        assert!(!med.consumed);
    }

    #[test]
    fn test_deserialize_backend_names() {
        let json = r#"{
            "id": 1,
            "nombre": "Ibuprofeno",
            "cantidadMg": 400,
            "frecuencia": 6,
            "horaInicio": "22:00",
            "fechaInicio": "2024-01-01",
            "fechaFin": "2024-01-03",
            "color": "blue",
            "consumed": true
        }"#;
        let med: Medication = serde_json::from_str(json).unwrap();
        assert_eq!(med.name, "Ibuprofeno");
        assert_eq!(med.dosage_mg, 400);
        assert_eq!(med.frequency_hours(), 6);
        assert!(med.consumed);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let med: Medication = serde_json::from_str(r#"{ "id": 3 }"#).unwrap();
        assert_eq!(med.frequency_hours(), 6);
        assert_eq!(med.first_dose_time().to_string(), "08:00");
        assert_eq!(med.start_date, None);
        assert_eq!(med.end_date, None);
    }

    #[test]
    fn test_display_name() {
        let med = Medication::new(1, "Ibuprofen", "08:00", 8).with_dosage(400);
        assert_eq!(med.display_name(), "Ibuprofen - 400mg");
        let unnamed = Medication::new(2, "  ", "08:00", 8);
        assert_eq!(unnamed.display_name(), "Unnamed medication - 0mg");
    }
}
