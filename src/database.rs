//! Read-only access to the medication list kept by the medication store.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::medication::Medication;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MedicationDatabase {
    /// `items` is the store API's list envelope
    #[serde(alias = "items")]
    pub medications: Vec<Medication>,
}

/// Loads the medication database from `path`.
///
/// Accepts `{ "medications": [...] }`, the API envelope
/// `{ "items": [...], "total": n }`, or a bare array. A missing file is an
/// empty database; an unreadable or unparsable one is an error.
pub fn load_database(path: &Path) -> Result<MedicationDatabase> {
    if !path.exists() {
        debug!(path = %path.display(), "no medications file, starting empty");
        return Ok(MedicationDatabase::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let db = match serde_json::from_str::<MedicationDatabase>(&contents) {
        Ok(db) => db,
        Err(envelope_err) => match serde_json::from_str::<Vec<Medication>>(&contents) {
            Ok(medications) => MedicationDatabase { medications },
            // Report why the object form failed unless the file is clearly an array.
            Err(list_err) => {
                let source = if contents.trim_start().starts_with('[') {
                    list_err
                } else {
                    envelope_err
                };
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    source,
                });
            }
        },
    };

    info!(
        path = %path.display(),
        count = db.medications.len(),
        "loaded medications"
    );
    Ok(db)
}

/// Loads only the medication list.
pub fn load_medications(path: &Path) -> Result<Vec<Medication>> {
    Ok(load_database(path)?.medications)
}
