//! Errors raised at the edges of medcal (data file, CLI input, output).
//!
//! The scheduling core never fails: malformed medication fields fall back to
//! defaults. Only reading the medication list and user-typed arguments can
//! produce these.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The medication file exists but could not be read.
    #[error("failed to read medications file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The medication file is not a list of medications in any accepted shape.
    #[error("medications file {} cannot be parsed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid time '{0}' (expected HH:MM, an hour, or a name like 'morning')")]
    InvalidTime(String),
}
