use std::path::PathBuf;

/// Environment variable overriding the medications file location.
pub const DATA_FILE_ENV: &str = "MEDCAL_DATA";

/// Seconds between daemon checks.
pub const POLL_INTERVAL_SECS: u64 = 60;

/// How long after its scheduled time a dose is still worth a reminder.
pub const REMINDER_WINDOW_MINUTES: u32 = 30;

/// Returns the path to the medications file.
///
/// `MEDCAL_DATA` wins if set; otherwise `~/.medcal.json`, falling back to
/// `./.medcal.json` if no home directory is found.
pub fn data_file() -> PathBuf {
    if let Some(path) = std::env::var_os(DATA_FILE_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".medcal.json")
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medcal=info"
}
