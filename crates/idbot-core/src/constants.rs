//! Constants and default values for idbot

use chrono::NaiveDate;
use std::path::PathBuf;

/// Log directory name, relative to the working directory
pub const LOGS_DIR: &str = "logs";

/// Prefix of daily log file names (`bot-YYYY-MM-DD.log`)
pub const LOG_FILE_PREFIX: &str = "bot";

/// Data directory name, relative to the working directory
pub const DATA_DIR: &str = "data";

/// User registry file name
pub const USERS_FILE: &str = "users.json";

/// Default rotation scheduler tick interval in seconds (10 minutes)
pub const DEFAULT_ROTATION_TICK_SECS: u64 = 600;

/// Default age in days beyond which log files are deleted
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

/// Default length of the post-midnight retention sweep window in minutes
pub const DEFAULT_SWEEP_WINDOW_MINS: u32 = 15;

/// Default long-polling timeout for getUpdates in seconds
pub const DEFAULT_POLL_TIMEOUT_SECS: u32 = 60;

/// Get the log directory
pub fn logs_dir() -> PathBuf {
    PathBuf::from(LOGS_DIR)
}

/// Get the user registry path
pub fn users_path() -> PathBuf {
    PathBuf::from(DATA_DIR).join(USERS_FILE)
}

/// Get the log file name for a calendar date
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{}-{}.log", LOG_FILE_PREFIX, date.format("%Y-%m-%d"))
}
