//! Day-boundary rotation and retention sweep

use crate::destination::LogDestination;
use crate::sink::LogSink;
use chrono::{Local, NaiveDate, Timelike};
use idbot_core::constants;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Rotation and retention settings
#[derive(Debug, Clone)]
pub struct RotationConfig {
    /// Directory the scheduler rotates and sweeps
    pub log_dir: PathBuf,
    /// Time between scheduler ticks
    pub tick_interval: Duration,
    /// Log files older than this many days are deleted
    pub retention_days: i64,
    /// Minutes after local midnight during which the sweep may run
    pub sweep_window_mins: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            log_dir: constants::logs_dir(),
            tick_interval: Duration::from_secs(constants::DEFAULT_ROTATION_TICK_SECS),
            retention_days: constants::DEFAULT_RETENTION_DAYS,
            sweep_window_mins: constants::DEFAULT_SWEEP_WINDOW_MINS,
        }
    }
}

/// Background task that keeps the sink's destination on today's file and
/// applies the retention policy once a day.
///
/// The scheduler is the sole mutator of the sink's destination. Each tick
/// runs the rotation check, then the sweep if the time falls inside the
/// post-midnight window. The window gate bounds the sweep to roughly once per
/// day without persisted state; deletion is idempotent, so a missed or
/// repeated window is harmless.
pub struct RotationScheduler {
    sink: LogSink,
    config: RotationConfig,
    shutdown_rx: broadcast::Receiver<()>,
}

impl RotationScheduler {
    pub fn new(
        sink: LogSink,
        config: RotationConfig,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            sink,
            config,
            shutdown_rx,
        }
    }

    /// Spawn the scheduler loop on the runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // An interval fires immediately; swallow that first tick so startup
        // does not re-check a destination opened moments ago.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Local::now();
                    self.check_rotation(now.date_naive());
                    if within_sweep_window(now.hour(), now.minute(), self.config.sweep_window_mins) {
                        sweep_old_logs(&self.config.log_dir, now.date_naive(), self.config.retention_days);
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    debug!("rotation scheduler stopped");
                    break;
                }
            }
        }
    }

    /// Rotate if the active file was last written on a day before `today`.
    ///
    /// A stat failure skips this tick; the next tick retries. If today's file
    /// cannot be opened the old destination stays installed, since logging to
    /// yesterday's file beats having no destination at all.
    fn check_rotation(&self, today: NaiveDate) {
        let file_date = match self.sink.modified_date() {
            Ok(date) => date,
            Err(e) => {
                warn!("cannot stat current log file, skipping rotation: {}", e);
                return;
            }
        };

        if file_date == today {
            return;
        }

        info!("date changed, rotating log file");
        match LogDestination::open(&self.config.log_dir, today) {
            Ok(destination) => self.sink.install(destination),
            Err(e) => warn!("failed to open log file for {}: {}", today, e),
        }
    }
}

/// True when `hour:minute` falls within the first `window_mins` after midnight.
fn within_sweep_window(hour: u32, minute: u32, window_mins: u32) -> bool {
    hour == 0 && minute < window_mins
}

/// Delete log files whose embedded date is more than `retention_days` before
/// `today`.
///
/// Only names matching `bot-YYYY-MM-DD.log` are candidates; anything else,
/// including names with unparsable dates, is left untouched. A single
/// deletion failure is logged and the sweep continues. The sweep keeps no
/// state between runs, so running it again is a no-op until new files age out.
pub fn sweep_old_logs(log_dir: &Path, today: NaiveDate, retention_days: i64) {
    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot read log directory {}: {}", log_dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let date = match path.file_name().and_then(|n| n.to_str()).and_then(parse_log_date) {
            Some(date) => date,
            None => continue,
        };
        if today.signed_duration_since(date).num_days() > retention_days {
            match std::fs::remove_file(&path) {
                Ok(()) => info!("deleted old log: {}", path.display()),
                Err(e) => warn!("failed to delete {}: {}", path.display(), e),
            }
        }
    }
}

/// Extract the date from a `bot-YYYY-MM-DD.log` file name.
fn parse_log_date(name: &str) -> Option<NaiveDate> {
    let date_str = name
        .strip_prefix(constants::LOG_FILE_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".log")?;
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}
