//! Active log file lifecycle

use chrono::{DateTime, Local, NaiveDate};
use idbot_core::{constants, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// An open, append-only log file bound to the calendar day it was opened for.
///
/// The on-disk name is always `bot-YYYY-MM-DD.log` for the destination's
/// date. The file handle is closed exactly once, when the destination is
/// dropped after a rotation swap or at process shutdown.
pub struct LogDestination {
    file: File,
    date: NaiveDate,
    path: PathBuf,
}

impl LogDestination {
    /// Open (or create) the log file for `date` under `dir` in append mode.
    pub fn open(dir: &Path, date: NaiveDate) -> Result<Self> {
        let path = dir.join(constants::log_file_name(date));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file, date, path })
    }

    /// Open today's log file (local calendar date).
    pub fn open_today(dir: &Path) -> Result<Self> {
        Self::open(dir, Local::now().date_naive())
    }

    /// The calendar date this destination was opened for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn file(&self) -> &File {
        &self.file
    }

    /// Calendar date of the file's last modification, in local time.
    ///
    /// Rotation compares this against today rather than the date captured at
    /// open time, so the check stays consistent with on-disk state across
    /// clock and timezone changes.
    pub fn modified_date(&self) -> Result<NaiveDate> {
        let mtime = self.file.metadata()?.modified()?;
        Ok(DateTime::<Local>::from(mtime).date_naive())
    }
}
