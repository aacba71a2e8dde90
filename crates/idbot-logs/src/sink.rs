//! Shared write target over the active log destination

use crate::destination::LogDestination;
use chrono::NaiveDate;
use idbot_core::Result;
use parking_lot::RwLock;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Process-wide handle to the active log destination plus a stdout mirror.
///
/// Cloning is cheap; all clones share the same destination. The rotation
/// scheduler is the only mutator (via [`LogSink::install`]); every other code
/// path just writes. Writers resolve the destination on each write, so a swap
/// takes effect for the very next line and no producer ever holds a file
/// handle that has already been closed.
#[derive(Clone)]
pub struct LogSink {
    current: Arc<RwLock<LogDestination>>,
    mirror_to_stdout: bool,
}

impl LogSink {
    pub fn new(destination: LogDestination) -> Self {
        Self {
            current: Arc::new(RwLock::new(destination)),
            mirror_to_stdout: true,
        }
    }

    /// Disable the stdout mirror. Tests use this to keep output quiet.
    pub fn without_mirror(mut self) -> Self {
        self.mirror_to_stdout = false;
        self
    }

    /// Swap in a new destination.
    ///
    /// Takes effect for all writes issued after this call returns. The
    /// previous destination is dropped (closing its file) only once the new
    /// one is visible, so there is no window without a valid target.
    pub fn install(&self, destination: LogDestination) {
        let previous = {
            let mut current = self.current.write();
            std::mem::replace(&mut *current, destination)
        };
        drop(previous);
    }

    /// Path of the currently active destination.
    pub fn current_path(&self) -> PathBuf {
        self.current.read().path().to_path_buf()
    }

    /// Modification date of the currently active destination's file.
    pub(crate) fn modified_date(&self) -> Result<NaiveDate> {
        self.current.read().modified_date()
    }

    /// A writer that re-resolves the active destination on every write.
    pub fn writer(&self) -> SinkWriter {
        SinkWriter { sink: self.clone() }
    }
}

/// Writer handed to log producers; holds the sink, never a file handle.
pub struct SinkWriter {
    sink: LogSink,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        {
            let current = self.sink.current.read();
            let mut file = current.file();
            file.write_all(buf)?;
        }
        if self.sink.mirror_to_stdout {
            // Mirror is best effort; console loss never fails the write.
            let _ = io::stdout().write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let current = self.sink.current.read();
        let mut file = current.file();
        file.flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn dest(dir: &TempDir, y: i32, m: u32, d: u32) -> LogDestination {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        LogDestination::open(dir.path(), date).unwrap()
    }

    #[test]
    fn test_writes_reach_current_destination() {
        let dir = TempDir::new().unwrap();
        let sink = LogSink::new(dest(&dir, 2025, 6, 1)).without_mirror();

        let mut writer = sink.writer();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        let content =
            std::fs::read_to_string(dir.path().join("bot-2025-06-01.log")).unwrap();
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn test_install_redirects_subsequent_writes() {
        let dir = TempDir::new().unwrap();
        let sink = LogSink::new(dest(&dir, 2025, 6, 1)).without_mirror();

        let mut writer = sink.writer();
        writer.write_all(b"before\n").unwrap();

        sink.install(dest(&dir, 2025, 6, 2));
        writer.write_all(b"after\n").unwrap();

        let old = std::fs::read_to_string(dir.path().join("bot-2025-06-01.log")).unwrap();
        let new = std::fs::read_to_string(dir.path().join("bot-2025-06-02.log")).unwrap();
        assert_eq!(old, "before\n");
        assert_eq!(new, "after\n");
    }

    #[test]
    fn test_clones_observe_the_same_swap() {
        let dir = TempDir::new().unwrap();
        let sink = LogSink::new(dest(&dir, 2025, 6, 1)).without_mirror();
        let clone = sink.clone();

        sink.install(dest(&dir, 2025, 6, 2));

        assert_eq!(
            clone.current_path(),
            dir.path().join("bot-2025-06-02.log")
        );

        let mut writer = clone.writer();
        writer.write_all(b"via clone\n").unwrap();
        let new = std::fs::read_to_string(dir.path().join("bot-2025-06-02.log")).unwrap();
        assert_eq!(new, "via clone\n");
    }
}
