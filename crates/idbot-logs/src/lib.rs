//! idbot Logs - durable, date-partitioned diagnostic logging
//!
//! Writes every `tracing` event to a daily `bot-YYYY-MM-DD.log` file and
//! mirrors it to stdout. A background scheduler swaps the active file at day
//! boundaries and deletes files older than the retention threshold during a
//! short window after local midnight. Producers log through the normal
//! `tracing` macros and never see rotation happen.

mod destination;
mod rotation;
mod sink;

pub use destination::LogDestination;
pub use rotation::{sweep_old_logs, RotationConfig, RotationScheduler};
pub use sink::{LogSink, SinkWriter};

use idbot_core::{Error, Result};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Handle to the running logging stack.
///
/// Dropping it leaves the scheduler running detached; call
/// [`Logger::shutdown`] to stop the rotation task deterministically.
pub struct Logger {
    sink: LogSink,
    shutdown_tx: broadcast::Sender<()>,
    scheduler: JoinHandle<()>,
}

impl Logger {
    /// The sink all log producers write through.
    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    /// Stop the rotation scheduler and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.scheduler.await;
    }
}

/// Create the log directory, open today's destination, install the global
/// tracing subscriber, and start the rotation scheduler.
///
/// Must be called once at startup, before anything else logs, from within a
/// tokio runtime. Failure here is fatal by design: running console-only would
/// silently drop the durability this crate exists to provide.
pub fn initialize(config: RotationConfig) -> Result<Logger> {
    std::fs::create_dir_all(&config.log_dir)?;
    let destination = LogDestination::open_today(&config.log_dir)?;
    let sink = LogSink::new(destination);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(sink.clone()),
        )
        .try_init()
        .map_err(|e| Error::log_setup(e.to_string()))?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let scheduler = RotationScheduler::new(sink.clone(), config, shutdown_rx).spawn();
    debug!("logging to {}", sink.current_path().display());

    Ok(Logger {
        sink,
        shutdown_tx,
        scheduler,
    })
}
