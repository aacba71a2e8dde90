//! idbot Core - Shared constants, configuration, and error handling

pub mod config;
pub mod constants;
pub mod error;

pub use config::BotConfig;
pub use error::{Error, Result};
