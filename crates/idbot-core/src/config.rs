//! Environment-backed bot configuration

use crate::error::{Error, Result};

/// Environment variable holding the Telegram bot token
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";

/// Runtime configuration for the bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token from @BotFather
    pub token: String,
}

impl BotConfig {
    /// Read the configuration from the process environment.
    ///
    /// The token has no usable default; a missing or empty `BOT_TOKEN` is a
    /// startup failure.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(BOT_TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::config(format!("{} is not set in environment", BOT_TOKEN_VAR)))?;

        Ok(Self { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env mutation is process-global, so both cases run in one test.
    #[test]
    fn test_from_env() {
        std::env::remove_var(BOT_TOKEN_VAR);
        assert!(BotConfig::from_env().is_err());

        std::env::set_var(BOT_TOKEN_VAR, "");
        assert!(BotConfig::from_env().is_err());

        std::env::set_var(BOT_TOKEN_VAR, "123456:ABC-DEF");
        let config = BotConfig::from_env().unwrap();
        assert_eq!(config.token, "123456:ABC-DEF");

        std::env::remove_var(BOT_TOKEN_VAR);
    }
}
