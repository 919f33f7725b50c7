//! Environment configuration.
//!
//! Payload values are fixture data and come from the command line, while the
//! bot token is a secret and is only ever read from the environment.
//!
//! # Security Notes
//! - `BOT_TOKEN` must never be logged or written to the output
//! - Use a throwaway token for fixtures, never a production bot token

use envconfig::Envconfig;
use log::LevelFilter;

use crate::{consts, errors::InitDataError};

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// 🔒 SENSITIVE: token shared with the backend that validates init data
    /// Only required by commands that sign.
    #[envconfig(from = "BOT_TOKEN")]
    pub bot_token: Option<String>,

    /// Diagnostics level written to stderr (NON-SENSITIVE)
    /// Values: "off", "error", "warn", "info", "debug", "trace"
    #[envconfig(from = "INIT_DATA_LOG_LEVEL", default = "warn")]
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn load() -> Result<Self, InitDataError> {
        Self::init_from_env().map_err(|err| InitDataError::ConfigurationError(err.to_string()))
    }

    /// The bot token, or an error naming the variable when unset or empty
    pub fn bot_token(&self) -> Result<&str, InitDataError> {
        match self.bot_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(InitDataError::missing_field(consts::BOT_TOKEN_ENV)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        AppConfig::init_from_hashmap(&vars).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);

        assert_eq!(config.log_level, LevelFilter::Warn);
        assert_eq!(
            config.bot_token().unwrap_err(),
            InitDataError::missing_field("BOT_TOKEN")
        );
    }

    #[test]
    fn test_empty_token_is_missing() {
        let config = config_from(&[("BOT_TOKEN", "")]);

        assert!(config.bot_token().is_err());
    }

    #[test]
    fn test_reads_token_and_level() {
        let config = config_from(&[
            ("BOT_TOKEN", "test_bot_token"),
            ("INIT_DATA_LOG_LEVEL", "debug"),
        ]);

        assert_eq!(config.bot_token().unwrap(), "test_bot_token");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }
}
