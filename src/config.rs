//! Environment-driven configuration

use chrono::NaiveDateTime;
use std::fmt::Write;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default pause before a scripted bot reply appears
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1200);

/// Hour and minute, e.g. `9:05 AM`
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M %p";

const REPLY_DELAY_ENV: &str = "SALES_CHAT_REPLY_DELAY_MS";
const TIME_FORMAT_ENV: &str = "SALES_CHAT_TIME_FORMAT";
const TOPICS_PATH_ENV: &str = "SALES_CHAT_TOPICS_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SALES_CHAT_REPLY_DELAY_MS must be a whole number of milliseconds, got {value:?}")]
    InvalidReplyDelay {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("SALES_CHAT_TIME_FORMAT is not a valid strftime pattern: {0:?}")]
    InvalidTimeFormat(String),
}

/// A strftime pattern that renders every local time without error
///
/// chrono panics when `to_string` hits a pattern it cannot render, so a
/// pattern is only accepted after a trial render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat(String);

impl TimeFormat {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeFormat`] when the pattern is empty,
    /// has an unknown specifier, or needs data a local time doesn't carry
    /// (such as `%z`).
    pub fn parse(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        let mut rendered = String::new();
        if pattern.is_empty()
            || write!(rendered, "{}", NaiveDateTime::default().format(&pattern)).is_err()
        {
            return Err(ConfigError::InvalidTimeFormat(pattern));
        }
        Ok(Self(pattern))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn render(&self, at: NaiveDateTime) -> String {
        at.format(&self.0).to_string()
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self(DEFAULT_TIME_FORMAT.to_string())
    }
}

/// Runtime settings for a chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Simulated typing time before each scheduled bot reply
    pub reply_delay: Duration,
    /// Pattern for message time labels
    pub time_format: TimeFormat,
    /// Replaces the built-in topic table when set
    pub topics_path: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
            time_format: TimeFormat::default(),
            topics_path: None,
        }
    }
}

impl ChatConfig {
    /// # Errors
    ///
    /// See [`ChatConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (the process environment in production)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the reply delay is not a whole number of
    /// milliseconds or the time format cannot be rendered.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(REPLY_DELAY_ENV) {
            let millis: u64 = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidReplyDelay {
                    value: value.clone(),
                    source,
                })?;
            config.reply_delay = Duration::from_millis(millis);
        }

        if let Some(format) = lookup(TIME_FORMAT_ENV) {
            config.time_format = TimeFormat::parse(format)?;
        }

        config.topics_path = lookup(TOPICS_PATH_ENV)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}
