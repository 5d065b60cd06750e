use crate::Result;
use crate::query::{DEFAULT_DELAY, DEFAULT_DURATION, DEFAULT_PERIOD_SECS, WindowDefaults};
use camino::Utf8Path;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::Deserialize;
use std::fs;

/// The default configuration TOML content, embedded from `default_config.toml`
const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Sampling period in seconds when `--period` is not given
    #[serde(default = "default_period")]
    pub period: u32,

    /// Lookback span when neither `--duration` nor `--window` is given
    #[serde(default = "default_duration", with = "humantime_serde")]
    pub duration: Duration,

    /// Offset from now when neither `--delay` nor `--window` is given
    #[serde(default = "default_delay", with = "humantime_serde")]
    pub delay: Duration,

    /// Upper bound on a single CloudWatch request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

const fn default_period() -> u32 {
    DEFAULT_PERIOD_SECS
}

const fn default_duration() -> Duration {
    DEFAULT_DURATION
}

const fn default_delay() -> Duration {
    DEFAULT_DELAY
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds invalid values
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let Some(path) = config_path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{path}'"))?;
        config.validate()?;

        log::debug!("loaded configuration from '{path}'");
        Ok(config)
    }

    /// Fallbacks for the time window resolver
    #[must_use]
    pub const fn window_defaults(&self) -> WindowDefaults {
        WindowDefaults {
            duration: self.duration,
            delay: self.delay,
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a period, duration or timeout is zero
    fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(app_err!("period must be at least one second"));
        }

        if self.duration.is_zero() {
            return Err(app_err!("duration must be greater than zero"));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
