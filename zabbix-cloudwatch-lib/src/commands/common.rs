//! Arguments and setup that are not specific to the metric being queried.

use super::Host;
use super::config::Config;
use crate::query::QueryError;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use std::io::Write;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments controlling the tool itself rather than the query
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to a TOML configuration file with default period, duration, delay and request timeout
    #[arg(long, short = 'c', value_name = "PATH", env = "ZABBIX_CLOUDWATCH_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output on stderr
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

impl CommonArgs {
    /// Initialize logging and load the configuration
    pub fn setup(&self) -> Result<Config, QueryError> {
        init_logging(self.log_level);
        Config::load(self.config.as_deref()).map_err(QueryError::BadConfig)
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a logger may already be installed when running more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Report a failed query on the host's error stream and terminate with the matching exit code
pub fn fail<H: Host>(host: &mut H, err: &QueryError) -> crate::Result<()> {
    log::debug!("query failed with exit code {}: {err:?}", err.exit_code());
    let _ = writeln!(host.error(), "{err}");
    host.exit(err.exit_code());
    Err(ohno::app_err!("{err}"))
}
