//! Command-line interface and orchestration for zabbix-cloudwatch
//!
//! This module turns the command line into one CloudWatch query and one printed value.
//!
//! ## Execution Flow
//!
//! 1. Parse arguments with clap; help and usage errors are reported through the [`Host`]
//! 2. Initialize logging and load the configuration file, if any
//! 3. Validate the mandatory flags and build a [`crate::query::MetricQuery`] from the
//!    dimension, statistic and time window arguments
//! 4. Connect to the metrics backend and fetch the data points
//! 5. Select the value to report and print it
//!
//! Every failure is a [`crate::query::QueryError`] whose exit code is handed to
//! [`Host::exit`] after the message is written to the host's error stream.

mod common;
mod config;
mod host;
mod query;
mod run;

pub use common::{CommonArgs, LogLevel};
pub use config::Config;
pub use host::Host;
pub use query::{Connection, Invocation, QueryArgs, execute};
pub use run::{run, run_with};
