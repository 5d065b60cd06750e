//! Command-line entry point for zabbix-cloudwatch

use super::common::{CommonArgs, fail};
use super::query::{Connection, QueryArgs, execute};
use crate::cloud::{CloudWatchSource, MetricsSource};
use crate::query::QueryError;
use crate::{Host, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::error::ErrorKind;
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "zabbix-cloudwatch", version, author, long_about = None)]
#[command(about = "Fetch the latest value of a CloudWatch metric for a Zabbix agent")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    query: QueryArgs,

    #[command(flatten)]
    common: CommonArgs,
}

/// Parse command-line arguments, query CloudWatch, and print the result
///
/// Designed to be called from main.rs with the program arguments. Exactly one result is written
/// to the host's output on success. On failure only an error message is written, to the host's
/// error stream, and the host is asked to exit with a code specific to the failure.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the query fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    run_with(host, args, Utc::now(), |connection: Connection| async move {
        CloudWatchSource::connect(&connection.region, connection.role_arn.as_deref(), connection.request_timeout).await
    })
    .await
}

/// Like [`run`], with an explicit current time and a custom way of reaching the metrics backend
///
/// `connect` is only called once all arguments have been validated.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the query fails
pub async fn run_with<I, T, H, S, F, Fut>(host: &mut H, args: I, now: DateTime<Utc>, connect: F) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
    S: MetricsSource,
    F: FnOnce(Connection) -> Fut,
    Fut: Future<Output = S>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => return usage(host, &e),
    };

    let config = match cli.common.setup() {
        Ok(config) => config,
        Err(e) => return fail(host, &e),
    };

    let invocation = match cli.query.prepare(&config, now) {
        Ok(invocation) => invocation,
        Err(e) => return fail(host, &e),
    };

    let source = connect(invocation.connection.clone()).await;

    match execute(&source, &invocation).await {
        Ok(result) => {
            let written = writeln!(host.output(), "{result}");
            written.or_else(|e| fail(host, &QueryError::OutputFailure(e)))
        }
        Err(e) => fail(host, &e),
    }
}

/// Print help, version, or a usage error the way clap would, through the host
fn usage<H: Host>(host: &mut H, err: &clap::Error) -> Result<()> {
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        let _ = write!(host.output(), "{err}");
        return Ok(());
    }

    let _ = write!(host.error(), "{err}");
    host.exit(err.exit_code());
    Err(ohno::app_err!("invalid command line"))
}
