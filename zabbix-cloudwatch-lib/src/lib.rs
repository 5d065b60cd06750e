#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for zabbix-cloudwatch
//!
//! This library holds all functionality of the zabbix-cloudwatch tool, which fetches one
//! statistic of one CloudWatch metric over a recent time window and prints a single value for a
//! Zabbix agent.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface, configuration and orchestration
//! - [`query`]: Dimension parsing, statistic classification, time windows and result selection
//! - [`cloud`]: Metrics backends, including the CloudWatch client

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod cloud;
pub mod commands;
pub mod query;

pub use crate::cloud::{CloudWatchSource, MetricsSource};
pub use crate::commands::{Connection, Host, run, run_with};
