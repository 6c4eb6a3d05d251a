//! # server-monitor
//!
//! A host telemetry agent that samples system metrics on a fixed cadence and
//! streams them to a serial-attached display.
//!
//! ## Overview
//!
//! Every tick the [`sampler::Sampler`] runs each collector against a
//! [`collectors::HostProbe`], builds a complete [`models::Sample`], and the
//! [`runner`] writes it over a [`transport::SerialSession`] as
//! `key=value` lines followed by `END`.
//!
//! Collectors degrade rather than fail: a sensor that cannot be read is sent
//! as `--`, and the rest of the record still goes out.
//!
//! ## Usage
//!
//! ```no_run
//! use server_monitor::collectors::SystemProbe;
//! use server_monitor::config::SamplingConfig;
//! use server_monitor::sampler::Sampler;
//! use server_monitor::transport::encode;
//!
//! let mut sampler = Sampler::new(SystemProbe::new(), SamplingConfig::default());
//! let sample = sampler.collect();
//!
//! for line in encode(&sample) {
//!     println!("{}", line);
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Readings, metric keys and samples
//! - [`collectors`]: Metric collectors and the OS probe they read through
//! - [`sampler`]: One complete sample per tick
//! - [`transport`]: Wire encoding and the serial session
//! - [`runner`]: The connect, stream and close driver
//! - [`config`]: YAML configuration
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models
pub mod models;

/// Host metric collectors
pub mod collectors;

/// Per-tick sample assembly
pub mod sampler;

/// Wire protocol and serial session
pub mod transport;

/// Streaming driver and stop handling
pub mod runner;

/// Console status line
pub mod status;

/// Configuration management
pub mod config;

/// Root privilege check
pub mod privileges;

/// SIGINT and SIGTERM handling
pub mod shutdown;

/// Application constants and configuration values
pub mod constants;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
