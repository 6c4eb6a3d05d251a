use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::MonitorConfig;

/// Command-line arguments for server-monitor.
///
/// Every option here overrides the matching value from the configuration
/// file; anything left unset keeps the file's value or the default.
#[derive(Parser, Debug)]
#[clap(
    name = "server-monitor",
    about = "Stream host metrics to a serial display"
)]
pub struct Args {
    /// Serial device of the display (e.g. /dev/ttyUSB0)
    pub port: Option<String>,

    /// Baud rate of the serial link
    #[clap(short, long)]
    pub baud: Option<u32>,

    /// Seconds to wait between records
    #[clap(short, long)]
    pub interval: Option<f64>,

    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Mount point of the data volume whose usage is reported
    #[clap(long)]
    pub data_mount: Option<PathBuf>,

    /// Stop after sending this many records
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,

    /// Print one encoded record to stdout instead of opening the port
    #[clap(long, help = "Print one encoded record to stdout and exit")]
    pub once: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = "server-monitor.yaml")]
        path: PathBuf,
    },
}

impl Args {
    /// Layer the options given on the command line over `config`
    pub fn apply_to(&self, config: &mut MonitorConfig) {
        if let Some(port) = &self.port {
            config.serial.port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(interval) = self.interval {
            config.sampling.interval_secs = interval;
        }
        if let Some(mount) = &self.data_mount {
            config.sampling.data_mount = mount.clone();
        }
    }
}
