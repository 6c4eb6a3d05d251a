use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::env_vars::expand_env_vars;
use crate::constants::*;

/// Where the file-share client count comes from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmbSource {
    /// Count peers on the file-sharing ports in the kernel TCP table
    #[default]
    Ports,
    /// Ask Samba's `smbstatus` tool (usually needs root)
    Smbstatus,
}

/// Serial transport settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SerialConfig {
    pub port: Option<String>,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub line_delay_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            line_delay_ms: DEFAULT_LINE_DELAY_MS,
        }
    }
}

/// What to measure and how long each blocking window lasts
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    pub interval_secs: f64,
    pub cpu_window_ms: u64,
    pub network_window_ms: u64,
    pub disk_window_ms: u64,
    pub data_mount: PathBuf,
    pub thermal_paths: Vec<PathBuf>,
    pub file_share_ports: Vec<u16>,
    pub ephemeral_port_floor: u16,
    pub smb_source: SmbSource,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            cpu_window_ms: DEFAULT_CPU_WINDOW_MS,
            network_window_ms: DEFAULT_NETWORK_WINDOW_MS,
            disk_window_ms: DEFAULT_DISK_WINDOW_MS,
            data_mount: PathBuf::from(DEFAULT_DATA_MOUNT),
            thermal_paths: DEFAULT_THERMAL_PATHS.iter().map(PathBuf::from).collect(),
            file_share_ports: DEFAULT_FILE_SHARE_PORTS.to_vec(),
            ephemeral_port_floor: DEFAULT_EPHEMERAL_PORT_FLOOR,
            smb_source: SmbSource::default(),
        }
    }
}

impl SamplingConfig {
    /// Total time one tick spends blocked inside collectors
    pub fn blocking_window_ms(&self) -> u64 {
        self.cpu_window_ms
            .saturating_add(self.network_window_ms)
            .saturating_add(self.disk_window_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct MonitorConfig {
    pub serial: SerialConfig,
    pub sampling: SamplingConfig,
}

impl MonitorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: MonitorConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, yaml).context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        MonitorConfig::default().save_to_yaml_file(path)
    }

    /// Expand `$VAR` and `${VAR}` references in path-valued settings
    pub fn process_environment_variables(&mut self) {
        if let Some(port) = self.serial.port.as_mut() {
            if port.contains('$') {
                *port = expand_env_vars(port);
            }
        }

        let mount = self.sampling.data_mount.to_string_lossy().to_string();
        if mount.contains('$') {
            self.sampling.data_mount = PathBuf::from(expand_env_vars(&mount));
        }
    }

    /// Reject settings the run loop cannot honor
    pub fn validate(&self) -> Result<()> {
        if !self.sampling.interval_secs.is_finite() || self.sampling.interval_secs <= 0.0 {
            bail!(
                "Reporting interval must be a positive number of seconds, got {}",
                self.sampling.interval_secs
            );
        }
        if Duration::try_from_secs_f64(self.sampling.interval_secs).is_err() {
            bail!(
                "Reporting interval of {} seconds is too large",
                self.sampling.interval_secs
            );
        }

        if self.serial.baud_rate == 0 {
            bail!("Baud rate must be greater than zero");
        }

        let blocking = self.sampling.blocking_window_ms();
        if blocking > MAX_BLOCKING_WINDOW_MS {
            bail!(
                "Sampling windows add up to {}ms, more than the {}ms allowed per tick",
                blocking,
                MAX_BLOCKING_WINDOW_MS
            );
        }

        Ok(())
    }
}

/// Load a configuration file, or the defaults when none is given.
///
/// The path comes from the caller first and the `SERVER_MONITOR_CONFIG`
/// environment variable second. A path that is given but missing is an
/// error rather than a silent fall back to defaults.
pub fn load_config(config_path: Option<&Path>) -> Result<MonitorConfig> {
    let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);

    let mut config = match config_path.map(Path::to_path_buf).or(env_path) {
        Some(path) => MonitorConfig::from_yaml_file(&path)?,
        None => {
            info!("No config path provided, using default configuration");
            MonitorConfig::default()
        }
    };

    config.process_environment_variables();
    Ok(config)
}
