mod env_vars;
mod monitor_config;

pub use env_vars::expand_env_vars;

pub use monitor_config::{
    load_config,
    MonitorConfig,
    SamplingConfig,
    SerialConfig,
    SmbSource,
};
