//! Global constants for the server-monitor application.
//!
//! This module centralizes unit conversions, wire-protocol markers and
//! default configuration values.

// Unit conversion constants
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_HOUR: u64 = 3_600;
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Thermal sysfs files report millidegrees Celsius
pub const MILLIDEGREE_DIVISOR: f64 = 1000.0;

pub const BITS_PER_BYTE: f64 = 8.0;
pub const KILO: f64 = 1000.0;

/// Bytes per mebibyte
pub const MB: u64 = 1024 * 1024;

/// Bytes per gibibyte
pub const GB: u64 = 1024 * 1024 * 1024;

/// `/proc/diskstats` always counts 512-byte sectors regardless of the device
pub const DISKSTATS_SECTOR_SIZE: u64 = 512;

// Wire protocol
/// Value sent in place of any measurement that could not be taken
pub const UNAVAILABLE: &str = "--";

/// Terminating line of every record
pub const END_OF_RECORD: &str = "END";

/// Fallback address when no interface qualifies
pub const UNSPECIFIED_IP: &str = "0.0.0.0";

// Serial defaults
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Pacing between lines so a small receiver buffer is never overrun
pub const DEFAULT_LINE_DELAY_MS: u64 = 10;

// Sampling defaults
pub const DEFAULT_INTERVAL_SECS: f64 = 2.0;
pub const DEFAULT_CPU_WINDOW_MS: u64 = 500;
pub const DEFAULT_NETWORK_WINDOW_MS: u64 = 500;
pub const DEFAULT_DISK_WINDOW_MS: u64 = 500;

/// Upper bound for the sum of all blocking windows in one tick
pub const MAX_BLOCKING_WINDOW_MS: u64 = 3000;

/// Granularity at which the interval sleep checks for a stop request
pub const STOP_POLL_SLICE_MS: u64 = 100;

pub const DEFAULT_DATA_MOUNT: &str = "/srv";
pub const ROOT_MOUNT: &str = "/";

pub const DEFAULT_THERMAL_PATHS: &[&str] = &[
    "/sys/class/thermal/thermal_zone0/temp",
    "/sys/class/hwmon/hwmon0/temp1_input",
    "/sys/class/hwmon/hwmon1/temp1_input",
];

// Network classification
/// SMB over TCP and NetBIOS session service
pub const DEFAULT_FILE_SHARE_PORTS: &[u16] = &[445, 139];

/// Local ports at or above this are treated as client-side ephemeral ports
pub const DEFAULT_EPHEMERAL_PORT_FLOOR: u16 = 49152;

/// Interfaces that never carry the host's LAN address
pub const VIRTUAL_INTERFACE_PREFIXES: &[&str] =
    &["lo", "tun", "nordlynx", "wg", "docker", "br-", "veth"];

/// Interface names that look like physical Ethernet
pub const PHYSICAL_INTERFACE_PREFIXES: &[&str] = &["eth", "enp", "eno", "ens"];

/// Kernel TCP state code for ESTABLISHED in `/proc/net/tcp`
pub const TCP_STATE_ESTABLISHED: &str = "01";

// File paths
pub const PROC_NET_TCP: &str = "/proc/net/tcp";
pub const PROC_NET_TCP6: &str = "/proc/net/tcp6";
pub const PROC_DISKSTATS: &str = "/proc/diskstats";

// smbstatus
pub const SMBSTATUS_TIMEOUT_SECS: u64 = 5;

// Environment variables
pub const CONFIG_ENV_VAR: &str = "SERVER_MONITOR_CONFIG";
