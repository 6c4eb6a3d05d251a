use std::fmt;

use crate::constants::UNAVAILABLE;

/// One measured value, already formatted for the display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Reading {
    Measured(String),
    #[default]
    Unavailable,
}

impl Reading {
    pub fn measured(value: impl Into<String>) -> Self {
        Reading::Measured(value.into())
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Measured(_))
    }

    /// Text sent on the wire for this reading
    pub fn as_str(&self) -> &str {
        match self {
            Reading::Measured(value) => value,
            Reading::Unavailable => UNAVAILABLE,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for Reading {
    fn from(value: Option<String>) -> Self {
        value.map_or(Reading::Unavailable, Reading::Measured)
    }
}

/// The fixed set of keys understood by the display.
///
/// Declaration order is transmission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKey {
    Ip,
    Uptime,
    Load1,
    Load5,
    Load15,
    CpuPct,
    CpuTemp,
    RamUsed,
    RamTotal,
    RamPct,
    SwapUsed,
    SwapTotal,
    SwapPct,
    DiskUsed,
    DiskTotal,
    DiskPct,
    NetRx,
    NetTx,
    DiskRead,
    DiskWrite,
    ProcCount,
    SmbClients,
    ConnIn,
}

impl MetricKey {
    pub const ALL: [MetricKey; 23] = [
        MetricKey::Ip,
        MetricKey::Uptime,
        MetricKey::Load1,
        MetricKey::Load5,
        MetricKey::Load15,
        MetricKey::CpuPct,
        MetricKey::CpuTemp,
        MetricKey::RamUsed,
        MetricKey::RamTotal,
        MetricKey::RamPct,
        MetricKey::SwapUsed,
        MetricKey::SwapTotal,
        MetricKey::SwapPct,
        MetricKey::DiskUsed,
        MetricKey::DiskTotal,
        MetricKey::DiskPct,
        MetricKey::NetRx,
        MetricKey::NetTx,
        MetricKey::DiskRead,
        MetricKey::DiskWrite,
        MetricKey::ProcCount,
        MetricKey::SmbClients,
        MetricKey::ConnIn,
    ];

    /// Wire name of the key
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::Ip => "ip",
            MetricKey::Uptime => "up",
            MetricKey::Load1 => "load_1",
            MetricKey::Load5 => "load_5",
            MetricKey::Load15 => "load_15",
            MetricKey::CpuPct => "cpu_pct",
            MetricKey::CpuTemp => "cpu_temp",
            MetricKey::RamUsed => "ram_used",
            MetricKey::RamTotal => "ram_total",
            MetricKey::RamPct => "ram_pct",
            MetricKey::SwapUsed => "swap_used",
            MetricKey::SwapTotal => "swap_total",
            MetricKey::SwapPct => "swap_pct",
            MetricKey::DiskUsed => "disk_used",
            MetricKey::DiskTotal => "disk_total",
            MetricKey::DiskPct => "disk_pct",
            MetricKey::NetRx => "net_rx",
            MetricKey::NetTx => "net_tx",
            MetricKey::DiskRead => "disk_read",
            MetricKey::DiskWrite => "disk_write",
            MetricKey::ProcCount => "proc_count",
            MetricKey::SmbClients => "smb_clients",
            MetricKey::ConnIn => "conn_in",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All readings taken during one reporting tick.
///
/// Every key is present from construction onwards; a key nobody wrote
/// stays [`Reading::Unavailable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    readings: [Reading; 23],
}

impl Default for Sample {
    fn default() -> Self {
        Self::new()
    }
}

impl Sample {
    pub fn new() -> Self {
        Self {
            readings: std::array::from_fn(|_| Reading::Unavailable),
        }
    }

    pub fn set(&mut self, key: MetricKey, reading: Reading) {
        self.readings[key.index()] = reading;
    }

    pub fn get(&self, key: MetricKey) -> &Reading {
        &self.readings[key.index()]
    }

    /// Number of keys, always the full key set
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Readings in transmission order
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &Reading)> {
        MetricKey::ALL.iter().copied().zip(self.readings.iter())
    }

    pub fn unavailable_count(&self) -> usize {
        self.readings.iter().filter(|r| !r.is_available()).count()
    }
}
