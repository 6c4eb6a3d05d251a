//! RAM and swap collectors.

use log::debug;

use crate::collectors::probe::{HostProbe, MemoryUsage};
use crate::constants::MB;
use crate::models::Reading;

/// Used MiB, total MiB and integer percent used
pub type PoolReadings = (Reading, Reading, Reading);

pub fn collect_memory(probe: &mut dyn HostProbe) -> PoolReadings {
    match probe.memory() {
        Ok(usage) => format_pool(usage),
        Err(e) => {
            debug!("Memory accounting unavailable: {:#}", e);
            unavailable_pool()
        }
    }
}

pub fn collect_swap(probe: &mut dyn HostProbe) -> PoolReadings {
    match probe.swap() {
        Ok(usage) => format_pool(usage),
        Err(e) => {
            debug!("Swap accounting unavailable: {:#}", e);
            unavailable_pool()
        }
    }
}

fn format_pool(usage: MemoryUsage) -> PoolReadings {
    (
        Reading::Measured((usage.used / MB).to_string()),
        Reading::Measured((usage.total / MB).to_string()),
        Reading::Measured(format!("{:.0}", percent(usage.used, usage.total))),
    )
}

fn unavailable_pool() -> PoolReadings {
    (Reading::Unavailable, Reading::Unavailable, Reading::Unavailable)
}

/// `used / total` as a percentage, 0 for an empty pool
pub(crate) fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 * 100.0 / total as f64
}
