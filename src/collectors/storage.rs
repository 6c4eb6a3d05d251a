//! Filesystem capacity and disk throughput collectors.

use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::collectors::memory::percent;
use crate::collectors::probe::{FilesystemUsage, HostProbe};
use crate::constants::{GB, MB, ROOT_MOUNT};
use crate::models::Reading;

/// Used GiB, total GiB and percent used of the data volume.
///
/// `data_mount` is preferred; the root filesystem is used when nothing is
/// mounted there.
pub fn collect_disk_usage(
    probe: &mut dyn HostProbe,
    data_mount: &Path,
) -> (Reading, Reading, Reading) {
    let unavailable = (Reading::Unavailable, Reading::Unavailable, Reading::Unavailable);

    let usage = match find_filesystem(probe, data_mount) {
        Some(usage) => usage,
        None => match find_filesystem(probe, Path::new(ROOT_MOUNT)) {
            Some(usage) => usage,
            None => return unavailable,
        },
    };

    let used = usage.total.saturating_sub(usage.available);
    (
        Reading::Measured((used / GB).to_string()),
        Reading::Measured((usage.total / GB).to_string()),
        Reading::Measured(format!("{:.0}", percent(used, usage.total))),
    )
}

fn find_filesystem(probe: &mut dyn HostProbe, mount: &Path) -> Option<FilesystemUsage> {
    match probe.filesystem_usage(mount) {
        Ok(Some(usage)) => Some(usage),
        Ok(None) => {
            debug!("Nothing mounted at {}", mount.display());
            None
        }
        Err(e) => {
            debug!("Filesystem usage of {} unavailable: {:#}", mount.display(), e);
            None
        }
    }
}

/// Disk read and write throughput in MB/s with one decimal.
///
/// Blocks for `interval_secs`. A non-positive interval returns immediately.
pub fn collect_disk_io(probe: &mut dyn HostProbe, interval_secs: f64) -> (Reading, Reading) {
    if !interval_secs.is_finite() || interval_secs <= 0.0 {
        return (Reading::Unavailable, Reading::Unavailable);
    }

    let first = match probe.disk_counters() {
        Ok(counters) => counters,
        Err(e) => {
            debug!("Disk counters unavailable: {:#}", e);
            return (Reading::Unavailable, Reading::Unavailable);
        }
    };

    probe.pause(Duration::from_secs_f64(interval_secs));

    let second = match probe.disk_counters() {
        Ok(counters) => counters,
        Err(e) => {
            debug!("Disk counters unavailable: {:#}", e);
            return (Reading::Unavailable, Reading::Unavailable);
        }
    };

    let read = megabytes_per_sec(second.read.saturating_sub(first.read), interval_secs);
    let write = megabytes_per_sec(second.written.saturating_sub(first.written), interval_secs);

    (
        Reading::Measured(format!("{:.1}", read)),
        Reading::Measured(format!("{:.1}", write)),
    )
}

pub fn megabytes_per_sec(delta_bytes: u64, interval_secs: f64) -> f64 {
    delta_bytes as f64 / MB as f64 / interval_secs
}
