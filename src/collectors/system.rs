//! CPU, thermal, uptime, load and process collectors.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;

use crate::collectors::probe::HostProbe;
use crate::constants::{MILLIDEGREE_DIVISOR, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::models::Reading;

/// CPU utilisation over `window`, as an integer percentage
pub fn collect_cpu_percent(probe: &mut dyn HostProbe, window: Duration) -> Reading {
    match probe.cpu_usage(window) {
        Ok(pct) if pct.is_finite() => Reading::Measured(format!("{:.0}", pct)),
        Ok(pct) => {
            debug!("CPU usage is not a number: {}", pct);
            Reading::Unavailable
        }
        Err(e) => {
            debug!("CPU usage unavailable: {:#}", e);
            Reading::Unavailable
        }
    }
}

/// CPU temperature in whole degrees Celsius.
///
/// Thermal files are tried in order, then the generic sensor list. The
/// first value that parses wins.
pub fn collect_cpu_temperature(probe: &mut dyn HostProbe, thermal_paths: &[PathBuf]) -> Reading {
    for path in thermal_paths {
        let raw = match probe.read_sysfs(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Thermal source skipped: {:#}", e);
                continue;
            }
        };

        match raw.parse::<i64>() {
            Ok(millidegrees) => {
                let celsius = millidegrees as f64 / MILLIDEGREE_DIVISOR;
                return Reading::Measured(format!("{:.0}", celsius));
            }
            Err(_) => debug!("Unparseable thermal value '{}' in {}", raw, path.display()),
        }
    }

    match probe.sensor_temperatures() {
        Ok(temps) => match temps.first() {
            Some(celsius) => Reading::Measured(format!("{:.0}", celsius)),
            None => {
                debug!("No temperature sensors reported");
                Reading::Unavailable
            }
        },
        Err(e) => {
            debug!("Sensor enumeration failed: {:#}", e);
            Reading::Unavailable
        }
    }
}

/// Time since boot, e.g. `3d 4h 12m`
pub fn collect_uptime(probe: &mut dyn HostProbe) -> Reading {
    let boot = match probe.boot_time() {
        Ok(boot) => boot,
        Err(e) => {
            debug!("Boot time unavailable: {:#}", e);
            return Reading::Unavailable;
        }
    };

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(now) => now.as_secs(),
        Err(e) => {
            debug!("System clock is before the Unix epoch: {}", e);
            return Reading::Unavailable;
        }
    };

    match now.checked_sub(boot) {
        Some(secs) => Reading::Measured(format_uptime(secs)),
        None => {
            debug!("Boot time {} is in the future", boot);
            Reading::Unavailable
        }
    }
}

/// Render an uptime keeping the leading non-zero units; minutes always shown.
pub fn format_uptime(total_secs: u64) -> String {
    let days = total_secs / SECONDS_PER_DAY;
    let hours = (total_secs % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total_secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// 1, 5 and 15 minute load averages; all three or none
pub fn collect_load_average(probe: &mut dyn HostProbe) -> (Reading, Reading, Reading) {
    match probe.load_average() {
        Ok(load) => (
            Reading::Measured(format!("{:.2}", load.one)),
            Reading::Measured(format!("{:.2}", load.five)),
            Reading::Measured(format!("{:.2}", load.fifteen)),
        ),
        Err(e) => {
            debug!("Load average unavailable: {:#}", e);
            (Reading::Unavailable, Reading::Unavailable, Reading::Unavailable)
        }
    }
}

pub fn collect_process_count(probe: &mut dyn HostProbe) -> Reading {
    match probe.process_count() {
        Ok(count) => Reading::Measured(count.to_string()),
        Err(e) => {
            debug!("Process count unavailable: {:#}", e);
            Reading::Unavailable
        }
    }
}
