//! Test utilities for server-monitor
//!
//! Canned probes and fixture files shared by the unit tests.

#![cfg(test)]

use std::io::Write;
use std::thread;

use anyhow::{anyhow, Result};
use tempfile::NamedTempFile;

use crate::collectors::probe::*;

/// Creates a temporary file with the given content
pub fn create_temp_file(content: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content)?;
    file.flush()?;
    Ok(file)
}

/// A probe on which every OS read fails
pub fn failing_probe() -> MockHostProbe {
    let mut probe = MockHostProbe::new();
    probe.expect_cpu_usage().returning(|_| Err(anyhow!("fail")));
    probe.expect_load_average().returning(|| Err(anyhow!("fail")));
    probe.expect_boot_time().returning(|| Err(anyhow!("fail")));
    probe.expect_memory().returning(|| Err(anyhow!("fail")));
    probe.expect_swap().returning(|| Err(anyhow!("fail")));
    probe
        .expect_filesystem_usage()
        .returning(|_| Err(anyhow!("fail")));
    probe
        .expect_network_counters()
        .returning(|| Err(anyhow!("fail")));
    probe.expect_disk_counters().returning(|| Err(anyhow!("fail")));
    probe.expect_process_count().returning(|| Err(anyhow!("fail")));
    probe
        .expect_interface_addresses()
        .returning(|| Err(anyhow!("fail")));
    probe
        .expect_tcp_connections()
        .returning(|| Err(anyhow!("fail")));
    probe.expect_read_sysfs().returning(|_| Err(anyhow!("fail")));
    probe
        .expect_sensor_temperatures()
        .returning(|| Err(anyhow!("fail")));
    probe.expect_smbstatus().returning(|| Err(anyhow!("fail")));
    probe.expect_pause().return_const(());
    probe
}

/// A probe whose CPU, network and disk windows really block.
///
/// Everything else fails, so a tick costs the three windows and little more.
pub fn blocking_probe() -> MockHostProbe {
    let mut probe = MockHostProbe::new();
    probe.expect_cpu_usage().returning(|window| {
        thread::sleep(window);
        Ok(5.0)
    });
    probe.expect_load_average().returning(|| Err(anyhow!("fail")));
    probe.expect_boot_time().returning(|| Err(anyhow!("fail")));
    probe.expect_memory().returning(|| Err(anyhow!("fail")));
    probe.expect_swap().returning(|| Err(anyhow!("fail")));
    probe
        .expect_filesystem_usage()
        .returning(|_| Err(anyhow!("fail")));
    probe.expect_network_counters().returning(|| {
        Ok(NetworkCounters {
            received: 0,
            transmitted: 0,
        })
    });
    probe
        .expect_disk_counters()
        .returning(|| Ok(DiskCounters { read: 0, written: 0 }));
    probe.expect_process_count().returning(|| Err(anyhow!("fail")));
    probe
        .expect_interface_addresses()
        .returning(|| Err(anyhow!("fail")));
    probe
        .expect_tcp_connections()
        .returning(|| Err(anyhow!("fail")));
    probe.expect_read_sysfs().returning(|_| Err(anyhow!("fail")));
    probe
        .expect_sensor_temperatures()
        .returning(|| Err(anyhow!("fail")));
    probe.expect_smbstatus().returning(|| Err(anyhow!("fail")));
    probe.expect_pause().returning(thread::sleep);
    probe
}

/// A probe describing a small healthy server.
///
/// With `memory_ok` false the RAM read fails and everything else succeeds.
pub fn healthy_probe(memory_ok: bool) -> MockHostProbe {
    const GIB: u64 = 1024 * 1024 * 1024;
    let mut probe = MockHostProbe::new();
    probe.expect_cpu_usage().returning(|_| Ok(12.4));
    probe.expect_load_average().returning(|| {
        Ok(LoadAverage {
            one: 0.42,
            five: 0.3,
            fifteen: 0.25,
        })
    });
    probe.expect_boot_time().returning(|| Ok(0));
    probe.expect_memory().returning(move || {
        if memory_ok {
            Ok(MemoryUsage {
                total: 8 * GIB,
                used: 2 * GIB,
            })
        } else {
            Err(anyhow!("/proc/meminfo unreadable"))
        }
    });
    probe.expect_swap().returning(|| {
        Ok(MemoryUsage {
            total: 2 * GIB,
            used: 0,
        })
    });
    probe.expect_filesystem_usage().returning(|_| {
        Ok(Some(FilesystemUsage {
            total: 100 * GIB,
            available: 50 * GIB,
        }))
    });
    probe.expect_network_counters().returning(|| {
        Ok(NetworkCounters {
            received: 0,
            transmitted: 0,
        })
    });
    probe
        .expect_disk_counters()
        .returning(|| Ok(DiskCounters { read: 0, written: 0 }));
    probe.expect_process_count().returning(|| Ok(150));
    probe.expect_interface_addresses().returning(|| {
        Ok(vec![InterfaceAddress {
            name: "eth0".to_string(),
            ip: "192.168.1.50".parse().unwrap(),
        }])
    });
    probe.expect_tcp_connections().returning(|| Ok(vec![]));
    probe
        .expect_read_sysfs()
        .returning(|_| Ok("48000".to_string()));
    probe.expect_sensor_temperatures().never();
    probe.expect_smbstatus().never();
    probe.expect_pause().return_const(());
    probe
}
