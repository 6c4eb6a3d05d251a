//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Result};

use server_monitor::collectors::probe::{
    DiskCounters, FilesystemUsage, InterfaceAddress, LoadAverage, MemoryUsage, NetworkCounters,
    TcpConnection,
};
use server_monitor::collectors::HostProbe;

pub const GIB: u64 = 1024 * 1024 * 1024;

/// Deterministic host: fixed pools, counters that advance by a fixed step
/// per read, and a pause that never sleeps.
pub struct ScriptedProbe {
    pub healthy: bool,
    pub network_step: NetworkCounters,
    pub disk_step: DiskCounters,
    pub interfaces: Vec<InterfaceAddress>,
    pub connections: Vec<TcpConnection>,
    pub pauses: Vec<Duration>,
    network: NetworkCounters,
    disk: DiskCounters,
}

impl ScriptedProbe {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            network_step: NetworkCounters {
                received: 125_000,
                transmitted: 62_500,
            },
            disk_step: DiskCounters {
                read: 1024 * 1024,
                written: 0,
            },
            interfaces: vec![
                interface("lo", "127.0.0.1"),
                interface("tun0", "10.8.0.2"),
                interface("eth0", "192.168.1.50"),
            ],
            connections: vec![
                connection("192.168.1.50:445", "192.168.1.20:50000"),
                connection("192.168.1.50:445", "192.168.1.20:50001"),
                connection("192.168.1.50:445", "192.168.1.21:50002"),
                connection("192.168.1.50:22", "192.168.1.30:41000"),
                connection("192.168.1.50:51000", "93.184.216.34:443"),
            ],
            pauses: Vec::new(),
            network: NetworkCounters {
                received: 0,
                transmitted: 0,
            },
            disk: DiskCounters { read: 0, written: 0 },
        }
    }

    pub fn offline() -> Self {
        Self {
            healthy: false,
            ..Self::healthy()
        }
    }

    fn check(&self) -> Result<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(anyhow!("probe offline"))
        }
    }
}

pub fn interface(name: &str, ip: &str) -> InterfaceAddress {
    InterfaceAddress {
        name: name.to_string(),
        ip: ip.parse().expect("valid address"),
    }
}

pub fn connection(local: &str, remote: &str) -> TcpConnection {
    TcpConnection {
        local: local.parse::<SocketAddr>().expect("valid local"),
        remote: remote.parse::<SocketAddr>().expect("valid remote"),
        established: true,
    }
}

impl HostProbe for ScriptedProbe {
    fn cpu_usage(&mut self, _window: Duration) -> Result<f32> {
        self.check()?;
        Ok(37.6)
    }

    fn load_average(&mut self) -> Result<LoadAverage> {
        self.check()?;
        Ok(LoadAverage {
            one: 1.5,
            five: 0.75,
            fifteen: 0.1,
        })
    }

    fn boot_time(&mut self) -> Result<u64> {
        self.check()?;
        Ok(0)
    }

    fn memory(&mut self) -> Result<MemoryUsage> {
        self.check()?;
        Ok(MemoryUsage {
            total: 16 * GIB,
            used: 4 * GIB,
        })
    }

    fn swap(&mut self) -> Result<MemoryUsage> {
        self.check()?;
        Ok(MemoryUsage { total: 0, used: 0 })
    }

    fn filesystem_usage(&mut self, mount: &Path) -> Result<Option<FilesystemUsage>> {
        self.check()?;
        if mount == Path::new("/") {
            Ok(Some(FilesystemUsage {
                total: 200 * GIB,
                available: 150 * GIB,
            }))
        } else {
            Ok(None)
        }
    }

    fn network_counters(&mut self) -> Result<NetworkCounters> {
        self.check()?;
        let current = self.network;
        self.network.received += self.network_step.received;
        self.network.transmitted += self.network_step.transmitted;
        Ok(current)
    }

    fn disk_counters(&mut self) -> Result<DiskCounters> {
        self.check()?;
        let current = self.disk;
        self.disk.read += self.disk_step.read;
        self.disk.written += self.disk_step.written;
        Ok(current)
    }

    fn process_count(&mut self) -> Result<usize> {
        self.check()?;
        Ok(212)
    }

    fn interface_addresses(&mut self) -> Result<Vec<InterfaceAddress>> {
        self.check()?;
        Ok(self.interfaces.clone())
    }

    fn tcp_connections(&mut self) -> Result<Vec<TcpConnection>> {
        self.check()?;
        Ok(self.connections.clone())
    }

    fn read_sysfs(&mut self, _path: &Path) -> Result<String> {
        self.check()?;
        Ok("51234".to_string())
    }

    fn sensor_temperatures(&mut self) -> Result<Vec<f32>> {
        self.check()?;
        Ok(vec![51.0])
    }

    fn smbstatus(&mut self) -> Result<Option<String>> {
        self.check()?;
        Ok(None)
    }

    fn pause(&mut self, window: Duration) {
        self.pauses.push(window);
    }
}

/// In-memory serial device whose contents stay readable after the run
/// loop has taken ownership of the writer.
#[derive(Clone, Default)]
pub struct SharedPort {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl SharedPort {
    pub fn contents(&self) -> String {
        String::from_utf8(self.buffer.borrow().clone()).expect("ASCII output")
    }
}

impl Write for SharedPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
