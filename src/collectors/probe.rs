//! The boundary between collectors and the operating system.
//!
//! Every raw read a collector needs goes through [`HostProbe`]. The
//! production implementation, [`SystemProbe`], uses `sysinfo` where it
//! covers the facet and falls back to `/proc`, `/sys` and `libc`
//! otherwise. Tests substitute a mock to inject failures.

use std::fs;
use std::io::{ErrorKind, Read};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use log::debug;
use sysinfo::{
    ComponentExt, CpuExt, CpuRefreshKind, DiskExt, NetworkExt, ProcessRefreshKind, System,
    SystemExt,
};

use crate::collectors::procfs;
use crate::constants::{PROC_DISKSTATS, PROC_NET_TCP, PROC_NET_TCP6, SMBSTATUS_TIMEOUT_SECS};

/// Used and total amount of a memory pool, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
}

/// Capacity of one mounted filesystem, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesystemUsage {
    pub total: u64,
    pub available: u64,
}

/// 1, 5 and 15 minute load averages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Cumulative bytes received and sent over all interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkCounters {
    pub received: u64,
    pub transmitted: u64,
}

/// Cumulative bytes read from and written to all physical disks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskCounters {
    pub read: u64,
    pub written: u64,
}

/// One address assigned to a network interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub name: String,
    pub ip: IpAddr,
}

/// One row of the kernel TCP table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpConnection {
    pub local: SocketAddr,
    pub remote: SocketAddr,
    pub established: bool,
}

/// Raw reads of host state.
///
/// Methods report failure through `Result`; turning a failure into the
/// unavailable marker is the collector's job.
#[cfg_attr(test, mockall::automock)]
pub trait HostProbe {
    /// Average utilisation of all CPUs over `window`, in percent. Blocks.
    fn cpu_usage(&mut self, window: Duration) -> Result<f32>;

    fn load_average(&mut self) -> Result<LoadAverage>;

    /// Boot time as seconds since the Unix epoch
    fn boot_time(&mut self) -> Result<u64>;

    fn memory(&mut self) -> Result<MemoryUsage>;

    fn swap(&mut self) -> Result<MemoryUsage>;

    /// Usage of the filesystem mounted exactly at `mount`, `None` if nothing is mounted there
    fn filesystem_usage(&mut self, mount: &Path) -> Result<Option<FilesystemUsage>>;

    fn network_counters(&mut self) -> Result<NetworkCounters>;

    fn disk_counters(&mut self) -> Result<DiskCounters>;

    fn process_count(&mut self) -> Result<usize>;

    fn interface_addresses(&mut self) -> Result<Vec<InterfaceAddress>>;

    fn tcp_connections(&mut self) -> Result<Vec<TcpConnection>>;

    /// Trimmed contents of a sysfs attribute
    fn read_sysfs(&mut self, path: &Path) -> Result<String>;

    /// Temperatures in degrees Celsius from the generic sensor API
    fn sensor_temperatures(&mut self) -> Result<Vec<f32>>;

    /// Stdout of `smbstatus -b`, `None` when no variant of the command could run
    fn smbstatus(&mut self) -> Result<Option<String>>;

    /// Wait out a measurement window
    fn pause(&mut self, window: Duration);
}

/// Host probe backed by the live system
pub struct SystemProbe {
    system: System,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe {
    pub fn new() -> Self {
        debug!("Initializing system probe");
        Self {
            system: System::new(),
        }
    }
}

impl HostProbe for SystemProbe {
    fn cpu_usage(&mut self, window: Duration) -> Result<f32> {
        self.system
            .refresh_cpu_specifics(CpuRefreshKind::new().with_cpu_usage());
        thread::sleep(window);
        self.system
            .refresh_cpu_specifics(CpuRefreshKind::new().with_cpu_usage());

        if self.system.cpus().is_empty() {
            bail!("No CPUs reported by the system");
        }
        Ok(self.system.global_cpu_info().cpu_usage())
    }

    fn load_average(&mut self) -> Result<LoadAverage> {
        read_load_average()
    }

    fn boot_time(&mut self) -> Result<u64> {
        match self.system.boot_time() {
            0 => bail!("Boot time is not available"),
            secs => Ok(secs),
        }
    }

    fn memory(&mut self) -> Result<MemoryUsage> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            bail!("Memory accounting is not available");
        }
        Ok(MemoryUsage {
            total,
            used: self.system.used_memory(),
        })
    }

    fn swap(&mut self) -> Result<MemoryUsage> {
        self.system.refresh_memory();
        Ok(MemoryUsage {
            total: self.system.total_swap(),
            used: self.system.used_swap(),
        })
    }

    fn filesystem_usage(&mut self, mount: &Path) -> Result<Option<FilesystemUsage>> {
        self.system.refresh_disks_list();
        self.system.refresh_disks();

        Ok(self
            .system
            .disks()
            .iter()
            .find(|disk| disk.mount_point() == mount)
            .map(|disk| FilesystemUsage {
                total: disk.total_space(),
                available: disk.available_space(),
            }))
    }

    fn network_counters(&mut self) -> Result<NetworkCounters> {
        self.system.refresh_networks_list();
        self.system.refresh_networks();

        let mut counters = NetworkCounters {
            received: 0,
            transmitted: 0,
        };
        for (_name, data) in self.system.networks() {
            counters.received += data.total_received();
            counters.transmitted += data.total_transmitted();
        }
        Ok(counters)
    }

    fn disk_counters(&mut self) -> Result<DiskCounters> {
        let content = fs::read_to_string(PROC_DISKSTATS)
            .context(format!("Failed to read {}", PROC_DISKSTATS))?;
        procfs::parse_diskstats(&content, |name| {
            Path::new("/sys/block").join(name).exists()
        })
    }

    fn process_count(&mut self) -> Result<usize> {
        self.system
            .refresh_processes_specifics(ProcessRefreshKind::new());
        match self.system.processes().len() {
            0 => bail!("No processes visible"),
            count => Ok(count),
        }
    }

    fn interface_addresses(&mut self) -> Result<Vec<InterfaceAddress>> {
        let interfaces =
            get_if_addrs::get_if_addrs().context("Failed to enumerate network interfaces")?;
        Ok(interfaces
            .into_iter()
            .map(|iface| InterfaceAddress {
                ip: iface.ip(),
                name: iface.name,
            })
            .collect())
    }

    fn tcp_connections(&mut self) -> Result<Vec<TcpConnection>> {
        let tcp = fs::read_to_string(PROC_NET_TCP)
            .context(format!("Failed to read {}", PROC_NET_TCP))?;
        let mut connections = procfs::parse_tcp_table(&tcp);

        // tcp6 is absent when IPv6 is disabled
        match fs::read_to_string(PROC_NET_TCP6) {
            Ok(tcp6) => connections.extend(procfs::parse_tcp_table(&tcp6)),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).context(format!("Failed to read {}", PROC_NET_TCP6)),
        }

        Ok(connections)
    }

    fn read_sysfs(&mut self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .context(format!("Failed to read {}", path.display()))
    }

    fn sensor_temperatures(&mut self) -> Result<Vec<f32>> {
        self.system.refresh_components_list();
        Ok(self
            .system
            .components()
            .iter()
            .map(|component| component.temperature())
            .filter(|t| t.is_finite())
            .collect())
    }

    fn smbstatus(&mut self) -> Result<Option<String>> {
        let candidates: [&[&str]; 2] = [&["sudo", "-n", "smbstatus", "-b"], &["smbstatus", "-b"]];

        for argv in candidates {
            match run_with_timeout(argv, Duration::from_secs(SMBSTATUS_TIMEOUT_SECS))? {
                Some((true, stdout)) => return Ok(Some(stdout)),
                Some((false, _)) => debug!("{} exited unsuccessfully", argv.join(" ")),
                None => debug!("{} is not installed", argv[0]),
            }
        }

        Ok(None)
    }

    fn pause(&mut self, window: Duration) {
        thread::sleep(window);
    }
}

#[cfg(unix)]
fn read_load_average() -> Result<LoadAverage> {
    let mut loads = [0f64; 3];
    // SAFETY: the pointer refers to a live array of exactly three doubles
    let filled = unsafe { libc::getloadavg(loads.as_mut_ptr(), 3) };
    if filled < 3 {
        bail!("getloadavg returned {} samples", filled);
    }
    Ok(LoadAverage {
        one: loads[0],
        five: loads[1],
        fifteen: loads[2],
    })
}

#[cfg(not(unix))]
fn read_load_average() -> Result<LoadAverage> {
    bail!("Load averages are not available on this platform")
}

/// Run a command, killing it after `timeout`.
///
/// Returns `None` if the program does not exist, otherwise whether it
/// exited successfully and its stdout.
fn run_with_timeout(argv: &[&str], timeout: Duration) -> Result<Option<(bool, String)>> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("Empty command line"))?;

    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context(format!("Failed to execute {}", program)),
    };

    // Drain stdout while waiting so a chatty child never stalls on a full pipe
    let reader = child.stdout.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut stdout = String::new();
            pipe.read_to_string(&mut stdout).map(|_| stdout)
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait().context("Failed to wait for child")? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            // The reader is left detached; a grandchild may still hold the pipe
            bail!("{} timed out after {:?}", program, timeout);
        }
        thread::sleep(Duration::from_millis(50));
    };

    let stdout = match reader {
        Some(reader) => reader
            .join()
            .map_err(|_| anyhow!("Output reader for {} panicked", program))?
            .context(format!("Failed to read output of {}", program))?,
        None => String::new(),
    };

    Ok(Some((status.success(), stdout)))
}
