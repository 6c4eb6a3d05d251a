//! Network throughput, address and connection collectors.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use log::debug;

use crate::collectors::probe::{HostProbe, InterfaceAddress, TcpConnection};
use crate::config::SmbSource;
use crate::constants::{
    BITS_PER_BYTE, KILO, PHYSICAL_INTERFACE_PREFIXES, UNSPECIFIED_IP, VIRTUAL_INTERFACE_PREFIXES,
};
use crate::models::Reading;

/// Receive and transmit throughput in kbit/s, as integers.
///
/// Blocks for `interval_secs`. A non-positive interval returns immediately.
pub fn collect_network_throughput(
    probe: &mut dyn HostProbe,
    interval_secs: f64,
) -> (Reading, Reading) {
    if !interval_secs.is_finite() || interval_secs <= 0.0 {
        return (Reading::Unavailable, Reading::Unavailable);
    }

    let first = match probe.network_counters() {
        Ok(counters) => counters,
        Err(e) => {
            debug!("Network counters unavailable: {:#}", e);
            return (Reading::Unavailable, Reading::Unavailable);
        }
    };

    probe.pause(Duration::from_secs_f64(interval_secs));

    let second = match probe.network_counters() {
        Ok(counters) => counters,
        Err(e) => {
            debug!("Network counters unavailable: {:#}", e);
            return (Reading::Unavailable, Reading::Unavailable);
        }
    };

    // Counters can go backwards when an interface is reset
    let rx = kilobits_per_sec(second.received.saturating_sub(first.received), interval_secs);
    let tx = kilobits_per_sec(
        second.transmitted.saturating_sub(first.transmitted),
        interval_secs,
    );

    (
        Reading::Measured(format!("{:.0}", rx)),
        Reading::Measured(format!("{:.0}", tx)),
    )
}

pub fn kilobits_per_sec(delta_bytes: u64, interval_secs: f64) -> f64 {
    delta_bytes as f64 * BITS_PER_BYTE / KILO / interval_secs
}

/// The host's LAN address, or `0.0.0.0` if none qualifies
pub fn collect_local_ip(probe: &mut dyn HostProbe) -> Reading {
    let addresses = match probe.interface_addresses() {
        Ok(addresses) => addresses,
        Err(e) => {
            debug!("Interface enumeration failed: {:#}", e);
            return Reading::measured(UNSPECIFIED_IP);
        }
    };

    match select_local_ip(&addresses) {
        Some(ip) => Reading::Measured(ip.to_string()),
        None => Reading::measured(UNSPECIFIED_IP),
    }
}

/// Pick the most meaningful IPv4 address.
///
/// Virtual interfaces (VPN, tunnels, bridges, containers) are ignored. An
/// interface named like physical Ethernet wins; otherwise the first
/// remaining private-range address is used.
pub fn select_local_ip(addresses: &[InterfaceAddress]) -> Option<Ipv4Addr> {
    let candidates: Vec<(&str, Ipv4Addr)> = addresses
        .iter()
        .filter(|a| !has_prefix(&a.name, VIRTUAL_INTERFACE_PREFIXES))
        .filter_map(|a| match a.ip {
            IpAddr::V4(ip) if !ip.is_loopback() => Some((a.name.as_str(), ip)),
            _ => None,
        })
        .collect();

    candidates
        .iter()
        .find(|(name, _)| has_prefix(name, PHYSICAL_INTERFACE_PREFIXES))
        .or_else(|| candidates.iter().find(|(_, ip)| ip.is_private()))
        .map(|(_, ip)| *ip)
}

fn has_prefix(name: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| name.starts_with(prefix))
}

/// Number of distinct peers using the file-sharing service
pub fn collect_file_share_clients(
    probe: &mut dyn HostProbe,
    source: SmbSource,
    ports: &[u16],
) -> Reading {
    match source {
        SmbSource::Ports => match probe.tcp_connections() {
            Ok(connections) => {
                Reading::Measured(count_file_share_clients(&connections, ports).to_string())
            }
            Err(e) => {
                debug!("TCP table unavailable: {:#}", e);
                Reading::Unavailable
            }
        },
        SmbSource::Smbstatus => match probe.smbstatus() {
            Ok(Some(output)) => Reading::Measured(parse_smbstatus(&output).to_string()),
            // Samba is not installed, so nobody is connected
            Ok(None) => Reading::measured("0"),
            Err(e) => {
                debug!("smbstatus failed: {:#}", e);
                Reading::Unavailable
            }
        },
    }
}

/// Established TCP connections to local service ports.
///
/// Local ports at or above `ephemeral_floor` are assumed to be outgoing
/// connections. This is a heuristic, not a protocol-level classification.
pub fn collect_incoming_connections(
    probe: &mut dyn HostProbe,
    file_share_ports: &[u16],
    ephemeral_floor: u16,
) -> Reading {
    match probe.tcp_connections() {
        Ok(connections) => Reading::Measured(
            count_incoming_connections(&connections, file_share_ports, ephemeral_floor)
                .to_string(),
        ),
        Err(e) => {
            debug!("TCP table unavailable: {:#}", e);
            Reading::Unavailable
        }
    }
}

pub fn count_file_share_clients(connections: &[TcpConnection], ports: &[u16]) -> usize {
    connections
        .iter()
        .filter(|c| c.established && ports.contains(&c.local.port()))
        .map(|c| canonical_ip(c.remote.ip()))
        .collect::<HashSet<_>>()
        .len()
}

pub fn count_incoming_connections(
    connections: &[TcpConnection],
    file_share_ports: &[u16],
    ephemeral_floor: u16,
) -> usize {
    connections
        .iter()
        .filter(|c| c.established)
        .filter(|c| c.local.port() < ephemeral_floor)
        .filter(|c| !file_share_ports.contains(&c.local.port()))
        .count()
}

/// Treat `::ffff:a.b.c.d` and `a.b.c.d` as the same peer
fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(IpAddr::V6(v6), IpAddr::V4),
        v4 => v4,
    }
}

/// Count distinct clients in `smbstatus -b` output.
///
/// Rows follow the `----` separator as `PID Username Group Machine ...`.
/// The machine column may be followed by `(ip)`; the address is preferred
/// when present.
pub fn parse_smbstatus(output: &str) -> usize {
    let mut clients: HashSet<String> = HashSet::new();
    let mut in_connections = false;

    for line in output.lines() {
        let line = line.trim();

        if line.contains("----") {
            in_connections = true;
            continue;
        }
        if !in_connections || line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 || !parts[0].chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let client = parts
            .iter()
            .find_map(|part| part.strip_prefix('(').and_then(|p| p.strip_suffix(')')))
            .map(strip_smb_address)
            .unwrap_or(parts[3]);
        clients.insert(client.to_string());
    }

    clients.len()
}

/// `ipv4:192.168.1.100:50000` -> `192.168.1.100`; bare addresses pass through
fn strip_smb_address(inner: &str) -> &str {
    match inner
        .strip_prefix("ipv4:")
        .or_else(|| inner.strip_prefix("ipv6:"))
    {
        Some(rest) => rest.rsplit_once(':').map_or(rest, |(addr, _port)| addr),
        None => inner,
    }
}
