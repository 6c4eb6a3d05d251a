//! Parsers for the Linux `/proc` tables the collectors rely on.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use anyhow::{bail, Result};

use crate::collectors::probe::{DiskCounters, TcpConnection};
use crate::constants::{DISKSTATS_SECTOR_SIZE, TCP_STATE_ESTABLISHED};

/// Sum sectors read and written over the devices `is_whole_disk` accepts.
///
/// Partitions are rejected by the caller so their traffic is not counted twice.
pub fn parse_diskstats<F>(content: &str, is_whole_disk: F) -> Result<DiskCounters>
where
    F: Fn(&str) -> bool,
{
    let mut counters = DiskCounters { read: 0, written: 0 };
    let mut matched = 0usize;

    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        // major minor name reads merged sectors_read ms writes merged sectors_written ...
        if fields.len() < 10 || !is_whole_disk(fields[2]) {
            continue;
        }

        let (Ok(sectors_read), Ok(sectors_written)) =
            (fields[5].parse::<u64>(), fields[9].parse::<u64>())
        else {
            continue;
        };

        counters.read += sectors_read * DISKSTATS_SECTOR_SIZE;
        counters.written += sectors_written * DISKSTATS_SECTOR_SIZE;
        matched += 1;
    }

    if matched == 0 {
        bail!("No disk devices found in diskstats");
    }
    Ok(counters)
}

/// Parse `/proc/net/tcp` or `/proc/net/tcp6`, skipping malformed rows.
pub fn parse_tcp_table(content: &str) -> Vec<TcpConnection> {
    let mut connections = Vec::new();

    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }

        let (Some(local), Some(remote)) = (parse_hex_socket(fields[1]), parse_hex_socket(fields[2]))
        else {
            continue;
        };

        connections.push(TcpConnection {
            local,
            remote,
            established: fields[3] == TCP_STATE_ESTABLISHED,
        });
    }

    connections
}

/// Decode a kernel `ADDR:PORT` pair where ADDR is 8 (IPv4) or 32 (IPv6) hex digits.
///
/// The kernel prints each 32-bit word of the address in host byte order.
pub fn parse_hex_socket(field: &str) -> Option<SocketAddr> {
    let (addr, port) = field.split_once(':')?;
    let port = u16::from_str_radix(port, 16).ok()?;

    let ip = match addr.len() {
        8 => {
            let word = u32::from_str_radix(addr, 16).ok()?;
            IpAddr::V4(Ipv4Addr::from(word.to_ne_bytes()))
        }
        32 => {
            let mut octets = [0u8; 16];
            for (i, chunk) in octets.chunks_exact_mut(4).enumerate() {
                let word = u32::from_str_radix(addr.get(i * 8..i * 8 + 8)?, 16).ok()?;
                chunk.copy_from_slice(&word.to_ne_bytes());
            }
            IpAddr::V6(Ipv6Addr::from(octets))
        }
        _ => return None,
    };

    Some(SocketAddr::new(ip, port))
}
