//! Host metric collectors.
//!
//! Each collector measures one facet of host state through a
//! [`HostProbe`](probe::HostProbe) and returns a [`Reading`](crate::models::Reading).
//! Collectors never fail: any fault at the OS boundary is logged at debug
//! level and reported as unavailable, so one missing sensor cannot abort
//! a tick.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               Sampler                   │
//! ├─────────────────────────────────────────┤
//! │            Collectors                   │
//! │  ┌─────────┬──────────┬──────────┐      │
//! │  │ System  │  Memory  │ Storage  │      │
//! │  ├─────────┴──────────┴──────────┤      │
//! │  │           Network             │      │
//! │  └───────────────────────────────┘      │
//! ├─────────────────────────────────────────┤
//! │    HostProbe (sysinfo, /proc, libc)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Two collectors measure a rate and block for their window: network
//! throughput and disk IO. CPU utilisation blocks inside the probe.

/// OS boundary trait and its live implementation
pub mod probe;

/// `/proc` table parsers
pub mod procfs;

/// CPU, temperature, uptime, load and process count
pub mod system;

/// RAM and swap
pub mod memory;

/// Filesystem usage and disk IO
pub mod storage;

/// Throughput, local address and TCP connection counts
pub mod network;

pub use probe::{HostProbe, SystemProbe};
