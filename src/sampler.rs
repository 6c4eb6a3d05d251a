use std::time::{Duration, Instant};

use log::debug;

use crate::collectors::network::{
    collect_file_share_clients, collect_incoming_connections, collect_local_ip,
    collect_network_throughput,
};
use crate::collectors::memory::{collect_memory, collect_swap};
use crate::collectors::storage::{collect_disk_io, collect_disk_usage};
use crate::collectors::system::{
    collect_cpu_percent, collect_cpu_temperature, collect_load_average, collect_process_count,
    collect_uptime,
};
use crate::collectors::HostProbe;
use crate::config::SamplingConfig;
use crate::models::{MetricKey, Sample};

/// Runs every collector once per tick and assembles the results.
pub struct Sampler<P: HostProbe> {
    probe: P,
    config: SamplingConfig,
    last_duration: Duration,
}

impl<P: HostProbe> Sampler<P> {
    pub fn new(probe: P, config: SamplingConfig) -> Self {
        Self {
            probe,
            config,
            last_duration: Duration::ZERO,
        }
    }

    /// How long the most recent [`collect`](Self::collect) took
    pub fn last_duration(&self) -> Duration {
        self.last_duration
    }

    /// Take one sample.
    ///
    /// Blocks for the CPU, network and disk windows in turn. The result
    /// always holds every key.
    pub fn collect(&mut self) -> Sample {
        let started = Instant::now();
        let probe: &mut dyn HostProbe = &mut self.probe;
        let config = &self.config;
        let mut sample = Sample::new();

        sample.set(
            MetricKey::CpuPct,
            collect_cpu_percent(probe, Duration::from_millis(config.cpu_window_ms)),
        );
        sample.set(
            MetricKey::CpuTemp,
            collect_cpu_temperature(probe, &config.thermal_paths),
        );

        let (ram_used, ram_total, ram_pct) = collect_memory(probe);
        sample.set(MetricKey::RamUsed, ram_used);
        sample.set(MetricKey::RamTotal, ram_total);
        sample.set(MetricKey::RamPct, ram_pct);

        let (swap_used, swap_total, swap_pct) = collect_swap(probe);
        sample.set(MetricKey::SwapUsed, swap_used);
        sample.set(MetricKey::SwapTotal, swap_total);
        sample.set(MetricKey::SwapPct, swap_pct);

        let (disk_used, disk_total, disk_pct) = collect_disk_usage(probe, &config.data_mount);
        sample.set(MetricKey::DiskUsed, disk_used);
        sample.set(MetricKey::DiskTotal, disk_total);
        sample.set(MetricKey::DiskPct, disk_pct);

        let (load_1, load_5, load_15) = collect_load_average(probe);
        sample.set(MetricKey::Load1, load_1);
        sample.set(MetricKey::Load5, load_5);
        sample.set(MetricKey::Load15, load_15);

        sample.set(MetricKey::Ip, collect_local_ip(probe));
        sample.set(MetricKey::Uptime, collect_uptime(probe));
        sample.set(MetricKey::ProcCount, collect_process_count(probe));
        sample.set(
            MetricKey::SmbClients,
            collect_file_share_clients(probe, config.smb_source, &config.file_share_ports),
        );
        sample.set(
            MetricKey::ConnIn,
            collect_incoming_connections(
                probe,
                &config.file_share_ports,
                config.ephemeral_port_floor,
            ),
        );

        let (net_rx, net_tx) =
            collect_network_throughput(probe, window_secs(config.network_window_ms));
        sample.set(MetricKey::NetRx, net_rx);
        sample.set(MetricKey::NetTx, net_tx);

        let (disk_read, disk_write) = collect_disk_io(probe, window_secs(config.disk_window_ms));
        sample.set(MetricKey::DiskRead, disk_read);
        sample.set(MetricKey::DiskWrite, disk_write);

        self.last_duration = started.elapsed();
        debug!(
            "Collected sample in {:?} ({} of {} unavailable)",
            self.last_duration,
            sample.unavailable_count(),
            sample.len()
        );
        sample
    }
}

fn window_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;
    use crate::test_utils::{failing_probe, healthy_probe};

    #[test]
    fn test_all_failures_still_yield_every_key() {
        let mut sampler = Sampler::new(failing_probe(), SamplingConfig::default());
        let sample = sampler.collect();

        assert_eq!(sample.len(), MetricKey::ALL.len());
        // The address falls back to 0.0.0.0 rather than the sentinel
        assert_eq!(sample.get(MetricKey::Ip), &Reading::measured("0.0.0.0"));
        assert_eq!(sample.unavailable_count(), MetricKey::ALL.len() - 1);
    }

    #[test]
    fn test_healthy_sample() {
        let mut sampler = Sampler::new(healthy_probe(true), SamplingConfig::default());
        let sample = sampler.collect();

        assert_eq!(sample.unavailable_count(), 0);
        assert_eq!(sample.get(MetricKey::Ip).as_str(), "192.168.1.50");
        assert_eq!(sample.get(MetricKey::CpuPct).as_str(), "12");
        assert_eq!(sample.get(MetricKey::CpuTemp).as_str(), "48");
        assert_eq!(sample.get(MetricKey::Load1).as_str(), "0.42");
        assert_eq!(sample.get(MetricKey::RamPct).as_str(), "25");
        assert_eq!(sample.get(MetricKey::SwapPct).as_str(), "0");
        assert_eq!(sample.get(MetricKey::DiskUsed).as_str(), "50");
        assert_eq!(sample.get(MetricKey::DiskPct).as_str(), "50");
        assert_eq!(sample.get(MetricKey::NetRx).as_str(), "0");
        assert_eq!(sample.get(MetricKey::DiskWrite).as_str(), "0.0");
        assert_eq!(sample.get(MetricKey::ProcCount).as_str(), "150");
        assert_eq!(sample.get(MetricKey::SmbClients).as_str(), "0");
        assert_eq!(sample.get(MetricKey::ConnIn).as_str(), "0");
    }

    #[test]
    fn test_partial_failure_is_isolated() {
        let mut sampler = Sampler::new(healthy_probe(false), SamplingConfig::default());
        let sample = sampler.collect();

        assert_eq!(sample.len(), MetricKey::ALL.len());
        assert_eq!(sample.get(MetricKey::RamUsed), &Reading::Unavailable);
        assert_eq!(sample.get(MetricKey::RamTotal), &Reading::Unavailable);
        assert_eq!(sample.get(MetricKey::RamPct), &Reading::Unavailable);
        assert_eq!(sample.unavailable_count(), 3);
        assert_eq!(sample.get(MetricKey::SwapTotal).as_str(), "2048");
    }

    #[test]
    fn test_zero_windows_skip_rate_collectors() {
        let config = SamplingConfig {
            network_window_ms: 0,
            disk_window_ms: 0,
            ..SamplingConfig::default()
        };

        let mut sampler = Sampler::new(healthy_probe(true), config);
        let sample = sampler.collect();
        assert_eq!(sample.get(MetricKey::NetRx), &Reading::Unavailable);
        assert_eq!(sample.get(MetricKey::NetTx), &Reading::Unavailable);
        assert_eq!(sample.get(MetricKey::DiskRead), &Reading::Unavailable);
        assert_eq!(sample.get(MetricKey::DiskWrite), &Reading::Unavailable);
        assert_eq!(sample.unavailable_count(), 4);
    }

    #[test]
    fn test_records_duration() {
        let mut sampler = Sampler::new(failing_probe(), SamplingConfig::default());
        assert_eq!(sampler.last_duration(), Duration::ZERO);
        sampler.collect();
        // The mock never sleeps, so a tick is quick
        assert!(sampler.last_duration() < Duration::from_secs(1));
    }
}
