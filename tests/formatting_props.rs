//! Property tests for value formatting and record framing.

use proptest::prelude::*;

use server_monitor::collectors::network::{count_incoming_connections, kilobits_per_sec};
use server_monitor::collectors::system::format_uptime;
use server_monitor::models::{MetricKey, Reading, Sample};
use server_monitor::transport::encode;

#[test]
fn test_uptime_examples() {
    assert_eq!(format_uptime(90_061), "1d 1h 1m");
    assert_eq!(format_uptime(3_661), "1h 1m");
    assert_eq!(format_uptime(45), "0m");
}

fn reading() -> impl Strategy<Value = Reading> {
    prop_oneof![
        Just(Reading::Unavailable),
        "[0-9]{1,6}(\\.[0-9]{1,2})?".prop_map(Reading::Measured),
    ]
}

proptest! {
    #[test]
    fn uptime_round_trips_to_minutes(days in 0u64..5000, hours in 0u64..24, minutes in 0u64..60, seconds in 0u64..60) {
        let total = days * 86_400 + hours * 3_600 + minutes * 60 + seconds;
        let text = format_uptime(total);

        let expected = if days > 0 {
            format!("{}d {}h {}m", days, hours, minutes)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}m", minutes)
        };
        prop_assert_eq!(text, expected);
    }

    #[test]
    fn record_is_always_framed(readings in proptest::collection::vec(reading(), 23)) {
        let mut sample = Sample::new();
        for (key, reading) in MetricKey::ALL.iter().zip(readings) {
            sample.set(*key, reading);
        }

        let lines = encode(&sample);
        prop_assert_eq!(lines.len(), MetricKey::ALL.len() + 1);
        prop_assert_eq!(lines.last().map(String::as_str), Some("END"));
        for (line, key) in lines.iter().zip(MetricKey::ALL.iter()) {
            let (name, value) = line.split_once('=').expect("key=value");
            prop_assert_eq!(name, key.as_str());
            prop_assert!(!value.is_empty());
        }
    }

    #[test]
    fn throughput_scales_with_window(delta in 0u64..10_000_000, window_ms in 1u64..5_000) {
        let secs = window_ms as f64 / 1000.0;
        let kbps = kilobits_per_sec(delta, secs);
        let expected = delta as f64 * 8.0 / 1000.0 / secs;
        prop_assert!((kbps - expected).abs() < 1e-6 * expected.max(1.0));
    }

    #[test]
    fn ephemeral_ports_never_count_as_incoming(port in 49152u16..=u16::MAX) {
        let connection = server_monitor::collectors::probe::TcpConnection {
            local: format!("10.0.0.1:{}", port).parse().unwrap(),
            remote: "10.0.0.2:22".parse().unwrap(),
            established: true,
        };
        prop_assert_eq!(count_incoming_connections(&[connection], &[445, 139], 49152), 0);
    }
}
