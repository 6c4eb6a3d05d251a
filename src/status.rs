//! One-line console summary, redrawn in place every tick.

use std::io::{self, Write};

use chrono::Local;

use crate::models::{MetricKey, Sample};

// Trailing padding clears leftovers from a longer previous line
const LINE_PADDING: &str = "      ";

/// Format the status line for `sample` stamped with `clock` (`HH:MM:SS`).
pub fn format_status_line(sample: &Sample, clock: &str) -> String {
    format!(
        "[{}] CPU: {}% @ {}C | RAM: {}% | LOAD: {} | SMB: {} | CONN: {}",
        clock,
        sample.get(MetricKey::CpuPct),
        sample.get(MetricKey::CpuTemp),
        sample.get(MetricKey::RamPct),
        sample.get(MetricKey::Load1),
        sample.get(MetricKey::SmbClients),
        sample.get(MetricKey::ConnIn),
    )
}

/// Overwrite the current terminal line with the status of `sample`
pub fn print_status(sample: &Sample) -> io::Result<()> {
    let clock = Local::now().format("%H:%M:%S").to_string();
    let mut stdout = io::stdout().lock();
    write!(
        stdout,
        "\r{}{}",
        format_status_line(sample, &clock),
        LINE_PADDING
    )?;
    stdout.flush()
}
