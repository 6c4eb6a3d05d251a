use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::constants::END_OF_RECORD;
use crate::models::Sample;

/// Render a sample as wire lines: one `key=value` per metric, then `END`.
///
/// Lines carry no terminator; [`write_sample`] appends `\n`.
pub fn encode(sample: &Sample) -> Vec<String> {
    let mut lines: Vec<String> = sample
        .iter()
        .map(|(key, reading)| format!("{}={}", key, reading))
        .collect();
    lines.push(END_OF_RECORD.to_string());
    lines
}

/// Write one sample to `writer`, pausing `pacing` after each metric line so
/// a slow receiver can keep up. The record is flushed after `END`.
pub fn write_sample<W: Write + ?Sized>(
    writer: &mut W,
    sample: &Sample,
    pacing: Duration,
) -> Result<()> {
    let lines = encode(sample);
    let last = lines.len() - 1;

    for (i, line) in lines.iter().enumerate() {
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .context(format!("Failed to write line '{}'", line))?;

        if i < last && !pacing.is_zero() {
            thread::sleep(pacing);
        }
    }

    writer.flush().context("Failed to flush record")?;
    Ok(())
}
