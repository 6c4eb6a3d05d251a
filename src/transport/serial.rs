use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serialport::SerialPort;

/// Exclusive handle on the display's serial link.
///
/// The port closes when the session drops, which happens exactly once on
/// every exit path.
pub struct SerialSession {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialSession {
    pub fn open(path: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self> {
        debug!(
            "Opening {} at {} baud (timeout {:?})",
            path, baud_rate, read_timeout
        );

        let port = serialport::new(path, baud_rate)
            .timeout(read_timeout)
            .open()
            .context(format!("Failed to open serial port {}", path))?;

        info!("Connected to {} at {} baud", path, baud_rate);
        Ok(Self {
            port,
            path: path.to_string(),
        })
    }
}

impl Write for SerialSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl Drop for SerialSession {
    fn drop(&mut self) {
        info!("Serial port {} closed", self.path);
    }
}
