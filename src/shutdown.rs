//! Process-wide stop request raised by SIGINT and SIGTERM.
//!
//! The handler only stores into an atomic; the run loop polls
//! [`shutdown_flag`] between ticks and while sleeping.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use log::debug;

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

pub fn shutdown_flag() -> &'static AtomicBool {
    &SHUTDOWN_REQUESTED
}

#[cfg(unix)]
extern "C" fn handle_signal(_signal: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Route SIGINT and SIGTERM to the stop flag
#[cfg(unix)]
pub fn install_handlers() -> Result<()> {
    let handler = handle_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;

    for signal in [libc::SIGINT, libc::SIGTERM] {
        // SAFETY: the handler only performs an atomic store, which is
        // async-signal-safe.
        let previous = unsafe { libc::signal(signal, handler) };
        if previous == libc::SIG_ERR {
            bail!("Failed to install handler for signal {}", signal);
        }
    }

    debug!("Installed SIGINT and SIGTERM handlers");
    Ok(())
}

#[cfg(not(unix))]
pub fn install_handlers() -> Result<()> {
    debug!("Signal handlers unsupported on this platform");
    Ok(())
}
