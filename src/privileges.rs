use log::{info, warn};

/// Check if the process is running as root
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid takes no arguments and cannot fail
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Warn that socket tables and `smbstatus` may be partial without root
pub fn check_privileges() {
    if is_elevated() {
        info!("Running as root");
    } else {
        warn!("Running without root privileges - connection counts may be incomplete");
        warn!("Run with sudo: 'sudo server-monitor <PORT>'");
    }
}
