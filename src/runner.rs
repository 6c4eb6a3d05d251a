//! The streaming driver: Connecting, then Streaming, then Closed.
//!
//! ```text
//! Connecting ──open ok──▶ Streaming ──stop / fault / count──▶ Closed
//!      │                                                        ▲
//!      └────────────────────open failed─────────────────────────┘
//! ```
//!
//! A tick is: check the stop flag, sample, print the status line, write the
//! record, then sleep the full interval. The period is therefore the
//! collection time plus the interval.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, error, info};

use crate::collectors::HostProbe;
use crate::config::MonitorConfig;
use crate::constants::STOP_POLL_SLICE_MS;
use crate::sampler::Sampler;
use crate::status::print_status;
use crate::transport::write_sample;

/// Why streaming ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of ticks was sent
    Completed,
    /// SIGINT or SIGTERM
    Interrupted,
    /// The serial device could not be opened
    OpenFailed,
    /// A write to the open device failed
    TransportFault,
}

impl StopReason {
    pub fn exit_code(self) -> i32 {
        match self {
            StopReason::Completed | StopReason::Interrupted => 0,
            StopReason::OpenFailed | StopReason::TransportFault => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub interval: Duration,
    pub pacing: Duration,
    pub max_ticks: Option<u64>,
    pub show_status: bool,
}

impl RunOptions {
    pub fn from_config(config: &MonitorConfig, max_ticks: Option<u64>) -> Result<Self> {
        let interval = Duration::try_from_secs_f64(config.sampling.interval_secs).context(
            format!("Invalid reporting interval {}", config.sampling.interval_secs),
        )?;

        Ok(Self {
            interval,
            pacing: Duration::from_millis(config.serial.line_delay_ms),
            max_ticks,
            show_status: true,
        })
    }
}

/// Monotonic interval timer that gives up early when asked to stop.
pub struct Ticker {
    interval: Duration,
    slice: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            slice: Duration::from_millis(STOP_POLL_SLICE_MS),
        }
    }

    /// Sleep one interval. Returns `false` if `stop` was raised meanwhile.
    pub fn wait(&self, stop: &AtomicBool) -> bool {
        let deadline = Instant::now() + self.interval;

        loop {
            if stop.load(Ordering::SeqCst) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(self.slice.min(deadline - now));
        }
    }
}

/// Open the transport with `open`, stream until stopped, then release it.
///
/// The session is owned here and dropped once, whichever way streaming ends.
pub fn run<W, F, P>(
    open: F,
    sampler: &mut Sampler<P>,
    options: &RunOptions,
    stop: &AtomicBool,
) -> StopReason
where
    W: Write,
    F: FnOnce() -> Result<W>,
    P: HostProbe,
{
    let mut session = match open() {
        Ok(session) => session,
        Err(e) => {
            error!("{:#}", e);
            return StopReason::OpenFailed;
        }
    };

    let reason = stream(&mut session, sampler, options, stop);
    drop(session);

    if options.show_status {
        // Finish the in-place status line
        println!();
    }
    match reason {
        StopReason::Interrupted => info!("Interrupted by user"),
        StopReason::TransportFault => error!("Serial link lost, stopping"),
        StopReason::Completed => info!("Finished after the requested number of ticks"),
        StopReason::OpenFailed => {}
    }
    reason
}

/// Sample and send until `stop` is raised, a write fails, or `max_ticks`
/// records have been sent.
pub fn stream<W, P>(
    session: &mut W,
    sampler: &mut Sampler<P>,
    options: &RunOptions,
    stop: &AtomicBool,
) -> StopReason
where
    W: Write + ?Sized,
    P: HostProbe,
{
    let ticker = Ticker::new(options.interval);
    let mut ticks: u64 = 0;

    info!("Streaming every {:?}", options.interval);
    loop {
        if stop.load(Ordering::SeqCst) {
            return StopReason::Interrupted;
        }

        let sample = sampler.collect();

        if options.show_status {
            if let Err(e) = print_status(&sample) {
                debug!("Status line not printed: {}", e);
            }
        }

        if let Err(e) = write_sample(session, &sample, options.pacing) {
            error!("Serial write failed: {:#}", e);
            return StopReason::TransportFault;
        }

        ticks += 1;
        debug!("Tick {} sent", ticks);
        if options.max_ticks.is_some_and(|max| ticks >= max) {
            return StopReason::Completed;
        }

        if !ticker.wait(stop) {
            return StopReason::Interrupted;
        }
    }
}
