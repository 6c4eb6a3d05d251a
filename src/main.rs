use std::io;
use std::process;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use server_monitor::cli::{Args, Commands};
use server_monitor::collectors::SystemProbe;
use server_monitor::config::{load_config, MonitorConfig};
use server_monitor::privileges::check_privileges;
use server_monitor::runner::{run, RunOptions};
use server_monitor::sampler::Sampler;
use server_monitor::shutdown;
use server_monitor::transport::{write_sample, SerialSession};

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd);
    }

    // Load configuration, then let the command line win
    let config = load_and_apply_config(&args)?;

    check_privileges();

    let mut sampler = Sampler::new(SystemProbe::new(), config.sampling.clone());

    if args.once {
        return dry_run(&mut sampler);
    }

    let port = config.serial.port.clone().ok_or_else(|| {
        anyhow!("No serial port given: pass PORT or set serial.port in the configuration")
    })?;
    let baud_rate = config.serial.baud_rate;
    let read_timeout = Duration::from_millis(config.serial.read_timeout_ms);

    shutdown::install_handlers()?;

    info!("Starting server monitor on {}", port);
    let options = RunOptions::from_config(&config, args.count)?;
    let reason = run(
        || SerialSession::open(&port, baud_rate, read_timeout),
        &mut sampler,
        &options,
        shutdown::shutdown_flag(),
    );

    process::exit(reason.exit_code());
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    // Stderr keeps log lines out of the stdout status line and dry-run output
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Handle subcommands (init-config)
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            MonitorConfig::create_default_config_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
    }
}

/// Load the configuration file, apply command-line overrides and validate
fn load_and_apply_config(args: &Args) -> Result<MonitorConfig> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Print a single record to stdout without touching the serial port
fn dry_run(sampler: &mut Sampler<SystemProbe>) -> Result<()> {
    info!("Dry run: printing one record to stdout");
    let sample = sampler.collect();
    let mut stdout = io::stdout().lock();
    write_sample(&mut stdout, &sample, Duration::ZERO).context("Failed to print record")?;
    Ok(())
}
