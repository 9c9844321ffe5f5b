//! Photo Organizer - CLI Entry Point
//!
//! This binary is a thin wrapper around the library, handling argument parsing,
//! logging setup, and command dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::info;
use photo_organizer::cli::args::level_filter;
use photo_organizer::cli::{self, Args, DualWriter};
use photo_organizer::core::config::{get_config_path, Config, ConfigError};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.clone().unwrap_or_else(get_config_path);
    let config = match Config::load(&config_path) {
        Ok(cfg) => cfg,
        Err(ConfigError::FileNotFound(_)) => Config::default(),
        Err(e) => {
            eprintln!("Warning: Failed to load config file, using defaults: {}", e);
            Config::default()
        }
    };

    // Set up graceful shutdown handler
    let shutdown_flag = Arc::new(AtomicBool::new(false));
    let shutdown_flag_clone = shutdown_flag.clone();

    ctrlc::set_handler(move || {
        if shutdown_flag_clone.load(Ordering::SeqCst) {
            // Second Ctrl+C - force exit
            eprintln!("\nForce shutdown requested. Exiting immediately...");
            std::process::exit(1);
        } else {
            shutdown_flag_clone.store(true, Ordering::SeqCst);
            eprintln!("\nStopping after the current download... (Press Ctrl+C again to force quit)");
        }
    })
    .context("Failed to set Ctrl+C handler")?;

    // Initialize logger
    let log_level = level_filter(args.log_level(&config));

    if config.logging.log_to_file {
        // Set up logging to both console and file
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.log_file)
            .with_context(|| {
                format!(
                    "Failed to open log file {}",
                    config.logging.log_file.display()
                )
            })?;

        Builder::new()
            .filter_level(log_level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{} {} {}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .target(env_logger::Target::Pipe(Box::new(DualWriter {
                console: std::io::stderr(),
                file: log_file,
            })))
            .init();

        info!("Logging to file: {}", config.logging.log_file.display());
    } else {
        Builder::new().filter_level(log_level).init();
    }

    info!("Photo Organizer v{}", photo_organizer::VERSION);

    config
        .ensure_folders()
        .context("Failed to create working folders")?;

    // Run the command
    cli::run_command(&args, &config, &config_path, shutdown_flag)?;

    Ok(())
}
