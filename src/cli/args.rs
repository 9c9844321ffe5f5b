//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use crate::core::config::Config;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

/// Download photos from a list of URLs, remove duplicates, and rename them by date
#[derive(Parser, Debug)]
#[command(name = "photo-organizer")]
#[command(version = "1.0.0")]
#[command(about = "Download, deduplicate and organize photos", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file (default: ./config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

impl Args {
    /// Log level for this run: `--log-level` if given, else the config's
    ///
    /// The override is never written into `config`, so saving the config
    /// from the menu doesn't persist it.
    pub fn log_level<'a>(&'a self, config: &'a Config) -> &'a str {
        self.log_level.as_deref().unwrap_or(&config.logging.level)
    }
}

/// Map a level name to a filter, defaulting to `Info`
pub fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every URL listed in a text file
    Download {
        /// File with one URL per line
        #[arg(short, long, value_name = "FILE")]
        urls: PathBuf,

        /// First date of the range (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Last date of the range (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<String>,

        /// Rename the downloads into the organized folder afterwards
        #[arg(long)]
        organize: bool,
    },

    /// Remove thumbnails and duplicates from a folder, then rename the rest
    Organize {
        /// Folder to organize (defaults to the download folder)
        folder: Option<PathBuf>,

        /// First date of the range (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Last date of the range (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<String>,
    },

    /// Show current configuration
    ShowConfig,
}
