//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::menu::App;
use crate::cli::progress::{
    format_bytes, print_header, print_info, print_success, print_warning, DownloadProgressBar,
};
use crate::cli::prompt::TerminalPrompt;
use crate::cli::urls::read_url_file;
use crate::cli::{Args, Commands};
use crate::core::config::Config;
use crate::core::dates::DateRange;
use crate::core::error::OrganizerError;
use crate::core::pipeline;
use crate::download::HttpFetcher;
use crate::organize::OrganizeReport;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Run the command selected on the command line
///
/// With no subcommand the interactive menu is started.
pub fn run_command(
    args: &Args,
    config: &Config,
    config_path: &Path,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    match &args.command {
        Some(Commands::Download {
            urls,
            start,
            end,
            organize,
        }) => {
            let date_range = date_range_arg(config, start.as_deref(), end.as_deref());
            download_command(config, urls, date_range, *organize, shutdown_flag)?;
        }
        Some(Commands::Organize { folder, start, end }) => {
            let date_range = date_range_arg(config, start.as_deref(), end.as_deref());
            let folder = folder
                .clone()
                .unwrap_or_else(|| config.download_folder.clone());
            organize_command(config, &folder, date_range)?;
        }
        Some(Commands::ShowConfig) => {
            show_config(config, config_path);
        }
        None => {
            let fetcher = HttpFetcher::new(&config.user_agent);
            App::new(
                config.clone(),
                config_path.to_path_buf(),
                TerminalPrompt,
                fetcher,
            )
            .with_shutdown_flag(shutdown_flag)
            .run()?;
        }
    }

    Ok(())
}

/// Build the date range from `--start`/`--end`
///
/// A malformed date is reported and the run continues without dates.
fn date_range_arg(config: &Config, start: Option<&str>, end: Option<&str>) -> Option<DateRange> {
    let (start, end) = start.zip(end)?;
    match DateRange::parse(start, end, config.date_order) {
        Ok(range) => Some(range),
        Err(e) => {
            warn!("{}. Proceeding without dates.", e);
            None
        }
    }
}

/// Download every URL in `urls_file`, optionally organizing the result
pub fn download_command(
    config: &Config,
    urls_file: &Path,
    date_range: Option<DateRange>,
    organize: bool,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    let urls = read_url_file(urls_file)
        .with_context(|| format!("Failed to read URL list {}", urls_file.display()))?;
    if urls.is_empty() {
        print_warning("No URLs to download");
        return Ok(());
    }

    print_header("DOWNLOADING PHOTOS");
    info!("Downloading {} URLs to {}", urls.len(), config.download_folder.display());

    let fetcher = HttpFetcher::new(&config.user_agent);
    let mut bar = DownloadProgressBar::new(urls.len() as u64);
    let result = pipeline::download_and_organize(
        config,
        &fetcher,
        &urls,
        date_range,
        organize,
        Some(shutdown_flag),
        |progress| bar.update(&progress),
    )?;
    bar.finish();
    let report = &result.download;

    if report.interrupted {
        print_warning("Download interrupted");
    }
    print_success(&format!(
        "Downloaded {} of {} photos ({})",
        report.saved(),
        urls.len(),
        format_bytes(report.total_bytes)
    ));
    print_info(&format!(
        "{} skipped (not images), {} failed",
        report.skipped, report.failed
    ));

    if let Some(organized) = &result.organize {
        print_organized(organized, &config.organized_folder);
    }
    Ok(())
}

/// Deduplicate and organize `folder`
pub fn organize_command(
    config: &Config,
    folder: &Path,
    date_range: Option<DateRange>,
) -> Result<()> {
    if !folder.is_dir() {
        return Err(OrganizerError::FolderNotFound(folder.to_path_buf()).into());
    }

    print_header("ORGANIZING PHOTOS");
    let result = pipeline::organize_folder(config, folder, date_range)?;

    print_info(&format!("Scanned {} images", result.filter.scanned));
    print_info(&format!(
        "Moved {} thumbnails to {}",
        result.filter.thumbnails.len(),
        config.thumbnails_folder.display()
    ));
    print_info(&format!(
        "Moved {} duplicates to {}",
        result.filter.duplicates.len(),
        config.duplicates_folder.display()
    ));

    if result.filter.unique.is_empty() {
        print_warning("No files to organize");
        return Ok(());
    }
    print_organized(&result.organize, &config.organized_folder);
    Ok(())
}

fn print_organized(report: &OrganizeReport, folder: &Path) {
    print_success(&format!(
        "Organized {} photos into {} ({} dated, {} undated)",
        report.outputs.len(),
        folder.display(),
        report.dated,
        report.undated
    ));
    if report.overwritten > 0 {
        print_warning(&format!(
            "{} existing files were overwritten",
            report.overwritten
        ));
    }
}

/// Print the active configuration
pub fn show_config(config: &Config, config_path: &Path) {
    println!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        println!("(Using default settings - no config file found)");
    }
    println!();
    for (key, value) in config.summary() {
        println!("  {} = {}", key, value);
    }
    println!();
    println!("[logging]");
    println!("  level = {}", config.logging.level);
    println!("  log_to_file = {}", config.logging.log_to_file);
    println!("  log_file = {}", config.logging.log_file.display());
}
