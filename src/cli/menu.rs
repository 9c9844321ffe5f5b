//! Interactive menu
//!
//! The menu is a small state machine: each [`MenuState`] has a handler that
//! does its work and returns the next state. All input goes through a
//! [`Prompt`] and all network access through a [`Fetcher`], so a whole session
//! can be replayed in tests with canned answers.
//!
//! An error inside one screen is reported and control returns to the main
//! menu. Running out of input ends the session.

use crate::cli::progress::{
    format_bytes, print_error, print_header, print_info, print_success, print_warning,
    DownloadProgressBar,
};
use crate::cli::prompt::Prompt;
use crate::cli::urls::{read_clipboard_urls, read_manual_urls, read_url_file};
use crate::core::config::{Config, DateOrder, NamingConvention};
use crate::core::dates::DateRange;
use crate::core::error::OrganizerError;
use crate::core::pipeline::{self, date_items};
use crate::download::{DownloadedItem, Fetcher};
use crate::duplicate::DuplicateFilter;
use crate::organize::{OrganizeReport, Organizer};
use anyhow::{Context, Result};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Screens of the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Main,
    Configure,
    Instructions,
    Download,
    Organize,
    ViewConfig,
    Exit,
}

/// Main menu entries and the screen each one opens
pub const MAIN_MENU: [(&str, MenuState); 6] = [
    ("Configure Settings", MenuState::Configure),
    (
        "Extract URLs from Website (Browser Method)",
        MenuState::Instructions,
    ),
    ("Download Photos from URLs", MenuState::Download),
    ("Organize Downloaded Photos", MenuState::Organize),
    ("View Current Configuration", MenuState::ViewConfig),
    ("Exit", MenuState::Exit),
];

const CONFIGURE_MENU: [&str; 6] = [
    "Change download folder",
    "Change naming convention",
    "Change date order",
    "Change minimum file size",
    "Change download delay",
    "Return to main menu",
];

const URL_SOURCE_MENU: [&str; 4] = [
    "Import from text file",
    "Paste URLs manually",
    "Use URLs from clipboard",
    "Cancel",
];

/// How many organized filenames to show after a run
const SAMPLE_SIZE: usize = 10;

/// Interactive session state
pub struct App<P: Prompt, F: Fetcher> {
    config: Config,
    config_path: PathBuf,
    prompt: P,
    fetcher: F,
    shutdown_flag: Arc<AtomicBool>,
}

impl<P: Prompt, F: Fetcher> App<P, F> {
    pub fn new(config: Config, config_path: PathBuf, prompt: P, fetcher: F) -> Self {
        Self {
            config,
            config_path,
            prompt,
            fetcher,
            shutdown_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share the Ctrl+C flag with the download loop
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = flag;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Run until the user picks Exit or input runs out
    pub fn run(&mut self) -> Result<()> {
        let mut state = MenuState::Main;
        while state != MenuState::Exit {
            state = self.step(state);
        }
        println!("\nThank you for using Photo Downloader & Organizer!");
        Ok(())
    }

    /// Handle one screen and return the next one
    pub fn step(&mut self, state: MenuState) -> MenuState {
        let result = match state {
            MenuState::Main => self.main_menu(),
            MenuState::Configure => self.configure().map(|_| MenuState::Main),
            MenuState::Instructions => {
                show_instructions();
                Ok(MenuState::Main)
            }
            MenuState::Download => self.download().map(|_| MenuState::Main),
            MenuState::Organize => self.organize().map(|_| MenuState::Main),
            MenuState::ViewConfig => {
                self.view_config();
                Ok(MenuState::Main)
            }
            MenuState::Exit => Ok(MenuState::Exit),
        };

        match result {
            Ok(next) => next,
            Err(e) if is_input_closed(&e) => {
                info!("Input closed, leaving menu: {}", e);
                MenuState::Exit
            }
            Err(e) => {
                error!("{:#}", e);
                print_error(&format!("{:#}", e));
                MenuState::Main
            }
        }
    }

    fn main_menu(&mut self) -> Result<MenuState> {
        print_header("PHOTO DOWNLOADER & ORGANIZER");
        let labels: Vec<&str> = MAIN_MENU.iter().map(|(label, _)| *label).collect();
        let choice = self.prompt.select("Main Menu", &labels)?;
        Ok(MAIN_MENU[choice].1)
    }

    // ------------------------------------------------------------------
    // Configure
    // ------------------------------------------------------------------

    fn configure(&mut self) -> Result<()> {
        print_header("CONFIGURATION SETTINGS");
        self.view_config();

        match self.prompt.select("Configure Settings", &CONFIGURE_MENU)? {
            0 => {
                let current = self.config.download_folder.display().to_string();
                let folder = self
                    .prompt
                    .input("Enter new download folder", Some(&current))?;
                if !folder.is_empty() {
                    self.config.download_folder = PathBuf::from(folder);
                }
            }
            1 => {
                let items: Vec<&str> = NamingConvention::ALL
                    .iter()
                    .map(|c| c.description())
                    .collect();
                let choice = self.prompt.select("Naming convention", &items)?;
                self.config.naming_convention = NamingConvention::ALL[choice];
            }
            2 => {
                let items = [
                    "newest_first - Most recent photos first",
                    "oldest_first - Oldest photos first",
                ];
                self.config.date_order = match self.prompt.select("Date order", &items)? {
                    0 => DateOrder::NewestFirst,
                    _ => DateOrder::OldestFirst,
                };
            }
            3 => {
                let current = self.config.min_file_size_kb.to_string();
                let answer = self
                    .prompt
                    .input("Enter minimum file size in KB", Some(&current))?;
                match answer.parse::<u64>() {
                    Ok(kb) if kb > 0 => self.config.min_file_size_kb = kb,
                    _ => print_warning("Invalid size. Keeping current."),
                }
            }
            4 => {
                let current = self.config.download_delay.to_string();
                let answer = self
                    .prompt
                    .input("Enter delay between downloads in seconds", Some(&current))?;
                match answer.parse::<f64>() {
                    Ok(secs) if secs >= 0.0 && secs.is_finite() => {
                        self.config.download_delay = secs
                    }
                    _ => print_warning("Invalid delay. Keeping current."),
                }
            }
            _ => return Ok(()),
        }

        self.config
            .ensure_folders()
            .context("Failed to create folders")?;
        self.config
            .save(&self.config_path)
            .context("Failed to save configuration")?;
        print_success("Configuration updated!");
        Ok(())
    }

    fn view_config(&self) {
        println!("Current Configuration ({}):", self.config_path.display());
        for (key, value) in self.config.summary() {
            println!("  {}: {}", key, value);
        }
    }

    // ------------------------------------------------------------------
    // Download
    // ------------------------------------------------------------------

    fn download(&mut self) -> Result<()> {
        let urls = self.collect_urls()?;
        if urls.is_empty() {
            print_warning("No URLs to download");
            return Ok(());
        }

        println!("\nDownloading {} photos...", urls.len());
        let date_range = self.ask_date_range("Assign dates to photos?", "Proceeding without dates.")?;

        self.shutdown_flag.store(false, Ordering::SeqCst);
        let mut bar = DownloadProgressBar::new(urls.len() as u64);
        let report = pipeline::download(
            &self.config,
            &self.fetcher,
            &urls,
            date_range,
            Some(self.shutdown_flag.clone()),
            |progress| bar.update(&progress),
        )?;
        bar.finish();

        if report.interrupted {
            print_warning("Download interrupted");
        }
        print_success(&format!(
            "Successfully downloaded {} photos ({})",
            report.saved(),
            format_bytes(report.total_bytes)
        ));
        if report.skipped > 0 || report.failed > 0 {
            print_info(&format!(
                "{} skipped (not images), {} failed",
                report.skipped, report.failed
            ));
        }

        if !report.items.is_empty() && self.prompt.confirm("Organize photos now?", true)? {
            self.organize_items(&report.items)?;
        }
        Ok(())
    }

    fn collect_urls(&mut self) -> Result<Vec<String>> {
        print_header("GET PHOTO URLs");
        let urls = match self.prompt.select("Where are the URLs?", &URL_SOURCE_MENU)? {
            0 => {
                let path = self.prompt.input("Enter path to URLs file", None)?;
                let path = Path::new(&path);
                if !path.is_file() {
                    print_error("File not found!");
                    return Ok(Vec::new());
                }
                read_url_file(path)?
            }
            1 => {
                println!("Paste URLs (one per line). Enter 'done' on a new line when finished:");
                read_manual_urls(&mut self.prompt)?
            }
            2 => read_clipboard_urls()?,
            _ => Vec::new(),
        };
        if !urls.is_empty() {
            print_info(&format!("Loaded {} URLs", urls.len()));
        }
        Ok(urls)
    }

    /// Ask whether to assign dates and for the range
    ///
    /// A malformed date means no dates for the whole batch.
    fn ask_date_range(&mut self, question: &str, fallback: &str) -> Result<Option<DateRange>> {
        if !self.prompt.confirm(question, false)? {
            return Ok(None);
        }
        let start = self
            .prompt
            .input("Start date (YYYY-MM-DD, e.g., 2025-01-01)", None)?;
        let end = self
            .prompt
            .input("End date (YYYY-MM-DD, e.g., 2025-12-31)", None)?;

        match DateRange::parse(&start, &end, self.config.date_order) {
            Ok(range) => {
                print_info(&format!(
                    "Date range: {} to {}",
                    range.start.format("%b %d, %Y"),
                    range.end.format("%b %d, %Y")
                ));
                Ok(Some(range))
            }
            Err(e) => {
                print_warning(&format!("{}. {}", e, fallback));
                Ok(None)
            }
        }
    }

    // ------------------------------------------------------------------
    // Organize
    // ------------------------------------------------------------------

    fn organize(&mut self) -> Result<()> {
        let current = self.config.download_folder.display().to_string();
        let folder = self
            .prompt
            .input("Enter folder path to organize", Some(&current))?;
        let folder = PathBuf::from(folder);
        if !folder.is_dir() {
            print_error(&format!("Folder not found: {}", folder.display()));
            return Ok(());
        }

        let filter = DuplicateFilter::from_config(&self.config).process(&folder)?;
        print_info(&format!(
            "Found {} images: {} thumbnails, {} duplicates, {} unique",
            filter.scanned,
            filter.thumbnails.len(),
            filter.duplicates.len(),
            filter.unique.len()
        ));
        if filter.unique.is_empty() {
            print_warning("No files to organize");
            return Ok(());
        }

        let date_range = self.ask_date_range(
            "Assign dates to these photos?",
            "Organizing without dates.",
        )?;
        let items = date_items(&filter.unique, date_range);
        self.organize_items(&items)
    }

    fn organize_items(&mut self, items: &[DownloadedItem]) -> Result<()> {
        let report = Organizer::from_config(&self.config).organize(items)?;
        print_organize_summary(&report, &self.config.organized_folder);
        Ok(())
    }
}

/// Whether the error means the input source is gone
fn is_input_closed(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<OrganizerError>(),
        Some(OrganizerError::Prompt(_))
    )
}

fn print_organize_summary(report: &OrganizeReport, folder: &Path) {
    print_success(&format!(
        "Organized {} photos ({} dated, {} undated)",
        report.outputs.len(),
        report.dated,
        report.undated
    ));
    if report.overwritten > 0 {
        print_warning(&format!(
            "{} existing files were overwritten",
            report.overwritten
        ));
    }
    println!("Saved to: {}", folder.display());

    let mut names: Vec<String> = report.outputs.iter().map(|o| o.file_name()).collect();
    names.sort();
    if !names.is_empty() {
        println!("\nSample files:");
        for name in names.iter().take(SAMPLE_SIZE) {
            println!("  {}", name);
        }
    }
}

fn show_instructions() {
    print_header("URL EXTRACTION INSTRUCTIONS");

    println!("METHOD 1: Browser console");
    println!("  1. Open the page with the photos and load all of them (scroll / 'Load more')");
    println!("  2. Press F12 and open the Console tab");
    println!("  3. Paste the line below and press Enter; the URLs are copied to the clipboard:");
    println!();
    println!("     copy([...new Set([...document.images].map(i => i.currentSrc || i.src))].join('\\n'))");
    println!();
    println!("  4. Choose 'Download Photos from URLs' > 'Use URLs from clipboard'");

    println!("\nMETHOD 2: Manual URL collection");
    println!("  1. Save all image URLs to a text file (one per line)");
    println!("  2. Choose 'Download Photos from URLs' > 'Import from text file'");

    println!("\nMETHOD 3: Browser extensions");
    println!("  1. Install an image downloader extension");
    println!("  2. Use it to export the URLs from the page");

    println!("\nThe URL file should contain one URL per line, for example:");
    println!("  https://example.com/photos/photo1.jpg");
    println!("  https://example.com/photos/photo2.jpg");
}
