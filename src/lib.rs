//! Photo Organizer Library
//!
//! Downloads photos from a list of URLs, strips thumbnails and byte-identical
//! duplicates, and copies the survivors into an organized folder under
//! compact date-based names (`250131a.jpg`, `250131b.jpg`, ...).
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Configuration, error handling, date assignment and the
//!   end-to-end flows
//! - [`download`] - Fetching URLs, image detection and extension choice
//! - [`duplicate`] - Thumbnail filtering and SHA-256 duplicate detection
//! - [`organize`] - Date-ordered renaming into the organized folder
//! - [`cli`] - Command-line interface and interactive menu (only used by
//!   the binary)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use photo_organizer::core::config::Config;
//! use photo_organizer::core::dates::DateRange;
//! use photo_organizer::core::pipeline;
//! use photo_organizer::download::HttpFetcher;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.json");
//!     config.ensure_folders()?;
//!
//!     let urls = vec!["https://example.com/photos/1.jpg".to_string()];
//!     let range = DateRange::parse("2025-01-01", "2025-01-31", config.date_order)?;
//!
//!     let fetcher = HttpFetcher::new(&config.user_agent);
//!     let result = pipeline::download_and_organize(
//!         &config,
//!         &fetcher,
//!         &urls,
//!         Some(range),
//!         true,
//!         None,
//!         |progress| println!("{}/{}", progress.current, progress.total),
//!     )?;
//!     println!("Downloaded {} photos", result.download.saved());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing Without a Network
//!
//! [`download::MockFetcher`] serves canned responses, and
//! [`cli::ScriptedPrompt`] replays menu answers, so whole sessions run
//! offline against temporary folders.

pub mod cli;
pub mod core;
pub mod download;
pub mod duplicate;
pub mod organize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
