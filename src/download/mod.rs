//! Download module
//!
//! Fetches photos from a list of URLs into the download folder.
//!
//! # Submodules
//!
//! - `downloader` - The sequential download loop and its per-item outcomes
//! - `extension` - Content-type / URL to file extension mapping
//! - `fetcher` - The `Fetcher` trait with HTTP and in-memory implementations

pub mod downloader;
pub mod extension;
pub mod fetcher;

pub use downloader::{
    DownloadOutcome, DownloadProgress, DownloadReport, DownloadSettings, DownloadedItem,
    Downloader, SkipReason,
};
pub use extension::resolve_extension;
pub use fetcher::{FetchedResource, Fetcher, HttpFetcher, MockFetcher};
