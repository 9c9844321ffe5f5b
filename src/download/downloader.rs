//! Photo download module
//!
//! Downloads a batch of URLs one at a time into the download folder, naming
//! each file `photo_NNNN.ext` after its 1-based position in the batch. Each
//! URL produces an explicit [`DownloadOutcome`]; a failing URL never aborts
//! the batch.

use crate::core::config::Config;
use crate::core::dates::DateRange;
use crate::core::error::{OrganizerError, Result};
use crate::download::extension::resolve_extension;
use crate::download::fetcher::Fetcher;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A file written by the downloader, with its synthetic date if one was assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedItem {
    pub path: PathBuf,
    pub assigned_date: Option<NaiveDate>,
}

impl DownloadedItem {
    pub fn new(path: PathBuf, assigned_date: Option<NaiveDate>) -> Self {
        Self {
            path,
            assigned_date,
        }
    }

    /// An item with no date
    pub fn undated(path: PathBuf) -> Self {
        Self::new(path, None)
    }
}

/// Why a URL was skipped without being an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The server answered with something other than an image
    NotAnImage { content_type: String },
}

/// Result of one download attempt
#[derive(Debug)]
pub enum DownloadOutcome {
    Saved(DownloadedItem),
    Skipped { url: String, reason: SkipReason },
    Failed { url: String, error: OrganizerError },
}

/// Progress information for a running batch
#[derive(Debug)]
pub struct DownloadProgress<'a> {
    /// 1-based position of the URL just processed
    pub current: usize,
    /// Total URLs in the batch
    pub total: usize,
    /// What happened to it
    pub outcome: &'a DownloadOutcome,
    /// Bytes saved so far in this batch
    pub bytes_saved: u64,
}

/// Statistics about a finished batch
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Saved files, in input order
    pub items: Vec<DownloadedItem>,
    pub skipped: usize,
    pub failed: usize,
    pub total_bytes: u64,
    /// Set when the batch stopped early on a shutdown request
    pub interrupted: bool,
}

impl DownloadReport {
    pub fn saved(&self) -> usize {
        self.items.len()
    }
}

/// Settings the downloader needs from the configuration
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub download_folder: PathBuf,
    pub delay: Duration,
}

impl DownloadSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            download_folder: config.download_folder.clone(),
            delay: config.download_delay(),
        }
    }
}

/// Sequential downloader
pub struct Downloader<F: Fetcher> {
    fetcher: F,
    settings: DownloadSettings,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl<F: Fetcher> Downloader<F> {
    pub fn new(fetcher: F, settings: DownloadSettings) -> Self {
        Self {
            fetcher,
            settings,
            shutdown_flag: None,
        }
    }

    /// Stop between items once `flag` is set
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Download every URL, optionally assigning dates from `date_range`
    pub fn download(&self, urls: &[String], date_range: Option<DateRange>) -> Result<DownloadReport> {
        self.download_with_progress(urls, date_range, |_| {})
    }

    /// Like [`Downloader::download`], reporting each outcome to `on_progress`
    pub fn download_with_progress<P>(
        &self,
        urls: &[String],
        date_range: Option<DateRange>,
        mut on_progress: P,
    ) -> Result<DownloadReport>
    where
        P: FnMut(DownloadProgress<'_>),
    {
        let folder = &self.settings.download_folder;
        fs::create_dir_all(folder).map_err(|e| OrganizerError::io_at("create", folder, e))?;

        let total = urls.len();
        let mut report = DownloadReport::default();

        if total == 0 {
            info!("No URLs to download");
            return Ok(report);
        }

        info!("Downloading {} photos into {}", total, folder.display());

        for (index, url) in urls.iter().enumerate() {
            if self.shutdown_requested() {
                warn!("Shutdown requested, stopping downloads...");
                report.interrupted = true;
                break;
            }

            let assigned_date = date_range.map(|range| range.date_for(index, total));
            let outcome = self.download_one(index, url, assigned_date);

            match &outcome {
                DownloadOutcome::Saved(item) => {
                    debug!("Saved {} -> {}", url, item.path.display());
                    if let Ok(meta) = fs::metadata(&item.path) {
                        report.total_bytes += meta.len();
                    }
                    report.items.push(item.clone());
                }
                DownloadOutcome::Skipped { url, reason } => {
                    info!("Skipping non-image: {} ({:?})", url, reason);
                    report.skipped += 1;
                }
                DownloadOutcome::Failed { url, error } => {
                    warn!("Failed to download {}: {}", url, error);
                    report.failed += 1;
                }
            }

            on_progress(DownloadProgress {
                current: index + 1,
                total,
                outcome: &outcome,
                bytes_saved: report.total_bytes,
            });

            if index + 1 < total && !self.settings.delay.is_zero() {
                thread::sleep(self.settings.delay);
            }
        }

        info!(
            "Downloaded {} photos ({} skipped, {} failed)",
            report.saved(),
            report.skipped,
            report.failed
        );

        Ok(report)
    }

    /// Fetch one URL and write it to disk
    fn download_one(&self, index: usize, url: &str, assigned_date: Option<NaiveDate>) -> DownloadOutcome {
        let resource = match self.fetcher.fetch(url) {
            Ok(resource) => resource,
            Err(error) => {
                return DownloadOutcome::Failed {
                    url: url.to_string(),
                    error,
                }
            }
        };

        if !resource.is_image() {
            return DownloadOutcome::Skipped {
                url: url.to_string(),
                reason: SkipReason::NotAnImage {
                    content_type: resource.content_type,
                },
            };
        }

        let ext = resolve_extension(&resource.content_type, url);
        let path = self.settings.download_folder.join(temp_file_name(index, ext));

        match write_file(&path, &resource.bytes) {
            Ok(()) => DownloadOutcome::Saved(DownloadedItem::new(path, assigned_date)),
            Err(error) => DownloadOutcome::Failed {
                url: url.to_string(),
                error,
            },
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

/// `photo_0001.jpg` for index 0
pub fn temp_file_name(index: usize, ext: &str) -> String {
    format!("photo_{:04}{}", index + 1, ext)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| OrganizerError::io_at("write", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DateOrder;
    use crate::download::fetcher::MockFetcher;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> DownloadSettings {
        DownloadSettings {
            download_folder: dir.path().join("raw"),
            delay: Duration::ZERO,
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_temp_file_name() {
        assert_eq!(temp_file_name(0, ".jpg"), "photo_0001.jpg");
        assert_eq!(temp_file_name(41, ".png"), "photo_0042.png");
        assert_eq!(temp_file_name(12344, ".gif"), "photo_12345.gif");
    }

    #[test]
    fn test_saves_bytes_verbatim() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new()
            .with_body("https://x.test/a", "image/jpeg", b"jpeg-bytes".to_vec())
            .with_body("https://x.test/b.png", "", b"png-bytes".to_vec());
        // empty content type is not an image
        let downloader = Downloader::new(&fetcher, settings(&dir));

        let report = downloader
            .download(&urls(&["https://x.test/a", "https://x.test/b.png"]), None)
            .unwrap();

        assert_eq!(report.saved(), 1);
        assert_eq!(report.skipped, 1);
        let item = &report.items[0];
        assert_eq!(item.path, dir.path().join("raw").join("photo_0001.jpg"));
        assert_eq!(item.assigned_date, None);
        assert_eq!(fs::read(&item.path).unwrap(), b"jpeg-bytes");
        assert_eq!(report.total_bytes, 10);
    }

    #[test]
    fn test_failures_do_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new()
            .with_status("https://x.test/1", 500)
            .with_body("https://x.test/2", "text/html", b"<html>".to_vec())
            .with_network_error("https://x.test/3", "timed out")
            .with_body("https://x.test/4.gif", "image/gif", b"gif".to_vec());
        let downloader = Downloader::new(&fetcher, settings(&dir));

        let list = urls(&[
            "https://x.test/1",
            "https://x.test/2",
            "https://x.test/3",
            "https://x.test/4.gif",
        ]);
        let mut outcomes = Vec::new();
        let report = downloader
            .download_with_progress(&list, None, |p| {
                outcomes.push(match p.outcome {
                    DownloadOutcome::Saved(_) => "saved",
                    DownloadOutcome::Skipped { .. } => "skipped",
                    DownloadOutcome::Failed { .. } => "failed",
                });
                assert_eq!(p.total, 4);
            })
            .unwrap();

        assert_eq!(outcomes, vec!["failed", "skipped", "failed", "saved"]);
        assert_eq!(report.failed, 2);
        assert_eq!(report.skipped, 1);
        // index is the position in the input, not among successes
        assert_eq!(
            report.items[0].path.file_name().unwrap().to_str().unwrap(),
            "photo_0004.gif"
        );
        assert_eq!(fetcher.requests().len(), 4);
    }

    #[test]
    fn test_progress_carries_running_byte_total() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new()
            .with_body("https://x.test/a", "image/png", vec![0u8; 5])
            .with_body("https://x.test/b", "text/plain", vec![0u8; 50])
            .with_body("https://x.test/c", "image/png", vec![0u8; 7]);
        let downloader = Downloader::new(&fetcher, settings(&dir));

        let mut seen = Vec::new();
        let report = downloader
            .download_with_progress(
                &urls(&["https://x.test/a", "https://x.test/b", "https://x.test/c"]),
                None,
                |p| seen.push(p.bytes_saved),
            )
            .unwrap();

        assert_eq!(seen, vec![5, 5, 12]);
        assert_eq!(report.total_bytes, 12);
    }

    #[test]
    fn test_assigns_dates_from_batch_position() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new()
            .with_body("u1", "image/jpeg", vec![1])
            .with_body("u2", "image/jpeg", vec![2])
            .with_body("u3", "image/jpeg", vec![3]);
        let downloader = Downloader::new(&fetcher, settings(&dir));
        let range = DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 31), DateOrder::NewestFirst);

        let report = downloader
            .download(&urls(&["u1", "u2", "u3"]), Some(range))
            .unwrap();

        let dates: Vec<_> = report.items.iter().map(|i| i.assigned_date).collect();
        assert_eq!(
            dates,
            vec![
                Some(ymd(2025, 1, 31)),
                Some(ymd(2025, 1, 16)),
                Some(ymd(2025, 1, 1))
            ]
        );
    }

    #[test]
    fn test_dates_use_total_url_count() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new()
            .with_body("u1", "image/jpeg", vec![1])
            .with_body("u3", "image/jpeg", vec![3]);
        let downloader = Downloader::new(&fetcher, settings(&dir));
        let range = DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 31), DateOrder::OldestFirst);

        let report = downloader
            .download(&urls(&["u1", "u2", "u3"]), Some(range))
            .unwrap();

        assert_eq!(report.saved(), 2);
        assert_eq!(report.items[0].assigned_date, Some(ymd(2025, 1, 1)));
        assert_eq!(report.items[1].assigned_date, Some(ymd(2025, 1, 31)));
    }

    #[test]
    fn test_shutdown_flag_stops_batch() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new().with_body("u1", "image/jpeg", vec![1]);
        let flag = Arc::new(AtomicBool::new(true));
        let downloader = Downloader::new(&fetcher, settings(&dir)).with_shutdown_flag(flag);

        let report = downloader.download(&urls(&["u1"]), None).unwrap();
        assert!(report.interrupted);
        assert!(report.items.is_empty());
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        let report = Downloader::new(&fetcher, settings(&dir))
            .download(&[], None)
            .unwrap();
        assert_eq!(report.saved(), 0);
        assert!(dir.path().join("raw").is_dir());
    }
}
