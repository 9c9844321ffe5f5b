//! End-to-end flows built from the individual stages
//!
//! - [`download_and_organize`]: URLs → downloader → organizer, keeping the
//!   dates computed during download.
//! - [`organize_folder`]: folder → duplicate filter → optional dates →
//!   organizer. Dates from an earlier download are not recovered here; they
//!   are assigned afresh over the unique files.

use crate::core::config::Config;
use crate::core::dates::DateRange;
use crate::core::error::Result;
use crate::download::{
    DownloadProgress, DownloadReport, DownloadSettings, DownloadedItem, Downloader, Fetcher,
};
use crate::duplicate::{DuplicateFilter, FilterReport};
use crate::organize::{OrganizeReport, Organizer};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Outcome of [`organize_folder`]
#[derive(Debug, Default)]
pub struct FolderOrganizeResult {
    pub filter: FilterReport,
    pub organize: OrganizeReport,
}

/// Outcome of [`download_and_organize`]
#[derive(Debug, Default)]
pub struct DownloadOrganizeResult {
    pub download: DownloadReport,
    pub organize: Option<OrganizeReport>,
}

/// Download `urls` using the settings in `config`
pub fn download<F, P>(
    config: &Config,
    fetcher: F,
    urls: &[String],
    date_range: Option<DateRange>,
    shutdown_flag: Option<Arc<AtomicBool>>,
    on_progress: P,
) -> Result<DownloadReport>
where
    F: Fetcher,
    P: FnMut(DownloadProgress<'_>),
{
    let mut downloader = Downloader::new(fetcher, DownloadSettings::from_config(config));
    if let Some(flag) = shutdown_flag {
        downloader = downloader.with_shutdown_flag(flag);
    }
    downloader.download_with_progress(urls, date_range, on_progress)
}

/// Download `urls`, then organize them straight away if `organize` is set
pub fn download_and_organize<F, P>(
    config: &Config,
    fetcher: F,
    urls: &[String],
    date_range: Option<DateRange>,
    organize: bool,
    shutdown_flag: Option<Arc<AtomicBool>>,
    on_progress: P,
) -> Result<DownloadOrganizeResult>
where
    F: Fetcher,
    P: FnMut(DownloadProgress<'_>),
{
    let report = download(config, fetcher, urls, date_range, shutdown_flag, on_progress)?;

    let organized = if organize && !report.items.is_empty() {
        Some(Organizer::from_config(config).organize(&report.items)?)
    } else {
        None
    };

    Ok(DownloadOrganizeResult {
        download: report,
        organize: organized,
    })
}

/// Pair each path with the date `date_range` gives its position, if any
pub fn date_items(paths: &[PathBuf], date_range: Option<DateRange>) -> Vec<DownloadedItem> {
    let total = paths.len();
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            DownloadedItem::new(path.clone(), date_range.map(|r| r.date_for(i, total)))
        })
        .collect()
}

/// Remove thumbnails and duplicates from `folder`, then organize what's left
pub fn organize_folder(
    config: &Config,
    folder: &Path,
    date_range: Option<DateRange>,
) -> Result<FolderOrganizeResult> {
    let filter = DuplicateFilter::from_config(config).process(folder)?;

    if filter.unique.is_empty() {
        info!("No unique photos left to organize");
        return Ok(FolderOrganizeResult {
            filter,
            organize: OrganizeReport::default(),
        });
    }

    let items = date_items(&filter.unique, date_range);
    let organize = Organizer::from_config(config).organize(&items)?;

    Ok(FolderOrganizeResult { filter, organize })
}
