//! End-to-end runs of the download and organize flows against temp folders

use chrono::NaiveDate;
use photo_organizer::core::config::{Config, DateOrder, NamingConvention};
use photo_organizer::core::dates::DateRange;
use photo_organizer::core::pipeline::{download_and_organize, organize_folder};
use photo_organizer::download::MockFetcher;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.download_folder = dir.join("downloads_raw");
    config.organized_folder = dir.join("photos_organized");
    config.thumbnails_folder = dir.join("thumbnails_backup");
    config.duplicates_folder = dir.join("duplicates_backup");
    config.download_delay = 0.0;
    config.ensure_folders().unwrap();
    config
}

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn january() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        DateOrder::NewestFirst,
    )
}

#[test]
fn download_three_urls_newest_first() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let fetcher = MockFetcher::new()
        .with_body("https://cdn.test/1", "image/jpeg", vec![1u8; 200_000])
        .with_body("https://cdn.test/2", "image/jpeg", vec![2u8; 200_000])
        .with_body("https://cdn.test/3", "image/jpeg", vec![3u8; 200_000]);
    let urls: Vec<String> = (1..=3).map(|i| format!("https://cdn.test/{}", i)).collect();

    let result = download_and_organize(
        &config,
        &fetcher,
        &urls,
        Some(january()),
        true,
        None,
        |_| {},
    )
    .unwrap();

    assert_eq!(result.download.saved(), 3);
    assert_eq!(
        list(&config.download_folder),
        vec!["photo_0001.jpg", "photo_0002.jpg", "photo_0003.jpg"]
    );
    assert_eq!(
        list(&config.organized_folder),
        vec!["250101a.jpg", "250116a.jpg", "250131a.jpg"]
    );
    // The first URL is the newest photo
    assert_eq!(
        fs::read(config.organized_folder.join("250131a.jpg")).unwrap(),
        vec![1u8; 200_000]
    );
}

#[test]
fn download_skips_non_images_and_survives_failures() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.naming_convention = NamingConvention::Iso;
    let fetcher = MockFetcher::new()
        .with_body("https://cdn.test/a.png", "image/png", vec![1u8; 10])
        .with_body("https://cdn.test/page", "text/html", b"<html>".to_vec())
        .with_status("https://cdn.test/gone.jpg", 404)
        .with_network_error("https://cdn.test/down.jpg", "connection refused")
        .with_body("https://cdn.test/b", "image/webp", vec![2u8; 10]);
    let urls: Vec<String> = ["a.png", "page", "gone.jpg", "down.jpg", "b"]
        .iter()
        .map(|u| format!("https://cdn.test/{}", u))
        .collect();

    let result = download_and_organize(
        &config,
        &fetcher,
        &urls,
        Some(january()),
        true,
        None,
        |_| {},
    )
    .unwrap();

    assert_eq!(result.download.saved(), 2);
    assert_eq!(result.download.skipped, 1);
    assert_eq!(result.download.failed, 2);
    // Dates are spread over all five positions, not just the saved ones
    assert_eq!(
        list(&config.organized_folder),
        vec!["2025-01-01a.webp", "2025-01-31a.png"]
    );
}

#[test]
fn organize_folder_filters_then_renames() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let raw = &config.download_folder;

    fs::write(raw.join("a.jpg"), vec![1u8; 150 * 1024]).unwrap();
    fs::write(raw.join("b.jpg"), vec![1u8; 150 * 1024]).unwrap();
    fs::write(raw.join("c.png"), vec![2u8; 150 * 1024]).unwrap();
    fs::write(raw.join("small.jpg"), vec![3u8; 50 * 1024]).unwrap();
    fs::write(raw.join("cover_thumb.jpg"), vec![4u8; 150 * 1024]).unwrap();
    fs::write(raw.join("notes.txt"), b"not an image").unwrap();

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        DateOrder::NewestFirst,
    );
    let result = organize_folder(&config, raw, Some(range)).unwrap();

    assert_eq!(result.filter.scanned, 5);
    assert_eq!(result.filter.unique.len(), 2);
    assert_eq!(
        list(&config.thumbnails_folder),
        vec!["cover_thumb.jpg", "small.jpg"]
    );
    assert_eq!(list(&config.duplicates_folder), vec!["b.jpg"]);
    assert_eq!(list(raw), vec!["a.jpg", "c.png", "notes.txt"]);
    assert_eq!(
        list(&config.organized_folder),
        vec!["250301a.jpg", "250301b.png"]
    );
}

#[test]
fn organize_folder_without_dates() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let raw = &config.download_folder;
    fs::write(raw.join("x.JPG"), vec![7u8; 120 * 1024]).unwrap();
    fs::write(raw.join("y.gif"), vec![8u8; 120 * 1024]).unwrap();

    let result = organize_folder(&config, raw, None).unwrap();

    assert_eq!(result.organize.undated, 2);
    assert_eq!(
        list(&config.organized_folder),
        vec!["photo_0001.JPG", "photo_0002.gif"]
    );
}

#[test]
fn download_without_organize_reports_progress() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let fetcher = MockFetcher::new()
        .with_body("https://cdn.test/1", "image/jpeg", vec![1u8; 4])
        .with_body("https://cdn.test/2", "image/gif", vec![2u8; 6]);
    let urls: Vec<String> = (1..=2).map(|i| format!("https://cdn.test/{}", i)).collect();

    let mut updates = Vec::new();
    let result = download_and_organize(&config, &fetcher, &urls, None, false, None, |p| {
        updates.push((p.current, p.bytes_saved))
    })
    .unwrap();

    assert!(result.organize.is_none());
    assert_eq!(updates, vec![(1, 4), (2, 10)]);
    assert!(list(&config.organized_folder).is_empty());
}
