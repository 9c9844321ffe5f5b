//! Photo organizing module
//!
//! Copies photos into the organized folder under date-based names. Dated
//! photos become `{date_key}{suffix}{ext}`, where the suffix counts photos
//! sharing a date key (`a`..`z`, then `27`, `28`, ...). Undated photos become
//! `photo_NNNN{ext}`.

use crate::core::config::{Config, DateOrder, NamingConvention};
use crate::core::error::{OrganizerError, Result};
use crate::download::DownloadedItem;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A file written to the organized folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedOutput {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub date: Option<NaiveDate>,
}

impl NamedOutput {
    pub fn file_name(&self) -> String {
        self.destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Statistics about an organize run
#[derive(Debug, Clone, Default)]
pub struct OrganizeReport {
    /// Dated outputs in sorted order, then undated outputs in input order
    pub outputs: Vec<NamedOutput>,
    pub dated: usize,
    pub undated: usize,
    /// Outputs that replaced a file already in the organized folder
    pub overwritten: usize,
}

/// Settings the organizer needs from the configuration
#[derive(Debug, Clone)]
pub struct OrganizerSettings {
    pub organized_folder: PathBuf,
    pub naming_convention: NamingConvention,
    pub date_order: DateOrder,
}

impl OrganizerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            organized_folder: config.organized_folder.clone(),
            naming_convention: config.naming_convention,
            date_order: config.date_order,
        }
    }
}

/// Renames and copies photos into the organized folder
#[derive(Debug, Clone)]
pub struct Organizer {
    settings: OrganizerSettings,
}

impl Organizer {
    pub fn new(settings: OrganizerSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(OrganizerSettings::from_config(config))
    }

    /// Work out the output name of every item without touching the disk
    pub fn plan(&self, items: &[DownloadedItem]) -> Vec<NamedOutput> {
        let folder = &self.settings.organized_folder;

        let mut dated: Vec<(&Path, NaiveDate)> = items
            .iter()
            .filter_map(|item| item.assigned_date.map(|d| (item.path.as_path(), d)))
            .collect();
        let undated = items.iter().filter(|item| item.assigned_date.is_none());

        // stable: equal dates keep their input order
        match self.settings.date_order {
            DateOrder::NewestFirst => dated.sort_by(|a, b| b.1.cmp(&a.1)),
            DateOrder::OldestFirst => dated.sort_by(|a, b| a.1.cmp(&b.1)),
        }

        let mut outputs = Vec::with_capacity(items.len());
        let mut counters: HashMap<String, usize> = HashMap::new();

        for (path, date) in dated {
            let date_key = self.settings.naming_convention.format(date);
            let counter = counters.entry(date_key.clone()).or_insert(0);
            *counter += 1;

            let name = dated_file_name(&date_key, *counter, &original_extension(path));
            outputs.push(NamedOutput {
                source: path.to_path_buf(),
                destination: folder.join(name),
                date: Some(date),
            });
        }

        for (i, item) in undated.enumerate() {
            let name = undated_file_name(i + 1, &original_extension(&item.path));
            outputs.push(NamedOutput {
                source: item.path.clone(),
                destination: folder.join(name),
                date: None,
            });
        }

        outputs
    }

    /// Copy every item into the organized folder under its new name
    ///
    /// Sources are left in place. An existing file with the same name in the
    /// organized folder is overwritten.
    pub fn organize(&self, items: &[DownloadedItem]) -> Result<OrganizeReport> {
        let mut report = OrganizeReport::default();
        if items.is_empty() {
            info!("No files to organize");
            return Ok(report);
        }

        let folder = &self.settings.organized_folder;
        fs::create_dir_all(folder).map_err(|e| OrganizerError::io_at("create", folder, e))?;

        info!("Organizing {} photos...", items.len());

        for output in self.plan(items) {
            if output.destination.exists() {
                warn!("Overwriting existing file: {}", output.destination.display());
                report.overwritten += 1;
            }

            fs::copy(&output.source, &output.destination)
                .map_err(|e| OrganizerError::io_at("copy", &output.source, e))?;

            if output.date.is_some() {
                report.dated += 1;
            } else {
                report.undated += 1;
            }
            report.outputs.push(output);
        }

        info!(
            "Organized {} photos ({} dated, {} undated) into {}",
            report.outputs.len(),
            report.dated,
            report.undated,
            folder.display()
        );

        Ok(report)
    }
}

/// Suffix for the `counter`-th photo sharing a date key
///
/// 1..=26 map to `a`..=`z`; larger counters are written as numbers.
pub fn sequence_suffix(counter: usize) -> String {
    match counter {
        1..=26 => char::from(b'a' + (counter - 1) as u8).to_string(),
        _ => counter.to_string(),
    }
}

/// `250131a.jpg`
pub fn dated_file_name(date_key: &str, counter: usize, ext: &str) -> String {
    format!("{}{}{}", date_key, sequence_suffix(counter), ext)
}

/// `photo_0001.jpg`
pub fn undated_file_name(index: usize, ext: &str) -> String {
    format!("photo_{:04}{}", index, ext)
}

/// Extension of `path` with its leading dot and original case, or empty
pub fn original_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn organizer(folder: &Path, convention: NamingConvention, order: DateOrder) -> Organizer {
        Organizer::new(OrganizerSettings {
            organized_folder: folder.to_path_buf(),
            naming_convention: convention,
            date_order: order,
        })
    }

    fn names(outputs: &[NamedOutput]) -> Vec<String> {
        outputs.iter().map(|o| o.file_name()).collect()
    }

    #[test]
    fn test_sequence_suffix() {
        assert_eq!(sequence_suffix(1), "a");
        assert_eq!(sequence_suffix(2), "b");
        assert_eq!(sequence_suffix(26), "z");
        assert_eq!(sequence_suffix(27), "27");
        assert_eq!(sequence_suffix(100), "100");
    }

    #[test]
    fn test_original_extension() {
        assert_eq!(original_extension(Path::new("a/photo.JPG")), ".JPG");
        assert_eq!(original_extension(Path::new("photo.tar.gz")), ".gz");
        assert_eq!(original_extension(Path::new("photo")), "");
    }

    #[test]
    fn test_plan_sorts_newest_first() {
        let org = organizer(Path::new("out"), NamingConvention::Yymmdd, DateOrder::NewestFirst);
        let items = vec![
            DownloadedItem::new("a.jpg".into(), Some(ymd(2025, 1, 1))),
            DownloadedItem::new("b.png".into(), Some(ymd(2025, 1, 31))),
            DownloadedItem::new("c.jpg".into(), Some(ymd(2025, 1, 16))),
        ];

        let plan = org.plan(&items);
        assert_eq!(names(&plan), vec!["250131a.png", "250116a.jpg", "250101a.jpg"]);
        assert_eq!(plan[0].source, PathBuf::from("b.png"));
    }

    #[test]
    fn test_plan_sorts_oldest_first_with_stable_ties() {
        let org = organizer(Path::new("out"), NamingConvention::Iso, DateOrder::OldestFirst);
        let day = ymd(2024, 7, 4);
        let items = vec![
            DownloadedItem::new("first.jpg".into(), Some(day)),
            DownloadedItem::new("early.jpg".into(), Some(ymd(2024, 7, 1))),
            DownloadedItem::new("second.jpg".into(), Some(day)),
        ];

        let plan = org.plan(&items);
        assert_eq!(
            names(&plan),
            vec!["2024-07-01a.jpg", "2024-07-04a.jpg", "2024-07-04b.jpg"]
        );
        assert_eq!(plan[1].source, PathBuf::from("first.jpg"));
        assert_eq!(plan[2].source, PathBuf::from("second.jpg"));
    }

    #[test]
    fn test_stable_ties_newest_first() {
        let org = organizer(Path::new("out"), NamingConvention::Yymmdd, DateOrder::NewestFirst);
        let day = ymd(2024, 7, 4);
        let items = vec![
            DownloadedItem::new("first.jpg".into(), Some(day)),
            DownloadedItem::new("second.jpg".into(), Some(day)),
        ];

        let plan = org.plan(&items);
        assert_eq!(plan[0].source, PathBuf::from("first.jpg"));
        assert_eq!(names(&plan), vec!["240704a.jpg", "240704b.jpg"]);
    }

    #[test]
    fn test_27th_photo_on_a_date_gets_numeric_suffix() {
        let org = organizer(Path::new("out"), NamingConvention::Yyyymmdd, DateOrder::NewestFirst);
        let day = ymd(2025, 5, 5);
        let items: Vec<_> = (0..28)
            .map(|i| DownloadedItem::new(format!("p{}.jpg", i).into(), Some(day)))
            .collect();

        let plan = names(&org.plan(&items));
        assert_eq!(plan[0], "20250505a.jpg");
        assert_eq!(plan[25], "20250505z.jpg");
        assert_eq!(plan[26], "2025050527.jpg");
        assert_eq!(plan[27], "2025050528.jpg");
    }

    #[test]
    fn test_undated_named_sequentially_after_dated() {
        let org = organizer(Path::new("out"), NamingConvention::Yymmdd, DateOrder::NewestFirst);
        let items = vec![
            DownloadedItem::undated("x.png".into()),
            DownloadedItem::new("d.jpg".into(), Some(ymd(2025, 2, 2))),
            DownloadedItem::undated("y.gif".into()),
        ];

        let plan = org.plan(&items);
        assert_eq!(names(&plan), vec!["250202a.jpg", "photo_0001.png", "photo_0002.gif"]);
    }

    #[test]
    fn test_organize_copies_and_keeps_sources() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("raw");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("photo_0001.jpg"), b"one").unwrap();
        fs::write(src.join("photo_0002.jpg"), b"two").unwrap();

        let out = dir.path().join("organized");
        let org = organizer(&out, NamingConvention::Mmddyy, DateOrder::NewestFirst);
        let items = vec![
            DownloadedItem::new(src.join("photo_0001.jpg"), Some(ymd(2025, 12, 25))),
            DownloadedItem::undated(src.join("photo_0002.jpg")),
        ];

        let report = org.organize(&items).unwrap();

        assert_eq!(report.dated, 1);
        assert_eq!(report.undated, 1);
        assert_eq!(fs::read(out.join("122525a.jpg")).unwrap(), b"one");
        assert_eq!(fs::read(out.join("photo_0001.jpg")).unwrap(), b"two");
        assert!(src.join("photo_0001.jpg").exists());
        assert!(src.join("photo_0002.jpg").exists());
    }

    #[test]
    fn test_organize_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("organized");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("photo_0001.jpg"), b"stale").unwrap();
        let src = dir.path().join("new.jpg");
        fs::write(&src, b"fresh").unwrap();

        let org = organizer(&out, NamingConvention::Ddmmyy, DateOrder::NewestFirst);
        let report = org.organize(&[DownloadedItem::undated(src)]).unwrap();

        assert_eq!(report.overwritten, 1);
        assert_eq!(fs::read(out.join("photo_0001.jpg")).unwrap(), b"fresh");
    }

    #[test]
    fn test_organize_empty_is_noop() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("organized");
        let report = organizer(&out, NamingConvention::Yymmdd, DateOrder::NewestFirst)
            .organize(&[])
            .unwrap();
        assert!(report.outputs.is_empty());
        assert!(!out.exists());
    }
}
