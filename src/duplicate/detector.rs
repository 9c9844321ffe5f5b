//! Duplicate Filtering Module
//!
//! Cleans a download folder in two passes:
//! 1. **Thumbnails**: files below the minimum size, or whose name contains one
//!    of the configured patterns, are moved to the thumbnails folder.
//! 2. **Exact duplicates**: remaining files are hashed with SHA256; the first
//!    file with a given hash is kept and every later one is moved to the
//!    duplicates folder.
//!
//! Files are visited in filename order so results are reproducible. A move
//! never overwrites an existing file; a name clash aborts the batch.
//!
//! # Example
//!
//! ```rust,no_run
//! use photo_organizer::core::config::Config;
//! use photo_organizer::duplicate::DuplicateFilter;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let filter = DuplicateFilter::from_config(&config);
//! let report = filter.process(Path::new("downloads_raw")).unwrap();
//! println!("Kept {} unique photos", report.unique.len());
//! ```

use crate::core::config::Config;
use crate::core::error::{OrganizerError, Result};
use log::{debug, info, trace};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Buffer size for streaming hash computation (64KB)
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Extensions considered when scanning a folder
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// SHA256 hash represented as a fixed-size array
pub type Sha256Hash = [u8; 32];

/// Why a file was treated as a thumbnail
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailReason {
    /// Smaller than the minimum size
    TooSmall { size_kb: f64 },
    /// Filename contains a thumbnail pattern
    NamePattern(String),
}

/// Classification of a scanned file
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Thumbnail(ThumbnailReason),
    Candidate,
    Unique,
    ExactDuplicate { original: PathBuf },
}

/// Size and filename rules for spotting thumbnails
#[derive(Debug, Clone)]
pub struct ThumbnailRules {
    pub min_file_size_kb: u64,
    /// Matched against the lowercase filename
    pub patterns: Vec<String>,
}

impl ThumbnailRules {
    pub fn new(min_file_size_kb: u64, patterns: Vec<String>) -> Self {
        let patterns = patterns.into_iter().map(|p| p.to_lowercase()).collect();
        Self {
            min_file_size_kb,
            patterns,
        }
    }

    /// Classify a file by name and size alone
    pub fn classify(&self, file_name: &str, size_bytes: u64) -> Classification {
        let size_kb = size_bytes as f64 / 1024.0;
        if size_kb < self.min_file_size_kb as f64 {
            return Classification::Thumbnail(ThumbnailReason::TooSmall { size_kb });
        }

        let lower = file_name.to_lowercase();
        match self.patterns.iter().find(|p| lower.contains(p.as_str())) {
            Some(pattern) => Classification::Thumbnail(ThumbnailReason::NamePattern(pattern.clone())),
            None => Classification::Candidate,
        }
    }
}

/// A file moved out of the scanned folder
#[derive(Debug, Clone, PartialEq)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
    pub classification: Classification,
}

/// Statistics about a filter run
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    /// Kept files, in the order they were kept
    pub unique: Vec<PathBuf>,
    /// Files moved to the thumbnails folder
    pub thumbnails: Vec<MovedFile>,
    /// Files moved to the duplicates folder
    pub duplicates: Vec<MovedFile>,
    /// Number of image files found by the scan
    pub scanned: usize,
}

/// Folder-level thumbnail and duplicate filter
#[derive(Debug, Clone)]
pub struct DuplicateFilter {
    rules: ThumbnailRules,
    thumbnails_folder: PathBuf,
    duplicates_folder: PathBuf,
}

impl DuplicateFilter {
    pub fn new(rules: ThumbnailRules, thumbnails_folder: PathBuf, duplicates_folder: PathBuf) -> Self {
        Self {
            rules,
            thumbnails_folder,
            duplicates_folder,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ThumbnailRules::new(config.min_file_size_kb, config.thumbnail_patterns.clone()),
            config.thumbnails_folder.clone(),
            config.duplicates_folder.clone(),
        )
    }

    /// Move thumbnails and duplicates out of `folder`, returning what's left
    pub fn process(&self, folder: &Path) -> Result<FilterReport> {
        if !folder.is_dir() {
            return Err(OrganizerError::FolderNotFound(folder.to_path_buf()));
        }

        info!("Analyzing {} for duplicates...", folder.display());

        let files = scan_images(folder)?;
        let mut report = FilterReport {
            scanned: files.len(),
            ..Default::default()
        };
        info!("Found {} image files", files.len());

        // Pass 1: thumbnails
        let mut candidates = Vec::new();
        for path in files {
            let size = fs::metadata(&path)
                .map_err(|e| OrganizerError::io_at("read metadata of", &path, e))?
                .len();
            let name = file_name(&path);

            match self.rules.classify(&name, size) {
                Classification::Candidate => candidates.push(path),
                classification => {
                    trace!("{} is a thumbnail: {:?}", path.display(), classification);
                    let to = move_into(&path, &self.thumbnails_folder)?;
                    report.thumbnails.push(MovedFile {
                        from: path,
                        to,
                        classification,
                    });
                }
            }
        }
        if !report.thumbnails.is_empty() {
            info!("Moved {} thumbnails to backup", report.thumbnails.len());
        }

        // Pass 2: exact duplicates, first seen wins
        let mut seen: HashMap<Sha256Hash, PathBuf> = HashMap::new();
        for path in candidates {
            let hash = compute_file_hash(&path)?;
            match seen.get(&hash) {
                Some(original) => {
                    debug!(
                        "{} duplicates {} ({})",
                        path.display(),
                        original.display(),
                        hash_to_hex(&hash)
                    );
                    let classification = Classification::ExactDuplicate {
                        original: original.clone(),
                    };
                    let to = move_into(&path, &self.duplicates_folder)?;
                    report.duplicates.push(MovedFile {
                        from: path,
                        to,
                        classification,
                    });
                }
                None => {
                    seen.insert(hash, path.clone());
                    report.unique.push(path);
                }
            }
        }
        if !report.duplicates.is_empty() {
            info!("Removed {} exact duplicates", report.duplicates.len());
        }
        info!("Kept {} unique photos", report.unique.len());

        Ok(report)
    }
}

/// List supported image files directly inside `folder`, sorted by name
pub fn scan_images(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| OrganizerError::Io(format!("Failed to scan folder: {}", e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_supported_image(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Whether the extension is one of [`SUPPORTED_EXTENSIONS`] (any case)
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Move `path` into `folder` under the same name, refusing to overwrite
pub fn move_into(path: &Path, folder: &Path) -> Result<PathBuf> {
    fs::create_dir_all(folder).map_err(|e| OrganizerError::io_at("create", folder, e))?;

    let dest = folder.join(path.file_name().unwrap_or_default());
    if dest.exists() {
        return Err(OrganizerError::DestinationExists(dest));
    }

    if fs::rename(path, &dest).is_err() {
        // rename fails across filesystems
        fs::copy(path, &dest).map_err(|e| OrganizerError::io_at("copy", path, e))?;
        fs::remove_file(path).map_err(|e| OrganizerError::io_at("remove", path, e))?;
    }

    Ok(dest)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compute SHA256 hash of a file using streaming (memory-efficient)
pub fn compute_file_hash(path: &Path) -> Result<Sha256Hash> {
    let file = File::open(path).map_err(|e| OrganizerError::io_at("open", path, e))?;

    let mut reader = BufReader::with_capacity(HASH_BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_BUFFER_SIZE];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| OrganizerError::io_at("read", path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().into())
}

/// Compute SHA256 hash of in-memory data
pub fn compute_data_hash(data: &[u8]) -> Sha256Hash {
    Sha256::digest(data).into()
}

/// Convert a hash to a hexadecimal string
pub fn hash_to_hex(hash: &Sha256Hash) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}
