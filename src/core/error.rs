//! Error types for the photo organizer
//!
//! This module defines the error type shared by the download, duplicate
//! filtering and organizing stages. Configuration errors live next to the
//! configuration code in [`crate::core::config::ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the photo organizer
#[derive(Error, Debug)]
pub enum OrganizerError {
    /// Network or HTTP failure while fetching a URL (non-2xx, timeout, DNS)
    #[error("Failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    /// A date typed by the user could not be parsed
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDateInput { input: String },

    /// General I/O error
    #[error("IO error: {0}")]
    Io(String),

    /// A move would have clobbered an existing file
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// The folder to process does not exist
    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// The system clipboard could not be read
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Interactive input could not be read
    #[error("Prompt error: {0}")]
    Prompt(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OrganizerError>;

impl From<std::io::Error> for OrganizerError {
    fn from(err: std::io::Error) -> Self {
        OrganizerError::Io(err.to_string())
    }
}

impl OrganizerError {
    /// Build an I/O error that names the path involved
    pub fn io_at(action: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        OrganizerError::Io(format!("Failed to {} '{}': {}", action, path.display(), err))
    }
}
