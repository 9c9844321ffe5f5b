//! Duplicate filtering module
//!
//! This module removes thumbnails and byte-identical copies from a folder of
//! downloaded photos, moving rejects into backup folders.
//!
//! # Submodules
//!
//! - `detector` - Thumbnail rules, SHA256 hashing and the folder filter

pub mod detector;

pub use detector::{
    compute_data_hash, compute_file_hash, Classification, DuplicateFilter, FilterReport,
    MovedFile, ThumbnailReason, ThumbnailRules,
};
