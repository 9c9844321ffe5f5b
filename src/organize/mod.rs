//! Organize module
//!
//! Renames photos into date-ordered sequential filenames.
//!
//! # Submodules
//!
//! - `organizer` - Date-key naming, per-date counters and copying

pub mod organizer;

pub use organizer::{NamedOutput, OrganizeReport, Organizer, OrganizerSettings};
