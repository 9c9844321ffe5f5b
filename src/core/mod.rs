//! Core functionality module
//!
//! Configuration, error types, date assignment, and the flows that chain the
//! download, duplicate and organize stages together.
//!
//! # Submodules
//!
//! - `config` - Configuration loading, saving, and management
//! - `dates` - Spreading a date range over an ordered batch
//! - `error` - Error types and result aliases
//! - `pipeline` - Download → deduplicate → organize flows

pub mod config;
pub mod dates;
pub mod error;
pub mod pipeline;
