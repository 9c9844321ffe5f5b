//! Configuration module for the photo organizer
//!
//! Configuration is a single JSON object stored next to the working directory
//! (`./config.json` unless `--config` says otherwise). Missing keys are filled
//! from the defaults, unknown keys are preserved, and the file is written back
//! with 2-space indentation.

use chrono::NaiveDate;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Filename fragments that mark an image as a thumbnail
pub const DEFAULT_THUMBNAIL_PATTERNS: &[&str] =
    &["thumb", "thumbnail", "_sm", "_xs", "-small", "mini"];

/// Get the default configuration file path (`./config.json`).
pub fn get_config_path() -> PathBuf {
    PathBuf::from(".").join(CONFIG_FILE_NAME)
}

/// Date pattern used for date keys and output filenames
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum NamingConvention {
    /// 250128
    #[default]
    #[serde(rename = "YYMMDD")]
    Yymmdd,
    /// 20250128
    #[serde(rename = "YYYYMMDD")]
    Yyyymmdd,
    /// 012825
    #[serde(rename = "MMDDYY")]
    Mmddyy,
    /// 280125
    #[serde(rename = "DDMMYY")]
    Ddmmyy,
    /// 2025-01-28
    #[serde(rename = "YYYY-MM-DD", alias = "ISO")]
    Iso,
}

impl NamingConvention {
    /// All conventions, in menu order
    pub const ALL: [NamingConvention; 5] = [
        NamingConvention::Yymmdd,
        NamingConvention::Yyyymmdd,
        NamingConvention::Mmddyy,
        NamingConvention::Ddmmyy,
        NamingConvention::Iso,
    ];

    /// The name used in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::Yymmdd => "YYMMDD",
            NamingConvention::Yyyymmdd => "YYYYMMDD",
            NamingConvention::Mmddyy => "MMDDYY",
            NamingConvention::Ddmmyy => "DDMMYY",
            NamingConvention::Iso => "YYYY-MM-DD",
        }
    }

    /// `chrono` format string for this convention
    pub fn pattern(&self) -> &'static str {
        match self {
            NamingConvention::Yymmdd => "%y%m%d",
            NamingConvention::Yyyymmdd => "%Y%m%d",
            NamingConvention::Mmddyy => "%m%d%y",
            NamingConvention::Ddmmyy => "%d%m%y",
            NamingConvention::Iso => "%Y-%m-%d",
        }
    }

    /// Format a date as a date key
    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }

    /// Human-readable description with an example, for menus
    pub fn description(&self) -> &'static str {
        match self {
            NamingConvention::Yymmdd => "YYMMDD - 250128 (YearMonthDay, 2-digit year)",
            NamingConvention::Yyyymmdd => "YYYYMMDD - 20250128 (YearMonthDay, 4-digit year)",
            NamingConvention::Mmddyy => "MMDDYY - 012825 (MonthDayYear)",
            NamingConvention::Ddmmyy => "DDMMYY - 280125 (DayMonthYear)",
            NamingConvention::Iso => "YYYY-MM-DD - 2025-01-28 (ISO format)",
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingConvention {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "YYMMDD" => Ok(NamingConvention::Yymmdd),
            "YYYYMMDD" => Ok(NamingConvention::Yyyymmdd),
            "MMDDYY" => Ok(NamingConvention::Mmddyy),
            "DDMMYY" => Ok(NamingConvention::Ddmmyy),
            "YYYY-MM-DD" | "ISO" => Ok(NamingConvention::Iso),
            other => Err(ConfigError::InvalidValue(
                "naming_convention".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// Order in which dates are distributed and output files are sorted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// Most recent photos first
    #[default]
    NewestFirst,
    /// Oldest photos first
    OldestFirst,
}

impl DateOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateOrder::NewestFirst => "newest_first",
            DateOrder::OldestFirst => "oldest_first",
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest_first" => Ok(DateOrder::NewestFirst),
            "oldest_first" => Ok(DateOrder::OldestFirst),
            other => Err(ConfigError::InvalidValue(
                "date_order".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where raw downloads are written
    pub download_folder: PathBuf,

    /// Where renamed copies are written
    pub organized_folder: PathBuf,

    /// Where thumbnails are moved
    pub thumbnails_folder: PathBuf,

    /// Where exact duplicates are moved
    pub duplicates_folder: PathBuf,

    /// Date pattern for output filenames
    pub naming_convention: NamingConvention,

    /// Date ordering policy
    pub date_order: DateOrder,

    /// Files smaller than this are treated as thumbnails
    pub min_file_size_kb: u64,

    /// Pause between download attempts, in seconds
    pub download_delay: f64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Lowercase filename fragments that mark a thumbnail
    pub thumbnail_patterns: Vec<String>,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Keys this version does not know about, kept so they survive a save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_folder: PathBuf::from("downloads_raw"),
            organized_folder: PathBuf::from("photos_organized"),
            thumbnails_folder: PathBuf::from("thumbnails_backup"),
            duplicates_folder: PathBuf::from("duplicates_backup"),
            naming_convention: NamingConvention::default(),
            date_order: DateOrder::default(),
            min_file_size_kb: 100,
            download_delay: 0.2,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            thumbnail_patterns: DEFAULT_THUMBNAIL_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            logging: LoggingConfig::default(),
            extra: Map::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./photo_organizer.log"),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        Self::from_json(&content).map_err(|e| match e {
            ConfigError::ParseError(_, msg) => ConfigError::ParseError(path.to_path_buf(), msg),
            other => other,
        })
    }

    /// Parse configuration from a JSON string, filling in defaults
    ///
    /// Only malformed JSON, or a top level that isn't an object, is an error.
    /// A key with an unusable value is logged and falls back to its own
    /// default; every other key, known or not, is kept.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(PathBuf::new(), e.to_string()))?;
        let Value::Object(mut map) = value else {
            return Err(ConfigError::ParseError(
                PathBuf::new(),
                "expected a JSON object".to_string(),
            ));
        };

        let mut config = Config::default();
        take_field(&mut map, "download_folder", &mut config.download_folder);
        take_field(&mut map, "organized_folder", &mut config.organized_folder);
        take_field(&mut map, "thumbnails_folder", &mut config.thumbnails_folder);
        take_field(&mut map, "duplicates_folder", &mut config.duplicates_folder);
        take_parsed(&mut map, "naming_convention", &mut config.naming_convention);
        take_parsed(&mut map, "date_order", &mut config.date_order);
        take_size_kb(&mut map, &mut config.min_file_size_kb);
        take_field(&mut map, "download_delay", &mut config.download_delay);
        take_field(&mut map, "user_agent", &mut config.user_agent);
        take_field(&mut map, "thumbnail_patterns", &mut config.thumbnail_patterns);

        match map.remove("logging") {
            Some(Value::Object(mut logging)) => {
                take_field(&mut logging, "level", &mut config.logging.level);
                take_field(&mut logging, "log_to_file", &mut config.logging.log_to_file);
                take_field(&mut logging, "log_file", &mut config.logging.log_file);
            }
            Some(other) => warn!("Invalid value for 'logging' ({}), using defaults", other),
            None => {}
        }

        config.extra = map;
        config.normalize();
        Ok(config)
    }

    /// Load configuration, falling back to defaults
    ///
    /// A missing file silently yields defaults. A malformed file is logged and
    /// also yields defaults; it is not an error for the caller.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(ConfigError::FileNotFound(_)) => Self::default(),
            Err(e) => {
                warn!("Error loading config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration as pretty-printed JSON (2-space indentation)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_json()?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Serialize to the on-disk JSON form
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create the four working folders if they don't exist
    pub fn ensure_folders(&self) -> Result<(), ConfigError> {
        for folder in self.folders() {
            fs::create_dir_all(folder)
                .map_err(|e| ConfigError::WriteError(folder.to_path_buf(), e.to_string()))?;
        }
        Ok(())
    }

    /// The download, organized, thumbnails and duplicates folders
    pub fn folders(&self) -> [&Path; 4] {
        [
            &self.download_folder,
            &self.organized_folder,
            &self.thumbnails_folder,
            &self.duplicates_folder,
        ]
    }

    /// Delay between download attempts
    pub fn download_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.download_delay.max(0.0)).unwrap_or_default()
    }

    /// Key/value lines for display
    pub fn summary(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            (
                "download_folder".to_string(),
                self.download_folder.display().to_string(),
            ),
            (
                "organized_folder".to_string(),
                self.organized_folder.display().to_string(),
            ),
            (
                "thumbnails_folder".to_string(),
                self.thumbnails_folder.display().to_string(),
            ),
            (
                "duplicates_folder".to_string(),
                self.duplicates_folder.display().to_string(),
            ),
            (
                "naming_convention".to_string(),
                self.naming_convention.to_string(),
            ),
            ("date_order".to_string(), self.date_order.to_string()),
            (
                "min_file_size_kb".to_string(),
                self.min_file_size_kb.to_string(),
            ),
            ("download_delay".to_string(), self.download_delay.to_string()),
            ("user_agent".to_string(), self.user_agent.clone()),
            (
                "thumbnail_patterns".to_string(),
                format!("{:?}", self.thumbnail_patterns),
            ),
            ("logging.level".to_string(), self.logging.level.clone()),
        ];
        for (key, value) in &self.extra {
            lines.push((key.clone(), value.to_string()));
        }
        lines
    }

    /// Clamp values that would be unusable at runtime
    fn normalize(&mut self) {
        if self.min_file_size_kb == 0 {
            warn!("min_file_size_kb must be positive, using 1");
            self.min_file_size_kb = 1;
        }
        if self.download_delay.is_nan() || self.download_delay < 0.0 {
            warn!("download_delay must be non-negative, using 0");
            self.download_delay = 0.0;
        }
    }
}

/// Move `key` out of `map` into `target`, keeping the default if it doesn't fit
fn take_field<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str, target: &mut T) {
    let Some(value) = map.remove(key) else {
        return;
    };
    match T::deserialize(&value) {
        Ok(parsed) => *target = parsed,
        Err(e) => warn!("Invalid value for '{}' ({}), using default: {}", key, value, e),
    }
}

/// Like [`take_field`] for settings also typed by users, matched case-insensitively
fn take_parsed<T: FromStr>(map: &mut Map<String, Value>, key: &str, target: &mut T) {
    let Some(value) = map.remove(key) else {
        return;
    };
    match value.as_str().map(str::parse::<T>) {
        Some(Ok(parsed)) => *target = parsed,
        _ => warn!("Invalid value for '{}' ({}), using default", key, value),
    }
}

/// `min_file_size_kb` also accepts whole-number floats such as `50.0`
fn take_size_kb(map: &mut Map<String, Value>, target: &mut u64) {
    let Some(value) = map.remove("min_file_size_kb") else {
        return;
    };
    let kb = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|kb| kb.is_finite() && *kb >= 0.0 && kb.fract() == 0.0)
            .map(|kb| kb as u64)
    });
    match kb {
        Some(kb) => *target = kb,
        None => warn!("Invalid value for 'min_file_size_kb' ({}), using default", value),
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Failed to read the configuration file
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    ReadError(PathBuf, String),

    /// Failed to parse the configuration file (invalid JSON)
    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    ParseError(PathBuf, String),

    /// Failed to serialize configuration to JSON
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),

    /// Failed to write configuration file or create a folder
    #[error("Failed to write '{}': {}", .0.display(), .1)]
    WriteError(PathBuf, String),

    /// A setting was given a value it does not accept
    #[error("Invalid value for {0}: '{1}'")]
    InvalidValue(String, String),
}
