use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LEVEL: &str = "debug";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Directory holding the daily files, relative to the working directory.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Minimum severity written by the logger.
    #[serde(default = "default_level")]
    pub level: String,
    /// `strftime` pattern for the `timestamp` field of each line.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Also print human-readable output to stdout.
    #[serde(default)]
    pub console: bool,
}

/// A usable `timestamp_format`: non-empty, with no unknown `strftime` specifiers.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn default_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            level: default_level(),
            timestamp_format: default_timestamp_format(),
            console: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_format_check() {
        assert!(is_valid_timestamp_format(DEFAULT_TIMESTAMP_FORMAT));
        assert!(is_valid_timestamp_format("%+"));
        assert!(!is_valid_timestamp_format(""));
        assert!(!is_valid_timestamp_format("%Y-%Q"));
        assert!(!is_valid_timestamp_format("%H:%M:%"));
    }
}
