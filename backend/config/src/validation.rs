//! Config validation: schema checks with user-friendly error messages.

use chrono::NaiveDate;
use logship_hooks::{DailyIndex, Severity};
use logship_logging::is_valid_timestamp_format;
use thiserror::Error;
use url::Url;

use crate::schema::{IndexSetting, LogshipConfig};

/// Characters the search engine refuses in index names.
const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#', ':', ' '];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &LogshipConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_search(config, &mut report);
    validate_hook(config, &mut report);
    validate_logging(config, &mut report);
    report
}

/// Check an index name against the engine's naming rules.
pub fn validate_index_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("index name cannot be empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("'{name}' is not a valid index name"));
    }
    if name.len() > 255 {
        return Err("index name is longer than 255 bytes".to_string());
    }
    if name.chars().any(char::is_uppercase) {
        return Err(format!("index name '{name}' must be lowercase"));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_INDEX_CHARS.contains(c)) {
        return Err(format!("index name '{name}' contains forbidden character '{c}'"));
    }
    if name.starts_with(['-', '_', '+']) {
        return Err(format!("index name '{name}' cannot start with '-', '_' or '+'"));
    }
    Ok(())
}

fn validate_search(config: &LogshipConfig, report: &mut ValidationReport) {
    let search = &config.search;
    if search.addresses.is_empty() {
        report.error("search.addresses", "At least one address is required");
    }
    for (i, address) in search.addresses.iter().enumerate() {
        let path = format!("search.addresses[{i}]");
        match Url::parse(address) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
                if url.scheme() == "http" && search.username.is_some() {
                    report.warn(&path, "Credentials will be sent over plain http");
                }
            }
            Ok(url) => report.error(&path, format!("Unsupported address '{url}'")),
            Err(e) => report.error(&path, format!("Invalid address '{address}': {e}")),
        }
    }
    if search.password.is_some() && search.username.is_none() {
        report.warn("search.password", "Password is ignored without a username");
    }
    if search.timeout_secs == 0 {
        report.error("search.timeoutSecs", "Timeout must be greater than zero");
    }
}

fn validate_hook(config: &LogshipConfig, report: &mut ValidationReport) {
    let hook = &config.hook;
    if !hook.enabled {
        return;
    }
    if hook.min_level.parse::<Severity>().is_err() {
        report.error(
            "hook.minLevel",
            format!("Unknown level '{}'; the hook would never fire", hook.min_level),
        );
    }
    if hook.host.trim().is_empty() {
        report.warn("hook.host", "Empty host label; documents will carry an empty Host");
    }
    match &hook.index {
        IndexSetting::Fixed { name } => {
            if let Err(message) = validate_index_name(name) {
                report.error("hook.index.name", message);
            }
        }
        IndexSetting::Daily {
            prefix,
            date_format,
        } => {
            let namer = match DailyIndex::with_format(prefix.clone(), date_format.clone()) {
                Ok(namer) => namer,
                Err(_) => {
                    report.error("hook.index.dateFormat", format!("Invalid date format '{date_format}'"));
                    return;
                }
            };
            // Check a sample name rather than the bare prefix.
            let sample_day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default();
            if let Err(message) = validate_index_name(&namer.name_on(sample_day)) {
                report.error("hook.index.prefix", message);
            }
        }
    }
}

fn validate_logging(config: &LogshipConfig, report: &mut ValidationReport) {
    let logging = &config.logging;
    if logging.dir.as_os_str().is_empty() {
        report.error("logging.dir", "Log directory cannot be empty");
    }
    if logging.level.parse::<Severity>().is_err() {
        report.error("logging.level", format!("Unknown level '{}'", logging.level));
    }
    if !is_valid_timestamp_format(&logging.timestamp_format) {
        report.error(
            "logging.timestampFormat",
            format!("Invalid timestamp format '{}'", logging.timestamp_format),
        );
    }
}
