//! Config file loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::env::resolve_env_vars_with;
use crate::schema::LogshipConfig;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "logship.yaml";

/// Resolve the config file path. Priority: `LOGSHIP_CONFIG` env > `./logship.yaml`.
pub fn config_path() -> PathBuf {
    std::env::var("LOGSHIP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME))
}

/// Load and parse the config from disk, substituting `${VAR}` from the process env.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub fn load_config(path: &Path) -> Result<LogshipConfig> {
    load_config_with(path, &std::env::vars().collect())
}

pub fn load_config_with(path: &Path, env: &HashMap<String, String>) -> Result<LogshipConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(LogshipConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: serde_yaml::Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;
    // An empty file parses as null.
    if value.is_null() {
        return Ok(LogshipConfig::default());
    }

    let value = resolve_env_vars_with(&value, env)
        .with_context(|| format!("Failed to resolve env vars in: {}", path.display()))?;

    let config: LogshipConfig = serde_yaml::from_value(value)
        .with_context(|| format!("Invalid config structure in: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
