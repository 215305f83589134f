//! `logship-config` — runtime configuration for logship.
//!
//! Provides:
//! - Typed config schema (search cluster, indexing hook, file logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Validation with errors and warnings

pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use env::{resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_path, load_config, load_config_with, CONFIG_FILE_NAME};
pub use schema::{HookSettings, IndexSetting, LogshipConfig};
pub use validation::{validate, validate_index_name, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load and validate a config file. Warnings are logged; errors fail the load.
///
/// This is the main entry point for loading a config at runtime.
pub fn load_and_prepare(path: &Path) -> Result<LogshipConfig> {
    let config = load_config(path)?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("invalid config {}: {}", path.display(), errors.join("; "));
    }

    Ok(config)
}
