//! Config schema.

use logship_hooks::{DailyIndex, FixedIndex, HookError, IndexNamer};
use logship_logging::LoggingConfig;
use logship_search::SearchConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST_LABEL: &str = "localhost";
pub const DEFAULT_MIN_LEVEL: &str = "debug";
pub const DEFAULT_INDEX: &str = "my_index";

/// Root config object (`logship.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogshipConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub hook: HookSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSettings {
    /// Attach the indexing hook at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Value of the `Host` field in shipped documents.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_min_level")]
    pub min_level: String,
    #[serde(default)]
    pub index: IndexSetting,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            min_level: default_min_level(),
            index: IndexSetting::default(),
        }
    }
}

/// Target index for shipped entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IndexSetting {
    Fixed {
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    Daily {
        prefix: String,
        #[serde(default = "default_date_format")]
        date_format: String,
    },
}

impl Default for IndexSetting {
    fn default() -> Self {
        Self::Fixed {
            name: DEFAULT_INDEX.to_string(),
        }
    }
}

impl IndexSetting {
    pub fn namer(&self) -> Result<Box<dyn IndexNamer>, HookError> {
        Ok(match self {
            Self::Fixed { name } => Box::new(FixedIndex::new(name.clone())),
            Self::Daily {
                prefix,
                date_format,
            } => Box::new(DailyIndex::with_format(prefix.clone(), date_format.clone())?),
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    DEFAULT_HOST_LABEL.to_string()
}

fn default_min_level() -> String {
    DEFAULT_MIN_LEVEL.to_string()
}

fn default_date_format() -> String {
    DailyIndex::DEFAULT_DATE_FORMAT.to_string()
}
