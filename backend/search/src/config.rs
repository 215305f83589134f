//! Connection settings for the search cluster.

use serde::{Deserialize, Serialize};

/// Address used when nothing else is configured.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:9200";

/// Request timeout applied to every call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Base URLs of the cluster nodes, e.g. `http://10.0.0.5:9200`.
    #[serde(default = "default_addresses")]
    pub addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_addresses() -> Vec<String> {
    vec![DEFAULT_ADDRESS.to_string()]
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            addresses: default_addresses(),
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    /// Config pointing at a single node.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            addresses: vec![address.into()],
            ..Default::default()
        }
    }
}
