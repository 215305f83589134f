use logship_search::SearchError;
use thiserror::Error;

/// Errors returned from a hook's `fire`.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to encode log message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("index write to '{index}' failed: {source}")]
    Index {
        index: String,
        #[source]
        source: SearchError,
    },

    #[error("invalid index date format '{0}'")]
    InvalidDateFormat(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
