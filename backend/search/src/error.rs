use thiserror::Error;

/// Failures surfaced by the search client.
///
/// `Transport` means the request never produced an HTTP response; `Rejected`
/// and `ShardFailure` mean the engine answered but refused the document.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("blocking search request issued from inside an async runtime")]
    AsyncContext,

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("search engine rejected request with status {status}: {reason}")]
    Rejected { status: u16, reason: String },

    #[error("document indexed on {successful}/{total} shards ({failed} failed)")]
    ShardFailure { total: u64, successful: u64, failed: u64 },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// True when the engine itself answered with a failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::ShardFailure { .. })
    }
}
