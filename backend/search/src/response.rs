//! Response bodies returned by the search engine and their classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SearchError;

/// Shard acknowledgement summary attached to every write response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub successful: u64,
    #[serde(default)]
    pub failed: u64,
}

/// Successful index-write acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: u64,
    /// `created` or `updated`.
    #[serde(default)]
    pub result: String,
    #[serde(rename = "_shards", default)]
    pub shards: ShardSummary,
}

/// Subset of the root endpoint (`GET /`) payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub name: String,
    pub cluster_name: String,
    pub version: ClusterVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterVersion {
    pub number: String,
}

/// Turn a raw `(status, body)` pair from an index write into a typed outcome.
pub fn classify_index_response(status: u16, body: &str) -> Result<IndexResponse, SearchError> {
    if !(200..300).contains(&status) {
        return Err(SearchError::Rejected {
            status,
            reason: rejection_reason(body),
        });
    }

    let response: IndexResponse = serde_json::from_str(body)?;
    if response.shards.failed > 0 {
        return Err(SearchError::ShardFailure {
            total: response.shards.total,
            successful: response.shards.successful,
            failed: response.shards.failed,
        });
    }
    Ok(response)
}

/// Parse the root endpoint payload, treating non-2xx as a rejection.
pub fn classify_cluster_info(status: u16, body: &str) -> Result<ClusterInfo, SearchError> {
    if !(200..300).contains(&status) {
        return Err(SearchError::Rejected {
            status,
            reason: rejection_reason(body),
        });
    }
    Ok(serde_json::from_str(body)?)
}

/// Extract `error.type: error.reason` from an engine error body, falling back
/// to the raw text.
fn rejection_reason(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    match value.get("error") {
        Some(Value::Object(err)) => {
            let kind = err.get("type").and_then(Value::as_str);
            let reason = err.get("reason").and_then(Value::as_str);
            match (kind, reason) {
                (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
                (Some(kind), None) => kind.to_string(),
                (None, Some(reason)) => reason.to_string(),
                (None, None) => body.trim().to_string(),
            }
        }
        Some(Value::String(reason)) => reason.clone(),
        _ => body.trim().to_string(),
    }
}
