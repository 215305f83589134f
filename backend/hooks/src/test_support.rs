//! In-memory `IndexWriter` for hook tests.

use std::sync::Mutex;

use logship_search::{IndexResponse, IndexWriter, Refresh, SearchError, ShardSummary};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct IndexCall {
    pub index: String,
    pub body: Value,
    pub refresh: Refresh,
}

#[derive(Default)]
pub struct RecordingWriter {
    pub calls: Mutex<Vec<IndexCall>>,
    pub reject_with: Option<u16>,
}

impl RecordingWriter {
    pub fn rejecting(status: u16) -> Self {
        Self {
            reject_with: Some(status),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<IndexCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl IndexWriter for RecordingWriter {
    fn index_document(
        &self,
        index: &str,
        body: Vec<u8>,
        refresh: Refresh,
    ) -> Result<IndexResponse, SearchError> {
        let body: Value = serde_json::from_slice(&body)?;
        let mut calls = self.calls.lock().unwrap();
        calls.push(IndexCall {
            index: index.to_string(),
            body,
            refresh,
        });
        if let Some(status) = self.reject_with {
            return Err(SearchError::Rejected {
                status,
                reason: "index_closed_exception: closed".to_string(),
            });
        }
        Ok(IndexResponse {
            index: index.to_string(),
            id: format!("doc-{}", calls.len()),
            version: 1,
            result: "created".to_string(),
            shards: ShardSummary {
                total: 1,
                successful: 1,
                failed: 0,
            },
        })
    }
}
