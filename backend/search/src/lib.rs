//! `logship-search` — minimal search-engine client.
//!
//! Provides:
//! - Address/credential configuration (`SearchConfig`)
//! - A blocking, cloneable `SearchClient` with round-robin address selection
//! - The `IndexWriter` seam used by the indexing hook
//! - Classification of index-write responses into success or typed failures

pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::{IndexWriter, Refresh, SearchClient};
pub use config::{SearchConfig, DEFAULT_ADDRESS};
pub use error::SearchError;
pub use response::{ClusterInfo, IndexResponse, ShardSummary};
