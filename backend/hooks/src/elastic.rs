//! Hook that writes each qualifying entry to a search index.

use std::sync::Arc;

use logship_search::{IndexWriter, Refresh};
use tracing::debug;

use crate::cancel::CancelScope;
use crate::entry::LogEntry;
use crate::error::HookError;
use crate::index::{FixedIndex, IndexNamer};
use crate::message::LogMessage;
use crate::registry::Hook;
use crate::severity::{LevelSet, Severity};

/// How an `ElasticHook` delivers an entry.
pub trait FireStrategy: Send + Sync {
    fn fire(&self, hook: &ElasticHook, entry: &LogEntry) -> Result<(), HookError>;
}

/// One blocking index write per entry, visible to searches immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncFire;

impl FireStrategy for SyncFire {
    fn fire(&self, hook: &ElasticHook, entry: &LogEntry) -> Result<(), HookError> {
        if hook.cancel_scope().is_cancelled() {
            debug!(level = %entry.level, "Hook cancelled; entry not shipped");
            return Ok(());
        }

        let body = hook.message_for(entry).to_json()?;
        let index = hook.index_name();
        let response = hook
            .client()
            .index_document(&index, body, Refresh::True)
            .map_err(|source| HookError::Index {
                index: index.clone(),
                source,
            })?;

        debug!(
            index = %response.index,
            id = %response.id,
            result = %response.result,
            "Log entry indexed"
        );
        Ok(())
    }
}

pub struct ElasticHook {
    client: Arc<dyn IndexWriter>,
    host: String,
    index: Box<dyn IndexNamer>,
    levels: LevelSet,
    cancel: CancelScope,
    strategy: Box<dyn FireStrategy>,
}

impl ElasticHook {
    /// Hook writing to a fixed index, firing at `min_level` and above.
    pub fn new(
        client: Arc<dyn IndexWriter>,
        host: impl Into<String>,
        min_level: Severity,
        index: impl Into<String>,
    ) -> Self {
        Self::with_namer(client, host, min_level, FixedIndex::new(index))
    }

    /// Hook whose target index is chosen by `namer` on every fire.
    pub fn with_namer(
        client: Arc<dyn IndexWriter>,
        host: impl Into<String>,
        min_level: Severity,
        namer: impl IndexNamer + 'static,
    ) -> Self {
        Self::with_boxed_namer(client, host, min_level, Box::new(namer))
    }

    pub fn with_boxed_namer(
        client: Arc<dyn IndexWriter>,
        host: impl Into<String>,
        min_level: Severity,
        namer: Box<dyn IndexNamer>,
    ) -> Self {
        Self {
            client,
            host: host.into(),
            index: namer,
            levels: LevelSet::at_or_above(min_level),
            cancel: CancelScope::new(),
            strategy: Box::new(SyncFire),
        }
    }

    /// Replace the firing set, e.g. with `LevelSet::parse` output.
    pub fn with_levels(mut self, levels: LevelSet) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_strategy(mut self, strategy: impl FireStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn client(&self) -> &dyn IndexWriter {
        self.client.as_ref()
    }

    /// Current target index; re-evaluated on each call.
    pub fn index_name(&self) -> String {
        self.index.name()
    }

    pub fn cancel_scope(&self) -> &CancelScope {
        &self.cancel
    }

    pub fn message_for(&self, entry: &LogEntry) -> LogMessage {
        LogMessage::from_entry(entry, &self.host)
    }
}

impl Hook for ElasticHook {
    fn name(&self) -> &str {
        "elastic_hook"
    }

    fn levels(&self) -> &[Severity] {
        self.levels.as_slice()
    }

    fn fire(&self, entry: &LogEntry) -> Result<(), HookError> {
        self.strategy.fire(self, entry)
    }
}
