/// Hook trait and registry.
///
/// Hooks declare the severities they handle. The registry indexes hooks by
/// severity and runs, in registration order, every hook registered for an
/// entry's level. A failing hook never stops the chain or the caller.
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::entry::LogEntry;
use crate::error::HookError;
use crate::severity::Severity;

// ---------------------------------------------------------------------------
// Hook trait
// ---------------------------------------------------------------------------

pub trait Hook: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Severities at which `fire` is invoked.
    fn levels(&self) -> &[Severity];

    fn fire(&self, entry: &LogEntry) -> Result<(), HookError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

type HookBox = Arc<dyn Hook>;
type LevelMap = HashMap<Severity, Vec<HookBox>>;

/// Thread-safe registry of hooks organized by severity.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: Arc<RwLock<LevelMap>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under each of its severities.
    pub fn register(&self, hook: Arc<dyn Hook>) {
        let mut map = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        for level in hook.levels() {
            map.entry(*level).or_default().push(hook.clone());
        }
    }

    pub fn has_hooks_for(&self, level: Severity) -> bool {
        let map = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&level).is_some_and(|chain| !chain.is_empty())
    }

    /// Run every hook registered for the entry's level.
    /// Returns how many hooks completed without error.
    pub fn fire(&self, entry: &LogEntry) -> usize {
        // Snapshot the chain so hooks may register others while firing.
        let chain: Vec<HookBox> = {
            let map = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
            match map.get(&entry.level) {
                Some(chain) => chain.clone(),
                None => return 0,
            }
        };

        let mut succeeded = 0;
        for hook in &chain {
            debug!("[Hooks] Running {} for level {}", hook.name(), entry.level);
            match hook.fire(entry) {
                Ok(()) => succeeded += 1,
                Err(e) => warn!("[Hooks] {} failed to fire: {}", hook.name(), e),
            }
        }
        succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::LevelSet;
    use std::sync::Mutex;

    struct Counting {
        levels: LevelSet,
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Counting {
        fn new(min: Severity, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                levels: LevelSet::at_or_above(min),
                seen: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    impl Hook for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn levels(&self) -> &[Severity] {
            self.levels.as_slice()
        }

        fn fire(&self, entry: &LogEntry) -> Result<(), HookError> {
            self.seen.lock().unwrap().push(entry.message.clone());
            if self.fail {
                return Err(anyhow::anyhow!("sink unavailable").into());
            }
            Ok(())
        }
    }

    #[test]
    fn only_hooks_for_the_entry_level_fire() {
        let registry = HookRegistry::new();
        let errors_only = Counting::new(Severity::Error, false);
        let verbose = Counting::new(Severity::Debug, false);
        registry.register(errors_only.clone());
        registry.register(verbose.clone());

        assert_eq!(registry.fire(&LogEntry::new(Severity::Info, "started")), 1);
        assert_eq!(registry.fire(&LogEntry::new(Severity::Error, "crashed")), 2);
        assert_eq!(registry.fire(&LogEntry::new(Severity::Trace, "noise")), 0);

        assert_eq!(*errors_only.seen.lock().unwrap(), vec!["crashed"]);
        assert_eq!(*verbose.seen.lock().unwrap(), vec!["started", "crashed"]);
        assert!(!registry.has_hooks_for(Severity::Trace));
    }

    #[test]
    fn failing_hook_does_not_stop_the_chain() {
        let registry = HookRegistry::new();
        let broken = Counting::new(Severity::Info, true);
        let healthy = Counting::new(Severity::Info, false);
        registry.register(broken.clone());
        registry.register(healthy.clone());

        assert_eq!(registry.fire(&LogEntry::new(Severity::Warning, "slow")), 1);
        assert_eq!(healthy.seen.lock().unwrap().len(), 1);
        assert_eq!(broken.seen.lock().unwrap().len(), 1);
    }
}
