//! Cooperative cancellation for a hook's write path.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared cancel flag. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct CancelScope {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Stop future writes. Writes already issued run to completion.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Receiver that flips to `true` on cancellation, for owners coordinating shutdown.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}
