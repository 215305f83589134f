//! Bridge from `tracing` events to the hook registry.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::Local;
use serde_json::Value;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::entry::{CapturedError, Field, LogEntry};
use crate::registry::HookRegistry;
use crate::severity::Severity;

thread_local! {
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as running hooks; events emitted by the hooks
/// themselves are written by the other layers but not fired again.
struct DispatchGuard;

impl DispatchGuard {
    fn enter() -> Option<Self> {
        DISPATCHING.with(|flag| (!flag.replace(true)).then_some(DispatchGuard))
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|flag| flag.set(false));
    }
}

/// Crates whose events describe the index write itself. Shipping them would
/// feed every write back into the hook.
const TRANSPORT_CRATES: &[&str] = &[
    "hyper", "hyper_util", "reqwest", "h2", "tokio", "tower", "rustls", "want", "mio",
];

/// `tracing_subscriber` layer that fires registered hooks for each event.
#[derive(Clone)]
pub struct HookLayer {
    registry: HookRegistry,
    ignored: Vec<String>,
}

impl HookLayer {
    pub fn new(registry: HookRegistry) -> Self {
        Self {
            registry,
            ignored: TRANSPORT_CRATES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Never fire hooks for events whose target is in crate `name`.
    pub fn ignore_crate(mut self, name: impl Into<String>) -> Self {
        self.ignored.push(name.into());
        self
    }

    fn is_ignored(&self, target: &str) -> bool {
        let krate = target.split("::").next().unwrap_or(target);
        self.ignored.iter().any(|c| c == krate)
    }
}

impl<S: Subscriber> Layer<S> for HookLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = Severity::from(*meta.level());
        if !self.registry.has_hooks_for(level) || self.is_ignored(meta.target()) {
            return;
        }
        let Some(_guard) = DispatchGuard::enter() else {
            return;
        };

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        let entry = LogEntry {
            time: Local::now().fixed_offset(),
            level,
            message: visitor.message,
            data: visitor.data,
        };
        self.registry.fire(&entry);
    }
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    data: BTreeMap<String, Field>,
}

impl EntryVisitor {
    fn insert(&mut self, field: &TracingField, value: Value) {
        self.data.insert(field.name().to_string(), Field::Value(value));
    }
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.insert(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.data.insert(
            field.name().to_string(),
            Field::Error(Arc::new(CapturedError::capture(value))),
        );
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.insert(field, Value::String(format!("{value:?}")));
        }
    }
}
