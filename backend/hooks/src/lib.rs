//! Logger hooks for structured logging pipelines.
//!
//! A hook declares the severities it cares about; the registry routes every
//! entry at one of those severities to the hook's `fire`. `ElasticHook` turns
//! the entry into a `LogMessage` document and writes it to a search index.

pub mod cancel;
pub mod elastic;
pub mod entry;
pub mod error;
pub mod index;
pub mod layer;
pub mod message;
pub mod registry;
pub mod severity;

#[cfg(test)]
pub(crate) mod test_support;

pub use cancel::CancelScope;
pub use elastic::{ElasticHook, FireStrategy, SyncFire};
pub use entry::{CapturedError, Field, LogEntry};
pub use error::HookError;
pub use index::{DailyIndex, FixedIndex, IndexNamer};
pub use layer::HookLayer;
pub use message::{rfc3339_nano, LogMessage, ERROR_KEY};
pub use registry::{Hook, HookRegistry};
pub use severity::{LevelSet, ParseSeverityError, Severity};
