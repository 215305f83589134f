//! Log entries as seen by hooks.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use serde_json::Value;

use crate::message::ERROR_KEY;
use crate::severity::Severity;

/// A value attached to a log entry.
#[derive(Debug, Clone)]
pub enum Field {
    Value(Value),
    /// An error object. Never serialized as-is; messages render its text.
    Error(Arc<dyn StdError + Send + Sync>),
}

impl Field {
    /// JSON form used in shipped documents.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Error(err) => Value::String(err.to_string()),
        }
    }
}

/// Owned snapshot of a borrowed error, keeping only its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError(String);

impl CapturedError {
    pub fn capture(err: &(dyn StdError + 'static)) -> Self {
        Self(err.to_string())
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for CapturedError {}

/// One emitted log event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: DateTime<FixedOffset>,
    pub level: Severity,
    pub message: String,
    pub data: BTreeMap<String, Field>,
}

impl LogEntry {
    /// Entry stamped with the current local time.
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            time: Local::now().fixed_offset(),
            level,
            message: message.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn at(mut self, time: DateTime<FixedOffset>) -> Self {
        self.time = time;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), Field::Value(value.into()));
        self
    }

    /// Attach `err` under the reserved `error` key.
    pub fn with_error<E>(self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.with_error_field(ERROR_KEY, err)
    }

    pub fn with_error_field<E>(mut self, key: impl Into<String>, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.data.insert(key.into(), Field::Error(Arc::new(err)));
        self
    }
}
