//! Severity model shared by hooks and loggers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Log severities, most severe first.
///
/// The derived ordering follows verbosity: `Panic < Fatal < ... < Trace`, so a
/// level "at or above" a threshold `m` in severity is any level `l <= m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Panic,
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::Panic,
        Severity::Fatal,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Panic => "panic",
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// True if `self` is at least as severe as `threshold`.
    pub fn is_at_least(&self, threshold: Severity) -> bool {
        *self <= threshold
    }

    /// Closest `tracing` level; `Panic` and `Fatal` collapse onto `ERROR`.
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Panic | Self::Fatal | Self::Error => tracing::Level::ERROR,
            Self::Warning => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid severity: '{0}'")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panic" => Ok(Self::Panic),
            "fatal" => Ok(Self::Fatal),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warning,
            tracing::Level::INFO => Self::Info,
            tracing::Level::DEBUG => Self::Debug,
            _ => Self::Trace,
        }
    }
}

/// The severities at which a hook fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSet(Vec<Severity>);

impl LevelSet {
    /// Every severity at least as severe as `min`.
    pub fn at_or_above(min: Severity) -> Self {
        Self(Severity::ALL.into_iter().filter(|l| l.is_at_least(min)).collect())
    }

    /// Like `at_or_above`, from a level name. Unknown names yield an empty set.
    pub fn parse(min: &str) -> Self {
        min.parse().map(Self::at_or_above).unwrap_or_default()
    }

    pub fn contains(&self, level: Severity) -> bool {
        self.0.contains(&level)
    }

    pub fn as_slice(&self) -> &[Severity] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
