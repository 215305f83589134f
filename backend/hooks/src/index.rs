//! Index-name suppliers, consulted once per fired entry.

use std::fmt::Write;

use chrono::{NaiveDate, Utc};

use crate::error::HookError;

pub trait IndexNamer: Send + Sync {
    fn name(&self) -> String;
}

/// Always the same index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIndex(String);

impl FixedIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl IndexNamer for FixedIndex {
    fn name(&self) -> String {
        self.0.clone()
    }
}

/// One index per UTC day, e.g. `logs-2024.03.01`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyIndex {
    prefix: String,
    date_format: String,
}

impl DailyIndex {
    pub const DEFAULT_DATE_FORMAT: &'static str = "%Y.%m.%d";

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            date_format: Self::DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Use a custom strftime pattern for the date part.
    ///
    /// The pattern is rendered once against a sample date; unknown specifiers
    /// and ones a bare date cannot supply (`%H`, `%z`) are rejected.
    pub fn with_format(
        prefix: impl Into<String>,
        date_format: impl Into<String>,
    ) -> Result<Self, HookError> {
        let date_format = date_format.into();
        let sample = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default();
        let mut rendered = String::new();
        if write!(rendered, "{}", sample.format(&date_format)).is_err() {
            return Err(HookError::InvalidDateFormat(date_format));
        }
        Ok(Self {
            prefix: prefix.into(),
            date_format,
        })
    }

    pub fn name_on(&self, date: NaiveDate) -> String {
        format!("{}{}", self.prefix, date.format(&self.date_format))
    }
}

impl IndexNamer for DailyIndex {
    fn name(&self) -> String {
        self.name_on(Utc::now().date_naive())
    }
}

impl<F> IndexNamer for F
where
    F: Fn() -> String + Send + Sync,
{
    fn name(&self) -> String {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn daily_index_formats_date() {
        let namer = DailyIndex::new("logs-");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(namer.name_on(date), "logs-2024.03.01");

        let compact = DailyIndex::with_format("app_", "%Y%m%d").unwrap();
        assert_eq!(compact.name_on(date), "app_20240301");
    }

    #[test]
    fn unusable_date_formats_are_rejected_up_front() {
        for pattern in ["%Q", "%Y.%", "%Y-%H", "%Y%z"] {
            let err = DailyIndex::with_format("logs-", pattern).unwrap_err();
            assert!(
                matches!(&err, HookError::InvalidDateFormat(p) if p == pattern),
                "{pattern}: {err}"
            );
        }
    }

    #[test]
    fn closures_are_namers() {
        let calls = AtomicUsize::new(0);
        let namer = || format!("shard-{}", calls.fetch_add(1, Ordering::SeqCst));
        assert_eq!(namer.name(), "shard-0");
        assert_eq!(namer.name(), "shard-1");
    }
}
