//! Structured file logger.
//!
//! First initialization fixes the level filter and the JSON line format.
//! Re-initialization only re-resolves the daily file and swaps it in.

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{Local, NaiveDate};
use logship_hooks::{HookLayer, Severity};
use tracing::{info, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, time::ChronoLocal};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{is_valid_timestamp_format, LoggingConfig};
use crate::daily::{resolve_daily_file, DailyFile};
use crate::error::LoggingError;
use crate::sink::FileSink;

pub struct FileLogger {
    config: LoggingConfig,
    level: Severity,
    sink: FileSink,
    current: ArcSwap<PathBuf>,
}

impl FileLogger {
    /// Open today's file under `config.dir`.
    pub fn init(config: &LoggingConfig) -> Result<Self, LoggingError> {
        Self::init_on(config, Local::now().date_naive())
    }

    pub fn init_on(config: &LoggingConfig, date: NaiveDate) -> Result<Self, LoggingError> {
        let level: Severity = config.level.parse()?;
        if !is_valid_timestamp_format(&config.timestamp_format) {
            return Err(LoggingError::InvalidTimestampFormat(
                config.timestamp_format.clone(),
            ));
        }
        let (daily, file) = resolve_daily_file(&config.dir, date)?;
        Ok(Self {
            config: config.clone(),
            level,
            sink: FileSink::new(file),
            current: ArcSwap::from_pointee(daily.path),
        })
    }

    /// Point the logger at today's file. Level and format are unchanged.
    pub fn reinit(&self) -> Result<DailyFile, LoggingError> {
        self.reinit_on(Local::now().date_naive())
    }

    pub fn reinit_on(&self, date: NaiveDate) -> Result<DailyFile, LoggingError> {
        let (daily, file) = resolve_daily_file(&self.config.dir, date)?;
        self.sink.swap(file);
        self.current.store(Arc::new(daily.path.clone()));
        info!(path = %daily.path.display(), "Log output switched");
        Ok(daily)
    }

    pub fn current_path(&self) -> PathBuf {
        self.current.load().as_ref().clone()
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// JSON-lines layer writing to the current daily file.
    pub fn layer<S>(&self) -> impl Layer<S> + Send + Sync + 'static
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_timer(ChronoLocal::new(self.config.timestamp_format.clone()))
            .with_ansi(false)
            .with_writer(self.sink.clone())
    }

    /// Install the global subscriber: level filter, file layer, optional
    /// console layer and optional hook layer.
    pub fn install(&self, hooks: Option<HookLayer>) -> Result<(), LoggingError> {
        // RUST_LOG overrides the configured level, as elsewhere in the stack.
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.level.as_tracing_level()).into())
            .from_env_lossy();

        let console = self.config.console.then(|| {
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .with_ansi(true)
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(self.layer())
            .with(console)
            .with(hooks)
            .try_init()?;
        Ok(())
    }
}
