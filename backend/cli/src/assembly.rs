//! Top-level wiring. Owns the search client, hook and file logger that the
//! libraries only ever borrow or share.

use std::sync::Arc;

use anyhow::{Context, Result};
use logship_config::LogshipConfig;
use logship_hooks::{ElasticHook, HookLayer, HookRegistry, Severity};
use logship_logging::{FileLogger, LoggingError};
use logship_search::SearchClient;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub struct App {
    /// `None` when the daily file could not be opened and output fell back to stdout.
    pub logger: Option<FileLogger>,
    pub hook: Option<Arc<ElasticHook>>,
}

/// Build the search client. Any failure here is fatal to the caller.
pub fn build_client(config: &LogshipConfig) -> Result<SearchClient> {
    SearchClient::new(&config.search).context("search client configuration is invalid")
}

pub fn build_hook(config: &LogshipConfig, client: SearchClient) -> Result<ElasticHook> {
    let min_level: Severity = config
        .hook
        .min_level
        .parse()
        .context("hook.minLevel is invalid")?;
    let namer = config.hook.index.namer().context("hook.index is invalid")?;
    Ok(ElasticHook::with_boxed_namer(
        Arc::new(client),
        config.hook.host.clone(),
        min_level,
        namer,
    ))
}

/// Open today's log file. Creation failures are fatal; anything else is
/// handed back so the caller can fall back to stdout.
pub fn open_logger(config: &LogshipConfig) -> Result<(Option<FileLogger>, Option<LoggingError>)> {
    match FileLogger::init(&config.logging) {
        Ok(logger) => Ok((Some(logger), None)),
        Err(e) if e.is_fatal() => Err(e).context("cannot create log sink"),
        Err(e) => Ok((None, Some(e))),
    }
}

/// Create the file logger, search client and hook, then install the global subscriber.
pub fn assemble(config: &LogshipConfig) -> Result<App> {
    let (logger, open_error) = open_logger(config)?;

    let registry = HookRegistry::new();
    let hook = if config.hook.enabled {
        let hook = Arc::new(build_hook(config, build_client(config)?)?);
        registry.register(hook.clone());
        Some(hook)
    } else {
        None
    };
    let hooks = Some(HookLayer::new(registry));

    match &logger {
        Some(logger) => logger.install(hooks)?,
        None => install_console(&config.logging.level, hooks)?,
    }

    if let Some(e) = open_error {
        warn!(error = %e, "Daily log file unavailable; logging to stdout only");
    }
    if let Some(logger) = &logger {
        info!(path = %logger.current_path().display(), "File logging initialized");
    }
    Ok(App { logger, hook })
}

fn install_console(level: &str, hooks: Option<HookLayer>) -> Result<()> {
    let level: Severity = level.parse()?;
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.as_tracing_level()).into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(hooks)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logship_config::IndexSetting;
    use logship_hooks::Hook;

    #[test]
    fn hook_follows_config() {
        let mut config = LogshipConfig::default();
        config.hook.host = "web-1".into();
        config.hook.min_level = "warn".into();
        config.hook.index = IndexSetting::Fixed { name: "app_logs".into() };

        let hook = build_hook(&config, build_client(&config).unwrap()).unwrap();
        assert_eq!(hook.host(), "web-1");
        assert_eq!(hook.index_name(), "app_logs");
        assert_eq!(hook.levels().len(), 4);
    }

    #[test]
    fn malformed_address_fails_client_build() {
        let mut config = LogshipConfig::default();
        config.search.addresses = vec!["192.168.61.129:9200".into()];
        assert!(build_client(&config).is_err());
    }

    fn config_in(dir: &std::path::Path) -> LogshipConfig {
        let mut config = LogshipConfig::default();
        config.logging.dir = dir.join("logs");
        config.hook.enabled = false;
        config
    }

    #[test]
    fn logger_opens_todays_file_in_configured_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let (logger, open_error) = open_logger(&config_in(tmp.path())).unwrap();

        assert!(open_error.is_none());
        let path = logger.unwrap().current_path();
        assert!(path.starts_with(tmp.path().join("logs")));
        assert!(path.is_file());
    }

    #[test]
    fn unopenable_log_file_falls_back_instead_of_failing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let today = chrono::Local::now().date_naive();
        for date in [today, today.succ_opt().unwrap()] {
            let name = logship_logging::daily_file_name(date);
            std::fs::create_dir_all(config.logging.dir.join(name)).unwrap();
        }

        let (logger, open_error) = open_logger(&config).unwrap();
        assert!(logger.is_none());
        assert!(matches!(open_error, Some(LoggingError::Open { .. })));
    }

    #[test]
    fn uncreatable_log_dir_aborts_assembly() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let err = assemble(&config_in(&blocker)).err().unwrap();
        assert!(format!("{err:#}").contains("cannot create log sink"), "{err:#}");
    }
}
