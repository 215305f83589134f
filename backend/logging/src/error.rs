use std::io;
use std::path::PathBuf;

use logship_hooks::ParseSeverityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level: {0}")]
    InvalidLevel(#[from] ParseSeverityError),

    #[error("invalid timestamp format '{0}'")]
    InvalidTimestampFormat(String),

    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create log file {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {} for append: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install global subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

impl LoggingError {
    /// Creation failures leave the process without a sink; everything else
    /// can be reported and worked around by the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CreateDir { .. } | Self::CreateFile { .. })
    }
}
