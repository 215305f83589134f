//! Structured file logging for logship.
//!
//! Writes JSON lines to `<dir>/YYYY-MM-DD.log`, swaps the destination file when
//! re-initialized on a new day, and assembles the global subscriber together
//! with the hook layer.

pub mod config;
pub mod daily;
pub mod error;
pub mod logger;
pub mod sink;

pub use config::{is_valid_timestamp_format, LoggingConfig};
pub use daily::{daily_file_name, resolve_daily_file, DailyFile};
pub use error::LoggingError;
pub use logger::FileLogger;
pub use sink::FileSink;
