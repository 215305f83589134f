//! One log file per calendar day.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::LoggingError;

/// What `resolve_daily_file` found or created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFile {
    pub path: PathBuf,
    pub created_dir: bool,
    pub created_file: bool,
}

/// `2024-03-01.log`
pub fn daily_file_name(date: NaiveDate) -> String {
    format!("{}.log", date.format("%Y-%m-%d"))
}

/// Ensure `dir` and the file for `date` exist, then open the file for append.
pub fn resolve_daily_file(dir: &Path, date: NaiveDate) -> Result<(DailyFile, File), LoggingError> {
    let mut created_dir = false;
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        created_dir = true;
    }

    let path = dir.join(daily_file_name(date));
    let mut created_file = false;
    if !path.exists() {
        File::create(&path).map_err(|source| LoggingError::CreateFile {
            path: path.clone(),
            source,
        })?;
        created_file = true;
    }

    let file = OpenOptions::new()
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::Open {
            path: path.clone(),
            source,
        })?;

    debug!(path = %path.display(), created_dir, created_file, "Resolved daily log file");
    Ok((
        DailyFile {
            path,
            created_dir,
            created_file,
        },
        file,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn file_name_is_the_date() {
        assert_eq!(daily_file_name(day(1)), "2024-03-01.log");
    }

    #[test]
    fn second_resolve_on_same_day_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");

        let (first, mut file) = resolve_daily_file(&dir, day(1)).unwrap();
        assert!(first.created_dir);
        assert!(first.created_file);
        writeln!(file, "line one").unwrap();

        let (second, mut file) = resolve_daily_file(&dir, day(1)).unwrap();
        assert_eq!(second.path, first.path);
        assert!(!second.created_dir);
        assert!(!second.created_file);
        writeln!(file, "line two").unwrap();

        let contents = fs::read_to_string(&first.path).unwrap();
        assert_eq!(contents, "line one\nline two\n");
    }

    #[test]
    fn different_days_get_different_files() {
        let tmp = tempfile::tempdir().unwrap();
        let (a, _) = resolve_daily_file(tmp.path(), day(1)).unwrap();
        let (b, _) = resolve_daily_file(tmp.path(), day(2)).unwrap();

        assert_ne!(a.path, b.path);
        assert!(a.path.ends_with("2024-03-01.log"));
        assert!(b.path.ends_with("2024-03-02.log"));
        assert!(!b.created_dir);
    }

    #[test]
    fn directory_creation_failure_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let err = resolve_daily_file(&blocker.join("logs"), day(1)).unwrap_err();
        assert!(matches!(err, LoggingError::CreateDir { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn open_failure_after_existence_check_is_recoverable() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("2024-03-01.log")).unwrap();

        let err = resolve_daily_file(tmp.path(), day(1)).unwrap_err();
        match &err {
            LoggingError::Open { path, .. } => assert!(path.ends_with("2024-03-01.log")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_fatal());
    }
}
