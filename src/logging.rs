//! File logging bootstrap.
//!
//! The terminal belongs to the UI while it runs, so diagnostics go to a
//! rotating log file instead of stderr.

use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

use crate::error::LoggingError;

const LOG_FILE_BASENAME: &str = "ges_explorer";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Starts the file logger. Keep the returned handle alive for as long as
/// logging should stay active; dropping it flushes and stops the writer.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle, LoggingError> {
    let level = normalize_level(level)?;
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::Directory {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    info!(
        "event=app_start module=logging status=ok level={} log_dir={} version={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::Level(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_level;
    use crate::error::LoggingError;

    #[test]
    fn known_levels_normalize() {
        assert_eq!(normalize_level(" INFO ").unwrap(), "info");
        assert_eq!(normalize_level("Warning").unwrap(), "warn");
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = normalize_level("verbose").unwrap_err();
        assert!(matches!(err, LoggingError::Level(ref l) if l == "verbose"));
    }
}
