use crate::error::Result;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging() {
    // Ensure logs directory exists
    let _ = fs::create_dir_all("logs");

    // Create a non-blocking file appender for daily log rotation
    let file_appender = tracing_appender::rolling::daily("logs", "etl.log");
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(file_appender);

    // Create a JSON layer for file logging
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Create a formatted layer for console logging
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    // Set the global default subscriber
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("gdp_etl=info".parse().unwrap()))
        .with(file_layer)
        .with(console_layer)
        .init();

    // We need to keep the guard in scope to ensure logs are flushed on exit
    std::mem::forget(_guard);
}

/// Append-only run log: one `<timestamp> : <message>` line per pipeline stage
/// boundary. The pipeline writes it and never reads it back.
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Appends one timestamped line. The file is opened per call and closed
    /// again immediately.
    pub fn record(&self, message: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%b-%d-%H:%M:%S");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{timestamp} : {message}")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::tempdir;

    #[test]
    fn test_record_appends_timestamped_lines() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("run_log.txt");
        let log = ProgressLog::new(&log_path);

        log.record("Extraction started").unwrap();
        log.record("Extraction complete").unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" : Extraction started"));
        assert!(lines[1].ends_with(" : Extraction complete"));

        // The timestamp half must parse back with the Year-MonthAbbrev-Day
        // pattern the log promises
        let (timestamp, _) = lines[0].split_once(" : ").unwrap();
        NaiveDateTime::parse_from_str(timestamp, "%Y-%b-%d-%H:%M:%S").unwrap();
    }

    #[test]
    fn test_record_preserves_existing_lines() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("run_log.txt");

        ProgressLog::new(&log_path).record("first run").unwrap();
        ProgressLog::new(&log_path).record("second run").unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().next().unwrap().contains("first run"));
    }
}
