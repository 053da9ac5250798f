use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use crate::paths;

/// Initialize logging to a dated file under the data directory.
///
/// The TUI owns the terminal while it runs, so nothing is written to stderr.
/// Returns the path of the log file.
pub fn init_logging() -> Result<PathBuf> {
    let logs_dir = paths::logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;

    let log_file = logs_dir.join(log_file_name(chrono::Local::now().date_naive()));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let file_layer = fmt::layer()
        .with_target(true)
        .with_writer(file)
        .with_ansi(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized. Log file: {}", log_file.display());

    Ok(log_file)
}

fn log_file_name(date: chrono::NaiveDate) -> String {
    format!("reporthist-{}.log", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_uses_iso_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(log_file_name(date), "reporthist-2024-03-07.log");
    }
}
