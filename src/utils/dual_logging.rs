use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::utils::app_paths::AppPaths;
use crate::utils::logging::LogEntry;

/// Global dual logger instance
static DUAL_LOGGER: OnceLock<DualLogger> = OnceLock::new();

/// File half of the dual logging setup; the ring buffer half lives in `logging`
pub struct DualLogger {
    log_file: Mutex<Option<File>>,
    log_path: PathBuf,
}

impl DualLogger {
    /// Open a timestamped log file in `log_dir` and point `latest.log` at it
    pub fn new(log_dir: &Path) -> Self {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("json-table_{}.log", timestamp));

        let latest_path = log_dir.join("latest.log");

        #[cfg(unix)]
        {
            let _ = std::fs::remove_file(&latest_path);
            let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
        }

        #[cfg(windows)]
        {
            // Symlinks need elevated rights on Windows
            let pointer_content = format!("Current log file: {}\n", log_path.display());
            let _ = std::fs::write(&latest_path, pointer_content);
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok();

        Self {
            log_file: Mutex::new(log_file),
            log_path,
        }
    }

    pub fn write_entry(&self, entry: &LogEntry) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = writeln!(file, "{}", entry.format_for_display());
                let _ = file.flush(); // Important for crash debugging!
            }
        }

        if std::env::var("JSON_TABLE_DEBUG").is_ok() {
            eprintln!("{}", entry.format_for_display());
        }
    }

    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }

    pub fn flush(&self) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = file.flush();
            }
        }
    }
}

/// Initialize the global dual logger
pub fn init_dual_logger() -> &'static DualLogger {
    DUAL_LOGGER.get_or_init(|| DualLogger::new(&AppPaths::log_dir()))
}

/// Get the global dual logger
pub fn get_dual_logger() -> Option<&'static DualLogger> {
    DUAL_LOGGER.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_writes_entries_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = DualLogger::new(dir.path());
        logger.write_entry(&LogEntry::new(Level::ERROR, "AppState", "fetch failed".to_string()));
        logger.flush();

        let contents = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(contents.contains("ERROR [AppState] fetch failed"));
    }
}
