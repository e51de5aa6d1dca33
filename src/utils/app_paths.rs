use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "json-table";

pub struct AppPaths;

impl AppPaths {
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join(APP_DIR);
        Ok(config_dir)
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Log directory, created on demand. Falls back to the temp dir when the
    /// platform has no data directory.
    pub fn log_dir() -> PathBuf {
        let log_dir = dirs::data_dir()
            .map(|d| d.join(APP_DIR).join("logs"))
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR));

        let _ = fs::create_dir_all(&log_dir);
        log_dir
    }
}
