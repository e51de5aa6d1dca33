use crate::api_client::ApiClient;
use crate::data::datatable::DataRow;
use crate::data::json_loader::load_json_file;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Where the dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Url(url) => url.clone(),
            DataSource::File(path) => path.display().to_string(),
        }
    }
}

/// The single completion message posted by a load
#[derive(Debug)]
pub struct LoadMessage {
    pub result: Result<Vec<DataRow>>,
    pub elapsed: Duration,
}

/// Loads the dataset once, either inline or on a worker thread
pub struct DataLoaderService {
    source: DataSource,
    timeout: Option<Duration>,
}

impl DataLoaderService {
    pub fn new(source: DataSource, timeout: Option<Duration>) -> Self {
        Self { source, timeout }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Load synchronously on the calling thread
    pub fn load(&self) -> Result<Vec<DataRow>> {
        info!(target: "DataLoader", "Loading dataset from {}", self.source.describe());
        match &self.source {
            DataSource::Url(url) => ApiClient::new(url, self.timeout)?.fetch_rows(),
            DataSource::File(path) => load_json_file(path),
        }
    }

    /// Start the load on a worker thread. Exactly one message arrives on the
    /// returned receiver.
    pub fn spawn(self) -> Receiver<LoadMessage> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let start = Instant::now();
            let result = self.load();
            let elapsed = start.elapsed();
            debug!(target: "DataLoader", "Load settled in {:?} (ok={})", elapsed, result.is_ok());
            // The receiver is gone only if the app already quit
            let _ = tx.send(LoadMessage { result, elapsed });
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_spawn_file_load_posts_one_message() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"state":"Ohio"}},{{"state":"Texas"}}]"#).unwrap();

        let service =
            DataLoaderService::new(DataSource::File(file.path().to_path_buf()), None);
        let rx = service.spawn();
        let message = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(message.result.unwrap().len(), 2);
        // Sender is dropped after the single message
        assert!(rx.recv_timeout(Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_missing_file_reports_error() {
        let service = DataLoaderService::new(
            DataSource::File(PathBuf::from("/no/such/dataset.json")),
            None,
        );
        assert!(service.load().is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            DataSource::Url("http://localhost/data.json".to_string()).describe(),
            "http://localhost/data.json"
        );
    }
}
