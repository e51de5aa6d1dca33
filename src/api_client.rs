use crate::data::datatable::DataRow;
use crate::data::json_loader::read_rows;
use anyhow::{anyhow, Context, Result};
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, info};

/// Fetches the dataset from a fixed URL
#[derive(Clone)]
pub struct ApiClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    /// `None` disables the request timeout; the blocking client would
    /// otherwise apply its own 30 s default
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the dataset and parse it as an array of flat objects
    pub fn fetch_rows(&self) -> Result<Vec<DataRow>> {
        debug!(target: "ApiClient", "GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("Request to {} failed", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("API Error: {} {}", status, body.trim()));
        }

        let rows = read_rows(response).context("Response body is not a valid dataset")?;
        info!(target: "ApiClient", "Fetched {} rows from {}", rows.len(), self.url);
        Ok(rows)
    }
}
