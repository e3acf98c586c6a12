//! One-shot asynchronous loading of the dataset from disk or over HTTP.
//!
//! Each call resolves once with the whole dataset or fails once with a
//! [`LoadError`]. There is no retry and no partial delivery.

use crate::dataset::Dataset;
use crate::error::{LoadError, Result};
use log::info;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Request timeout for remote dataset downloads.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

impl Dataset {
    /// Read and parse a CSV file without blocking the runtime.
    pub async fn load_path(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        info!("[avo] fetch: reading {}", path.display());
        let body = tokio::fs::read_to_string(path).await?;
        Dataset::from_csv_str(&body)
    }

    /// Download and parse a CSV document.
    pub async fn fetch(url: &str) -> Result<Dataset> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Self::fetch_with_client(&client, url).await
    }

    pub async fn fetch_with_client(client: &Client, url: &str) -> Result<Dataset> {
        info!("[avo] fetch: downloading {}", url);
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await?;
        Dataset::from_csv_str(&body)
    }
}
