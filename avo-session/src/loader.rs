//! Session constructors over the dataset loaders.
//!
//! The published file is a header row followed by one row per week, region and
//! type:
//!
//! ```text
//! ,Date,AveragePrice,Total Volume,4046,4225,4770,Total Bags,Small Bags,Large Bags,XLarge Bags,type,year,region
//! 0,2015-12-27,1.33,64236.62,1036.74,54454.85,48.16,8696.87,8603.62,93.25,0.0,conventional,2015,Albany
//! ```

use crate::Session;
use anyhow::Context;
use avo_core::dataset::Dataset;
use std::path::Path;

impl Session {
    /// Load from an in-memory CSV document (typically an `include_str!`).
    pub fn from_csv_str(csv_data: &str) -> anyhow::Result<Self> {
        let dataset = Dataset::from_csv_str(csv_data).context("parsing avocado CSV")?;
        Ok(Self::loaded(dataset))
    }

    /// Load from a CSV file, blocking the current thread.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?;
        Ok(Self::loaded(dataset))
    }

    #[cfg(feature = "api")]
    pub async fn load_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::load_path(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?;
        Ok(Self::loaded(dataset))
    }

    /// Download the CSV from `url`.
    #[cfg(feature = "api")]
    pub async fn fetch(url: &str) -> anyhow::Result<Self> {
        let dataset = Dataset::fetch(url)
            .await
            .with_context(|| format!("fetching {}", url))?;
        Ok(Self::loaded(dataset))
    }

    fn loaded(dataset: Dataset) -> Self {
        log::info!(
            "[avo] loader: session ready with {} records, {} rejected rows",
            dataset.len(),
            dataset.rejected().len()
        );
        Self::new(dataset)
    }
}
