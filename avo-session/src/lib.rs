//! A loaded avocado dataset with typed query methods for the chart views.
//!
//! A [`Session`] is created once per load and passed explicitly to whatever
//! renders or prints results. It never mutates after construction, so clones
//! are cheap and can be shared across threads.
//!
//! # Usage
//!
//! ```rust
//! use avo_session::Session;
//!
//! let csv = "\
//! Date,AveragePrice,Total Volume,4046,4225,4770,Total Bags,Small Bags,Large Bags,XLarge Bags,type,year,region
//! 2015-12-27,1.33,64236.62,1036.74,54454.85,48.16,8696.87,8603.62,93.25,0.0,conventional,2015,Albany
//! ";
//! let session = Session::from_csv_str(csv).unwrap();
//! let months = session.monthly_summaries(&session.year_filter(2015, 2015));
//! assert_eq!(months.len(), 1);
//! assert_eq!(months[0].label, "Dec");
//! ```

mod loader;
pub mod models;
mod queries;

use avo_core::dataset::Dataset;
use avo_data::resolver::RegionResolver;
use std::sync::Arc;

/// Epoch used for month indices when the dataset holds no records.
pub const DEFAULT_EPOCH_YEAR: i32 = 2015;

/// One loaded dataset plus the region resolver used to query it.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    resolver: Arc<RegionResolver>,
    epoch_year: i32,
}

impl Session {
    /// Wrap a dataset using the canonical region table.
    pub fn new(dataset: Dataset) -> Self {
        Self::with_resolver(dataset, RegionResolver::default())
    }

    pub fn with_resolver(dataset: Dataset, resolver: RegionResolver) -> Self {
        let epoch_year = dataset.epoch_year().unwrap_or(DEFAULT_EPOCH_YEAR);
        Self {
            dataset: Arc::new(dataset),
            resolver: Arc::new(resolver),
            epoch_year,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn resolver(&self) -> &RegionResolver {
        &self.resolver
    }

    /// Year whose January is month index 0: the earliest year in the data.
    pub fn epoch_year(&self) -> i32 {
        self.epoch_year
    }
}
