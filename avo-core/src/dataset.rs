//! Strict loading of the weekly avocado CSV into typed [`Record`]s.
//!
//! The header row must name every column in [`REQUIRED_COLUMNS`]; other
//! columns (such as the unnamed row-number column of the published file) are
//! ignored. Rows that fail to parse are skipped and reported back as
//! [`RejectedRow`]s rather than coerced to NaN.

use crate::error::{LoadError, MalformedRecordError, Result};
use crate::record::{RawRecord, Record, REQUIRED_COLUMNS};
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A data row that was skipped during loading. `index` is zero-based over
/// data rows (the header is not counted).
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub index: usize,
    pub error: MalformedRecordError,
}

/// Every record from one load of the dataset, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    rejected: Vec<RejectedRow>,
}

impl Dataset {
    /// Wrap records that were produced elsewhere.
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset {
            records,
            rejected: Vec::new(),
        }
    }

    /// Parse a CSV document held in memory.
    pub fn from_csv_str(csv_data: &str) -> Result<Self> {
        Self::from_reader(csv_data.as_bytes())
    }

    /// Parse a CSV file from disk, blocking the current thread.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(LoadError::MissingColumn(column));
            }
        }

        let mut records = Vec::new();
        let mut rejected = Vec::new();
        for (index, result) in rdr.deserialize::<RawRecord>().enumerate() {
            let parsed = match result {
                Ok(raw) => Record::try_from(raw),
                Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(err.into());
                }
                Err(err) => Err(MalformedRecordError::Unreadable(err.to_string())),
            };
            match parsed {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!("[avo] loader: rejected row {}: {}", index, error);
                    rejected.push(RejectedRow { index, error });
                }
            }
        }

        if records.is_empty() {
            return Err(LoadError::Empty {
                rejected: rejected.len(),
            });
        }
        info!(
            "[avo] loader: Loaded {} records, rejected {} malformed rows",
            records.len(),
            rejected.len()
        );
        Ok(Dataset { records, rejected })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest year present; month index 0 is January of this year.
    pub fn epoch_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.date.year()).min()
    }

    /// Earliest and latest observation dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.date.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct region labels, sorted.
    pub fn regions(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
