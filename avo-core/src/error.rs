/// Error types for loading the avocado dataset
use thiserror::Error;

/// A failure that aborts the whole dataset load.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the dataset from disk failed
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited text itself could not be read
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// The header row lacks a required column
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// Fetching the dataset over HTTP failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP response status {0}")]
    HttpStatus(u16),

    /// No usable rows survived parsing
    #[error("Dataset contains no valid records ({rejected} rows rejected)")]
    Empty { rejected: usize },
}

/// A single row that failed strict parsing. The row is skipped; the load continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedRecordError {
    /// The date column did not match any accepted format
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// A numeric column was not a number
    #[error("Column '{column}' is not numeric: '{value}'")]
    NotNumeric { column: &'static str, value: String },

    /// A numeric column was negative, NaN or infinite
    #[error("Column '{column}' must be a non-negative finite number, got {value}")]
    OutOfRange { column: &'static str, value: f64 },

    /// The type column was neither `organic` nor `conventional`
    #[error("Unknown avocado type: '{0}'")]
    UnknownType(String),

    /// The region column was empty
    #[error("Region label is empty")]
    EmptyRegion,

    /// The redundant year column disagrees with the date
    #[error("Year column {year} does not match date {date}")]
    YearMismatch { year: i32, date: chrono::NaiveDate },

    /// The row could not be read at all (wrong field count, bad quoting)
    #[error("Unreadable row: {0}")]
    Unreadable(String),
}

/// Type alias for Results using LoadError
pub type Result<T> = std::result::Result<T, LoadError>;
