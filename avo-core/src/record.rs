use crate::error::MalformedRecordError;
use crate::season::Season;
use avo_utils::dates::parse_flexible_date;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header names of the columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    "Date",
    "AveragePrice",
    "Total Volume",
    "4046",
    "4225",
    "4770",
    "Total Bags",
    "Small Bags",
    "Large Bags",
    "XLarge Bags",
    "type",
    "year",
    "region",
];

/// Growing method of the avocados in an observation.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Conventional,
    Organic,
}

impl RecordType {
    pub const ALL: [RecordType; 2] = [RecordType::Conventional, RecordType::Organic];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Conventional => "conventional",
            RecordType::Organic => "organic",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: only the exact dataset spellings are accepted.
impl FromStr for RecordType {
    type Err = MalformedRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conventional" => Ok(RecordType::Conventional),
            "organic" => Ok(RecordType::Organic),
            other => Err(MalformedRecordError::UnknownType(other.to_string())),
        }
    }
}

/// One weekly observation for a region and type.
///
/// `year` and `month` are derived from `date`, so the redundant year column of
/// the source file can never disagree with the date once a record exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    pub average_price: f64,
    pub total_volume: f64,
    pub volume_4046: f64,
    pub volume_4225: f64,
    pub volume_4770: f64,
    pub total_bags: f64,
    pub small_bags: f64,
    pub large_bags: f64,
    pub x_large_bags: f64,
    pub record_type: RecordType,
    pub region: String,
}

impl Record {
    /// A record with the given price and volume and every sub-volume set to zero.
    pub fn new(
        date: NaiveDate,
        record_type: RecordType,
        region: &str,
        average_price: f64,
        total_volume: f64,
    ) -> Self {
        Record {
            date,
            average_price,
            total_volume,
            volume_4046: 0.0,
            volume_4225: 0.0,
            volume_4770: 0.0,
            total_bags: 0.0,
            small_bags: 0.0,
            large_bags: 0.0,
            x_large_bags: 0.0,
            record_type,
            region: region.to_string(),
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Zero-based month (0 = January).
    pub fn month(&self) -> u32 {
        self.date.month0()
    }

    pub fn season(&self) -> Season {
        Season::from_month0(self.month())
    }
}

/// A row as it arrives from the delimited file: every field still text.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "AveragePrice")]
    pub average_price: String,
    #[serde(rename = "Total Volume")]
    pub total_volume: String,
    #[serde(rename = "4046")]
    pub volume_4046: String,
    #[serde(rename = "4225")]
    pub volume_4225: String,
    #[serde(rename = "4770")]
    pub volume_4770: String,
    #[serde(rename = "Total Bags")]
    pub total_bags: String,
    #[serde(rename = "Small Bags")]
    pub small_bags: String,
    #[serde(rename = "Large Bags")]
    pub large_bags: String,
    #[serde(rename = "XLarge Bags")]
    pub x_large_bags: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub year: String,
    pub region: String,
}

fn parse_amount(column: &'static str, value: &str) -> Result<f64, MalformedRecordError> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| MalformedRecordError::NotNumeric {
            column,
            value: value.to_string(),
        })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(MalformedRecordError::OutOfRange {
            column,
            value: parsed,
        });
    }
    Ok(parsed)
}

impl TryFrom<RawRecord> for Record {
    type Error = MalformedRecordError;

    fn try_from(value: RawRecord) -> Result<Self, Self::Error> {
        let date = parse_flexible_date(&value.date)
            .map_err(|_| MalformedRecordError::DateParse(value.date.clone()))?;
        let year = value
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| MalformedRecordError::NotNumeric {
                column: "year",
                value: value.year.clone(),
            })?;
        if year != date.year() {
            return Err(MalformedRecordError::YearMismatch { year, date });
        }
        let record_type: RecordType = value.record_type.trim().parse()?;
        let region = value.region.trim();
        if region.is_empty() {
            return Err(MalformedRecordError::EmptyRegion);
        }
        Ok(Record {
            date,
            average_price: parse_amount("AveragePrice", &value.average_price)?,
            total_volume: parse_amount("Total Volume", &value.total_volume)?,
            volume_4046: parse_amount("4046", &value.volume_4046)?,
            volume_4225: parse_amount("4225", &value.volume_4225)?,
            volume_4770: parse_amount("4770", &value.volume_4770)?,
            total_bags: parse_amount("Total Bags", &value.total_bags)?,
            small_bags: parse_amount("Small Bags", &value.small_bags)?,
            large_bags: parse_amount("Large Bags", &value.large_bags)?,
            x_large_bags: parse_amount("XLarge Bags", &value.x_large_bags)?,
            record_type,
            region: region.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawRecord {
        RawRecord {
            date: "2015-12-27".to_string(),
            average_price: "1.33".to_string(),
            total_volume: "64236.62".to_string(),
            volume_4046: "1036.74".to_string(),
            volume_4225: "54454.85".to_string(),
            volume_4770: "48.16".to_string(),
            total_bags: "8696.87".to_string(),
            small_bags: "8603.62".to_string(),
            large_bags: "93.25".to_string(),
            x_large_bags: "0.0".to_string(),
            record_type: "conventional".to_string(),
            year: "2015".to_string(),
            region: "Albany".to_string(),
        }
    }

    #[test]
    fn test_raw_record_converts() {
        let record: Record = raw().try_into().unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2015, 12, 27).unwrap());
        assert_eq!(record.year(), 2015);
        assert_eq!(record.month(), 11);
        assert_eq!(record.season(), Season::Winter);
        assert_eq!(record.record_type, RecordType::Conventional);
        assert_eq!(record.region, "Albany");
        assert!((record.average_price - 1.33).abs() < f64::EPSILON);
        assert!((record.large_bags - 93.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_type_is_case_sensitive() {
        let mut row = raw();
        row.record_type = "Organic".to_string();
        let err = Record::try_from(row).unwrap_err();
        assert_eq!(err, MalformedRecordError::UnknownType("Organic".to_string()));
    }

    #[test]
    fn test_non_numeric_price_rejected() {
        let mut row = raw();
        row.average_price = "n/a".to_string();
        let err = Record::try_from(row).unwrap_err();
        assert_eq!(
            err,
            MalformedRecordError::NotNumeric {
                column: "AveragePrice",
                value: "n/a".to_string()
            }
        );
    }

    #[test]
    fn test_negative_volume_rejected() {
        let mut row = raw();
        row.total_volume = "-5".to_string();
        let err = Record::try_from(row).unwrap_err();
        assert_eq!(
            err,
            MalformedRecordError::OutOfRange {
                column: "Total Volume",
                value: -5.0
            }
        );
    }

    #[test]
    fn test_year_must_match_date() {
        let mut row = raw();
        row.year = "2016".to_string();
        let err = Record::try_from(row).unwrap_err();
        assert!(matches!(
            err,
            MalformedRecordError::YearMismatch { year: 2016, .. }
        ));
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut row = raw();
        row.date = "27th of December".to_string();
        let err = Record::try_from(row).unwrap_err();
        assert!(matches!(err, MalformedRecordError::DateParse(_)));
    }

    #[test]
    fn test_empty_region_rejected() {
        let mut row = raw();
        row.region = "  ".to_string();
        assert_eq!(
            Record::try_from(row).unwrap_err(),
            MalformedRecordError::EmptyRegion
        );
    }

    #[test]
    fn test_record_type_serializes_lowercase() {
        let json = serde_json::to_string(&RecordType::Organic).unwrap();
        assert_eq!(json, "\"organic\"");
        assert_eq!("organic".parse::<RecordType>().unwrap(), RecordType::Organic);
    }
}
