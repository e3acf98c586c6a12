//! Region resolution, filtering and grouped aggregation over avocado records.
//!
//! Everything here is a pure function of its inputs: records are borrowed,
//! never copied or mutated, and results come back in a deterministic order.

pub mod aggregate;
pub mod filter;
pub mod resolver;
pub mod series;

#[cfg(test)]
pub(crate) mod testing {
    use avo_core::record::{Record, RecordType};
    use chrono::NaiveDate;

    /// Record dated `year-month-day` (month is 1-based).
    pub fn record(
        year: i32,
        month: u32,
        day: u32,
        record_type: RecordType,
        region: &str,
        price: f64,
        volume: f64,
    ) -> Record {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        Record::new(date, record_type, region, price, volume)
    }
}
