//! Grouped summary statistics over filtered records.
//!
//! Groups come back in ascending key order. [`rank_by`] re-sorts them
//! descending on a metric; the sort is stable, so equal metrics keep their
//! key order, and ranks are 1-based positions after sorting.

use crate::filter::RecordFilter;
use avo_core::record::Record;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Statistics for one bucket of records. Every field is 0 for an empty bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Unweighted mean of `average_price`.
    pub mean_price: f64,
    pub total_volume: f64,
    pub mean_volume: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub min_volume: f64,
    pub max_volume: f64,
    pub total_bags: f64,
    pub small_bags: f64,
    pub large_bags: f64,
    pub x_large_bags: f64,
    /// Number of distinct years among the records.
    pub year_count: usize,
    pub count: usize,
}

impl Summary {
    pub fn from_records<'a, I>(records: I) -> Summary
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut acc = Accumulator::default();
        for record in records {
            acc.add(record);
        }
        acc.finish()
    }
}

#[derive(Default)]
struct Accumulator {
    price_sum: f64,
    volume_sum: f64,
    price_range: Option<(f64, f64)>,
    volume_range: Option<(f64, f64)>,
    total_bags: f64,
    small_bags: f64,
    large_bags: f64,
    x_large_bags: f64,
    years: BTreeSet<i32>,
    count: usize,
}

fn widen(range: Option<(f64, f64)>, value: f64) -> Option<(f64, f64)> {
    Some(match range {
        None => (value, value),
        Some((lo, hi)) => (lo.min(value), hi.max(value)),
    })
}

impl Accumulator {
    fn add(&mut self, record: &Record) {
        self.price_sum += record.average_price;
        self.volume_sum += record.total_volume;
        self.price_range = widen(self.price_range, record.average_price);
        self.volume_range = widen(self.volume_range, record.total_volume);
        self.total_bags += record.total_bags;
        self.small_bags += record.small_bags;
        self.large_bags += record.large_bags;
        self.x_large_bags += record.x_large_bags;
        self.years.insert(record.year());
        self.count += 1;
    }

    fn finish(self) -> Summary {
        if self.count == 0 {
            return Summary::default();
        }
        let n = self.count as f64;
        let (min_price, max_price) = self.price_range.unwrap_or_default();
        let (min_volume, max_volume) = self.volume_range.unwrap_or_default();
        Summary {
            mean_price: self.price_sum / n,
            total_volume: self.volume_sum,
            mean_volume: self.volume_sum / n,
            min_price,
            max_price,
            min_volume,
            max_volume,
            total_bags: self.total_bags,
            small_bags: self.small_bags,
            large_bags: self.large_bags,
            x_large_bags: self.x_large_bags,
            year_count: self.years.len(),
            count: self.count,
        }
    }
}

/// A group key with its statistics. `rank` is set only after [`rank_by`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary<K> {
    pub key: K,
    pub rank: Option<usize>,
    pub summary: Summary,
}

/// Metric to rank groups by, always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankMetric {
    MeanPrice,
    TotalVolume,
    MeanVolume,
}

impl RankMetric {
    pub fn value(&self, summary: &Summary) -> f64 {
        match self {
            RankMetric::MeanPrice => summary.mean_price,
            RankMetric::TotalVolume => summary.total_volume,
            RankMetric::MeanVolume => summary.mean_volume,
        }
    }
}

impl fmt::Display for RankMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RankMetric::MeanPrice => "price",
            RankMetric::TotalVolume => "volume",
            RankMetric::MeanVolume => "mean-volume",
        })
    }
}

impl FromStr for RankMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" | "mean-price" => Ok(RankMetric::MeanPrice),
            "volume" | "total-volume" => Ok(RankMetric::TotalVolume),
            "mean-volume" => Ok(RankMetric::MeanVolume),
            other => Err(format!("unknown rank metric '{}'", other)),
        }
    }
}

/// Group `(key, record)` pairs whose record passes `filter`.
///
/// A record may appear under several keys (state fan-out). Keys with no
/// matching records are omitted.
pub fn aggregate_keyed<'a, K, I>(pairs: I, filter: &RecordFilter) -> Vec<GroupSummary<K>>
where
    K: Ord,
    I: IntoIterator<Item = (K, &'a Record)>,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for (key, record) in pairs {
        if filter.matches(record) {
            groups.entry(key).or_default().add(record);
        }
    }
    groups
        .into_iter()
        .map(|(key, acc)| GroupSummary {
            key,
            rank: None,
            summary: acc.finish(),
        })
        .collect()
}

/// Group the records passing `filter` by `key`.
pub fn aggregate_by<'a, K, I, F>(records: I, filter: &RecordFilter, key: F) -> Vec<GroupSummary<K>>
where
    K: Ord,
    I: IntoIterator<Item = &'a Record>,
    F: Fn(&Record) -> K,
{
    aggregate_keyed(records.into_iter().map(|record| (key(record), record)), filter)
}

/// Summary of every record passing `filter`, ungrouped.
pub fn summarize<'a, I>(records: I, filter: &RecordFilter) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    Summary::from_records(filter.apply(records))
}

/// Stable sort descending on `metric`, assigning 1-based ranks.
pub fn rank_by<K>(mut groups: Vec<GroupSummary<K>>, metric: RankMetric) -> Vec<GroupSummary<K>> {
    groups.sort_by(|a, b| metric.value(&b.summary).total_cmp(&metric.value(&a.summary)));
    for (position, group) in groups.iter_mut().enumerate() {
        group.rank = Some(position + 1);
    }
    groups
}

/// Ready-made grouping keys.
pub mod keys {
    use avo_core::record::{Record, RecordType};
    use avo_core::season::Season;
    use chrono::NaiveDate;

    /// Zero-based month of year; collapses all years into 12 buckets.
    pub fn month_of_year(record: &Record) -> u32 {
        record.month()
    }

    pub fn year(record: &Record) -> i32 {
        record.year()
    }

    pub fn season(record: &Record) -> Season {
        record.season()
    }

    pub fn region(record: &Record) -> String {
        record.region.clone()
    }

    pub fn record_type(record: &Record) -> RecordType {
        record.record_type
    }

    pub fn date(record: &Record) -> NaiveDate {
        record.date
    }
}

/// Earliest and latest dates among `records`.
pub fn date_span<'a, I>(records: I) -> Option<(NaiveDate, NaiveDate)>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().fold(None, |span, record| {
        Some(match span {
            None => (record.date, record.date),
            Some((first, last)) => (first.min(record.date), last.max(record.date)),
        })
    })
}
