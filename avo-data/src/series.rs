//! Time series and tallies feeding the price, seasonal and tree charts.

use crate::aggregate::{aggregate_by, keys};
use crate::filter::RecordFilter;
use avo_core::record::{Record, RecordType};
use avo_core::season::Season;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean price and total volume of all records sharing a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub mean_price: f64,
    pub total_volume: f64,
    pub count: usize,
}

/// Per-date series, ascending by date.
pub fn price_series<'a, I>(records: I, filter: &RecordFilter) -> Vec<DatePoint>
where
    I: IntoIterator<Item = &'a Record>,
{
    aggregate_by(records, filter, keys::date)
        .into_iter()
        .map(|group| DatePoint {
            date: group.key,
            mean_price: group.summary.mean_price,
            total_volume: group.summary.total_volume,
            count: group.summary.count,
        })
        .collect()
}

/// Mean price of each type on one date. A type with no records that day is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypeSplitPoint {
    pub date: NaiveDate,
    pub organic: f64,
    pub conventional: f64,
}

/// Per-date organic/conventional split for a stacked chart.
///
/// With `only = Some(t)` the other type is reported as 0 on every date, while
/// every date with any record still appears.
pub fn type_split_series<'a, I>(records: I, only: Option<RecordType>) -> Vec<TypeSplitPoint>
where
    I: IntoIterator<Item = &'a Record>,
{
    let groups = aggregate_by(records, &RecordFilter::all(), |r| (r.date, r.record_type));
    let mut by_date: BTreeMap<NaiveDate, TypeSplitPoint> = BTreeMap::new();
    for group in groups {
        let (date, record_type) = group.key;
        let point = by_date.entry(date).or_insert(TypeSplitPoint {
            date,
            organic: 0.0,
            conventional: 0.0,
        });
        if only.map_or(false, |t| t != record_type) {
            continue;
        }
        match record_type {
            RecordType::Organic => point.organic = group.summary.mean_price,
            RecordType::Conventional => point.conventional = group.summary.mean_price,
        }
    }
    by_date.into_values().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtremeKind {
    Peak,
    Trough,
}

/// Highest or lowest mean price of a calendar year, with its season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearExtreme {
    pub year: i32,
    pub kind: ExtremeKind,
    pub date: NaiveDate,
    pub mean_price: f64,
    pub season: Season,
}

/// Peak then trough for each year of `points`, years ascending.
///
/// On equal prices the earliest date wins.
pub fn yearly_extremes(points: &[DatePoint]) -> Vec<YearExtreme> {
    let mut by_year: BTreeMap<i32, Vec<&DatePoint>> = BTreeMap::new();
    for point in points {
        by_year.entry(point.date.year()).or_default().push(point);
    }
    let mut extremes = Vec::with_capacity(by_year.len() * 2);
    for (year, mut year_points) in by_year {
        year_points.sort_by_key(|p| p.date);
        let mut peak = year_points[0];
        let mut trough = year_points[0];
        for point in &year_points[1..] {
            if point.mean_price > peak.mean_price {
                peak = point;
            }
            if point.mean_price < trough.mean_price {
                trough = point;
            }
        }
        for (kind, point) in [(ExtremeKind::Peak, peak), (ExtremeKind::Trough, trough)] {
            extremes.push(YearExtreme {
                year,
                kind,
                date: point.date,
                mean_price: point.mean_price,
                season: Season::from_month0(point.date.month0()),
            });
        }
    }
    extremes
}

/// A series point with the price change from the previous point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub date: NaiveDate,
    pub mean_price: f64,
    /// 0 for the first point.
    pub change: f64,
}

/// Week-over-week price deltas over date-sorted `points`.
pub fn price_changes(points: &[DatePoint]) -> Vec<PriceChange> {
    let mut sorted: Vec<&DatePoint> = points.iter().collect();
    sorted.sort_by_key(|p| p.date);
    let mut previous: Option<f64> = None;
    sorted
        .into_iter()
        .map(|point| {
            let change = previous.map_or(0.0, |p| point.mean_price - p);
            previous = Some(point.mean_price);
            PriceChange {
                date: point.date,
                mean_price: point.mean_price,
                change,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub mean_price: f64,
    pub total_volume: f64,
}

/// One month of year with a value per year that has data in that month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub month: u32,
    pub values: Vec<YearValue>,
}

/// Month-of-year x year grid, months then years ascending.
pub fn month_year_grid<'a, I>(records: I, filter: &RecordFilter) -> Vec<MonthRow>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut rows: Vec<MonthRow> = Vec::new();
    for group in aggregate_by(records, filter, |r| (r.month(), r.year())) {
        let (month, year) = group.key;
        let value = YearValue {
            year,
            mean_price: group.summary.mean_price,
            total_volume: group.summary.total_volume,
        };
        match rows.last_mut() {
            Some(row) if row.month == month => row.values.push(value),
            _ => rows.push(MonthRow {
                month,
                values: vec![value],
            }),
        }
    }
    rows
}

/// Record counts per region within one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonTally {
    pub season: Season,
    /// `(region, count)` sorted by region label.
    pub regions: Vec<(String, usize)>,
}

/// All four seasons, each with per-region record counts (possibly empty).
pub fn season_region_tally<'a, I>(records: I) -> Vec<SeasonTally>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut tallies: BTreeMap<Season, BTreeMap<&str, usize>> =
        Season::ALL.iter().map(|s| (*s, BTreeMap::new())).collect();
    for record in records {
        if let Some(regions) = tallies.get_mut(&record.season()) {
            *regions.entry(record.region.as_str()).or_insert(0) += 1;
        }
    }
    tallies
        .into_iter()
        .map(|(season, regions)| SeasonTally {
            season,
            regions: regions
                .into_iter()
                .map(|(region, count)| (region.to_string(), count))
                .collect(),
        })
        .collect()
}

/// Bag-size sums for one avocado type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BagDistribution {
    pub record_type: RecordType,
    pub small_bags: f64,
    pub large_bags: f64,
    pub x_large_bags: f64,
}

/// Bag sums per type present in the filtered records.
pub fn bag_distribution<'a, I>(records: I, filter: &RecordFilter) -> Vec<BagDistribution>
where
    I: IntoIterator<Item = &'a Record>,
{
    aggregate_by(records, filter, keys::record_type)
        .into_iter()
        .map(|group| BagDistribution {
            record_type: group.key,
            small_bags: group.summary.small_bags,
            large_bags: group.summary.large_bags,
            x_large_bags: group.summary.x_large_bags,
        })
        .collect()
}
