use crate::record::Record;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Months elapsed between January of `epoch_year` and the month holding `date`.
///
/// Dates before the epoch yield negative indices.
pub fn month_index(epoch_year: i32, date: &NaiveDate) -> i32 {
    clamp_index((i64::from(date.year()) - i64::from(epoch_year)) * 12 + i64::from(date.month0()))
}

/// First day of the month at `index` months past January of `epoch_year`.
pub fn date_for_month_index(epoch_year: i32, index: i32) -> Option<NaiveDate> {
    let year = epoch_year.checked_add(index.div_euclid(12))?;
    let month0 = index.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}

/// Saturates a month offset into the `i32` index range.
fn clamp_index(months: i64) -> i32 {
    months.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// An inclusive range of month indices relative to an epoch year.
///
/// Both ways of expressing a time window (calendar years, or month indices
/// counted from the epoch) normalize to this one form. A window whose end
/// precedes its start is valid and simply matches nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    pub epoch_year: i32,
    pub start: i32,
    pub end: i32,
}

impl TimeWindow {
    /// Window covering January of `start_year` through December of `end_year`.
    ///
    /// Years too far from the epoch saturate at the ends of the index range.
    pub fn from_years(epoch_year: i32, start_year: i32, end_year: i32) -> Self {
        let offset = |year: i32| (i64::from(year) - i64::from(epoch_year)) * 12;
        TimeWindow {
            epoch_year,
            start: clamp_index(offset(start_year)),
            end: clamp_index(offset(end_year) + 11),
        }
    }

    pub fn from_month_indices(epoch_year: i32, start: i32, end: i32) -> Self {
        TimeWindow {
            epoch_year,
            start,
            end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of months covered, zero for an inverted window.
    pub fn len_months(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            usize::try_from(i64::from(self.end) - i64::from(self.start) + 1).unwrap_or(usize::MAX)
        }
    }

    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        let index = month_index(self.epoch_year, date);
        self.start <= index && index <= self.end
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.contains_date(&record.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_index() {
        assert_eq!(month_index(2015, &ymd(2015, 1, 4)), 0);
        assert_eq!(month_index(2015, &ymd(2015, 12, 27)), 11);
        assert_eq!(month_index(2015, &ymd(2017, 12, 31)), 35);
        assert_eq!(month_index(2015, &ymd(2014, 12, 1)), -1);
    }

    #[test]
    fn test_date_for_month_index() {
        assert_eq!(date_for_month_index(2015, 0), Some(ymd(2015, 1, 1)));
        assert_eq!(date_for_month_index(2015, 14), Some(ymd(2016, 3, 1)));
        assert_eq!(date_for_month_index(2015, -1), Some(ymd(2014, 12, 1)));
        assert_eq!(date_for_month_index(i32::MAX, 12), None);
    }

    #[test]
    fn test_year_window_matches_month_window() {
        let by_years = TimeWindow::from_years(2015, 2015, 2017);
        let by_months = TimeWindow::from_month_indices(2015, 0, 35);
        assert_eq!(by_years, by_months);
        assert_eq!(by_years.len_months(), 36);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = TimeWindow::from_month_indices(2015, 11, 12);
        assert!(!window.contains_date(&ymd(2015, 11, 29)));
        assert!(window.contains_date(&ymd(2015, 12, 1)));
        assert!(window.contains_date(&ymd(2016, 1, 31)));
        assert!(!window.contains_date(&ymd(2016, 2, 1)));
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let window = TimeWindow::from_years(2015, 2017, 2016);
        assert!(window.is_empty());
        assert_eq!(window.len_months(), 0);
        let record = Record::new(ymd(2016, 6, 5), RecordType::Organic, "Albany", 1.0, 1.0);
        assert!(!window.contains(&record));
    }

    #[test]
    fn test_extreme_years_saturate() {
        let open_end = TimeWindow::from_years(2015, 2015, i32::MAX);
        assert_eq!(open_end.start, 0);
        assert_eq!(open_end.end, i32::MAX);
        assert!(open_end.contains_date(&ymd(2017, 12, 31)));
        assert!(!open_end.contains_date(&ymd(2014, 12, 31)));

        let open_start = TimeWindow::from_years(2015, i32::MIN, 2016);
        assert_eq!(open_start.start, i32::MIN);
        assert_eq!(open_start.end, 23);
        assert!(open_start.contains_date(&ymd(2015, 1, 4)));
        assert!(!open_start.contains_date(&ymd(2017, 1, 1)));

        let everything = TimeWindow::from_years(0, i32::MIN, i32::MAX);
        assert_eq!(everything.len_months(), 1 << 32);

        let inverted = TimeWindow::from_years(2015, i32::MAX, i32::MIN);
        assert!(inverted.is_empty());
        assert_eq!(inverted.len_months(), 0);
    }

    #[test]
    fn test_month_index_saturates_for_distant_epochs() {
        assert_eq!(month_index(i32::MIN, &ymd(2015, 1, 4)), i32::MAX);
        assert_eq!(month_index(i32::MAX, &ymd(2015, 1, 4)), i32::MIN);
    }
}
