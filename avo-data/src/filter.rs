//! Record selection by time window, type, month and season.

use avo_core::month_index::TimeWindow;
use avo_core::record::{Record, RecordType};
use avo_core::season::Season;

/// Conjunction of optional predicates; an unset field matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub window: Option<TimeWindow>,
    pub record_type: Option<RecordType>,
    /// Zero-based month of year.
    pub month: Option<u32>,
    pub season: Option<Season>,
}

impl RecordFilter {
    /// Matches every record.
    pub fn all() -> Self {
        RecordFilter::default()
    }

    /// Inclusive calendar-year range.
    pub fn years(epoch_year: i32, start_year: i32, end_year: i32) -> Self {
        RecordFilter::default().with_window(TimeWindow::from_years(epoch_year, start_year, end_year))
    }

    /// Inclusive month-index range counted from January of `epoch_year`.
    pub fn months(epoch_year: i32, start: i32, end: i32) -> Self {
        RecordFilter::default().with_window(TimeWindow::from_month_indices(epoch_year, start, end))
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }

    pub fn with_month(mut self, month0: u32) -> Self {
        self.month = Some(month0);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.window.map_or(true, |w| w.contains(record))
            && self.record_type.map_or(true, |t| record.record_type == t)
            && self.month.map_or(true, |m| record.month() == m)
            && self.season.map_or(true, |s| record.season() == s)
    }

    /// Lazily select matching records, preserving input order.
    pub fn apply<'a, I>(&self, records: I) -> impl Iterator<Item = &'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let filter = *self;
        records.into_iter().filter(move |record| filter.matches(record))
    }
}
