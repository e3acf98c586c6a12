//! Typed query methods over a loaded session.
//!
//! Queries take a [`RecordFilter`] built by the caller, usually through
//! [`Session::year_filter`] or [`Session::month_filter`] so that month indices
//! are counted from the session's epoch year. Results are in ascending key
//! order unless a [`RankMetric`] is given.

use crate::models::{
    DatasetInfo, MonthSummary, RegionInfo, RegionSummary, SeasonSummary, StateScope, StateSummary,
    UnresolvedRegion, YearSummary,
};
use crate::Session;
use avo_core::month_index::{date_for_month_index, month_index};
use avo_core::record::RecordType;
use avo_core::region::StateCode;
use avo_data::aggregate::{aggregate_by, aggregate_keyed, keys, rank_by, GroupSummary, RankMetric};
use avo_data::filter::RecordFilter;
use avo_data::series::{
    self, BagDistribution, DatePoint, MonthRow, PriceChange, SeasonTally, TypeSplitPoint,
    YearExtreme,
};
use avo_utils::dates::month_label;
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

fn ranked<K>(groups: Vec<GroupSummary<K>>, sort: Option<RankMetric>) -> Vec<GroupSummary<K>> {
    match sort {
        Some(metric) => rank_by(groups, metric),
        None => groups,
    }
}

impl Session {
    // ───────────────────── Epoch helpers ─────────────────────

    /// Filter for the inclusive calendar years `[start_year, end_year]`.
    pub fn year_filter(&self, start_year: i32, end_year: i32) -> RecordFilter {
        RecordFilter::years(self.epoch_year, start_year, end_year)
    }

    /// Filter for the inclusive month indices `[start, end]`.
    pub fn month_filter(&self, start: i32, end: i32) -> RecordFilter {
        RecordFilter::months(self.epoch_year, start, end)
    }

    pub fn month_index_of(&self, date: &NaiveDate) -> i32 {
        month_index(self.epoch_year, date)
    }

    /// First day of the month at `index`.
    pub fn date_for_month_index(&self, index: i32) -> Option<NaiveDate> {
        date_for_month_index(self.epoch_year, index)
    }

    pub fn info(&self) -> DatasetInfo {
        let span = self.dataset.date_span();
        DatasetInfo {
            records: self.dataset.len(),
            rejected: self.dataset.rejected().len(),
            epoch_year: self.epoch_year,
            first_date: span.map(|(first, _)| first),
            last_date: span.map(|(_, last)| last),
            years: self.dataset.years(),
            regions: self.dataset.regions().len(),
        }
    }

    // ───────────────────── Grouped summaries ─────────────────────

    /// Month-of-year statistics, collapsing the selected years together.
    pub fn monthly_summaries(&self, filter: &RecordFilter) -> Vec<MonthSummary> {
        let rows: Vec<MonthSummary> = aggregate_by(self.dataset.records(), filter, keys::month_of_year)
            .into_iter()
            .map(|group| MonthSummary {
                month: group.key,
                label: month_label(group.key),
                summary: group.summary,
            })
            .collect();
        debug!("[avo] query: monthly_summaries returned {} months", rows.len());
        rows
    }

    pub fn yearly_summaries(&self, filter: &RecordFilter) -> Vec<YearSummary> {
        let rows: Vec<YearSummary> = aggregate_by(self.dataset.records(), filter, keys::year)
            .into_iter()
            .map(|group| YearSummary {
                year: group.key,
                summary: group.summary,
            })
            .collect();
        debug!("[avo] query: yearly_summaries returned {} years", rows.len());
        rows
    }

    pub fn season_summaries(&self, filter: &RecordFilter) -> Vec<SeasonSummary> {
        let rows: Vec<SeasonSummary> = aggregate_by(self.dataset.records(), filter, keys::season)
            .into_iter()
            .map(|group| SeasonSummary {
                season: group.key,
                summary: group.summary,
            })
            .collect();
        debug!("[avo] query: season_summaries returned {} seasons", rows.len());
        rows
    }

    /// Per-region statistics. Every region label present in the data appears,
    /// including labels the resolver does not know.
    pub fn region_summaries(&self, filter: &RecordFilter, sort: Option<RankMetric>) -> Vec<RegionSummary> {
        let records = self.dataset.records();
        let mut spans: BTreeMap<&str, (NaiveDate, NaiveDate)> = BTreeMap::new();
        for record in filter.apply(records) {
            spans
                .entry(record.region.as_str())
                .and_modify(|(first, last)| {
                    *first = (*first).min(record.date);
                    *last = (*last).max(record.date);
                })
                .or_insert((record.date, record.date));
        }
        let groups = ranked(aggregate_by(records, filter, keys::region), sort);
        let rows: Vec<RegionSummary> = groups
            .into_iter()
            .filter_map(|group| {
                let (first_date, last_date) = *spans.get(group.key.as_str())?;
                Some(RegionSummary {
                    kind: self.resolver.kind(&group.key),
                    region: group.key,
                    first_date,
                    last_date,
                    rank: group.rank,
                    summary: group.summary,
                })
            })
            .collect();
        debug!("[avo] query: region_summaries returned {} regions", rows.len());
        rows
    }

    /// Per-state statistics for a choropleth.
    ///
    /// With [`StateScope::Multi`] a record of a multi-state region counts
    /// toward every state the region covers, with its values unchanged.
    pub fn state_summaries(
        &self,
        scope: StateScope,
        filter: &RecordFilter,
        sort: Option<RankMetric>,
    ) -> Vec<StateSummary> {
        let fan_out = self.resolver.fan_out_to_states(self.dataset.records());
        let groups = match scope {
            StateScope::Single => aggregate_keyed(fan_out.single_state_pairs(), filter),
            StateScope::Multi => aggregate_keyed(fan_out.multi_state_pairs(), filter),
        };
        let rows: Vec<StateSummary> = ranked(groups, sort)
            .into_iter()
            .map(|group| StateSummary {
                state: group.key,
                name: group.key.name().unwrap_or(group.key.as_str()),
                rank: group.rank,
                summary: group.summary,
            })
            .collect();
        debug!(
            "[avo] query: state_summaries({}) returned {} states",
            scope,
            rows.len()
        );
        rows
    }

    // ───────────────────── Series ─────────────────────

    pub fn price_series(&self, filter: &RecordFilter) -> Vec<DatePoint> {
        series::price_series(self.dataset.records(), filter)
    }

    /// Organic/conventional split per date over the whole dataset. With a
    /// mask, only the masked-in type keeps its values.
    pub fn type_split_series(&self, mask: Option<RecordType>) -> Vec<TypeSplitPoint> {
        series::type_split_series(self.dataset.records(), mask)
    }

    /// Yearly peak and trough of the per-date mean price.
    pub fn yearly_extremes(&self, filter: &RecordFilter) -> Vec<YearExtreme> {
        series::yearly_extremes(&self.price_series(filter))
    }

    pub fn price_changes(&self, filter: &RecordFilter) -> Vec<PriceChange> {
        series::price_changes(&self.price_series(filter))
    }

    pub fn month_year_grid(&self, filter: &RecordFilter) -> Vec<MonthRow> {
        series::month_year_grid(self.dataset.records(), filter)
    }

    pub fn season_region_tally(&self) -> Vec<SeasonTally> {
        series::season_region_tally(self.dataset.records())
    }

    pub fn bag_distribution(&self, filter: &RecordFilter) -> Vec<BagDistribution> {
        series::bag_distribution(self.dataset.records(), filter)
    }

    // ───────────────────── Regions ─────────────────────

    /// Labels present in the data that the resolver cannot map, with their
    /// record counts.
    pub fn unresolved_regions(&self) -> Vec<UnresolvedRegion> {
        self.resolver
            .fan_out_to_states(self.dataset.records())
            .unresolved
            .into_iter()
            .map(|(region, records)| UnresolvedRegion { region, records })
            .collect()
    }

    /// The resolver's table, sorted by label.
    pub fn region_table(&self) -> Vec<RegionInfo> {
        let resolver = &self.resolver;
        let mut rows: Vec<RegionInfo> = resolver
            .labels()
            .map(|label| RegionInfo {
                region: label,
                kind: resolver.kind(label),
                states: resolver.states_for_regions([label]),
            })
            .collect();
        rows.sort_by_key(|row| row.region);
        rows
    }

    /// Region labels whose coverage includes `state`, sorted.
    pub fn regions_for_state(&self, state: StateCode) -> Vec<&'static str> {
        self.resolver.regions_for_state(state)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::StateScope;
    use crate::Session;
    use avo_core::dataset::Dataset;
    use avo_core::record::{Record, RecordType};
    use avo_core::region::StateCode;
    use avo_core::season::Season;
    use avo_data::aggregate::RankMetric;
    use avo_data::filter::RecordFilter;
    use avo_data::resolver::RegionKind;
    use avo_data::series::ExtremeKind;
    use chrono::NaiveDate;

    const SAMPLE: &str = include_str!("../../fixtures/avocado-sample.csv");

    fn sample_session() -> Session {
        Session::from_csv_str(SAMPLE).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn code(s: &str) -> StateCode {
        StateCode::parse(s).unwrap()
    }

    // ───────────────────── Epoch helpers ─────────────────────

    #[test]
    fn month_index_round_trip_through_epoch() {
        let session = sample_session();
        assert_eq!(session.month_index_of(&ymd(2015, 1, 4)), 0);
        assert_eq!(session.month_index_of(&ymd(2016, 6, 26)), 17);
        assert_eq!(session.date_for_month_index(17), Some(ymd(2016, 6, 1)));
    }

    #[test]
    fn info_describes_fixture() {
        let info = sample_session().info();
        assert_eq!(info.records, 12);
        assert_eq!(info.rejected, 0);
        assert_eq!(info.epoch_year, 2015);
        assert_eq!(info.first_date, Some(ymd(2015, 1, 4)));
        assert_eq!(info.last_date, Some(ymd(2017, 11, 26)));
        assert_eq!(info.years, vec![2015, 2016, 2017]);
        assert_eq!(info.regions, 5);
    }

    // ───────────────────── Grouped summaries ─────────────────────

    #[test]
    fn monthly_summaries_collapse_years() {
        let session = sample_session();
        let months = session.monthly_summaries(&RecordFilter::all());
        let keys: Vec<u32> = months.iter().map(|m| m.month).collect();
        assert_eq!(keys, vec![0, 2, 5, 6, 10, 11]);
        assert_eq!(months[0].label, "Jan");
        // 2015-01-04 and 2017-01-01
        assert_eq!(months[0].summary.count, 2);
        assert_eq!(months[0].summary.year_count, 2);
        assert_eq!(months[5].label, "Dec");
        assert_eq!(months[5].summary.count, 5);
    }

    #[test]
    fn year_filter_selects_calendar_years() {
        let session = sample_session();
        let years = session.yearly_summaries(&session.year_filter(2016, 2016));
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].year, 2016);
        assert_eq!(years[0].summary.count, 3);

        let inverted = session.yearly_summaries(&session.year_filter(2017, 2015));
        assert!(inverted.is_empty());
    }

    #[test]
    fn month_filter_uses_session_epoch() {
        let session = sample_session();
        // December 2015 (11) through January 2017 (24)
        let years = session.yearly_summaries(&session.month_filter(11, 24));
        let counts: Vec<(i32, usize)> = years.iter().map(|y| (y.year, y.summary.count)).collect();
        assert_eq!(counts, vec![(2015, 5), (2016, 3), (2017, 1)]);
    }

    #[test]
    fn season_summaries_cover_every_record() {
        let session = sample_session();
        let seasons = session.season_summaries(&RecordFilter::all());
        let counts: Vec<(Season, usize)> = seasons.iter().map(|s| (s.season, s.summary.count)).collect();
        assert_eq!(
            counts,
            vec![
                (Season::Spring, 1),
                (Season::Summer, 3),
                (Season::Fall, 1),
                (Season::Winter, 7),
            ]
        );
    }

    #[test]
    fn region_summaries_carry_time_range_and_kind() {
        let session = sample_session();
        let regions = session.region_summaries(&RecordFilter::all(), None);
        let labels: Vec<&str> = regions.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Albany", "BaltimoreWashington", "California", "TotalUS", "West"]
        );
        let albany = &regions[0];
        assert_eq!(albany.kind, RegionKind::SingleState);
        assert_eq!(albany.first_date, ymd(2015, 12, 20));
        assert_eq!(albany.last_date, ymd(2017, 1, 1));
        assert_eq!(albany.summary.count, 4);
        assert!((albany.summary.mean_price - 1.495).abs() < 1e-9);
        assert_eq!(albany.rank, None);
        assert_eq!(regions[3].kind, RegionKind::National);
        assert_eq!(regions[4].kind, RegionKind::MultiState);
    }

    #[test]
    fn region_summaries_ranked_by_price() {
        let session = sample_session();
        let filter = RecordFilter::all().with_record_type(RecordType::Organic);
        let regions = session.region_summaries(&filter, Some(RankMetric::MeanPrice));
        let ranked: Vec<(&str, Option<usize>)> =
            regions.iter().map(|r| (r.region.as_str(), r.rank)).collect();
        // West (1.98, 2.02) > Albany (1.83) > BaltimoreWashington (1.52)
        assert_eq!(
            ranked,
            vec![
                ("West", Some(1)),
                ("Albany", Some(2)),
                ("BaltimoreWashington", Some(3)),
            ]
        );
    }

    #[test]
    fn single_state_summaries() {
        let session = sample_session();
        let states = session.state_summaries(StateScope::Single, &RecordFilter::all(), None);
        let codes: Vec<&str> = states.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(codes, vec!["CA", "NY"]);
        assert_eq!(states[0].name, "California");
        assert_eq!(states[0].summary.count, 3);
        assert_eq!(states[1].summary.count, 4);

        let ranked = session.state_summaries(
            StateScope::Single,
            &RecordFilter::all(),
            Some(RankMetric::MeanPrice),
        );
        assert_eq!(ranked[0].state, code("NY"));
        assert_eq!(ranked[0].rank, Some(1));
        assert_eq!(ranked[1].state, code("CA"));
    }

    #[test]
    fn multi_state_summaries_repeat_records() {
        let session = sample_session();
        let states = session.state_summaries(StateScope::Multi, &RecordFilter::all(), None);
        let by_code = |c: &str| states.iter().find(|s| s.state == code(c)).unwrap();
        // BaltimoreWashington rows land in MD, DC and VA with identical values
        for state in ["MD", "DC", "VA"] {
            let summary = &by_code(state).summary;
            assert_eq!(summary.count, 2);
            assert!((summary.total_volume - (788025.06 + 2067.6)).abs() < 1e-6);
        }
        // West rows land in CA; California's own rows stay single-state
        assert_eq!(by_code("CA").summary.count, 2);
        assert!(states.iter().all(|s| s.state != code("NY")));
    }

    // ───────────────────── Series ─────────────────────

    #[test]
    fn price_series_and_extremes() {
        let session = sample_session();
        let series = session.price_series(&RecordFilter::all());
        assert_eq!(series.len(), 8);
        assert_eq!(series[0].date, ymd(2015, 1, 4));

        let extremes = session.yearly_extremes(&RecordFilter::all());
        assert_eq!(extremes.len(), 6);
        assert_eq!(extremes[0].year, 2015);
        assert_eq!(extremes[0].kind, ExtremeKind::Peak);
        assert_eq!(extremes[0].date, ymd(2015, 1, 4));
        assert_eq!(extremes[0].season, Season::Winter);
        assert_eq!(extremes[1].kind, ExtremeKind::Trough);
        assert_eq!(extremes[1].date, ymd(2015, 12, 27));
    }

    #[test]
    fn price_changes_start_at_zero() {
        let session = sample_session();
        let changes = session.price_changes(&session.year_filter(2017, 2017));
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].change, 0.0);
        assert!((changes[1].change - (2.02 - 1.47)).abs() < 1e-9);
    }

    #[test]
    fn type_split_masks_other_type() {
        let session = sample_session();
        let split = session.type_split_series(Some(RecordType::Conventional));
        assert_eq!(split.len(), 8);
        assert!(split.iter().all(|p| p.organic == 0.0));
        let first = session.type_split_series(None)[0];
        assert_eq!(first.organic, 1.52);
        assert_eq!(first.conventional, 0.0);
    }

    #[test]
    fn tallies_and_bags() {
        let session = sample_session();
        let tally = session.season_region_tally();
        assert_eq!(tally.len(), 4);
        let total: usize = tally.iter().flat_map(|t| t.regions.iter().map(|(_, n)| n)).sum();
        assert_eq!(total, 12);

        let bags = session.bag_distribution(&RecordFilter::all());
        assert_eq!(bags.len(), 2);
        assert_eq!(bags[0].record_type, RecordType::Conventional);

        let grid = session.month_year_grid(&RecordFilter::all());
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0].values.len(), 2);
    }

    // ───────────────────── Regions ─────────────────────

    #[test]
    fn unresolved_regions_are_counted() {
        let date = ymd(2016, 5, 1);
        let session = Session::new(Dataset::from_records(vec![
            Record::new(date, RecordType::Organic, "Atlantis", 1.0, 1.0),
            Record::new(date, RecordType::Conventional, "Atlantis", 1.0, 1.0),
            Record::new(date, RecordType::Organic, "Albany", 1.0, 1.0),
        ]));
        let unresolved = session.unresolved_regions();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].region, "Atlantis");
        assert_eq!(unresolved[0].records, 2);

        let regions = session.region_summaries(&RecordFilter::all(), None);
        assert_eq!(regions[1].region, "Atlantis");
        assert_eq!(regions[1].kind, RegionKind::Unknown);

        assert!(sample_session().unresolved_regions().is_empty());
    }

    #[test]
    fn region_table_lists_every_label() {
        let session = sample_session();
        let table = session.region_table();
        assert_eq!(table.len(), 54);
        assert!(table.windows(2).all(|w| w[0].region < w[1].region));
        let total_us = table.iter().find(|r| r.region == "TotalUS").unwrap();
        assert_eq!(total_us.kind, RegionKind::National);
        assert!(total_us.states.is_empty());
        assert_eq!(
            session.regions_for_state(code("MD")),
            vec!["BaltimoreWashington"]
        );
    }

    #[test]
    fn summaries_serialize_to_json() {
        let session = sample_session();
        let states = session.state_summaries(StateScope::Single, &RecordFilter::all(), None);
        let json = serde_json::to_value(&states).unwrap();
        assert_eq!(json[0]["state"], "CA");
        assert_eq!(json[0]["summary"]["count"], 3);
        let regions = serde_json::to_value(session.region_summaries(&RecordFilter::all(), None)).unwrap();
        assert_eq!(regions[0]["first_date"], "2015-12-20");
        assert_eq!(regions[0]["kind"], "SingleState");
    }
}
