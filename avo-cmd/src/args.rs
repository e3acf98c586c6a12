//! Argument groups shared by several subcommands.

use anyhow::bail;
use avo_core::record::RecordType;
use avo_core::region::StateCode;
use avo_core::season::Season;
use avo_data::filter::RecordFilter;
use avo_session::Session;
use chrono::Datelike;
use clap::Args;
use log::{info, warn};

/// Where to load the dataset from.
#[derive(Debug, Clone, Default, Args)]
pub struct Source {
    /// Path to the avocado CSV file
    #[arg(long, conflicts_with = "url")]
    pub csv: Option<String>,

    /// URL to download the avocado CSV from
    #[arg(long)]
    pub url: Option<String>,
}

impl Source {
    pub fn is_given(&self) -> bool {
        self.csv.is_some() || self.url.is_some()
    }

    pub async fn load(&self) -> anyhow::Result<Session> {
        let session = match (&self.csv, &self.url) {
            (Some(path), _) => Session::load_path(path).await?,
            (None, Some(url)) => Session::fetch(url).await?,
            (None, None) => bail!("no dataset given; pass --csv <path> or --url <url>"),
        };
        let rejected = session.dataset().rejected().len();
        if rejected > 0 {
            warn!("[avo] cmd: {} malformed rows were skipped", rejected);
        }
        info!(
            "[avo] cmd: {} records from {} regions",
            session.dataset().len(),
            session.dataset().regions().len()
        );
        Ok(session)
    }
}

/// Record selection. A year range and a month-index range are mutually
/// exclusive; an open end defaults to the edge of the data.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct FilterArgs {
    /// First calendar year to include
    #[arg(long, conflicts_with_all = ["start_month", "end_month"])]
    pub start_year: Option<i32>,

    /// Last calendar year to include
    #[arg(long, conflicts_with_all = ["start_month", "end_month"])]
    pub end_year: Option<i32>,

    /// First month index to include (0 is January of the earliest year)
    #[arg(long)]
    pub start_month: Option<i32>,

    /// Last month index to include
    #[arg(long)]
    pub end_month: Option<i32>,

    /// Only conventional or only organic avocados
    #[arg(long = "type")]
    pub record_type: Option<RecordType>,

    /// Only one season (spring, summer, fall, winter)
    #[arg(long)]
    pub season: Option<Season>,
}

impl FilterArgs {
    pub fn to_filter(&self, session: &Session) -> RecordFilter {
        let span = session.dataset().date_span();
        let mut filter = if self.start_month.is_some() || self.end_month.is_some() {
            let last = span.map_or(0, |(_, last)| session.month_index_of(&last));
            session.month_filter(self.start_month.unwrap_or(0), self.end_month.unwrap_or(last))
        } else if self.start_year.is_some() || self.end_year.is_some() {
            let first = session.epoch_year();
            let last = span.map_or(first, |(_, last)| last.year());
            session.year_filter(self.start_year.unwrap_or(first), self.end_year.unwrap_or(last))
        } else {
            RecordFilter::all()
        };
        if let Some(record_type) = self.record_type {
            filter = filter.with_record_type(record_type);
        }
        if let Some(season) = self.season {
            filter = filter.with_season(season);
        }
        filter
    }
}

/// Accepts a two-letter code or a full state name.
pub fn parse_state(s: &str) -> Result<StateCode, String> {
    StateCode::parse(s)
        .filter(|code| !code.is_all())
        .or_else(|| StateCode::from_name(s))
        .ok_or_else(|| format!("unknown US state '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../fixtures/avocado-sample.csv");

    fn counted(args: FilterArgs) -> usize {
        let session = Session::from_csv_str(SAMPLE).unwrap();
        let filter = args.to_filter(&session);
        filter.apply(session.dataset().records()).count()
    }

    #[test]
    fn no_bounds_selects_everything() {
        assert_eq!(counted(FilterArgs::default()), 12);
    }

    #[test]
    fn open_year_range_runs_to_last_year() {
        let args = FilterArgs {
            start_year: Some(2016),
            ..FilterArgs::default()
        };
        assert_eq!(counted(args), 6);
        let args = FilterArgs {
            end_year: Some(2015),
            ..FilterArgs::default()
        };
        assert_eq!(counted(args), 6);
    }

    #[test]
    fn extreme_years_are_clamped() {
        let args = FilterArgs {
            start_year: Some(i32::MIN),
            end_year: Some(i32::MAX),
            ..FilterArgs::default()
        };
        assert_eq!(counted(args), 12);
        let args = FilterArgs {
            start_year: Some(i32::MAX),
            ..FilterArgs::default()
        };
        assert_eq!(counted(args), 0);
    }

    #[test]
    fn month_range_and_type() {
        let args = FilterArgs {
            start_month: Some(11),
            end_month: Some(11),
            record_type: Some(RecordType::Conventional),
            ..FilterArgs::default()
        };
        assert_eq!(counted(args), 4);
        let args = FilterArgs {
            start_month: Some(24),
            ..FilterArgs::default()
        };
        assert_eq!(counted(args), 3);
    }

    #[test]
    fn season_filter() {
        let args = FilterArgs {
            season: Some(Season::Summer),
            ..FilterArgs::default()
        };
        assert_eq!(counted(args), 3);
    }

    #[test]
    fn parse_state_accepts_codes_and_names() {
        assert_eq!(parse_state("nm").unwrap().as_str(), "NM");
        assert_eq!(parse_state("New Mexico").unwrap().as_str(), "NM");
        assert!(parse_state("ALL").is_err());
        assert!(parse_state("Atlantis").is_err());
    }

    #[tokio::test]
    async fn load_requires_a_source() {
        let err = Source::default().load().await.unwrap_err();
        assert!(err.to_string().contains("--csv"));
    }
}
