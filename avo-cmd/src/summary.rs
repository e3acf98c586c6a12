//! `summary`: grouped price and volume statistics.

use crate::args::{FilterArgs, Source};
use crate::output::{emit, OutputFormat};
use avo_data::aggregate::RankMetric;
use avo_data::filter::RecordFilter;
use avo_session::models::StateScope;
use avo_session::Session;
use clap::{Args, ValueEnum};
use log::warn;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    /// Month of year, all selected years together
    Month,
    Year,
    Season,
    /// Region label as it appears in the data
    Region,
    /// States covered by single-state regions
    StateSingle,
    /// States covered by multi-state regions
    StateMulti,
}

#[derive(Debug, Clone, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: Source,

    /// Grouping key
    #[arg(short, long, value_enum, default_value_t = GroupBy::Month)]
    pub group_by: GroupBy,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Rank region or state groups by price, volume or mean-volume
    #[arg(long)]
    pub sort: Option<RankMetric>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub async fn run_summary(args: &SummaryArgs) -> anyhow::Result<()> {
    let session = args.source.load().await?;
    let filter = args.filter.to_filter(&session);
    let mut out = std::io::stdout().lock();
    render_summary(&session, args.group_by, &filter, args.sort, args.format, &mut out)
}

pub fn render_summary<W: Write>(
    session: &Session,
    group_by: GroupBy,
    filter: &RecordFilter,
    sort: Option<RankMetric>,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    if sort.is_some() && matches!(group_by, GroupBy::Month | GroupBy::Year | GroupBy::Season) {
        warn!("[avo] cmd: --sort only applies to region and state groupings; ignoring it");
    }
    match group_by {
        GroupBy::Month => emit(&session.monthly_summaries(filter), format, out),
        GroupBy::Year => emit(&session.yearly_summaries(filter), format, out),
        GroupBy::Season => emit(&session.season_summaries(filter), format, out),
        GroupBy::Region => emit(&session.region_summaries(filter, sort), format, out),
        GroupBy::StateSingle => emit(
            &session.state_summaries(StateScope::Single, filter, sort),
            format,
            out,
        ),
        GroupBy::StateMulti => emit(
            &session.state_summaries(StateScope::Multi, filter, sort),
            format,
            out,
        ),
    }
}
