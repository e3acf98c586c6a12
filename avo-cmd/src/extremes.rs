//! `extremes`: yearly peak and trough of the weekly mean price.

use crate::args::{FilterArgs, Source};
use crate::output::{emit, OutputFormat};
use avo_data::filter::RecordFilter;
use avo_session::Session;
use clap::Args;
use std::io::Write;

#[derive(Debug, Clone, Args)]
pub struct ExtremesArgs {
    #[command(flatten)]
    pub source: Source,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub async fn run_extremes(args: &ExtremesArgs) -> anyhow::Result<()> {
    let session = args.source.load().await?;
    let filter = args.filter.to_filter(&session);
    let mut out = std::io::stdout().lock();
    render_extremes(&session, &filter, args.format, &mut out)
}

pub fn render_extremes<W: Write>(
    session: &Session,
    filter: &RecordFilter,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    emit(&session.yearly_extremes(filter), format, out)
}
