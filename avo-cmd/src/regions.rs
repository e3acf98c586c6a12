//! `regions`: the region-to-state table and labels the data uses that it
//! does not cover.

use crate::args::{parse_state, Source};
use crate::output::{emit, emit_json, OutputFormat};
use avo_core::dataset::Dataset;
use avo_core::region::StateCode;
use avo_session::models::{RegionInfo, UnresolvedRegion};
use avo_session::Session;
use clap::Args;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Args)]
pub struct RegionsArgs {
    // optional: when given, unresolved labels are listed too
    #[command(flatten)]
    pub source: Source,

    /// Only regions covering this state (code or full name)
    #[arg(long, value_parser = parse_state)]
    pub state: Option<StateCode>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct RegionsReport {
    regions: Vec<RegionInfo>,
    unresolved: Vec<UnresolvedRegion>,
}

pub async fn run_regions(args: &RegionsArgs) -> anyhow::Result<()> {
    let session = if args.source.is_given() {
        args.source.load().await?
    } else {
        Session::new(Dataset::default())
    };
    let mut out = std::io::stdout().lock();
    render_regions(&session, args.state, args.format, &mut out)
}

pub fn render_regions<W: Write>(
    session: &Session,
    state: Option<StateCode>,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let regions: Vec<RegionInfo> = match state {
        Some(state) => {
            let covering = session.regions_for_state(state);
            session
                .region_table()
                .into_iter()
                .filter(|row| covering.contains(&row.region))
                .collect()
        }
        None => session.region_table(),
    };
    let unresolved = session.unresolved_regions();

    if format == OutputFormat::Json {
        return emit_json(&RegionsReport { regions, unresolved }, out);
    }
    emit(&regions, format, out)?;
    if !unresolved.is_empty() {
        writeln!(out)?;
        emit(&unresolved, format, out)?;
    }
    Ok(())
}
