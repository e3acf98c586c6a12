//! Command implementations for the avocado market CLI.
//!
//! Every subcommand loads the dataset once, from a file or over HTTP, runs
//! one query against the resulting session and prints it as a table, JSON or
//! CSV.

use clap::{Args, Subcommand};

pub mod args;
pub mod extremes;
pub mod output;
pub mod regions;
pub mod summary;

use args::Source;
use output::{emit, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price and volume statistics grouped by month, year, season, region or state
    Summary(summary::SummaryArgs),

    /// Highest and lowest weekly mean price of each year
    Extremes(extremes::ExtremesArgs),

    /// Region to state resolution table
    Regions(regions::RegionsArgs),

    /// Record count, date span and years of a dataset
    Info(InfoArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: Source,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Summary(args) => summary::run_summary(&args).await,
        Command::Extremes(args) => extremes::run_extremes(&args).await,
        Command::Regions(args) => regions::run_regions(&args).await,
        Command::Info(args) => {
            let session = args.source.load().await?;
            let mut out = std::io::stdout().lock();
            emit(&[session.info()], args.format, &mut out)
        }
    }
}
