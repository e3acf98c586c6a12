//! avo-cli - Command line tool for exploring the weekly avocado dataset.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "avo-cli",
    version,
    about = "Avocado prices and volumes by region, state and season"
)]
struct Cli {
    #[command(subcommand)]
    command: avo_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[avo] cli: {:?}", cli.command);
    avo_cmd::run(cli.command).await
}
