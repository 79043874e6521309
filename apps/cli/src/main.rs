//! docboard CLI — headless view of the job-description dataset.
//!
//! Fetches the published sheet, builds the validated dataset, and prints
//! summary counts plus the table (or JSON) to stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
