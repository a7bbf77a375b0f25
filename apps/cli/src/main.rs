//! HotNews CLI: collect, rank, and print today's top news.
//!
//! Pulls headlines from syndication feeds and a "most read" page, merges
//! near-duplicates, and prints the top N as JSON or Markdown.

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
