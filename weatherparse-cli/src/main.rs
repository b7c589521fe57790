//! Binary crate for the `weatherparse` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Printing the single report line

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries only the report line
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
