//! Binary crate for the `yr` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output of forecast documents

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Requests run on this runtime while the main thread uses the blocking API.
    let runtime = tokio::runtime::Runtime::new()?;

    let cmd = cli::Cli::parse();
    cmd.run(runtime.handle())
}
