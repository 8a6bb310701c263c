//! Binary crate for the `geofetch` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Logging setup and human-friendly output

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cli::init_tracing(cmd.verbose);
    cmd.run()
}
