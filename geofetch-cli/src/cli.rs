use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use geofetch_core::{
    Config, Coordinate, FailurePolicy, OutputLocation, Selection, SourceId, run_selection,
};
use inquire::{Select, Text};
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geofetch", version, about = "Fetch geospatial datasets for a coordinate")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch data for a latitude/longitude from one source or all of them.
    Fetch {
        /// Latitude of the location.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the location.
        #[arg(long, allow_negative_numbers = true)]
        long: f64,

        /// Data source to fetch from, e.g. "prism".
        #[arg(long, conflicts_with = "all")]
        source: Option<String>,

        /// Run every implemented source.
        #[arg(long)]
        all: bool,

        /// Directory to save results. Defaults to the configured one, then ./output.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Interactively set the default source, output directory and failure policy.
    Configure,

    /// List registered sources.
    Sources,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Fetch { lat, long, source, all, output } => {
                let config = Config::load()?;
                let selection = selection(source, all, &config)?;
                let output = OutputLocation::new(output.unwrap_or_else(|| config.output_dir()));

                let summary = run_selection(
                    &selection,
                    Coordinate::new(lat, long),
                    output,
                    config.failure_policy,
                )?;

                for path in &summary.written {
                    println!("Saved {}", path.display());
                }

                let failed = summary.failures.len();
                for err in summary.failures {
                    eprintln!("Error: {:#}", anyhow::Error::from(err));
                }

                if failed > 0 {
                    bail!("{failed} source(s) failed");
                }
            }
            Command::Configure => configure()?,
            Command::Sources => {
                for id in SourceId::all() {
                    let status = if id.is_implemented() { "available" } else { "not implemented" };
                    println!("{id:<10} {status}");
                }
            }
        }

        Ok(())
    }
}

fn selection(source: Option<String>, all: bool, config: &Config) -> anyhow::Result<Selection> {
    if all {
        return Ok(Selection::All);
    }

    match source {
        Some(name) => Ok(Selection::One(name)),
        None => Ok(Selection::One(config.default_source_id()?.as_str().to_string())),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let names: Vec<&str> = SourceId::all().iter().map(SourceId::as_str).collect();
    let source = Select::new("Default source:", names)
        .prompt()
        .context("Failed to read default source")?;
    config.set_default_source(SourceId::try_from(source)?);

    let current_dir = config.output_dir();
    let output = Text::new("Output directory:")
        .with_default(&current_dir.to_string_lossy())
        .prompt()
        .context("Failed to read output directory")?;
    config.output_dir = Some(PathBuf::from(output));

    let labels = vec![policy_label(FailurePolicy::Continue), policy_label(FailurePolicy::Halt)];
    let choice = Select::new("When a source fails:", labels)
        .prompt()
        .context("Failed to read failure policy")?;
    config.failure_policy = if choice == policy_label(FailurePolicy::Halt) {
        FailurePolicy::Halt
    } else {
        FailurePolicy::Continue
    };

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn policy_label(policy: FailurePolicy) -> &'static str {
    match policy {
        FailurePolicy::Continue => "continue with remaining sources",
        FailurePolicy::Halt => "stop at the first failure",
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the `-v` level.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
