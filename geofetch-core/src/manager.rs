//! Runs several sources for one coordinate into one output directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::SourceError,
    model::{Coordinate, OutputLocation},
    source::{Pipeline, SourceId, source_from_id, source_from_name},
};

/// What `run_all` does after a source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep going and collect every failure.
    #[default]
    Continue,
    /// Stop at the first failure.
    Halt,
}

/// Outcome of a multi-source run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub failures: Vec<SourceError>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct Manager {
    coordinate: Coordinate,
    output: OutputLocation,
    policy: FailurePolicy,
    sources: Vec<Box<dyn Pipeline>>,
}

impl Manager {
    /// Manager with one fresh instance of every implemented source, in registration order.
    pub fn new(coordinate: Coordinate, output: OutputLocation) -> Self {
        let sources = SourceId::implemented()
            .filter_map(|id| match source_from_id(id, coordinate) {
                Ok(source) => Some(source),
                Err(err) => {
                    warn!(source = %id, error = %err, "Skipping source that failed to build");
                    None
                }
            })
            .collect();

        Self { coordinate, output, policy: FailurePolicy::default(), sources }
    }

    /// Manager with no sources registered.
    pub fn empty(coordinate: Coordinate, output: OutputLocation) -> Self {
        Self { coordinate, output, policy: FailurePolicy::default(), sources: Vec::new() }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn register(&mut self, source: Box<dyn Pipeline>) {
        self.sources.push(source);
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn output(&self) -> &OutputLocation {
        &self.output
    }

    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    pub fn run_all(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        for source in &self.sources {
            match source.run(&self.output) {
                Ok(path) => summary.written.push(path),
                Err(err) => {
                    warn!(source = %source.id(), stage = ?err.stage(), error = %err, "Source failed");
                    summary.failures.push(err);

                    if self.policy == FailurePolicy::Halt {
                        info!("Halting after first failure");
                        break;
                    }
                }
            }
        }

        summary
    }
}

/// Which sources a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    One(String),
    All,
}

/// Run the selected source(s). An unknown or unimplemented name is rejected before
/// anything touches the filesystem.
pub fn run_selection(
    selection: &Selection,
    coordinate: Coordinate,
    output: OutputLocation,
    policy: FailurePolicy,
) -> Result<RunSummary, SourceError> {
    let manager = match selection {
        Selection::All => {
            info!("Fetching data from all sources");
            Manager::new(coordinate, output)
        }
        Selection::One(name) => {
            let source = source_from_name(name, coordinate)?;
            info!(source = %source.id(), "Fetching from a single source");
            let mut manager = Manager::empty(coordinate, output);
            manager.register(source);
            manager
        }
    };

    Ok(manager.with_policy(policy).run_all())
}
