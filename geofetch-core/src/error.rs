//! Error taxonomy for source pipelines.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::{model::Coordinate, source::SourceId};

/// Pipeline stage in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Process,
    Save,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Process => "process",
            Stage::Save => "save",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("source unreachable: {0}")]
    Unreachable(String),

    #[error("access denied: {0}")]
    Unauthorized(String),

    #[error("no data available at {coordinate}")]
    NoData { coordinate: Coordinate },
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("malformed raw payload: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("failed to create output directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        io: io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        io: io::Error,
    },
}

/// Failure reported to whoever ran a source: which source, where, and at which stage.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{id} at {coordinate}: fetch failed")]
    Fetch {
        id: SourceId,
        coordinate: Coordinate,
        #[source]
        cause: FetchError,
    },

    #[error("{id} at {coordinate}: process failed")]
    Process {
        id: SourceId,
        coordinate: Coordinate,
        #[source]
        cause: ProcessError,
    },

    #[error("{id} at {coordinate}: save failed")]
    Save {
        id: SourceId,
        coordinate: Coordinate,
        #[source]
        cause: SaveError,
    },

    #[error("Unsupported source '{0}'. Supported sources: {list}.", list = SourceId::names())]
    Unsupported(String),

    #[error("Source '{0}' is registered but not implemented yet.")]
    NotImplemented(SourceId),
}

impl SourceError {
    /// Stage that failed, if the error came out of a running pipeline.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SourceError::Fetch { .. } => Some(Stage::Fetch),
            SourceError::Process { .. } => Some(Stage::Process),
            SourceError::Save { .. } => Some(Stage::Save),
            SourceError::Unsupported(_) | SourceError::NotImplemented(_) => None,
        }
    }

    pub fn source_id(&self) -> Option<SourceId> {
        match self {
            SourceError::Fetch { id, .. }
            | SourceError::Process { id, .. }
            | SourceError::Save { id, .. } => Some(*id),
            SourceError::NotImplemented(id) => Some(*id),
            SourceError::Unsupported(_) => None,
        }
    }
}
