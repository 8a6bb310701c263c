//! Core library for the `geofetch` CLI.
//!
//! This crate defines:
//! - The fetch/process/save contract every dataset source implements
//! - Source variants and the registry that resolves them by name
//! - Multi-source orchestration over one coordinate and output directory
//! - Configuration handling
//!
//! It is used by `geofetch-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod source;

pub use config::Config;
pub use error::{FetchError, ProcessError, SaveError, SourceError, Stage};
pub use manager::{FailurePolicy, Manager, RunSummary, Selection, run_selection};
pub use model::{Coordinate, OutputLocation};
pub use source::{DataSource, Pipeline, SourceId};
