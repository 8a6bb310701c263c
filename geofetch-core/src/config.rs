use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{manager::FailurePolicy, source::SourceId};

/// Output directory used when neither the command line nor the config names one.
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_source = "prism"
/// output_dir = "/data/geofetch"
/// failure_policy = "continue"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Source used when `fetch` is given neither `--source` nor `--all`.
    pub default_source: Option<String>,

    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Config {
    /// Return the default source as a strongly-typed SourceId.
    pub fn default_source_id(&self) -> Result<SourceId> {
        let s = self.default_source.as_ref().ok_or_else(|| {
            anyhow!(
                "No source selected and no default source configured.\n\
                 Hint: pass `--source <name>` or `--all`, or run `geofetch configure`."
            )
        })?;

        Ok(SourceId::try_from(s.as_str())?)
    }

    pub fn set_default_source(&mut self, id: SourceId) {
        self.default_source = Some(id.as_str().to_string());
    }

    /// Configured output directory, falling back to `./output`.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geofetch", "geofetch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
