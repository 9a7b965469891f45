//! YAML run configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the standard auxiliary-data layout relative to the working directory.

use crate::{Result, RunnerError};
use lclinks_sources::AuxiliaryPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Auxiliary file locations.
    pub aux: AuxiliaryPaths,
    /// Timeout applied to every HTTP request.
    pub http_timeout_secs: u64,
    /// Download FROM_GLC catalog snapshots that are missing.
    pub fetch_missing_catalogs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aux: AuxiliaryPaths::default(),
            http_timeout_secs: lclinks_sources::http::DEFAULT_TIMEOUT_SECS,
            fetch_missing_catalogs: true,
        }
    }
}

impl Config {
    /// Parse YAML text. Relative auxiliary paths are left as written.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a config file and rebase its relative paths onto the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RunnerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_yaml_str(&text).map_err(|e| RunnerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        debug!(path = %path.display(), base = %base.display(), "loaded configuration");
        Ok(config.rebased(&base))
    }

    /// Load `path` if given, otherwise use defaults relative to the current
    /// directory.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default().rebased(Path::new("."))),
        }
    }

    /// Copy with auxiliary paths rebased onto `base`.
    pub fn rebased(mut self, base: &Path) -> Self {
        self.aux = self.aux.resolve_against(base);
        self
    }

    /// HTTP timeout as a duration.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
