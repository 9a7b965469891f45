//! Error types for the runner.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Configuration file is unusable.
    #[error("Configuration error in {path}: {reason}")]
    Config {
        /// Config file.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },

    /// The requested year list is empty or malformed.
    #[error("Invalid years: {0}")]
    InvalidYears(String),

    /// The region name cannot be used in output file names.
    #[error("Invalid region {0:?}: must be a non-empty name without path separators")]
    InvalidRegion(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// AOI error.
    #[error(transparent)]
    Geo(#[from] lclinks_geo::GeoError),

    /// Source registry or catalog error.
    #[error(transparent)]
    Source(#[from] lclinks_sources::SourceError),
}
