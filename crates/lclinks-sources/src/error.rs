//! Error types for the sources crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source name not in the registry.
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// A required local file (grid, shapefile, catalog snapshot) is absent.
    #[error("Auxiliary data missing for {source_name}: {path}")]
    AuxiliaryDataMissing {
        /// Source that needed the file.
        source_name: &'static str,
        /// Expected location.
        path: PathBuf,
    },

    /// Network or API failure in a remote collaborator.
    #[error("Remote query failed for {service}: {reason}")]
    RemoteQueryFailed {
        /// Service that was queried.
        service: &'static str,
        /// Underlying cause.
        reason: String,
    },

    /// A year the source cannot build a link for.
    #[error("Year {year} out of range for {source_name}")]
    YearOutOfRange {
        /// Source being resolved.
        source_name: &'static str,
        /// Offending map year.
        year: u16,
    },

    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Shapefile decoding error.
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// Geometry error.
    #[error(transparent)]
    Geo(#[from] lclinks_geo::GeoError),

    /// HTTP client error.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// A catalog snapshot or grid file has an unexpected shape.
    #[error("Unexpected data format in {path}: {reason}")]
    CatalogFormat {
        /// File being read.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },
}
