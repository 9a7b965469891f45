//! Error types for the geometry crate.

use thiserror::Error;

/// Errors that can occur when parsing or transforming geometry.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The AOI could not be turned into a usable geometry.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A bounding box coordinate is outside WGS84 limits or inverted.
    #[error("Bounding box out of range: lat {min_lat}..{max_lat}, lon {min_lon}..{max_lon}")]
    OutOfRange {
        /// Minimum latitude.
        min_lat: f64,
        /// Maximum latitude.
        max_lat: f64,
        /// Minimum longitude.
        min_lon: f64,
        /// Maximum longitude.
        max_lon: f64,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reprojection failed.
    #[error("Projection error: {0}")]
    Projection(String),
}
