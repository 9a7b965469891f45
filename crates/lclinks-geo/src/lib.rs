//! # lclinks-geo
//!
//! Geometry helpers for resolving an area of interest (AOI) onto the tiling
//! schemes of land-cover archives.
//!
//! This crate provides:
//! - [`Aoi`] - GeoJSON parsing (Feature, FeatureCollection or bare Geometry)
//! - [`BoundingBox`] - validated WGS84 bounds with closed-set intersection
//! - [`quantize`] and [`GridAxis`] - snapping bounds onto fixed grids
//! - [`intersects_geometry`] / [`is_valid_polygonal`] - footprint filtering
//! - [`Reprojector`] - projected footprints to WGS84 via proj4rs
//!
//! ## Example
//!
//! ```
//! use lclinks_geo::{Aoi, GridAxis};
//!
//! let aoi = Aoi::from_geojson_str(
//!     r#"{"type": "Polygon", "coordinates": [[[27.0, 3.5], [43.3, 3.5], [43.3, 16.3], [27.0, 3.5]]]}"#,
//! )?;
//! let (lon_min, lon_max) = GridAxis::LON_10.bounds(aoi.bbox().min_lon, aoi.bbox().max_lon);
//! assert_eq!((lon_min, lon_max), (20, 50));
//! # Ok::<(), lclinks_geo::GeoError>(())
//! ```

mod aoi;
mod bbox;
mod error;
mod intersect;
mod projection;
mod quantize;

pub use aoi::Aoi;
pub use bbox::BoundingBox;
pub use error::GeoError;
pub use intersect::{intersects_geometry, is_valid_polygonal};
pub use projection::{Reprojector, MOLLWEIDE_PROJ, WGS84_PROJ};
pub use quantize::{left_decade, quantize, GridAxis};

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeoError>;
