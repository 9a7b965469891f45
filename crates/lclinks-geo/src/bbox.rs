//! WGS84 bounding boxes.

use crate::{GeoError, Result};
use geo::{coord, Polygon, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic bounds of an AOI or a tile, in WGS84 degrees.
///
/// Construct through [`BoundingBox::new`] so the invariants hold:
/// `min <= max` on both axes, latitudes in [-90, 90] and longitudes in
/// [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum latitude (south edge).
    pub min_lat: f64,
    /// Maximum latitude (north edge).
    pub max_lat: f64,
    /// Minimum longitude (west edge).
    pub min_lon: f64,
    /// Maximum longitude (east edge).
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a validated bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let finite = [min_lat, max_lat, min_lon, max_lon].iter().all(|v| v.is_finite());
        let ordered = min_lat <= max_lat && min_lon <= max_lon;
        let in_range = (-90.0..=90.0).contains(&min_lat)
            && (-90.0..=90.0).contains(&max_lat)
            && (-180.0..=180.0).contains(&min_lon)
            && (-180.0..=180.0).contains(&max_lon);

        if !(finite && ordered && in_range) {
            return Err(GeoError::OutOfRange {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
            });
        }

        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Check if a coordinate is within the bounds (edges included).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Closed-set rectangle intersection: boxes sharing only an edge or a
    /// corner intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }

    /// The box as a `geo` rectangle (x = longitude, y = latitude).
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    /// The box as a closed polygon.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }

    /// The box as a closed `[lon, lat]` ring, starting at the north-west
    /// corner and running counter-clockwise. This is the shape written to the
    /// `aoi` column of the link table.
    pub fn ring(&self) -> [[f64; 2]; 5] {
        [
            [self.min_lon, self.max_lat],
            [self.min_lon, self.min_lat],
            [self.max_lon, self.min_lat],
            [self.max_lon, self.max_lat],
            [self.min_lon, self.max_lat],
        ]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MinLon={}, MinLat={}, MaxLon={}, MaxLat={}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
