//! Reprojection of footprint geometries to WGS84.

use crate::{GeoError, Result};
use geo::{Coord, Geometry, MapCoords};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

/// World Mollweide (ESRI:54009), the CRS of the GHSL tile schema.
pub const MOLLWEIDE_PROJ: &str = "+proj=moll +lon_0=0 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs";

/// Geographic WGS84 (EPSG:4326).
pub const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Transforms projected coordinates into WGS84 longitude/latitude degrees.
pub struct Reprojector {
    source: Proj,
    target: Proj,
    source_is_geographic: bool,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reprojector")
            .field("source_is_geographic", &self.source_is_geographic)
            .finish()
    }
}

impl Reprojector {
    /// Create a reprojector from a PROJ.4 definition of the source CRS.
    pub fn to_wgs84(source_proj: &str) -> Result<Self> {
        let source = Proj::from_proj_string(source_proj)
            .map_err(|e| GeoError::Projection(format!("invalid source projection '{source_proj}': {e:?}")))?;
        let target = Proj::from_proj_string(WGS84_PROJ)
            .map_err(|e| GeoError::Projection(format!("invalid WGS84 projection: {e:?}")))?;

        Ok(Self {
            source,
            target,
            source_is_geographic: source_proj.contains("+proj=longlat"),
        })
    }

    /// Project one `(x, y)` pair to `(lon, lat)` degrees.
    pub fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        // proj4rs works in radians for geographic systems
        let mut point = if self.source_is_geographic {
            (x.to_radians(), y.to_radians(), 0.0)
        } else {
            (x, y, 0.0)
        };

        transform(&self.source, &self.target, &mut point)
            .map_err(|e| GeoError::Projection(format!("transform of ({x}, {y}) failed: {e:?}")))?;

        Ok((point.0.to_degrees(), point.1.to_degrees()))
    }

    /// Project every vertex of a geometry.
    pub fn project_geometry(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>> {
        geometry.try_map_coords(|c: Coord<f64>| {
            let (x, y) = self.project(c.x, c.y)?;
            Ok(Coord { x, y })
        })
    }
}
