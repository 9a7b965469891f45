//! Tile-index footprints: WRS-2 scenes, GHS tiles and WSF grid cells.
//!
//! Readers turn shapefiles and GeoJSON grids into plain [`Footprint`]
//! lists; the filtering in [`matching_keys`] and [`intersecting_keys`] works on those lists only, so
//! it can be exercised without files.

use crate::{Result, SourceError};
use geo::{Geometry, LineString, MultiPolygon, Polygon};
use geojson::GeoJson;
use lclinks_geo::{intersects_geometry, is_valid_polygonal, BoundingBox, Reprojector};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape};
use std::path::Path;
use tracing::{debug, trace};

/// A footprint geometry (WGS84) tagged with the attribute a resolver needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint<K> {
    /// Attribute carried through to the link.
    pub key: K,
    /// Footprint outline in WGS84 degrees.
    pub geometry: Geometry<f64>,
}

impl<K> Footprint<K> {
    /// Create a footprint.
    pub fn new(key: K, geometry: Geometry<f64>) -> Self {
        Self { key, geometry }
    }
}

/// Landsat WRS-2 path/row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathRow {
    /// WRS-2 path.
    pub path: u32,
    /// WRS-2 row.
    pub row: u32,
}

/// Keys of valid footprints intersecting `bbox`, in input order.
pub fn matching_keys<'a, K>(
    footprints: &'a [Footprint<K>],
    bbox: &'a BoundingBox,
) -> impl Iterator<Item = &'a K> + 'a {
    footprints
        .iter()
        .filter(move |fp| is_valid_polygonal(&fp.geometry) && intersects_geometry(bbox, &fp.geometry))
        .map(|fp| &fp.key)
}

/// Keys of footprints intersecting `bbox`, in input order, without a
/// validity check.
pub fn intersecting_keys<'a, K>(
    footprints: &'a [Footprint<K>],
    bbox: &'a BoundingBox,
) -> impl Iterator<Item = &'a K> + 'a {
    footprints
        .iter()
        .filter(move |fp| intersects_geometry(bbox, &fp.geometry))
        .map(|fp| &fp.key)
}

// ============================================================================
// Shapefile readers
// ============================================================================

/// Read WRS-2 scene footprints with their `PATH` / `ROW` attributes.
pub fn read_wrs2_scenes(path: &Path) -> Result<Vec<Footprint<PathRow>>> {
    read_polygons(path, |record| {
        let path_value = numeric_field(record, "PATH")?;
        let row_value = numeric_field(record, "ROW")?;
        Some(PathRow {
            path: path_value as u32,
            row: row_value as u32,
        })
    })
}

/// Read GHS tile footprints with their `tile_id`, projected to WGS84.
pub fn read_ghs_tiles(path: &Path, reprojector: &Reprojector) -> Result<Vec<Footprint<String>>> {
    let tiles = read_polygons(path, |record| text_field(record, "tile_id"))?;
    Ok(project_tiles(tiles, reprojector))
}

/// Project tiles to WGS84. Tiles with a vertex outside the source
/// projection's domain are dropped.
fn project_tiles(tiles: Vec<Footprint<String>>, reprojector: &Reprojector) -> Vec<Footprint<String>> {
    let total = tiles.len();
    let projected: Vec<_> = tiles
        .into_iter()
        .filter_map(|fp| match reprojector.project_geometry(&fp.geometry) {
            Ok(geometry) => Some(Footprint::new(fp.key, geometry)),
            Err(e) => {
                debug!(tile_id = %fp.key, error = %e, "skipping tile outside projection domain");
                None
            }
        })
        .collect();
    if projected.len() < total {
        debug!(dropped = total - projected.len(), kept = projected.len(), "projected GHS tiles");
    }
    projected
}

fn read_polygons<K>(path: &Path, key_of: impl Fn(&Record) -> Option<K>) -> Result<Vec<Footprint<K>>> {
    let mut reader = shapefile::Reader::from_path(path)?;
    let mut footprints = Vec::new();
    let mut skipped = 0usize;

    for item in reader.iter_shapes_and_records() {
        let (shape, record) = item?;
        let geometry = shape_to_geometry(shape);
        match (geometry, key_of(&record)) {
            (Some(geometry), Some(key)) => footprints.push(Footprint::new(key, geometry)),
            _ => skipped += 1,
        }
    }

    debug!(path = %path.display(), footprints = footprints.len(), skipped, "read shapefile");
    Ok(footprints)
}

fn shape_to_geometry(shape: Shape) -> Option<Geometry<f64>> {
    let rings: Vec<(bool, Vec<(f64, f64)>)> = match shape {
        Shape::Polygon(polygon) => polygon.rings().iter().map(|r| ring_xy(r, |p| (p.x, p.y))).collect(),
        Shape::PolygonM(polygon) => polygon.rings().iter().map(|r| ring_xy(r, |p| (p.x, p.y))).collect(),
        Shape::PolygonZ(polygon) => polygon.rings().iter().map(|r| ring_xy(r, |p| (p.x, p.y))).collect(),
        other => {
            trace!(shape_type = ?other.shapetype(), "ignoring non-polygon shape");
            return None;
        }
    };
    rings_to_geometry(rings)
}

fn ring_xy<P>(ring: &PolygonRing<P>, xy: impl Fn(&P) -> (f64, f64)) -> (bool, Vec<(f64, f64)>) {
    match ring {
        PolygonRing::Outer(points) => (true, points.iter().map(&xy).collect()),
        PolygonRing::Inner(points) => (false, points.iter().map(&xy).collect()),
    }
}

/// Assemble shapefile rings: each outer ring opens a polygon, inner rings
/// attach to the most recent outer ring.
fn rings_to_geometry(rings: Vec<(bool, Vec<(f64, f64)>)>) -> Option<Geometry<f64>> {
    let mut polygons: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    for (is_outer, points) in rings {
        let ring = LineString::from(points);
        if is_outer {
            polygons.push((ring, Vec::new()));
        } else if let Some((_, holes)) = polygons.last_mut() {
            holes.push(ring);
        }
    }

    let mut polygons: Vec<Polygon<f64>> = polygons
        .into_iter()
        .map(|(exterior, holes)| Polygon::new(exterior, holes))
        .collect();

    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon(polygons))),
    }
}

fn numeric_field(record: &Record, name: &str) -> Option<f64> {
    match record.get(name)? {
        FieldValue::Numeric(value) => *value,
        FieldValue::Integer(value) => Some(f64::from(*value)),
        FieldValue::Double(value) => Some(*value),
        FieldValue::Float(value) => value.map(f64::from),
        FieldValue::Character(Some(text)) => text.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(record: &Record, name: &str) -> Option<String> {
    match record.get(name)? {
        FieldValue::Character(Some(text)) => Some(text.trim().to_string()),
        FieldValue::Numeric(Some(value)) => Some(value.to_string()),
        FieldValue::Integer(value) => Some(value.to_string()),
        _ => None,
    }
}

// ============================================================================
// GeoJSON grids
// ============================================================================

/// Parse a WSF tile grid: every feature with a geometry and a string
/// `Download` property becomes a footprint keyed by that URL.
pub fn parse_wsf_grid(text: &str, path: &Path) -> Result<Vec<Footprint<String>>> {
    let format_error = |reason: String| SourceError::CatalogFormat {
        path: path.to_path_buf(),
        reason,
    };

    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| format_error(e.to_string()))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(format_error("expected a FeatureCollection".into()));
    };

    let mut footprints = Vec::new();
    for feature in collection.features {
        let download = feature
            .property("Download")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let (Some(download), Some(geometry)) = (download, feature.geometry) else {
            continue;
        };
        match Geometry::<f64>::try_from(geometry) {
            Ok(geometry) => footprints.push(Footprint::new(download, geometry)),
            Err(e) => trace!(error = %e, "skipping grid cell with unconvertible geometry"),
        }
    }
    Ok(footprints)
}

/// Read a WSF grid file.
pub fn read_wsf_grid(path: &Path) -> Result<Vec<Footprint<String>>> {
    let text = std::fs::read_to_string(path)?;
    let footprints = parse_wsf_grid(&text, path)?;
    debug!(path = %path.display(), cells = footprints.len(), "read WSF grid");
    Ok(footprints)
}
