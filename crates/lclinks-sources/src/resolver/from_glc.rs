//! FROM_GLC resolvers. All three products are downloaded by catalog id from
//! data-starcloud.pcl.ac.cn; they differ in how a tile is located.

use super::{lat_label, lon_label, ten_degree_cells, ResolveContext, ResolveRequest, TileResolver};
use crate::catalog::path_row_key;
use crate::footprints::matching_keys;
use crate::Result;
use lclinks_geo::{BoundingBox, GridAxis};
use std::collections::HashSet;
use tracing::{info, trace};

const DOWNLOAD_BASE: &str = "https://data-starcloud.pcl.ac.cn/api/en/resourceFile/download";

/// FROM_GLC 2015 latitude coverage.
const LAT_AXIS_2015: GridAxis = GridAxis::new(-60.0, 80.0, 10.0);

/// FROM_GLC 2010: Landsat 5 scenes located by WRS-2 path/row.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromGlc2010;

impl TileResolver for FromGlc2010 {
    fn resolve(&self, request: &ResolveRequest, ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let scenes = ctx.aux.wrs2_scenes()?;
        let index = ctx.aux.from_glc_2010()?;

        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        for path_row in matching_keys(scenes, &request.bbox) {
            if !seen.insert(*path_row) {
                continue;
            }
            let key = path_row_key(path_row.path, path_row.row);
            let Some(entries) = index.get(&key) else {
                info!(source = "FROM_GLC_2010", path_row = %key, "missing metadata for path/row");
                continue;
            };
            urls.extend(
                entries
                    .iter()
                    .filter(|e| e.name.ends_with(".tif.tar.gz"))
                    .map(|e| format!("{DOWNLOAD_BASE}/4/{}", e.id)),
            );
        }
        Ok(urls)
    }
}

/// File name of a FROM_GLC 2015 tile, e.g. `030E10N.tif`.
pub fn from_glc_2015_tile_name(lat: i32, lon: i32) -> String {
    format!("{}{}.tif", lon_label(lon), lat_label(lat))
}

/// FROM_GLC 2015: 10° tiles looked up by file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromGlc2015;

impl TileResolver for FromGlc2015 {
    fn resolve(&self, request: &ResolveRequest, ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let index = ctx.aux.from_glc_2015()?;

        let mut urls = Vec::new();
        for (lat, lon) in ten_degree_cells(&request.bbox, LAT_AXIS_2015, "FROM_GLC_2015") {
            let name = from_glc_2015_tile_name(lat, lon);
            match index.first(&name) {
                Some(entry) => urls.push(format!("{DOWNLOAD_BASE}/3/{}", entry.id)),
                None => info!(source = "FROM_GLC_2015", tile = %name, "no data for tile"),
            }
        }
        Ok(urls)
    }
}

/// South-west corner `(lat, lon)` encoded in the last two `_` tokens of a
/// FROM_GLC 2017 file stem.
fn tile_corner_2017(name: &str) -> Option<(i32, i32)> {
    let stem = name.split('.').next()?;
    let mut tokens = stem.rsplit('_');
    let lon = tokens.next()?.parse().ok()?;
    let lat = tokens.next()?.parse().ok()?;
    Some((lat, lon))
}

/// Whether any corner of the 2° tile at `(lat, lon)` lies in `bbox`.
fn tile_2017_matches(bbox: &BoundingBox, lat: i32, lon: i32) -> bool {
    [(lat, lon), (lat, lon + 2), (lat + 2, lon), (lat + 2, lon + 2)]
        .iter()
        .any(|&(y, x)| bbox.contains(f64::from(y), f64::from(x)))
}

/// FROM_GLC 2017: 2° tiles located by the coordinates in their names.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromGlc2017;

impl TileResolver for FromGlc2017 {
    fn resolve(&self, request: &ResolveRequest, ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let catalog = ctx.aux.from_glc_2017()?;

        let mut urls = Vec::new();
        for entry in catalog.entries().iter().filter(|e| e.name.ends_with(".tif")) {
            let Some((lat, lon)) = tile_corner_2017(&entry.name) else {
                trace!(name = %entry.name, "could not parse tile corner");
                continue;
            };
            if tile_2017_matches(&request.bbox, lat, lon) {
                urls.push(format!("{DOWNLOAD_BASE}/1/{}", entry.id));
            }
        }
        Ok(urls)
    }
}
