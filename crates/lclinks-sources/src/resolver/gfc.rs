use super::{ResolveContext, ResolveRequest, TileResolver};
use crate::Result;
use lclinks_geo::BoundingBox;
use tracing::info;

fn gwl_fcs30_url(map_year: u16) -> String {
    format!("https://zenodo.org/records/10068479/files/GWL_FCS30_{map_year}.zip?download=1")
}

/// Global wetland map: one world-wide archive per year.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gfc;

impl TileResolver for Gfc {
    fn resolve(&self, request: &ResolveRequest, _ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        Ok(vec![gwl_fcs30_url(request.map_year)])
    }
}

/// Map years whose archive covers the whole globe.
const GLOBAL_MAP_YEARS: [u16; 7] = [2000, 2005, 2010, 2015, 2019, 2020, 2022];

/// Regional coverage per map year, as (min_lat, max_lat, min_lon, max_lon).
const REGION_BOXES: [(u16, (f64, f64, f64, f64)); 6] = [
    (2000, (3.5, 16.3, 27.0, 43.3)),
    (2005, (3.5, 16.3, 27.0, 43.3)),
    (2010, (3.5, 16.3, 27.0, 43.3)),
    (2015, (3.5, 16.3, 27.0, 43.3)),
    (2019, (-0.1, 18.1, 9.9, 43.3)),
    (2022, (3.5, 16.3, 27.0, 43.3)),
];

/// GWL_FCS30D: the same archive family, gated by per-year coverage.
#[derive(Debug, Clone, Copy, Default)]
pub struct GfcFcs30d;

impl TileResolver for GfcFcs30d {
    fn resolve(&self, request: &ResolveRequest, _ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let map_year = request.map_year;
        if GLOBAL_MAP_YEARS.contains(&map_year) {
            return Ok(vec![gwl_fcs30_url(map_year)]);
        }

        let Some((_, (min_lat, max_lat, min_lon, max_lon))) =
            REGION_BOXES.iter().find(|(year, _)| *year == map_year)
        else {
            info!(source = "GFC_FCS30D", map_year, "no coverage defined for this map year");
            return Ok(Vec::new());
        };

        let region = BoundingBox::new(*min_lat, *max_lat, *min_lon, *max_lon)?;
        if request.bbox.intersects(&region) {
            Ok(vec![gwl_fcs30_url(map_year)])
        } else {
            info!(source = "GFC_FCS30D", map_year, "AOI does not intersect the covered region");
            Ok(Vec::new())
        }
    }
}
