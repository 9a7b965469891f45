use super::{lat_label, lon_label, ten_degree_cells, ResolveContext, ResolveRequest, TileResolver};
use crate::Result;
use lclinks_geo::GridAxis;

const HANSEN_BASE: &str =
    "https://storage.googleapis.com/earthenginepartners-hansen/GFC-2023-v1.11/Hansen_GFC-2023-v1.11_treecover2000";

/// Tree-cover tiles span 50°S to 80°N.
const LAT_AXIS: GridAxis = GridAxis::new(-50.0, 80.0, 10.0);

/// Hansen global forest change, tree canopy cover for 2000.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeCover2000;

impl TileResolver for TreeCover2000 {
    fn resolve(&self, request: &ResolveRequest, _ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        Ok(ten_degree_cells(&request.bbox, LAT_AXIS, "GFC_TreeCover2000")
            .into_iter()
            .map(|(lat, lon)| format!("{HANSEN_BASE}_{}_{}.tif", lat_label(lat), lon_label(lon)))
            .collect())
    }
}
