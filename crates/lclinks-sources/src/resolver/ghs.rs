use super::{ResolveContext, ResolveRequest, TileResolver};
use crate::footprints::matching_keys;
use crate::Result;

const GHS_TILE_BASE: &str = "https://jeodpp.jrc.ec.europa.eu/ftp/jrc-opendata/GHSL/GHS_BUILT_S_GLOBE_R2023A/\
                             GHS_BUILT_S_E2018_GLOBE_R2023A_54009_10/V1-0/tiles";

/// GHSL built-up surface (R2023A, epoch 2018), one zip per schema tile.
#[derive(Debug, Clone, Copy, Default)]
pub struct GhsBuiltUp;

impl TileResolver for GhsBuiltUp {
    fn resolve(&self, request: &ResolveRequest, ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let tiles = ctx.aux.ghs_tiles()?;
        Ok(matching_keys(tiles, &request.bbox)
            .map(|tile_id| format!("{GHS_TILE_BASE}/GHS_BUILT_S_E2018_GLOBE_R2023A_54009_10_V1_0_{tile_id}.zip"))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aux_data::AuxiliaryData;
    use crate::footprints::Footprint;
    use crate::resolver::test_support::OfflineClient;
    use crate::SourceError;
    use geo::{Geometry, Rect};
    use lclinks_geo::BoundingBox;

    fn tile(id: &str, x0: f64, y0: f64) -> Footprint<String> {
        let rect = Rect::new((x0, y0), (x0 + 10.0, y0 + 10.0));
        Footprint::new(id.to_string(), Geometry::Polygon(rect.to_polygon()))
    }

    #[test]
    fn test_intersecting_tiles() {
        let aux = AuxiliaryData::empty().with_ghs_tiles(vec![
            tile("R9_C20", 20.0, 0.0),
            tile("R9_C21", 30.0, 0.0),
            tile("R1_C1", -170.0, 70.0),
        ]);
        let ctx = ResolveContext::new(&aux, &OfflineClient);
        let bbox = BoundingBox::new(3.5, 8.0, 27.0, 33.0).unwrap();
        let urls = GhsBuiltUp.resolve(&ResolveRequest::new(bbox, 2018, 2018), &ctx).unwrap();

        assert_eq!(urls.len(), 2);
        assert!(urls[0].ends_with("/V1-0/tiles/GHS_BUILT_S_E2018_GLOBE_R2023A_54009_10_V1_0_R9_C20.zip"));
        assert!(urls[1].ends_with("_R9_C21.zip"));
    }

    #[test]
    fn test_missing_schema() {
        let aux = AuxiliaryData::empty();
        let ctx = ResolveContext::new(&aux, &OfflineClient);
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0).unwrap();
        assert!(matches!(
            GhsBuiltUp.resolve(&ResolveRequest::new(bbox, 2018, 2018), &ctx),
            Err(SourceError::AuxiliaryDataMissing { .. })
        ));
    }
}
