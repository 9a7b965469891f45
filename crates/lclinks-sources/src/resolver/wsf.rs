use super::{ResolveContext, ResolveRequest, TileResolver};
use crate::footprints::intersecting_keys;
use crate::Result;

/// World Settlement Footprint: grid cells carry their own download URL.
///
/// Cells are matched on intersection alone; the grid is not validity-checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wsf;

impl TileResolver for Wsf {
    fn resolve(&self, request: &ResolveRequest, ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let grid = ctx.aux.wsf_grid(request.year)?;
        Ok(intersecting_keys(grid, &request.bbox).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aux_data::AuxiliaryData;
    use crate::footprints::Footprint;
    use crate::resolver::test_support::OfflineClient;
    use geo::{polygon, Geometry, Rect};
    use lclinks_geo::BoundingBox;

    fn cell(url: &str, x0: f64, y0: f64) -> Footprint<String> {
        let rect = Rect::new((x0, y0), (x0 + 2.0, y0 + 2.0));
        Footprint::new(url.to_string(), Geometry::Polygon(rect.to_polygon()))
    }

    #[test]
    fn test_grid_per_year() {
        let aux = AuxiliaryData::empty()
            .with_wsf_grid(2015, vec![cell("https://wsf/2015/a.tif", 0.0, 0.0)])
            .with_wsf_grid(
                2019,
                vec![cell("https://wsf/2019/a.tif", 0.0, 0.0), cell("https://wsf/2019/b.tif", 8.0, 8.0)],
            );
        let ctx = ResolveContext::new(&aux, &OfflineClient);
        let bbox = BoundingBox::new(1.0, 3.0, 1.0, 3.0).unwrap();

        let urls = Wsf.resolve(&ResolveRequest::new(bbox, 2019, 2019), &ctx).unwrap();
        assert_eq!(urls, vec!["https://wsf/2019/a.tif"]);

        let urls = Wsf.resolve(&ResolveRequest::new(bbox, 2015, 2015), &ctx).unwrap();
        assert_eq!(urls, vec!["https://wsf/2015/a.tif"]);
    }

    #[test]
    fn test_self_intersecting_cell_still_matches() {
        let bowtie = Geometry::Polygon(geo::polygon![
            (x: 0.0, y: 0.0),
            (x: 4.0, y: 4.0),
            (x: 4.0, y: 0.0),
            (x: 0.0, y: 4.0),
            (x: 0.0, y: 0.0),
        ]);
        let aux = AuxiliaryData::empty().with_wsf_grid(
            2019,
            vec![Footprint::new("https://wsf/2019/bowtie.tif".to_string(), bowtie)],
        );
        let ctx = ResolveContext::new(&aux, &OfflineClient);
        let bbox = BoundingBox::new(1.0, 3.0, 1.0, 3.0).unwrap();

        let urls = Wsf.resolve(&ResolveRequest::new(bbox, 2019, 2019), &ctx).unwrap();
        assert_eq!(urls, vec!["https://wsf/2019/bowtie.tif"]);
    }

    #[test]
    fn test_missing_grid_is_an_error() {
        let aux = AuxiliaryData::empty();
        let ctx = ResolveContext::new(&aux, &OfflineClient);
        let bbox = BoundingBox::new(1.0, 3.0, 1.0, 3.0).unwrap();
        assert!(Wsf.resolve(&ResolveRequest::new(bbox, 2019, 2019), &ctx).is_err());
    }
}
