use super::{ResolveContext, ResolveRequest, TileResolver};
use crate::Result;
use lclinks_geo::GridAxis;

fn strip_label(lon: i32) -> String {
    format!("{}{}", if lon >= 0 { 'E' } else { 'W' }, lon.unsigned_abs())
}

/// GLC_FCS30D longitude-strip mirror.
///
/// Every 10° step of the snapped longitude range (inclusive on both ends)
/// names one zip. The strip pair `(lon, lon + 5)` is written with the
/// smaller absolute value first. Latitude is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlcFcs30dStrips;

impl TileResolver for GlcFcs30dStrips {
    fn resolve(&self, request: &ResolveRequest, _ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let (lon_min, lon_max) = GridAxis::LON_10.bounds(request.bbox.min_lon, request.bbox.max_lon);

        Ok((lon_min..=lon_max)
            .step_by(GridAxis::LON_10.stride())
            .map(|lon| {
                let (first, second) = if lon.abs() < (lon + 5).abs() {
                    (lon, lon + 5)
                } else {
                    (lon + 5, lon)
                };
                format!(
                    "https://zenodo.org/records/8239305/files/GLC_FCS30D_19852022maps_{}-{}.zip?download=1",
                    strip_label(first),
                    strip_label(second)
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aux_data::AuxiliaryData;
    use crate::resolver::test_support::OfflineClient;
    use lclinks_geo::BoundingBox;

    #[test]
    fn test_strip_pairs() {
        let aux = AuxiliaryData::empty();
        let ctx = ResolveContext::new(&aux, &OfflineClient);
        let bbox = BoundingBox::new(-80.0, 80.0, -12.0, 3.0).unwrap();
        let urls = GlcFcs30dStrips.resolve(&ResolveRequest::new(bbox, 2022, 2022), &ctx).unwrap();

        // lon snapped to [-20, 10]
        let names: Vec<_> = urls
            .iter()
            .map(|u| u.trim_start_matches("https://zenodo.org/records/8239305/files/GLC_FCS30D_19852022maps_"))
            .collect();
        assert_eq!(
            names,
            vec![
                "W15-W20.zip?download=1",
                "W5-W10.zip?download=1",
                "E0-E5.zip?download=1",
                "E10-E15.zip?download=1",
            ]
        );
    }
}
