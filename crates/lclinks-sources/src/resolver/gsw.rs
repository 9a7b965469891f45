use super::{ResolveContext, ResolveRequest, TileResolver};
use crate::Result;
use lclinks_geo::left_decade;

const GSW_BASE: &str =
    "https://jeodpp.jrc.ec.europa.eu/ftp/jrc-opendata/GSWE/YearlyClassification/LATEST/tiles";

/// JRC Global Surface Water yearly classification.
///
/// Tiles are 10° cells whose file names encode `4 * (70 - lat) / 10` and
/// `4 * (lon + 180) / 10` (floor division), each right-aligned in a
/// six-character field padded with `0` and followed by `0000`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gsw;

/// Build the URL of one GSW tile whose south-west corner is `(lat, lon)`.
pub fn gsw_tile_url(year: u16, lat: i32, lon: i32) -> String {
    let left = (4 * (70 - lat)).div_euclid(10);
    let right = (4 * (lon + 180)).div_euclid(10);
    // 2021 is the only release that separates the year with an underscore
    let sep = if year == 2021 { '_' } else { '-' };
    format!(
        "{GSW_BASE}/yearlyClassification{year}/yearlyClassification{year}{sep}{:0>6}0000-{:0>6}0000.tif",
        left.to_string(),
        right.to_string()
    )
}

impl TileResolver for Gsw {
    fn resolve(&self, request: &ResolveRequest, _ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let bbox = &request.bbox;
        let (start_lon, end_lon) = (left_decade(bbox.min_lon), left_decade(bbox.max_lon));
        let (start_lat, end_lat) = (left_decade(bbox.min_lat), left_decade(bbox.max_lat));

        let mut urls = Vec::new();
        for lon in (start_lon..=end_lon).step_by(10) {
            for lat in (start_lat..=end_lat).step_by(10) {
                urls.push(gsw_tile_url(request.year, lat, lon));
            }
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aux_data::AuxiliaryData;
    use crate::resolver::test_support::OfflineClient;
    use lclinks_geo::BoundingBox;

    #[test]
    fn test_tile_url_format() {
        assert_eq!(
            gsw_tile_url(2020, 0, 20),
            "https://jeodpp.jrc.ec.europa.eu/ftp/jrc-opendata/GSWE/YearlyClassification/LATEST/tiles/\
             yearlyClassification2020/yearlyClassification2020-0000280000-0000800000.tif"
        );
        assert!(gsw_tile_url(2021, 0, 20).contains("yearlyClassification2021_0000280000-0000800000.tif"));
    }

    #[test]
    fn test_negative_index_keeps_sign_inside_padding() {
        // 4 * (70 - 80) / 10 = -4
        assert!(gsw_tile_url(2000, 80, -180).ends_with("yearlyClassification2000-0000-40000-0000000000.tif"));
    }

    #[test]
    fn test_resolve_enumerates_lon_major() {
        let aux = AuxiliaryData::empty();
        let ctx = ResolveContext::new(&aux, &OfflineClient);
        let bbox = BoundingBox::new(3.5, 16.3, 27.0, 43.3).unwrap();
        let urls = Gsw.resolve(&ResolveRequest::new(bbox, 2020, 2020), &ctx).unwrap();

        // lon 20..=40, lat 0..=10
        assert_eq!(urls.len(), 6);
        assert_eq!(urls[0], gsw_tile_url(2020, 0, 20));
        assert_eq!(urls[1], gsw_tile_url(2020, 10, 20));
        assert_eq!(urls[5], gsw_tile_url(2020, 10, 40));
    }
}
