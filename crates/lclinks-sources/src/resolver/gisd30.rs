use super::{ResolveContext, ResolveRequest, TileResolver};
use crate::Result;

/// Longitude bands `(west, east)` and the region code of their archive.
pub const GISD30_BANDS: [((f64, f64), &str); 12] = [
    ((-180.0, -150.0), "W155_W180"),
    ((-150.0, -120.0), "W125_W150"),
    ((-120.0, -90.0), "W95_W120"),
    ((-90.0, -60.0), "W65_W90"),
    ((-60.0, -30.0), "W35_W60"),
    ((-30.0, 0.0), "W5_W30"),
    ((0.0, 35.0), "E0_E30"),
    ((35.0, 65.0), "E35_E60"),
    ((65.0, 95.0), "E65_E90"),
    ((95.0, 125.0), "E95_E120"),
    ((125.0, 155.0), "E125_E150"),
    ((155.0, 180.0), "E155_E175"),
];

/// Global impervious surface dynamics: one archive per longitude band.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gisd30;

impl TileResolver for Gisd30 {
    fn resolve(&self, request: &ResolveRequest, _ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let bbox = &request.bbox;
        let mut urls: Vec<String> = Vec::new();
        for ((west, east), code) in GISD30_BANDS {
            if west <= bbox.max_lon && east >= bbox.min_lon {
                let url = format!("https://zenodo.org/records/5220816/files/GISD30_1985-2020_{code}.rar?download=1");
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }
        Ok(urls)
    }
}
