//! Tile resolvers.
//!
//! Each source maps a bounding box onto its own addressing scheme. A
//! resolver receives the request (box and years) plus the shared read-only
//! context, and returns the matching download URLs in enumeration order.

mod esri;
mod from_glc;
mod gfc;
mod ghs;
mod gisd30;
mod glc_fcs30d;
mod gsw;
mod treecover;
mod wsf;

pub use esri::{esri_query_url, Esri, ESRI_QUERY_BASE};
pub use from_glc::{from_glc_2015_tile_name, FromGlc2010, FromGlc2015, FromGlc2017};
pub use gfc::{Gfc, GfcFcs30d};
pub use ghs::GhsBuiltUp;
pub use gisd30::{Gisd30, GISD30_BANDS};
pub use glc_fcs30d::GlcFcs30dStrips;
pub use gsw::{gsw_tile_url, Gsw};
pub use treecover::TreeCover2000;
pub use wsf::Wsf;

use crate::aux_data::AuxiliaryData;
use crate::http::HttpClient;
use crate::Result;
use lclinks_geo::{BoundingBox, GridAxis};
use tracing::debug;

/// What to resolve: the AOI box and the already-snapped years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveRequest {
    /// AOI bounding box.
    pub bbox: BoundingBox,
    /// Year after snapping onto the source's published years.
    pub year: u16,
    /// Year of the map file serving `year`.
    pub map_year: u16,
}

impl ResolveRequest {
    /// Create a request.
    pub fn new(bbox: BoundingBox, year: u16, map_year: u16) -> Self {
        Self { bbox, year, map_year }
    }
}

/// Shared inputs available to every resolver.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Preloaded auxiliary files.
    pub aux: &'a AuxiliaryData,
    /// Client for remote collaborators.
    pub http: &'a dyn HttpClient,
}

impl<'a> ResolveContext<'a> {
    /// Create a context.
    pub fn new(aux: &'a AuxiliaryData, http: &'a dyn HttpClient) -> Self {
        Self { aux, http }
    }
}

/// Maps a request onto a source's download URLs.
pub trait TileResolver: Send + Sync {
    /// Return the matching URLs. An empty list is a valid answer.
    fn resolve(&self, request: &ResolveRequest, ctx: &ResolveContext<'_>) -> Result<Vec<String>>;
}

// ============================================================================
// 10° grid helpers
// ============================================================================

/// Cells of a 10° grid covering `bbox`, named by their north-west corner.
///
/// Rows run from the snapped north edge down to (excluding) the snapped
/// south edge; columns from the snapped west edge up to (excluding) the
/// snapped east edge.
pub(crate) fn ten_degree_cells(bbox: &BoundingBox, lat_axis: GridAxis, label: &str) -> Vec<(i32, i32)> {
    let (lat_min, lat_max) = lat_axis.bounds(bbox.min_lat, bbox.max_lat);
    let (lon_min, lon_max) = GridAxis::LON_10.bounds(bbox.min_lon, bbox.max_lon);
    debug!(
        grid = label,
        lon_min, lat_min, lon_max, lat_max, "adjusted boundary"
    );

    let mut cells = Vec::new();
    let mut lat = lat_max;
    while lat > lat_min {
        for lon in (lon_min..lon_max).step_by(GridAxis::LON_10.stride()) {
            cells.push((lat, lon));
        }
        lat -= lat_axis.stride() as i32;
    }
    cells
}

/// `10N`, `00N`, `20S`.
pub(crate) fn lat_label(lat: i32) -> String {
    format!("{:02}{}", lat.unsigned_abs(), if lat >= 0 { 'N' } else { 'S' })
}

/// `030E`, `000E`, `120W`.
pub(crate) fn lon_label(lon: i32) -> String {
    format!("{:03}{}", lon.unsigned_abs(), if lon >= 0 { 'E' } else { 'W' })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::http::HttpClient;
    use crate::{Result, SourceError};

    /// Client for resolvers that must not touch the network.
    pub struct OfflineClient;

    impl HttpClient for OfflineClient {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            Err(SourceError::RemoteQueryFailed {
                service: "offline",
                reason: format!("unexpected GET {url}"),
            })
        }

        fn post_json(&self, url: &str, _headers: &[(&str, &str)], _json_body: &str) -> Result<Vec<u8>> {
            Err(SourceError::RemoteQueryFailed {
                service: "offline",
                reason: format!("unexpected POST {url}"),
            })
        }
    }
}
