use super::{ResolveContext, ResolveRequest, TileResolver};
use crate::{Result, SourceError};
use lclinks_geo::BoundingBox;
use serde::Deserialize;
use tracing::{debug, warn};

/// LULC footprint feature service query endpoint.
pub const ESRI_QUERY_BASE: &str =
    "https://services.arcgis.com/P3ePLMYs2RVChkJx/ArcGIS/rest/services/LULC_Footprints/FeatureServer/0/query";

const ESRI_BLOB_BASE: &str = "https://lulctimeseries.blob.core.windows.net/lulctimeseriesv003";

/// Query URL asking for every footprint intersecting `bbox`.
pub fn esri_query_url(bbox: &BoundingBox) -> String {
    let BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    } = *bbox;
    format!(
        "{ESRI_QUERY_BASE}?f=json&geometry=%7B%22rings%22:[[[{min_lon},{min_lat}],[{min_lon},{max_lat}],\
         [{max_lon},{max_lat}],[{max_lon},{min_lat}],[{min_lon},{min_lat}]]],\
         %22spatialReference%22:%20%7B%20%22wkid%22:%204326%20%7D%7D&where=1%3D1\
         &outFields=*&returnGeometry=false&returnQueryGeometry=true\
         &spatialRel=esriSpatialRelIntersects&geometryType=esriGeometryPolygon"
    )
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    features: Vec<QueryFeature>,
}

#[derive(Debug, Deserialize)]
struct QueryFeature {
    attributes: FeatureAttributes,
}

#[derive(Debug, Deserialize)]
struct FeatureAttributes {
    #[serde(rename = "ImageName", default)]
    image_name: Option<String>,
}

/// Esri 10 m land use / land cover, located through the footprint service.
///
/// A failed query is logged and yields no links.
#[derive(Debug, Clone, Copy, Default)]
pub struct Esri;

impl Esri {
    fn image_names(bbox: &BoundingBox, ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let body = ctx.http.get(&esri_query_url(bbox))?;
        let response: QueryResponse =
            serde_json::from_slice(&body).map_err(|e| SourceError::RemoteQueryFailed {
                service: "ESRI footprints",
                reason: e.to_string(),
            })?;
        let total = response.features.len();
        let names: Vec<String> = response
            .features
            .into_iter()
            .filter_map(|f| f.attributes.image_name)
            .collect();
        if names.len() < total {
            debug!(source = "ESRI", skipped = total - names.len(), "features without ImageName");
        }
        Ok(names)
    }
}

impl TileResolver for Esri {
    fn resolve(&self, request: &ResolveRequest, ctx: &ResolveContext<'_>) -> Result<Vec<String>> {
        let from = request.map_year;
        let Some(to) = from.checked_add(1) else {
            return Err(SourceError::YearOutOfRange {
                source_name: "ESRI",
                year: from,
            });
        };

        let names = match Self::image_names(&request.bbox, ctx) {
            Ok(names) => names,
            Err(e) => {
                warn!(source = "ESRI", year = request.year, error = %e, "failed to query ESRI service");
                return Ok(Vec::new());
            }
        };
        debug!(source = "ESRI", footprints = names.len(), "footprint query returned");

        Ok(names
            .into_iter()
            .map(|name| format!("{ESRI_BLOB_BASE}/lc{from}/{name}_{from}0101-{to}0101.tif"))
            .collect())
    }
}
