//! Area of interest parsed from user-supplied GeoJSON.

use crate::{BoundingBox, GeoError, Result};
use geo::BoundingRect;
use geojson::GeoJson;

/// The user's area of interest.
///
/// Holds the parsed geometry, its enclosing [`BoundingBox`] and the GeoJSON
/// text it came from. Read-only for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Aoi {
    geometry: geo::Geometry<f64>,
    bbox: BoundingBox,
    source: String,
}

impl Aoi {
    /// Parse an AOI from GeoJSON text.
    ///
    /// Accepts a `Feature`, a `FeatureCollection` (its first feature is used)
    /// or a bare `Geometry`.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| GeoError::InvalidGeometry(e.to_string()))?;

        let geometry = match geojson {
            GeoJson::Geometry(geometry) => geometry,
            GeoJson::Feature(feature) => feature
                .geometry
                .ok_or_else(|| GeoError::InvalidGeometry("feature has no geometry".into()))?,
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .next()
                .ok_or_else(|| GeoError::InvalidGeometry("feature collection is empty".into()))?
                .geometry
                .ok_or_else(|| GeoError::InvalidGeometry("first feature has no geometry".into()))?,
        };

        let geometry = geo::Geometry::<f64>::try_from(geometry)
            .map_err(|e| GeoError::InvalidGeometry(e.to_string()))?;

        let mut aoi = Self::from_geometry(geometry)?;
        aoi.source = text.to_string();
        Ok(aoi)
    }

    /// Build an AOI from an already-parsed geometry.
    pub fn from_geometry(geometry: geo::Geometry<f64>) -> Result<Self> {
        let rect = geometry
            .bounding_rect()
            .ok_or_else(|| GeoError::InvalidGeometry("geometry has no coordinates".into()))?;

        let bbox = BoundingBox::new(rect.min().y, rect.max().y, rect.min().x, rect.max().x)?;
        let source = geojson::Geometry::new(geojson::Value::from(&geometry)).to_string();

        Ok(Self {
            geometry,
            bbox,
            source,
        })
    }

    /// Build a rectangular AOI directly from a bounding box.
    pub fn from_bbox(bbox: BoundingBox) -> Self {
        let geometry = geo::Geometry::Polygon(bbox.to_polygon());
        let source = geojson::Geometry::new(geojson::Value::from(&geometry)).to_string();
        Self {
            geometry,
            bbox,
            source,
        }
    }

    /// The enclosing rectangle of all AOI vertices.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// The AOI geometry.
    pub fn geometry(&self) -> &geo::Geometry<f64> {
        &self.geometry
    }

    /// The AOI re-serialized as indented JSON, for saving next to the output.
    pub fn to_pretty_json(&self) -> Result<String> {
        let value: serde_json::Value = serde_json::from_str(&self.source)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FEATURE_COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[27.0, 3.5], [43.3, 3.5], [43.3, 16.3], [27.0, 16.3], [27.0, 3.5]]]
            }
        }]
    }"#;

    #[test]
    fn test_feature_collection_uses_first_feature() {
        let aoi = Aoi::from_geojson_str(FEATURE_COLLECTION).unwrap();
        let bbox = aoi.bbox();
        assert_relative_eq!(bbox.min_lat, 3.5);
        assert_relative_eq!(bbox.max_lat, 16.3);
        assert_relative_eq!(bbox.min_lon, 27.0);
        assert_relative_eq!(bbox.max_lon, 43.3);
    }

    #[test]
    fn test_bare_geometry_and_feature() {
        let geometry = r#"{"type": "Polygon", "coordinates": [[[-1.0, 2.0], [1.0, 2.0], [0.5, 5.0], [-1.0, 2.0]]]}"#;
        let aoi = Aoi::from_geojson_str(geometry).unwrap();
        assert_relative_eq!(aoi.bbox().max_lat, 5.0);
        assert_relative_eq!(aoi.bbox().min_lon, -1.0);

        let feature = format!(r#"{{"type": "Feature", "properties": null, "geometry": {}}}"#, geometry);
        let aoi = Aoi::from_geojson_str(&feature).unwrap();
        assert_relative_eq!(aoi.bbox().max_lon, 1.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            Aoi::from_geojson_str("not json"),
            Err(GeoError::InvalidGeometry(_))
        ));
        assert!(matches!(
            Aoi::from_geojson_str(r#"{"type": "FeatureCollection", "features": []}"#),
            Err(GeoError::InvalidGeometry(_))
        ));
        assert!(matches!(
            Aoi::from_geojson_str(r#"{"type": "Feature", "properties": {}, "geometry": null}"#),
            Err(GeoError::InvalidGeometry(_))
        ));
        assert!(matches!(
            Aoi::from_geojson_str(r#"{"type": "Polygon", "coordinates": [[]]}"#),
            Err(GeoError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_pretty_json_roundtrips_source() {
        let aoi = Aoi::from_geojson_str(FEATURE_COLLECTION).unwrap();
        let pretty = aoi.to_pretty_json().unwrap();
        assert!(pretty.contains("\"FeatureCollection\""));
        assert!(pretty.contains('\n'));
    }
}
