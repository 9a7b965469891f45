//! Footprint filtering against an AOI box.

use crate::BoundingBox;
use geo::{Area, Geometry, Intersects, LineString, Polygon};

/// Closed-set intersection between a box and an arbitrary geometry.
///
/// Touching boundaries count as a match, the same as for rectangles in
/// [`BoundingBox::intersects`].
pub fn intersects_geometry(bbox: &BoundingBox, geometry: &Geometry<f64>) -> bool {
    geometry.intersects(&bbox.to_polygon())
}

/// Structural validity check for index footprints.
///
/// Rejects collapsed rings, open rings, zero-area polygons and non-finite
/// vertices. Only polygonal geometries count as footprints.
pub fn is_valid_polygonal(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Polygon(polygon) => is_valid_polygon(polygon),
        Geometry::MultiPolygon(multi) => {
            !multi.0.is_empty() && multi.0.iter().all(is_valid_polygon)
        }
        Geometry::Rect(rect) => rect.unsigned_area() > 0.0,
        _ => false,
    }
}

fn is_valid_polygon(polygon: &Polygon<f64>) -> bool {
    is_valid_ring(polygon.exterior())
        && polygon.interiors().iter().all(is_valid_ring)
        && polygon.unsigned_area() > 0.0
}

fn is_valid_ring(ring: &LineString<f64>) -> bool {
    ring.0.len() >= 4
        && ring.is_closed()
        && ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon, Point};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]
    }

    #[test]
    fn test_intersects_touching_edge() {
        let bbox = BoundingBox::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let touching = Geometry::Polygon(square(10.0, 0.0, 5.0));
        let apart = Geometry::Polygon(square(11.0, 0.0, 5.0));
        let inside = Geometry::Polygon(square(2.0, 2.0, 1.0));

        assert!(intersects_geometry(&bbox, &touching));
        assert!(!intersects_geometry(&bbox, &apart));
        assert!(intersects_geometry(&bbox, &inside));
    }

    #[test]
    fn test_validity() {
        assert!(is_valid_polygonal(&Geometry::Polygon(square(0.0, 0.0, 1.0))));
        assert!(is_valid_polygonal(&Geometry::MultiPolygon(MultiPolygon(vec![
            square(0.0, 0.0, 1.0),
            square(5.0, 5.0, 1.0),
        ]))));

        let flat = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 0.0, y: 0.0)];
        assert!(!is_valid_polygonal(&Geometry::Polygon(flat)));

        let nan = polygon![(x: 0.0, y: 0.0), (x: f64::NAN, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)];
        assert!(!is_valid_polygonal(&Geometry::Polygon(nan)));

        assert!(!is_valid_polygonal(&Geometry::Point(Point::new(0.0, 0.0))));
        assert!(!is_valid_polygonal(&Geometry::MultiPolygon(MultiPolygon(vec![]))));
    }
}
