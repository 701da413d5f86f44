use geo::{Area, Geometry, LineString, Polygon};

/// Pick the single exterior ring that represents a region.
///
/// A `MultiPolygon` keeps only its largest part by exterior area, so
/// offshore islands are dropped. Ties go to the first part. Geometries
/// that are not polygonal yield an empty ring.
pub fn select_ring(geometry: &Geometry<f64>) -> LineString<f64> {
    match geometry {
        Geometry::Polygon(p) => p.exterior().clone(),
        Geometry::MultiPolygon(mp) => largest_exterior(&mp.0).unwrap_or_else(empty_ring),
        _ => empty_ring(),
    }
}

fn largest_exterior(polygons: &[Polygon<f64>]) -> Option<LineString<f64>> {
    let mut best: Option<(&Polygon<f64>, f64)> = None;

    for polygon in polygons {
        let area = exterior_area(polygon);
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((polygon, area)),
        }
    }

    best.map(|(p, _)| p.exterior().clone())
}

/// Planar area enclosed by the exterior ring, ignoring holes
pub fn exterior_area(polygon: &Polygon<f64>) -> f64 {
    Polygon::new(polygon.exterior().clone(), vec![]).unsigned_area()
}

fn empty_ring() -> LineString<f64> {
    LineString::new(vec![])
}
