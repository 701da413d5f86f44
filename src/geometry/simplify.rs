use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Geometry, Line, LineString, MultiPolygon, Polygon, Simplify};
use log::debug;
use thiserror::Error;

/// Default simplification tolerance in degrees (roughly 1km at ASGS latitudes)
pub const DEFAULT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Error, PartialEq)]
pub enum SimplifyError {
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
    #[error("ring contains a non-finite coordinate")]
    NonFinite,
    #[error("simplified ring collapsed to {0} points")]
    Collapsed(usize),
    #[error("simplified ring self-intersects between segments {0} and {1}")]
    SelfIntersection(usize, usize),
}

/// Douglas-Peucker simplification of a single ring, rejecting any result
/// that is no longer a simple ring.
pub fn simplify_ring(ring: &LineString<f64>, tolerance: f64) -> Result<LineString<f64>, SimplifyError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(SimplifyError::InvalidTolerance(tolerance));
    }
    if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(SimplifyError::NonFinite);
    }

    let closed = ring.is_closed();
    let min_len = if closed { 4 } else { 3 };
    if ring.0.len() <= min_len {
        return Ok(ring.clone());
    }

    let simplified = ring.simplify(&tolerance);
    if simplified.0.len() < min_len {
        return Err(SimplifyError::Collapsed(simplified.0.len()));
    }

    // nothing dropped means the input comes back as-is
    if simplified.0.len() == ring.0.len() {
        return Ok(simplified);
    }

    check_simple(&simplified)?;
    Ok(simplified)
}

/// Simplify a ring, keeping the original whenever simplification fails
pub fn simplify_ring_or_original(ring: &LineString<f64>, tolerance: f64) -> LineString<f64> {
    match simplify_ring(ring, tolerance) {
        Ok(simplified) => simplified,
        Err(e) => {
            debug!("simplification skipped ({} points): {}", ring.0.len(), e);
            ring.clone()
        }
    }
}

fn simplify_polygon(polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64> {
    let exterior = simplify_ring_or_original(polygon.exterior(), tolerance);
    let interiors = polygon
        .interiors()
        .iter()
        .map(|hole| simplify_ring_or_original(hole, tolerance))
        .collect();
    Polygon::new(exterior, interiors)
}

/// Simplify every ring of a polygonal geometry.
///
/// Other geometry types are returned unchanged; ring selection rejects
/// them later.
pub fn simplify_geometry(geometry: &Geometry<f64>, tolerance: f64) -> Geometry<f64> {
    match geometry {
        Geometry::Polygon(p) => Geometry::Polygon(simplify_polygon(p, tolerance)),
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon::new(
            mp.0.iter().map(|p| simplify_polygon(p, tolerance)).collect(),
        )),
        other => other.clone(),
    }
}

/// Fail if any two non-adjacent segments touch, or adjacent segments overlap
fn check_simple(ring: &LineString<f64>) -> Result<(), SimplifyError> {
    // zero-length segments come from repeated points and carry no shape
    let segments: Vec<Line<f64>> = ring.lines().filter(|l| l.start != l.end).collect();
    let n = segments.len();
    let closed = ring.is_closed();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (closed && i == 0 && j == n - 1);
            match line_intersection(segments[i], segments[j]) {
                None => {}
                Some(LineIntersection::SinglePoint { intersection, .. }) if adjacent => {
                    if !is_shared_endpoint(intersection, &segments[i], &segments[j]) {
                        return Err(SimplifyError::SelfIntersection(i, j));
                    }
                }
                Some(_) => return Err(SimplifyError::SelfIntersection(i, j)),
            }
        }
    }

    Ok(())
}

fn is_shared_endpoint(point: Coord<f64>, a: &Line<f64>, b: &Line<f64>) -> bool {
    (point == a.end && point == b.start) || (point == a.start && point == b.end)
}
