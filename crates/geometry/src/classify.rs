//! Planar point-in-polygon classification.
//!
//! Containment is evaluated in (longitude, latitude) space, not on the
//! sphere. Points on a polygon boundary are outside.

use foundation::{Coordinate, Polygon, open_ring};
use geo::{Contains, Coord, LineString, Point};
use tracing::debug;

use crate::ring::ReferencePoint;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Outside,
    /// The polygon could not be evaluated (non-finite coordinates). Callers
    /// treat this as outside.
    Indeterminate,
}

/// Full containment result for `point` against `shape`.
pub fn containment(shape: &Polygon, point: Coordinate) -> Containment {
    if !point.is_finite() || !shape.is_finite() {
        return Containment::Indeterminate;
    }
    if shape.is_empty() {
        return Containment::Outside;
    }
    // Cheap reject before building the geo polygon.
    match shape.bounds() {
        Some(b) if b.contains(&point) => {}
        _ => return Containment::Outside,
    }

    let poly = to_geo_polygon(shape);
    if poly.contains(&Point::new(point.x(), point.y())) {
        Containment::Inside
    } else {
        Containment::Outside
    }
}

/// True iff `point` lies strictly inside `shape`.
///
/// Boundary points, empty rings and malformed polygons all yield `false`.
pub fn contains(shape: &Polygon, point: Coordinate) -> bool {
    match containment(shape, point) {
        Containment::Inside => true,
        Containment::Outside => false,
        Containment::Indeterminate => {
            debug!("containment indeterminate for point {point:?}; treating as outside");
            false
        }
    }
}

/// True iff at least one reference point is contained in `shape`.
pub fn classify_shape(shape: &Polygon, refs: &[ReferencePoint]) -> bool {
    refs.iter().any(|r| contains(shape, r.coordinate()))
}

fn to_geo_polygon(shape: &Polygon) -> geo::Polygon<f64> {
    let mut rings = shape.rings.iter().map(|r| to_line_string(r));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    geo::Polygon::new(exterior, rings.collect())
}

fn to_line_string(ring: &[Coordinate]) -> LineString<f64> {
    LineString::new(
        open_ring(ring)
            .iter()
            .map(|c| Coord { x: c.x(), y: c.y() })
            .collect(),
    )
}
