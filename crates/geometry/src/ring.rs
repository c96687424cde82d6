use foundation::math::{destination, wrap_longitude};
use foundation::{Coordinate, Polygon, closed_ring};
use serde::{Deserialize, Serialize};

/// A vertex of the reference ring. Immutable once generated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReferencePoint(Coordinate);

impl ReferencePoint {
    pub fn new(coordinate: Coordinate) -> Self {
        Self(coordinate)
    }

    pub fn coordinate(&self) -> Coordinate {
        self.0
    }
}

/// Radius of the reference ring.
///
/// `Degrees` places vertices in the same planar (lon, lat) space the
/// containment test uses. `Kilometers` walks geodesic distances from the
/// center, which is what the interactive map shows.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingRadius {
    Degrees(f64),
    Kilometers(f64),
}

/// Reference ring around a center point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRing {
    pub center: Coordinate,
    pub vertices: Vec<ReferencePoint>,
}

impl ReferenceRing {
    pub fn generate(center: Coordinate, radius: RingRadius, count: usize) -> Self {
        let vertices = match radius {
            RingRadius::Degrees(r) => generate_ring(center, r, count),
            RingRadius::Kilometers(km) => geodesic_ring(center, km, count),
        };
        Self { center, vertices }
    }

    /// Closed outline through the vertices, in generation order.
    pub fn outline(&self) -> Polygon {
        ring_polygon(&self.vertices)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Minimum number of ring vertices; smaller counts are raised to this.
pub const MIN_RING_VERTICES: usize = 3;

/// Bearing (degrees clockwise from north) of vertex `i` out of `count`.
///
/// Vertices step counter-clockwise starting due north.
fn vertex_bearing(i: usize, count: usize) -> f64 {
    -360.0 * i as f64 / count as f64
}

/// `count` points evenly spaced on a planar circle of `radius` degrees
/// around `center`. The center itself is not included.
///
/// Latitudes past a pole are clamped to it and longitudes are wrapped into
/// [-180, 180], so every vertex is a valid coordinate.
pub fn generate_ring(center: Coordinate, radius: f64, count: usize) -> Vec<ReferencePoint> {
    let count = count.max(MIN_RING_VERTICES);
    (0..count)
        .map(|i| {
            let b = vertex_bearing(i, count).to_radians();
            ReferencePoint(Coordinate::new(
                (center.latitude + radius * b.cos()).clamp(-90.0, 90.0),
                wrap_longitude(center.longitude + radius * b.sin()),
            ))
        })
        .collect()
}

/// `count` points at geodesic distance `radius_km` from `center`, on evenly
/// spaced bearings. The closing duplicate vertex is not emitted.
pub fn geodesic_ring(center: Coordinate, radius_km: f64, count: usize) -> Vec<ReferencePoint> {
    let count = count.max(MIN_RING_VERTICES);
    (0..count)
        .map(|i| ReferencePoint(destination(center, radius_km, vertex_bearing(i, count))))
        .collect()
}

pub fn ring_polygon(vertices: &[ReferencePoint]) -> Polygon {
    let coords: Vec<Coordinate> = vertices.iter().map(ReferencePoint::coordinate).collect();
    Polygon::from_exterior(closed_ring(&coords))
}

#[cfg(test)]
mod tests {
    use super::{ReferenceRing, RingRadius, generate_ring, geodesic_ring};
    use foundation::Coordinate;
    use foundation::math::haversine_km;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn planar_ring_is_evenly_spaced_on_radius() {
        let center = Coordinate::new(10.0, 20.0);
        let ring = generate_ring(center, 0.5, 6);
        assert_eq!(ring.len(), 6);
        for p in &ring {
            let c = p.coordinate();
            let d = ((c.latitude - 10.0).powi(2) + (c.longitude - 20.0).powi(2)).sqrt();
            assert_close(d, 0.5, 1e-12);
            assert_ne!(c, center);
        }
        // First vertex is due north.
        assert_close(ring[0].coordinate().longitude, 20.0, 1e-12);
        assert_close(ring[0].coordinate().latitude, 10.5, 1e-12);
        // Neighbouring vertices of a hexagon are one radius apart.
        let a = ring[0].coordinate();
        let b = ring[1].coordinate();
        let side = ((a.latitude - b.latitude).powi(2) + (a.longitude - b.longitude).powi(2)).sqrt();
        assert_close(side, 0.5, 1e-12);
    }

    #[test]
    fn ring_is_deterministic() {
        let center = Coordinate::new(28.7041, 77.1025);
        assert_eq!(geodesic_ring(center, 10.0, 6), geodesic_ring(center, 10.0, 6));
        assert_eq!(generate_ring(center, 0.1, 6), generate_ring(center, 0.1, 6));
    }

    #[test]
    fn geodesic_ring_vertices_are_radius_away() {
        let center = Coordinate::new(28.7041, 77.1025);
        let ring = geodesic_ring(center, 10.0, 6);
        assert_eq!(ring.len(), 6);
        for p in ring {
            assert_close(haversine_km(center, p.coordinate()), 10.0, 1e-6);
        }
    }

    #[test]
    fn planar_ring_stays_in_range_near_pole_and_antimeridian() {
        let ring = generate_ring(Coordinate::new(89.999, 179.999), 0.01, 6);
        assert_eq!(ring.len(), 6);
        for p in &ring {
            let c = p.coordinate();
            assert!(c.validate().is_ok(), "out of range vertex {c:?}");
        }
        // North vertex sits on the pole, the eastern ones wrap to the far side.
        assert_close(ring[0].coordinate().latitude, 90.0, 1e-12);
        assert!(ring[4].coordinate().longitude < -179.99);

        let south = generate_ring(Coordinate::new(-89.995, -179.995), 0.01, 6);
        assert!(south.iter().all(|p| p.coordinate().validate().is_ok()));
    }

    #[test]
    fn count_below_three_is_raised() {
        assert_eq!(generate_ring(Coordinate::new(0.0, 0.0), 1.0, 1).len(), 3);
    }

    #[test]
    fn outline_is_closed() {
        let ring = ReferenceRing::generate(Coordinate::new(0.0, 0.0), RingRadius::Degrees(1.0), 6);
        let outline = ring.outline();
        let ext = outline.exterior().expect("exterior");
        assert_eq!(ext.len(), 7);
        assert_eq!(ext.first(), ext.last());
        assert!(!outline.is_empty());
    }
}
