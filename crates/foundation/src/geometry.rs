use crate::bounds::Aabb2;
use crate::coord::Coordinate;

/// Polygon as a list of rings; the first ring is the exterior boundary and
/// any further rings are holes. Rings may or may not repeat their first
/// vertex at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Vec<Coordinate>>,
}

impl Polygon {
    pub fn new(rings: Vec<Vec<Coordinate>>) -> Self {
        Self { rings }
    }

    pub fn from_exterior(exterior: Vec<Coordinate>) -> Self {
        Self {
            rings: vec![exterior],
        }
    }

    /// Axis-aligned rectangle spanning two opposite corners.
    pub fn rectangle(a: Coordinate, b: Coordinate) -> Self {
        let (w, e) = (a.longitude.min(b.longitude), a.longitude.max(b.longitude));
        let (s, n) = (a.latitude.min(b.latitude), a.latitude.max(b.latitude));
        Self::from_exterior(vec![
            Coordinate::new(s, w),
            Coordinate::new(s, e),
            Coordinate::new(n, e),
            Coordinate::new(n, w),
            Coordinate::new(s, w),
        ])
    }

    pub fn exterior(&self) -> Option<&[Coordinate]> {
        self.rings.first().map(|r| r.as_slice())
    }

    pub fn interiors(&self) -> &[Vec<Coordinate>] {
        self.rings.get(1..).unwrap_or(&[])
    }

    /// True when there is no exterior ring with at least three distinct
    /// positions.
    pub fn is_empty(&self) -> bool {
        let Some(ext) = self.exterior() else {
            return true;
        };
        let mut distinct: Vec<Coordinate> = Vec::with_capacity(3);
        for p in open_ring(ext) {
            if !distinct.contains(p) {
                distinct.push(*p);
                if distinct.len() == 3 {
                    return false;
                }
            }
        }
        true
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        Aabb2::from_coords(self.exterior()?)
    }

    pub fn is_finite(&self) -> bool {
        self.rings.iter().flatten().all(Coordinate::is_finite)
    }
}

/// Returns `ring` without its closing duplicate vertex, if present.
pub fn open_ring(ring: &[Coordinate]) -> &[Coordinate] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() >= 2 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Returns a copy of `ring` that ends with its first vertex.
pub fn closed_ring(ring: &[Coordinate]) -> Vec<Coordinate> {
    let mut out = open_ring(ring).to_vec();
    if let Some(first) = out.first().copied() {
        out.push(first);
    }
    out
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    Polygon,
}

/// Geometry handed across the boundary with the map and drawing tools.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    Polygon(Polygon),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(p) => Some(p),
            Geometry::Point(_) => None,
        }
    }
}

impl From<Coordinate> for Geometry {
    fn from(c: Coordinate) -> Self {
        Geometry::Point(c)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Geometry::Polygon(p)
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, GeometryKind, Polygon, closed_ring, open_ring};
    use crate::coord::Coordinate;

    fn c(lon: f64, lat: f64) -> Coordinate {
        Coordinate::from_lon_lat(lon, lat)
    }

    #[test]
    fn rectangle_normalizes_corners() {
        let p = Polygon::rectangle(c(2.0, 3.0), c(0.0, 1.0));
        let ext = p.exterior().expect("exterior");
        assert_eq!(ext.len(), 5);
        assert_eq!(ext[0], c(0.0, 1.0));
        assert_eq!(ext[2], c(2.0, 3.0));
        assert_eq!(ext[4], ext[0]);
    }

    #[test]
    fn open_and_closed_rings() {
        let ring = vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 0.0)];
        assert_eq!(open_ring(&ring).len(), 3);
        assert_eq!(closed_ring(&ring), ring);
        assert_eq!(closed_ring(open_ring(&ring)), ring);
        assert!(closed_ring(&[]).is_empty());
    }

    #[test]
    fn empty_polygons() {
        assert!(Polygon::default().is_empty());
        assert!(Polygon::from_exterior(vec![c(0.0, 0.0), c(1.0, 1.0), c(0.0, 0.0)]).is_empty());
        assert!(!Polygon::rectangle(c(0.0, 0.0), c(1.0, 1.0)).is_empty());
        assert!(Polygon::from_exterior(vec![c(2.0, 2.0); 4]).is_empty());
        assert!(
            Polygon::from_exterior(vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)])
                .is_empty()
        );
    }

    #[test]
    fn geometry_kind() {
        assert_eq!(Geometry::from(c(0.0, 0.0)).kind(), GeometryKind::Point);
        let poly: Geometry = Polygon::rectangle(c(0.0, 0.0), c(1.0, 1.0)).into();
        assert_eq!(poly.kind(), GeometryKind::Polygon);
        assert!(poly.as_polygon().is_some());
    }
}
