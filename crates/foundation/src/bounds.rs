use crate::coord::Coordinate;

/// Axis-aligned bounding box in (longitude, latitude) space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Bounds of a coordinate list. Returns `None` for an empty list or
    /// when any coordinate is not finite.
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut out: Option<Self> = None;
        for c in coords {
            if !c.is_finite() {
                return None;
            }
            let p = [c.x(), c.y()];
            out = Some(match out {
                None => Aabb2::new(p, p),
                Some(b) => Aabb2::new(
                    [b.min[0].min(p[0]), b.min[1].min(p[1])],
                    [b.max[0].max(p[0]), b.max[1].max(p[1])],
                ),
            });
        }
        out
    }

    /// Inclusive containment test.
    pub fn contains(&self, c: &Coordinate) -> bool {
        c.x() >= self.min[0] && c.x() <= self.max[0] && c.y() >= self.min[1] && c.y() <= self.max[1]
    }
}
