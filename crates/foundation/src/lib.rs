pub mod bounds;
pub mod coord;
pub mod geometry;
pub mod ids;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use coord::*;
pub use geometry::*;
pub use ids::*;
