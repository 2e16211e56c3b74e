//! `ped-spatial` — walkable-area geometry and spatial indexing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`segment`]   | `LineSegment` — closest point, distance, intersection          |
//! | [`polygon`]   | `Polygon` — validated simple ring, containment, area, centroid |
//! | [`geometry`]  | `Geometry` (outer boundary + obstacles, wall R-tree), `GeometryBuilder` |
//! | [`neighbors`] | `NeighborIndex` (per-iteration R-tree of agent positions)      |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on value types.            |

pub mod error;
pub mod geometry;
pub mod neighbors;
pub mod polygon;
pub mod segment;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use geometry::{Geometry, GeometryBuilder};
pub use neighbors::{NeighborIndex, brute_force_within};
pub use polygon::Polygon;
pub use segment::LineSegment;
