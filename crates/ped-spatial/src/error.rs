//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `ped-spatial`, all raised while validating geometry
/// at construction time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("polygon needs at least 3 distinct vertices, got {got}")]
    TooFewVertices { got: usize },

    #[error("polygon vertex {index} is not finite")]
    NonFiniteVertex { index: usize },

    #[error("polygon has zero area")]
    ZeroArea,

    #[error("polygon edges {first} and {second} intersect")]
    SelfIntersecting { first: usize, second: usize },

    #[error("obstacle {index} is not strictly inside the outer boundary")]
    ObstacleOutsideBoundary { index: usize },

    #[error("obstacles {first} and {second} overlap")]
    ObstaclesOverlap { first: usize, second: usize },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
