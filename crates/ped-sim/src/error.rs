use thiserror::Error;

use ped_core::{AgentId, CoreError};
use ped_journey::JourneyError;
use ped_model::ModelError;
use ped_spatial::SpatialError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("position ({x}, {y}) is outside the walkable area")]
    OutsideGeometry { x: f64, y: f64 },

    #[error("invalid agent: {0}")]
    InvalidAgent(String),

    /// A force model produced NaN or infinity.  The step was aborted and the
    /// simulation halted in its pre-step state.
    #[error("agent {agent}: computed {what} is not finite; simulation halted")]
    NonFinite { agent: AgentId, what: &'static str },

    #[error("simulation halted by an earlier numerical failure")]
    Halted,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Journey(#[from] JourneyError),
}

pub type SimResult<T> = Result<T, SimError>;
