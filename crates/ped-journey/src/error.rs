use thiserror::Error;

use ped_core::{JourneyId, StageId};
use ped_spatial::SpatialError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum JourneyError {
    #[error("unknown stage {0}")]
    UnknownStage(StageId),

    #[error("unknown journey {0}")]
    UnknownJourney(JourneyId),

    #[error("journey has no stages")]
    EmptyJourney,

    #[error("{0} appears twice in the journey")]
    DuplicateStage(StageId),

    #[error("transition declared for {0}, which is not part of the journey")]
    TransitionSourceOutside(StageId),

    #[error("transition from {from} targets {to}, which is not part of the journey")]
    TransitionTargetOutside { from: StageId, to: StageId },

    #[error("transition from {0} has no candidates")]
    EmptyCandidates(StageId),

    #[error("round-robin transition from {from} gives {to} weight 0")]
    ZeroWeight { from: StageId, to: StageId },

    #[error("transition from {from} lists {to} more than once")]
    DuplicateCandidate { from: StageId, to: StageId },

    #[error("no exit is reachable from {0}")]
    NoExitReachable(StageId),

    #[error("{stage} is not part of {journey}")]
    StageNotInJourney { journey: JourneyId, stage: StageId },

    #[error("{0} is not a queue")]
    NotAQueue(StageId),

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type JourneyResult<T> = Result<T, JourneyError>;
