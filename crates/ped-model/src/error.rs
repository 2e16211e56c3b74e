use thiserror::Error;

use ped_core::{AgentId, CoreError};

use crate::ModelKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("{model}: parameter `{name}` = {value} is invalid ({reason})")]
    InvalidParameter {
        model:  ModelKind,
        name:   &'static str,
        value:  f64,
        reason: &'static str,
    },

    #[error("{model}: unknown parameter `{key}`")]
    UnknownParameter { model: ModelKind, key: String },

    #[error("agent parameters are for {got}, but the simulation runs {expected}")]
    ModelMismatch { expected: ModelKind, got: ModelKind },

    #[error("agent {agent} overlaps agent {other}")]
    AgentOverlap { agent: AgentId, other: AgentId },

    #[error("agent {agent} is closer to a wall than its radius ({distance:.4} m)")]
    TooCloseToWall { agent: AgentId, distance: f64 },

    #[error("agent {agent}: computed {what} is not finite")]
    NonFinite { agent: AgentId, what: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;
