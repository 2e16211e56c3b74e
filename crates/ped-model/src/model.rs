//! Closed set of operational models and per-agent parameter blocks.
//!
//! The model is chosen once when the simulation is built.  Dispatch is a
//! single `match` per agent per step over [`OperationalModel`]; each
//! variant's maths lives in its own module.

use std::fmt;

use ped_spatial::LineSegment;

use crate::common::{ARRIVAL_EPSILON, CUTOFF_RADIUS};
use crate::{
    AgentView, CollisionFreeSpeedAgent, CollisionFreeSpeedParams, CollisionFreeSpeedV2Agent,
    GeneralizedCentrifugalForceAgent, GeneralizedCentrifugalForceParams, ModelError, ModelResult,
    ModelUpdate, SocialForceAgent, SocialForceParams, VelocityAgent, VelocityParams,
    centrifugal, collision_free, social_force, velocity,
};

// ── ModelKind ─────────────────────────────────────────────────────────────────

/// Tag identifying a model variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelKind {
    Velocity,
    SocialForce,
    CollisionFreeSpeed,
    CollisionFreeSpeedV2,
    GeneralizedCentrifugalForce,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Velocity,
        ModelKind::SocialForce,
        ModelKind::CollisionFreeSpeed,
        ModelKind::CollisionFreeSpeedV2,
        ModelKind::GeneralizedCentrifugalForce,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Velocity                    => "velocity model",
            ModelKind::SocialForce                 => "social force model",
            ModelKind::CollisionFreeSpeed          => "collision-free speed model",
            ModelKind::CollisionFreeSpeedV2        => "collision-free speed model v2",
            ModelKind::GeneralizedCentrifugalForce => "generalized centrifugal force model",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── AgentModelState ───────────────────────────────────────────────────────────

/// Exactly one parameter block per agent, matching the simulation's model.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentModelState {
    Velocity(VelocityAgent),
    SocialForce(SocialForceAgent),
    CollisionFreeSpeed(CollisionFreeSpeedAgent),
    CollisionFreeSpeedV2(CollisionFreeSpeedV2Agent),
    GeneralizedCentrifugalForce(GeneralizedCentrifugalForceAgent),
}

impl AgentModelState {
    /// Documented defaults for `kind`.
    pub fn default_for(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Velocity             => Self::Velocity(Default::default()),
            ModelKind::SocialForce          => Self::SocialForce(Default::default()),
            ModelKind::CollisionFreeSpeed   => Self::CollisionFreeSpeed(Default::default()),
            ModelKind::CollisionFreeSpeedV2 => Self::CollisionFreeSpeedV2(Default::default()),
            ModelKind::GeneralizedCentrifugalForce => {
                Self::GeneralizedCentrifugalForce(Default::default())
            }
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Velocity(_)                    => ModelKind::Velocity,
            Self::SocialForce(_)                 => ModelKind::SocialForce,
            Self::CollisionFreeSpeed(_)          => ModelKind::CollisionFreeSpeed,
            Self::CollisionFreeSpeedV2(_)        => ModelKind::CollisionFreeSpeedV2,
            Self::GeneralizedCentrifugalForce(_) => ModelKind::GeneralizedCentrifugalForce,
        }
    }

    /// Body radius used for spacing, overlap checks, and neighbour contact.
    /// The centrifugal model reports its widest lateral semi-axis.
    pub fn radius(&self) -> f64 {
        match self {
            Self::Velocity(p)                    => p.radius,
            Self::SocialForce(p)                 => p.radius,
            Self::CollisionFreeSpeed(p)          => p.radius,
            Self::CollisionFreeSpeedV2(p)        => p.radius,
            Self::GeneralizedCentrifugalForce(p) => p.b_max,
        }
    }

    pub fn desired_speed(&self) -> f64 {
        match self {
            Self::Velocity(p)                    => p.v0,
            Self::SocialForce(p)                 => p.desired_speed,
            Self::CollisionFreeSpeed(p)          => p.v0,
            Self::CollisionFreeSpeedV2(p)        => p.v0,
            Self::GeneralizedCentrifugalForce(p) => p.v0,
        }
    }

    /// Upper speed bound this agent can ever reach.
    pub fn max_speed(&self) -> f64 {
        match self {
            Self::SocialForce(p) => p.max_speed(),
            other => other.desired_speed(),
        }
    }

    /// Range-check every field.
    pub fn validate(&self) -> ModelResult<()> {
        match self {
            Self::Velocity(p)                    => p.validate(),
            Self::SocialForce(p)                 => p.validate(),
            Self::CollisionFreeSpeed(p)          => p.validate(),
            Self::CollisionFreeSpeedV2(p)        => p.validate(),
            Self::GeneralizedCentrifugalForce(p) => p.validate(),
        }
    }

    /// Set a field by canonical name.  Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self {
            Self::Velocity(p)                    => p.set(name, value),
            Self::SocialForce(p)                 => p.set(name, value),
            Self::CollisionFreeSpeed(p)          => p.set(name, value),
            Self::CollisionFreeSpeedV2(p)        => p.set(name, value),
            Self::GeneralizedCentrifugalForce(p) => p.set(name, value),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        match self {
            Self::Velocity(p)                    => p.get(name),
            Self::SocialForce(p)                 => p.get(name),
            Self::CollisionFreeSpeed(p)          => p.get(name),
            Self::CollisionFreeSpeedV2(p)        => p.get(name),
            Self::GeneralizedCentrifugalForce(p) => p.get(name),
        }
    }
}

macro_rules! state_from {
    ($($block:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$block> for AgentModelState {
                fn from(p: $block) -> Self {
                    AgentModelState::$variant(p)
                }
            }
        )*
    };
}

state_from! {
    VelocityAgent                    => Velocity,
    SocialForceAgent                 => SocialForce,
    CollisionFreeSpeedAgent          => CollisionFreeSpeed,
    CollisionFreeSpeedV2Agent        => CollisionFreeSpeedV2,
    GeneralizedCentrifugalForceAgent => GeneralizedCentrifugalForce,
}

// ── OperationalModel ──────────────────────────────────────────────────────────

/// The simulation's force/velocity model and its model-level parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationalModel {
    Velocity(VelocityParams),
    SocialForce(SocialForceParams),
    CollisionFreeSpeed(CollisionFreeSpeedParams),
    /// All repulsion parameters live on the agents.
    CollisionFreeSpeedV2,
    GeneralizedCentrifugalForce(GeneralizedCentrifugalForceParams),
}

impl OperationalModel {
    /// The model with its documented default parameters.
    pub fn default_for(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Velocity             => Self::Velocity(Default::default()),
            ModelKind::SocialForce          => Self::SocialForce(Default::default()),
            ModelKind::CollisionFreeSpeed   => Self::CollisionFreeSpeed(Default::default()),
            ModelKind::CollisionFreeSpeedV2 => Self::CollisionFreeSpeedV2,
            ModelKind::GeneralizedCentrifugalForce => {
                Self::GeneralizedCentrifugalForce(Default::default())
            }
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Velocity(_)                    => ModelKind::Velocity,
            Self::SocialForce(_)                 => ModelKind::SocialForce,
            Self::CollisionFreeSpeed(_)          => ModelKind::CollisionFreeSpeed,
            Self::CollisionFreeSpeedV2           => ModelKind::CollisionFreeSpeedV2,
            Self::GeneralizedCentrifugalForce(_) => ModelKind::GeneralizedCentrifugalForce,
        }
    }

    /// Default per-agent block for this model.
    pub fn default_agent(&self) -> AgentModelState {
        AgentModelState::default_for(self.kind())
    }

    /// Range-check the model-level parameters.
    pub fn validate(&self) -> ModelResult<()> {
        match self {
            Self::Velocity(p)                    => p.validate(),
            Self::SocialForce(p)                 => p.validate(),
            Self::CollisionFreeSpeed(p)          => p.validate(),
            Self::CollisionFreeSpeedV2           => Ok(()),
            Self::GeneralizedCentrifugalForce(p) => p.validate(),
        }
    }

    pub(crate) fn set(&mut self, name: &str, value: f64) -> bool {
        match self {
            Self::Velocity(p)                    => p.set(name, value),
            Self::SocialForce(p)                 => p.set(name, value),
            Self::CollisionFreeSpeed(p)          => p.set(name, value),
            Self::CollisionFreeSpeedV2           => false,
            Self::GeneralizedCentrifugalForce(p) => p.set(name, value),
        }
    }

    /// Reject a parameter block of the wrong variant or with out-of-range
    /// fields.
    pub fn validate_agent(&self, state: &AgentModelState) -> ModelResult<()> {
        if state.kind() != self.kind() {
            return Err(ModelError::ModelMismatch { expected: self.kind(), got: state.kind() });
        }
        state.validate()
    }

    /// Centre-to-centre radius within which neighbours are passed to
    /// [`compute_step`](Self::compute_step).
    pub fn neighbor_cutoff(&self) -> f64 {
        match self {
            Self::GeneralizedCentrifugalForce(p) => p.neighbor_cutoff(),
            _ => CUTOFF_RADIUS,
        }
    }

    /// Radius within which walls are passed to
    /// [`compute_step`](Self::compute_step).
    pub fn wall_cutoff(&self) -> f64 {
        match self {
            Self::GeneralizedCentrifugalForce(p) => p.wall_cutoff(),
            _ => CUTOFF_RADIUS,
        }
    }

    /// Placement constraints checked when an agent is inserted.
    ///
    /// The social force model tolerates partial overlap, which its contact
    /// forces resolve, but not a centre on a wall or on another agent: the
    /// repulsion direction is undefined there.  Every other model requires
    /// the body to be clear of neighbours and walls.
    pub fn check_placement(
        &self,
        agent:         &AgentView<'_>,
        neighbors:     &[AgentView<'_>],
        wall_distance: f64,
    ) -> ModelResult<()> {
        let id = agent.id;
        if let Self::SocialForce(_) = self {
            if wall_distance <= ARRIVAL_EPSILON {
                return Err(ModelError::TooCloseToWall { agent: id, distance: wall_distance });
            }
            return match neighbors
                .iter()
                .find(|other| agent.position.distance(other.position) <= ARRIVAL_EPSILON)
            {
                Some(other) => Err(ModelError::AgentOverlap { agent: id, other: other.id }),
                None => Ok(()),
            };
        }

        let r = agent.radius();
        if wall_distance < r {
            return Err(ModelError::TooCloseToWall { agent: id, distance: wall_distance });
        }
        match neighbors
            .iter()
            .find(|other| agent.position.distance(other.position) < r + other.radius())
        {
            Some(other) => Err(ModelError::AgentOverlap { agent: id, other: other.id }),
            None => Ok(()),
        }
    }

    /// Compute one agent's next kinematic state.
    ///
    /// Pure function of its arguments.  `neighbors` must not contain the
    /// agent itself; `walls` are the segments within
    /// [`wall_cutoff`](Self::wall_cutoff).
    ///
    /// # Errors
    ///
    /// [`ModelError::ModelMismatch`] if the agent's parameter block belongs
    /// to another model, [`ModelError::NonFinite`] if the result contains
    /// NaN or infinity.
    pub fn compute_step(
        &self,
        agent:     &AgentView<'_>,
        neighbors: &[AgentView<'_>],
        walls:     &[LineSegment],
        dt:        f64,
    ) -> ModelResult<ModelUpdate> {
        let update = match (self, agent.params) {
            (Self::Velocity(m), AgentModelState::Velocity(p)) => {
                velocity::step(m, p, agent, neighbors, walls, dt)
            }
            (Self::SocialForce(m), AgentModelState::SocialForce(p)) => {
                social_force::step(m, p, agent, neighbors, walls, dt)
            }
            (Self::CollisionFreeSpeed(m), AgentModelState::CollisionFreeSpeed(p)) => {
                collision_free::step(m.into(), p.time_gap, p.v0, agent, neighbors, walls, dt)
            }
            (Self::CollisionFreeSpeedV2, AgentModelState::CollisionFreeSpeedV2(p)) => {
                collision_free::step(p.into(), p.time_gap, p.v0, agent, neighbors, walls, dt)
            }
            (Self::GeneralizedCentrifugalForce(m), AgentModelState::GeneralizedCentrifugalForce(p)) => {
                centrifugal::step(m, p, agent, neighbors, walls, dt)
            }
            (model, state) => {
                return Err(ModelError::ModelMismatch { expected: model.kind(), got: state.kind() });
            }
        };
        match update.first_non_finite() {
            Some(what) => Err(ModelError::NonFinite { agent: agent.id, what }),
            None => Ok(update),
        }
    }
}
