//! Fluent description of an agent to insert.
//!
//! # Usage
//!
//! ```rust
//! use ped_agent::NewAgent;
//! use ped_core::{JourneyId, Point, StageId};
//! use ped_model::{CollisionFreeSpeedAgent, ModelKind};
//!
//! let agent = NewAgent::new(JourneyId(0), StageId(0), (0.5, 1.0))
//!     .orientation((0.0, 1.0))
//!     .model(CollisionFreeSpeedAgent { v0: 1.4, ..Default::default() });
//!
//! assert_eq!(agent.position, Point::new(0.5, 1.0));
//! assert_eq!(agent.model.kind(), ModelKind::CollisionFreeSpeed);
//! ```

use ped_core::{JourneyId, Point, StageId};
use ped_model::{AgentModelState, CollisionFreeSpeedAgent};

/// Everything needed to insert one agent.
///
/// Defaults: heading `(1, 0)`, at rest, collision-free speed model
/// parameters.  Callers running another model must set
/// [`model`](Self::model).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewAgent {
    pub journey:     JourneyId,
    /// Stage of `journey` the agent starts at.
    pub stage:       StageId,
    pub position:    Point,
    /// Any non-zero vector; normalised on insertion.
    pub orientation: Point,
    pub velocity:    Point,
    pub model:       AgentModelState,
}

impl NewAgent {
    pub fn new(journey: JourneyId, stage: StageId, position: impl Into<Point>) -> Self {
        Self {
            journey,
            stage,
            position:    position.into(),
            orientation: Point::new(1.0, 0.0),
            velocity:    Point::ZERO,
            model:       CollisionFreeSpeedAgent::default().into(),
        }
    }

    pub fn orientation(mut self, orientation: impl Into<Point>) -> Self {
        self.orientation = orientation.into();
        self
    }

    pub fn velocity(mut self, velocity: impl Into<Point>) -> Self {
        self.velocity = velocity.into();
        self
    }

    pub fn model(mut self, model: impl Into<AgentModelState>) -> Self {
        self.model = model.into();
        self
    }
}
