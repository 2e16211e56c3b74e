//! Read-only agent snapshot passed to every model evaluation.

use ped_core::{AgentId, Point};

use crate::AgentModelState;

/// One agent as seen by a force model during the compute phase.
///
/// Built by the stepper from the pre-step state of the agent registry.
/// Views borrow the parameter block, so building one per neighbour costs
/// nothing beyond the copy of the kinematic fields.
#[derive(Copy, Clone, Debug)]
pub struct AgentView<'a> {
    pub id:          AgentId,
    pub position:    Point,
    /// Unit heading.
    pub orientation: Point,
    pub velocity:    Point,
    /// Point the agent is currently walking towards.
    pub destination: Point,
    pub params:      &'a AgentModelState,
}

impl AgentView<'_> {
    #[inline]
    pub fn radius(&self) -> f64 {
        self.params.radius()
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}
