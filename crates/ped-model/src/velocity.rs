//! Velocity model (Tordeux et al. 2015).
//!
//! Like the collision-free speed model, speed follows the headway relation
//! `min(max(s / T, 0), v0)`.  The heading is not reset every step though:
//! it relaxes towards the repulsion-adjusted goal direction with time
//! constant `tau`, which smooths turns.

use ped_spatial::LineSegment;

use crate::common::{
    arrival_cap, desired_direction, neighbor_repulsion, optimal_speed, spacing, wall_repulsion,
};
use crate::params::Check;
use crate::{AgentView, ModelKind, ModelResult, ModelUpdate};

param_block! {
    /// Model-level repulsion coefficients.
    pub struct VelocityParams {
        /// Neighbour repulsion strength.
        a_ped  = 8.0,
        /// Neighbour repulsion range, metres.
        d_ped  = 0.1,
        /// Wall repulsion strength.
        a_wall = 5.0,
        /// Wall repulsion range, metres.
        d_wall = 0.02,
    }
}

param_block! {
    /// Per-agent parameters.
    pub struct VelocityAgent {
        time_gap = 1.0,
        /// Heading relaxation time, seconds.
        tau      = 0.5,
        v0       = 1.2,
        radius   = 0.2,
    }
}

impl VelocityParams {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::Velocity);
        c.non_negative("a_ped", self.a_ped)?;
        c.positive("d_ped", self.d_ped)?;
        c.non_negative("a_wall", self.a_wall)?;
        c.positive("d_wall", self.d_wall)
    }
}

impl VelocityAgent {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::Velocity);
        c.within("time_gap", self.time_gap, 0.1, 10.0)?;
        c.positive("tau", self.tau)?;
        c.within("v0", self.v0, 0.0, 10.0)?;
        c.within("radius", self.radius, f64::MIN_POSITIVE, 2.0)
    }
}

pub(crate) fn step(
    model:     &VelocityParams,
    params:    &VelocityAgent,
    agent:     &AgentView<'_>,
    neighbors: &[AgentView<'_>],
    walls:     &[LineSegment],
    dt:        f64,
) -> ModelUpdate {
    let (goal, remaining) = desired_direction(agent);
    let push = neighbor_repulsion(agent, neighbors, model.a_ped, model.d_ped)
        + wall_repulsion(agent, walls, model.a_wall, model.d_wall);
    let raw = goal.unwrap_or(agent.orientation) + push;
    let target = if raw.norm_squared() == 0.0 { agent.orientation } else { raw.normalized() };

    let blend = (dt / params.tau).min(1.0);
    let relaxed = agent.orientation + (target - agent.orientation) * blend;
    let direction = if relaxed.norm_squared() == 0.0 { target } else { relaxed.normalized() };

    let free = neighbors
        .iter()
        .map(|other| spacing(agent, other, direction))
        .fold(f64::INFINITY, f64::min);
    let speed = arrival_cap(optimal_speed(free, params.time_gap, params.v0), remaining, dt);

    let velocity = direction * speed;
    ModelUpdate {
        position:    agent.position + velocity * dt,
        orientation: direction,
        velocity,
    }
}

