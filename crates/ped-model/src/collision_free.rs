//! Collision-free speed model (Tordeux, Chraibi, Seyfried 2016) and its
//! per-agent-parameter variant.
//!
//! Each step the agent picks a direction from its goal direction plus
//! exponential repulsion, then moves along it at the largest speed that
//! keeps a time gap `T` to the first agent in its corridor:
//!
//! ```text
//! e     = normalize(e0 + Σ R_nbr + Σ R_wall)
//! v     = min(max(s / T, 0), v0)           s = free distance along e
//! x    += v · e · dt
//! ```
//!
//! The two variants differ only in where the repulsion strengths and ranges
//! live: on the model (v1) or on every agent (v2).

use ped_core::Point;
use ped_spatial::LineSegment;

use crate::common::{
    arrival_cap, desired_direction, neighbor_repulsion, optimal_speed, spacing, wall_repulsion,
};
use crate::params::Check;
use crate::{AgentView, ModelKind, ModelResult, ModelUpdate};

param_block! {
    /// Model-level repulsion shared by all agents (v1).
    pub struct CollisionFreeSpeedParams {
        strength_neighbor_repulsion = 8.0,
        /// Metres.
        range_neighbor_repulsion    = 0.1,
        strength_geometry_repulsion = 5.0,
        /// Metres.
        range_geometry_repulsion    = 0.02,
    }
}

param_block! {
    /// Per-agent parameters (v1).
    pub struct CollisionFreeSpeedAgent {
        /// Seconds.
        time_gap = 1.0,
        /// Desired speed, m/s.
        v0       = 1.2,
        /// Metres.
        radius   = 0.2,
    }
}

param_block! {
    /// Per-agent parameters (v2): repulsion is configured per agent.
    pub struct CollisionFreeSpeedV2Agent {
        strength_neighbor_repulsion = 8.0,
        range_neighbor_repulsion    = 0.1,
        strength_geometry_repulsion = 5.0,
        range_geometry_repulsion    = 0.02,
        time_gap                    = 1.0,
        v0                          = 1.2,
        radius                      = 0.2,
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

impl CollisionFreeSpeedParams {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::CollisionFreeSpeed);
        c.non_negative("strength_neighbor_repulsion", self.strength_neighbor_repulsion)?;
        c.positive("range_neighbor_repulsion", self.range_neighbor_repulsion)?;
        c.non_negative("strength_geometry_repulsion", self.strength_geometry_repulsion)?;
        c.positive("range_geometry_repulsion", self.range_geometry_repulsion)
    }
}

impl CollisionFreeSpeedAgent {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::CollisionFreeSpeed);
        c.within("time_gap", self.time_gap, 0.1, 10.0)?;
        c.within("v0", self.v0, 0.0, 10.0)?;
        c.within("radius", self.radius, f64::MIN_POSITIVE, 2.0)
    }
}

impl CollisionFreeSpeedV2Agent {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::CollisionFreeSpeedV2);
        c.non_negative("strength_neighbor_repulsion", self.strength_neighbor_repulsion)?;
        c.positive("range_neighbor_repulsion", self.range_neighbor_repulsion)?;
        c.non_negative("strength_geometry_repulsion", self.strength_geometry_repulsion)?;
        c.positive("range_geometry_repulsion", self.range_geometry_repulsion)?;
        c.within("time_gap", self.time_gap, 0.1, 10.0)?;
        c.within("v0", self.v0, 0.0, 10.0)?;
        c.within("radius", self.radius, f64::MIN_POSITIVE, 2.0)
    }
}

// ── Step ──────────────────────────────────────────────────────────────────────

/// The four repulsion coefficients, from whichever block holds them.
pub(crate) struct Repulsion {
    pub neighbor_strength: f64,
    pub neighbor_range:    f64,
    pub geometry_strength: f64,
    pub geometry_range:    f64,
}

impl From<&CollisionFreeSpeedParams> for Repulsion {
    fn from(p: &CollisionFreeSpeedParams) -> Self {
        Self {
            neighbor_strength: p.strength_neighbor_repulsion,
            neighbor_range:    p.range_neighbor_repulsion,
            geometry_strength: p.strength_geometry_repulsion,
            geometry_range:    p.range_geometry_repulsion,
        }
    }
}

impl From<&CollisionFreeSpeedV2Agent> for Repulsion {
    fn from(p: &CollisionFreeSpeedV2Agent) -> Self {
        Self {
            neighbor_strength: p.strength_neighbor_repulsion,
            neighbor_range:    p.range_neighbor_repulsion,
            geometry_strength: p.strength_geometry_repulsion,
            geometry_range:    p.range_geometry_repulsion,
        }
    }
}

pub(crate) fn step(
    rep:       Repulsion,
    time_gap:  f64,
    v0:        f64,
    agent:     &AgentView<'_>,
    neighbors: &[AgentView<'_>],
    walls:     &[LineSegment],
    dt:        f64,
) -> ModelUpdate {
    let (goal, remaining) = desired_direction(agent);
    let push = neighbor_repulsion(agent, neighbors, rep.neighbor_strength, rep.neighbor_range)
        + wall_repulsion(agent, walls, rep.geometry_strength, rep.geometry_range);
    let raw = goal.unwrap_or(Point::ZERO) + push;

    // NaN must propagate; only a genuinely zero sum falls back to the heading.
    let direction = if raw.norm_squared() == 0.0 { agent.orientation } else { raw.normalized() };

    let free = neighbors
        .iter()
        .map(|other| spacing(agent, other, direction))
        .fold(f64::INFINITY, f64::min);
    let speed = arrival_cap(optimal_speed(free, time_gap, v0), remaining, dt);

    let velocity = direction * speed;
    ModelUpdate {
        position:    agent.position + velocity * dt,
        orientation: direction,
        velocity,
    }
}
