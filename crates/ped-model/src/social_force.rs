//! Social force model (Helbing, Farkas, Vicsek 2000).
//!
//! Newtonian dynamics with explicit Euler integration:
//!
//! ```text
//! F  = m (v0·e0 − v) / τ                                 driving
//!    + Σ_j [A e^{(r_ij − d_ij)/B} + k g(r_ij − d_ij)] n_ij + κ g(r_ij − d_ij) Δv_t t_ij
//!    + Σ_W [A_w e^{(r_i − d_iW)/B} + k g(r_i − d_iW)] n_iW − κ g(r_i − d_iW) (v·t_iW) t_iW
//! v' = clamp(v + F/m · dt)
//! x' = x + v' · dt
//! ```
//!
//! `g(x)` is `x` while bodies touch and zero otherwise.

use ped_core::Point;
use ped_spatial::LineSegment;

use crate::common::{ARRIVAL_EPSILON, desired_direction, heading};
use crate::params::Check;
use crate::{AgentView, ModelKind, ModelResult, ModelUpdate};

/// Speed bound relative to the desired speed.  Pushed agents may exceed
/// `v0` up to this factor.
pub const MAX_SPEED_FACTOR: f64 = 1.3;

param_block! {
    /// Contact coefficients shared by all agents.
    pub struct SocialForceParams {
        /// Body compression coefficient `k`, kg s⁻².
        body_force = 120_000.0,
        /// Sliding friction coefficient `κ`, kg m⁻¹ s⁻¹.
        friction   = 240_000.0,
    }
}

param_block! {
    /// Per-agent parameters.
    pub struct SocialForceAgent {
        /// kg.
        mass           = 80.0,
        /// m/s.
        desired_speed  = 0.8,
        /// Seconds.
        reaction_time  = 0.5,
        /// Neighbour interaction strength `A`, N.
        agent_scale    = 2000.0,
        /// Wall interaction strength `A_w`, N.
        obstacle_scale = 2000.0,
        /// Interaction range `B`, metres.
        force_distance = 0.08,
        radius         = 0.3,
    }
}

impl SocialForceParams {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::SocialForce);
        c.non_negative("body_force", self.body_force)?;
        c.non_negative("friction", self.friction)
    }
}

impl SocialForceAgent {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::SocialForce);
        c.positive("mass", self.mass)?;
        c.non_negative("desired_speed", self.desired_speed)?;
        c.positive("reaction_time", self.reaction_time)?;
        c.non_negative("agent_scale", self.agent_scale)?;
        c.non_negative("obstacle_scale", self.obstacle_scale)?;
        c.positive("force_distance", self.force_distance)?;
        c.positive("radius", self.radius)
    }

    #[inline]
    pub fn max_speed(&self) -> f64 {
        MAX_SPEED_FACTOR * self.desired_speed
    }
}

pub(crate) fn step(
    model:     &SocialForceParams,
    params:    &SocialForceAgent,
    agent:     &AgentView<'_>,
    neighbors: &[AgentView<'_>],
    walls:     &[LineSegment],
    dt:        f64,
) -> ModelUpdate {
    let (goal, remaining) = desired_direction(agent);
    let wanted = match goal {
        Some(e0) => e0 * params.desired_speed.min(remaining / params.reaction_time),
        None => Point::ZERO,
    };
    let mut force = (wanted - agent.velocity) * (params.mass / params.reaction_time);

    for other in neighbors {
        force += agent_force(model, params, agent, other);
    }
    for wall in walls {
        force += wall_force(model, params, agent, wall);
    }

    let velocity = (agent.velocity + force * (dt / params.mass)).clamp_norm(params.max_speed());
    // Drift below the arrival threshold is treated as standing still.
    let velocity = if velocity.norm() < ARRIVAL_EPSILON { Point::ZERO } else { velocity };
    ModelUpdate {
        position:    agent.position + velocity * dt,
        orientation: heading(velocity, agent.orientation),
        velocity,
    }
}

fn agent_force(
    model:  &SocialForceParams,
    params: &SocialForceAgent,
    agent:  &AgentView<'_>,
    other:  &AgentView<'_>,
) -> Point {
    let offset = agent.position - other.position;
    let dist = offset.norm();
    let n = offset.normalized();
    let overlap = agent.radius() + other.radius() - dist;

    let mut f = n * (params.agent_scale * (overlap / params.force_distance).exp());
    if overlap > 0.0 {
        let t = n.orthogonal();
        let slip = (other.velocity - agent.velocity).dot(t);
        f += n * (model.body_force * overlap) + t * (model.friction * overlap * slip);
    }
    f
}

fn wall_force(
    model:  &SocialForceParams,
    params: &SocialForceAgent,
    agent:  &AgentView<'_>,
    wall:   &LineSegment,
) -> Point {
    let offset = agent.position - wall.closest_point(agent.position);
    let dist = offset.norm();
    let n = offset.normalized();
    let overlap = params.radius - dist;

    let mut f = n * (params.obstacle_scale * (overlap / params.force_distance).exp());
    if overlap > 0.0 {
        let t = n.orthogonal();
        f += n * (model.body_force * overlap) - t * (model.friction * overlap * agent.velocity.dot(t));
    }
    f
}
