//! Generalized centrifugal force model (Chraibi, Seyfried, Schadschneider
//! 2010).
//!
//! Agents are ellipses whose semi-axis along the heading grows with speed
//! (`a = a_min + a_v |v|`) and whose lateral semi-axis shrinks with speed
//! (`b = b_max − (b_max − b_min) |v| / v0`).  Repulsion acts only on what
//! lies ahead of the agent and scales with the closing speed:
//!
//! ```text
//! F_ij = −m K_ij (ν v0 + v_ij)² / d_eff · e_ij
//! K_ij = max(0, o_i · e_ij)          v_ij = max(0, (v_i − v_j) · e_ij)
//! d_eff = |x_j − x_i| − r_i(e_ij) − r_j(−e_ij)
//! ```
//!
//! The singularity at `d_eff → 0` is removed by capping the magnitude at
//! `m · max_*_repulsion_force`, and the force fades linearly to zero over
//! the last interpolation distance before the interaction cutoff.

use ped_core::Point;
use ped_spatial::LineSegment;

use crate::common::{ARRIVAL_EPSILON, desired_direction, heading};
use crate::params::Check;
use crate::{AgentModelState, AgentView, ModelKind, ModelResult, ModelUpdate};

/// Upper bound on either semi-axis, metres.  Keeps the neighbour query
/// radius finite for fast agents.
pub const MAX_SEMI_AXIS: f64 = 1.5;

param_block! {
    /// Model-level interaction parameters.
    pub struct GeneralizedCentrifugalForceParams {
        /// `ν` for neighbours.
        strength_neighbor_repulsion         = 0.3,
        /// `ν` for walls.
        strength_geometry_repulsion         = 0.2,
        /// Effective distance beyond which neighbours are ignored, metres.
        max_neighbor_interaction_distance   = 2.0,
        max_geometry_interaction_distance   = 2.0,
        /// Width of the fade-out band before the cutoff, and the smallest
        /// effective distance used in the force law, metres.
        max_neighbor_interpolation_distance = 0.1,
        max_geometry_interpolation_distance = 0.1,
        /// Force cap per unit mass, m s⁻².
        max_neighbor_repulsion_force        = 3.0,
        max_geometry_repulsion_force        = 3.0,
    }
}

param_block! {
    /// Per-agent parameters.
    pub struct GeneralizedCentrifugalForceAgent {
        mass  = 1.0,
        /// Driving-force relaxation time, seconds.
        tau   = 0.5,
        v0    = 1.2,
        /// Speed dependence of the longitudinal semi-axis, seconds.
        a_v   = 1.0,
        a_min = 0.2,
        b_min = 0.2,
        b_max = 0.4,
    }
}

impl GeneralizedCentrifugalForceParams {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::GeneralizedCentrifugalForce);
        c.non_negative("strength_neighbor_repulsion", self.strength_neighbor_repulsion)?;
        c.non_negative("strength_geometry_repulsion", self.strength_geometry_repulsion)?;
        c.positive("max_neighbor_interaction_distance", self.max_neighbor_interaction_distance)?;
        c.positive("max_geometry_interaction_distance", self.max_geometry_interaction_distance)?;
        c.positive("max_neighbor_interpolation_distance", self.max_neighbor_interpolation_distance)?;
        c.positive("max_geometry_interpolation_distance", self.max_geometry_interpolation_distance)?;
        c.non_negative("max_neighbor_repulsion_force", self.max_neighbor_repulsion_force)?;
        c.non_negative("max_geometry_repulsion_force", self.max_geometry_repulsion_force)
    }

    pub(crate) fn neighbor_cutoff(&self) -> f64 {
        self.max_neighbor_interaction_distance + 2.0 * MAX_SEMI_AXIS
    }

    pub(crate) fn wall_cutoff(&self) -> f64 {
        self.max_geometry_interaction_distance + MAX_SEMI_AXIS
    }
}

impl GeneralizedCentrifugalForceAgent {
    pub fn validate(&self) -> ModelResult<()> {
        let c = Check(ModelKind::GeneralizedCentrifugalForce);
        c.positive("mass", self.mass)?;
        c.positive("tau", self.tau)?;
        c.within("v0", self.v0, 0.0, 10.0)?;
        c.non_negative("a_v", self.a_v)?;
        c.within("a_min", self.a_min, f64::MIN_POSITIVE, MAX_SEMI_AXIS)?;
        c.within("b_min", self.b_min, f64::MIN_POSITIVE, MAX_SEMI_AXIS)?;
        c.within("b_max", self.b_max, f64::MIN_POSITIVE, MAX_SEMI_AXIS)?;
        c.at_least("b_max", self.b_max, self.b_min)
    }

    /// Semi-axes `(a, b)` at `speed`.
    pub fn semi_axes(&self, speed: f64) -> (f64, f64) {
        let a = (self.a_min + self.a_v * speed).min(MAX_SEMI_AXIS);
        let ratio = if self.v0 > 0.0 { (speed / self.v0).min(1.0) } else { 0.0 };
        let b = self.b_max - (self.b_max - self.b_min) * ratio;
        (a, b)
    }
}

/// Distance from the ellipse centre to its boundary along unit `dir`.
fn effective_radius(params: &GeneralizedCentrifugalForceAgent, view: &AgentView<'_>, dir: Point) -> f64 {
    let (a, b) = params.semi_axes(view.speed());
    let cos = view.orientation.dot(dir);
    let sin = view.orientation.cross(dir);
    a * b / ((b * cos).powi(2) + (a * sin).powi(2)).sqrt()
}

/// Neighbours of other models cannot occur (the registry enforces one
/// model), but fall back to a circle of their nominal radius.
fn other_radius(other: &AgentView<'_>, dir: Point) -> f64 {
    match other.params {
        AgentModelState::GeneralizedCentrifugalForce(p) => effective_radius(p, other, dir),
        state => state.radius(),
    }
}

struct Falloff {
    nu:            f64,
    cutoff:        f64,
    interpolation: f64,
    max_force:     f64,
}

impl Falloff {
    fn magnitude(&self, mass: f64, v0: f64, k: f64, closing: f64, d_eff: f64) -> f64 {
        if d_eff >= self.cutoff {
            return 0.0;
        }
        let raw = mass * k * (self.nu * v0 + closing).powi(2) / d_eff.max(self.interpolation);
        let fade = ((self.cutoff - d_eff) / self.interpolation).min(1.0);
        raw.min(mass * self.max_force) * fade
    }
}

pub(crate) fn step(
    model:     &GeneralizedCentrifugalForceParams,
    params:    &GeneralizedCentrifugalForceAgent,
    agent:     &AgentView<'_>,
    neighbors: &[AgentView<'_>],
    walls:     &[LineSegment],
    dt:        f64,
) -> ModelUpdate {
    let (goal, remaining) = desired_direction(agent);
    let wanted = match goal {
        Some(e0) => e0 * params.v0.min(remaining / params.tau),
        None => Point::ZERO,
    };
    let mut force = (wanted - agent.velocity) * (params.mass / params.tau);

    let nbr = Falloff {
        nu:            model.strength_neighbor_repulsion,
        cutoff:        model.max_neighbor_interaction_distance,
        interpolation: model.max_neighbor_interpolation_distance,
        max_force:     model.max_neighbor_repulsion_force,
    };
    for other in neighbors {
        let offset = other.position - agent.position;
        let e = offset.normalized();
        let d_eff = offset.norm() - effective_radius(params, agent, e) - other_radius(other, -e);
        let k = agent.orientation.dot(e).max(0.0);
        let closing = (agent.velocity - other.velocity).dot(e).max(0.0);
        force -= e * nbr.magnitude(params.mass, params.v0, k, closing, d_eff);
    }

    let geo = Falloff {
        nu:            model.strength_geometry_repulsion,
        cutoff:        model.max_geometry_interaction_distance,
        interpolation: model.max_geometry_interpolation_distance,
        max_force:     model.max_geometry_repulsion_force,
    };
    for wall in walls {
        let offset = wall.closest_point(agent.position) - agent.position;
        let e = offset.normalized();
        let d_eff = offset.norm() - effective_radius(params, agent, e);
        let k = agent.orientation.dot(e).max(0.0);
        let closing = agent.velocity.dot(e).max(0.0);
        force -= e * geo.magnitude(params.mass, params.v0, k, closing, d_eff);
    }

    let velocity = (agent.velocity + force * (dt / params.mass)).clamp_norm(params.v0);
    let velocity = if velocity.norm() < ARRIVAL_EPSILON { Point::ZERO } else { velocity };
    ModelUpdate {
        position:    agent.position + velocity * dt,
        orientation: heading(velocity, agent.orientation),
        velocity,
    }
}
