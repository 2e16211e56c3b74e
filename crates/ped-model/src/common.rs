//! Kinematic helpers shared by the model variants.

use ped_core::Point;
use ped_spatial::LineSegment;

use crate::AgentView;

/// Below this distance the agent counts as standing on its destination.
pub(crate) const ARRIVAL_EPSILON: f64 = 1e-6;

/// Interaction radius used by the collision-free-speed, velocity, and
/// social force models for both neighbours and walls.
pub(crate) const CUTOFF_RADIUS: f64 = 3.0;

/// Unit direction towards the destination and the remaining distance.
/// The direction is `None` once the agent has arrived.
pub(crate) fn desired_direction(agent: &AgentView<'_>) -> (Option<Point>, f64) {
    let to_goal = agent.destination - agent.position;
    let remaining = to_goal.norm();
    (to_goal.try_normalized(ARRIVAL_EPSILON), remaining)
}

/// Cap `speed` so one step of length `speed * dt` cannot overshoot the
/// destination.
#[inline]
pub(crate) fn arrival_cap(speed: f64, remaining: f64, dt: f64) -> f64 {
    speed.min(remaining / dt)
}

/// Exponential repulsion `strength * exp((contact - d) / range)` pointing
/// along `offset` (from the source towards the affected agent).
///
/// A zero offset yields NaN: coincident bodies are a configuration error
/// and must surface as a non-finite update.
#[inline]
pub(crate) fn exp_repulsion(offset: Point, contact: f64, strength: f64, range: f64) -> Point {
    let dist = offset.norm();
    offset.normalized() * (strength * ((contact - dist) / range).exp())
}

/// Sum of exponential neighbour repulsions acting on `agent`.
pub(crate) fn neighbor_repulsion(
    agent:     &AgentView<'_>,
    neighbors: &[AgentView<'_>],
    strength:  f64,
    range:     f64,
) -> Point {
    let r = agent.radius();
    neighbors.iter().fold(Point::ZERO, |acc, other| {
        acc + exp_repulsion(agent.position - other.position, r + other.radius(), strength, range)
    })
}

/// Sum of exponential wall repulsions acting on `agent`.
pub(crate) fn wall_repulsion(
    agent:    &AgentView<'_>,
    walls:    &[LineSegment],
    strength: f64,
    range:    f64,
) -> Point {
    let r = agent.radius();
    walls.iter().fold(Point::ZERO, |acc, wall| {
        acc + exp_repulsion(agent.position - wall.closest_point(agent.position), r, strength, range)
    })
}

/// Free distance ahead of an agent along `direction` before it touches
/// `other`.  Agents behind or outside the swept corridor give infinity.
pub(crate) fn spacing(agent: &AgentView<'_>, other: &AgentView<'_>, direction: Point) -> f64 {
    let offset = other.position - agent.position;
    if direction.dot(offset) < 0.0 {
        return f64::INFINITY;
    }
    let contact = agent.radius() + other.radius();
    if direction.orthogonal().dot(offset).abs() > contact {
        return f64::INFINITY;
    }
    offset.norm() - contact
}

/// Speed-headway relation `clamp(s / T, 0, v0)`.
#[inline]
pub(crate) fn optimal_speed(spacing: f64, time_gap: f64, v0: f64) -> f64 {
    (spacing / time_gap).max(0.0).min(v0)
}

/// Orientation after a step: the movement direction when the agent moves,
/// otherwise the previous heading.
#[inline]
pub(crate) fn heading(velocity: Point, previous: Point) -> Point {
    velocity.try_normalized(ARRIVAL_EPSILON).unwrap_or(previous)
}
