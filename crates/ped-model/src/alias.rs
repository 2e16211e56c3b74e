//! Deprecated parameter names.
//!
//! Older configurations used camel-case keys.  They are mapped to the
//! canonical snake-case field exactly once, when a
//! [`ParameterSet`](crate::ParameterSet) is built; nothing downstream ever
//! sees the old names.

use crate::{ModelKind, ParameterScope};

/// `(model, scope, deprecated, canonical)`.
const ALIASES: &[(ModelKind, ParameterScope, &str, &str)] = &[
    (ModelKind::SocialForce, ParameterScope::Model, "bodyForce", "body_force"),
    (ModelKind::SocialForce, ParameterScope::Agent, "desiredSpeed", "desired_speed"),
    (ModelKind::SocialForce, ParameterScope::Agent, "reactionTime", "reaction_time"),
    (ModelKind::SocialForce, ParameterScope::Agent, "agentScale", "agent_scale"),
    (ModelKind::SocialForce, ParameterScope::Agent, "obstacleScale", "obstacle_scale"),
    (ModelKind::SocialForce, ParameterScope::Agent, "forceDistance", "force_distance"),
];

/// Canonical name for a deprecated key, if it is one.
pub fn resolve(kind: ModelKind, scope: ParameterScope, name: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(k, s, old, _)| *k == kind && *s == scope && *old == name)
        .map(|(_, _, _, canonical)| *canonical)
}

/// All `(deprecated, canonical)` pairs for one block.
pub fn aliases_for(
    kind: ModelKind,
    scope: ParameterScope,
) -> impl Iterator<Item = (&'static str, &'static str)> {
    ALIASES
        .iter()
        .filter(move |(k, s, _, _)| *k == kind && *s == scope)
        .map(|(_, _, old, canonical)| (*old, *canonical))
}
