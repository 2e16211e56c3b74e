//! Parameter blocks and key/value construction.
//!
//! Every model has a model-level parameter block (shared by all agents) and
//! a per-agent block.  Both are plain `f64` structs generated by
//! [`param_block!`] with documented defaults.
//!
//! Hosts that configure agents from untyped input (config files, bindings)
//! go through [`ParameterSet`], which resolves deprecated names through the
//! [`alias`](crate::alias) table once and then only carries canonical
//! fields.

use ped_core::{CoreError, Logger};

use crate::{AgentModelState, ModelError, ModelKind, ModelResult, OperationalModel, alias};

/// Generate a parameter block: a `Copy` struct of `f64` fields with a
/// `Default` impl, a `FIELDS` list, and name-based `get`/`set`.
macro_rules! param_block {
    (
        $(#[$attr:meta])*
        pub struct $name:ident {
            $( $(#[$fattr:meta])* $field:ident = $default:expr, )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            $( $(#[$fattr])* pub $field: f64, )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self { $( $field: $default, )* }
            }
        }

        impl $name {
            /// Canonical field names, in declaration order.
            pub const FIELDS: &'static [&'static str] = &[$( stringify!($field) ),*];

            /// Set a field by canonical name.  Returns `false` for unknown
            /// names.
            pub fn set(&mut self, name: &str, value: f64) -> bool {
                match name {
                    $( stringify!($field) => { self.$field = value; true } )*
                    _ => false,
                }
            }

            pub fn get(&self, name: &str) -> Option<f64> {
                match name {
                    $( stringify!($field) => Some(self.$field), )*
                    _ => None,
                }
            }
        }
    };
}

// ── Range checks ──────────────────────────────────────────────────────────────

/// Range checks that report the failing field by name.
#[derive(Copy, Clone)]
pub(crate) struct Check(pub ModelKind);

impl Check {
    fn fail(self, name: &'static str, value: f64, reason: &'static str) -> ModelError {
        ModelError::InvalidParameter { model: self.0, name, value, reason }
    }

    pub(crate) fn positive(self, name: &'static str, value: f64) -> ModelResult<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(self.fail(name, value, "must be finite and > 0"))
        }
    }

    pub(crate) fn non_negative(self, name: &'static str, value: f64) -> ModelResult<()> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(self.fail(name, value, "must be finite and >= 0"))
        }
    }

    /// Inclusive range `[lo, hi]`.
    pub(crate) fn within(self, name: &'static str, value: f64, lo: f64, hi: f64) -> ModelResult<()> {
        if value >= lo && value <= hi {
            Ok(())
        } else {
            Err(self.fail(name, value, "outside the admissible range"))
        }
    }

    /// `value` must be at least `other` (both already range-checked).
    pub(crate) fn at_least(self, name: &'static str, value: f64, other: f64) -> ModelResult<()> {
        if value >= other {
            Ok(())
        } else {
            Err(self.fail(name, value, "must not be smaller than its lower companion"))
        }
    }
}

// ── ParameterSet ──────────────────────────────────────────────────────────────

/// Which block a [`ParameterSet`] configures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterScope {
    /// Model-level parameters, fixed at simulation construction.
    Model,
    /// Per-agent parameters, validated at `add_agent`.
    Agent,
}

/// Canonical key/value overrides for one parameter block.
///
/// Unset fields keep their documented defaults.  When a key is given twice
/// (for instance once under a deprecated name), the later value wins.
///
/// # Example
///
/// ```
/// use ped_core::Logger;
/// use ped_model::{AgentModelState, ModelKind, ParameterSet};
///
/// let logger = Logger::new();
/// let set = ParameterSet::agent(ModelKind::SocialForce, [("desiredSpeed", 1.1), ("mass", 70.0)], &logger)
///     .unwrap();
/// assert_eq!(set.renamed(), &[("desiredSpeed".to_string(), "desired_speed")]);
///
/// let AgentModelState::SocialForce(p) = set.to_agent_state().unwrap() else { unreachable!() };
/// assert_eq!(p.desired_speed, 1.1);
/// assert_eq!(p.mass, 70.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    kind:    ModelKind,
    scope:   ParameterScope,
    values:  Vec<(&'static str, f64)>,
    renamed: Vec<(String, &'static str)>,
}

impl ParameterSet {
    /// Resolve `pairs` against the canonical fields and alias table of
    /// `kind`/`scope`.  Each deprecated name produces one warning on
    /// `logger`.
    pub fn from_pairs<'k, I>(kind: ModelKind, scope: ParameterScope, pairs: I, logger: &Logger) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (&'k str, f64)>,
    {
        let fields = canonical_fields(kind, scope);
        let mut set = Self { kind, scope, values: Vec::new(), renamed: Vec::new() };

        for (key, value) in pairs {
            let canonical = match fields.iter().find(|f| **f == key) {
                Some(field) => *field,
                None => match alias::resolve(kind, scope, key) {
                    Some(canonical) => {
                        logger.warning(format_args!(
                            "{kind}: `{key}` is deprecated, use `{canonical}` instead"
                        ));
                        set.renamed.push((key.to_owned(), canonical));
                        canonical
                    }
                    None => {
                        return Err(ModelError::UnknownParameter { model: kind, key: key.to_owned() });
                    }
                },
            };
            match set.values.iter_mut().find(|(name, _)| *name == canonical) {
                Some(slot) => slot.1 = value,
                None => set.values.push((canonical, value)),
            }
        }
        Ok(set)
    }

    /// Shorthand for [`ParameterScope::Agent`].
    pub fn agent<'k, I>(kind: ModelKind, pairs: I, logger: &Logger) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (&'k str, f64)>,
    {
        Self::from_pairs(kind, ParameterScope::Agent, pairs, logger)
    }

    /// Shorthand for [`ParameterScope::Model`].
    pub fn model<'k, I>(kind: ModelKind, pairs: I, logger: &Logger) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (&'k str, f64)>,
    {
        Self::from_pairs(kind, ParameterScope::Model, pairs, logger)
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn scope(&self) -> ParameterScope {
        self.scope
    }

    /// Explicitly set value for a canonical field.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    /// `(deprecated, canonical)` for every alias that was resolved.
    pub fn renamed(&self) -> &[(String, &'static str)] {
        &self.renamed
    }

    /// Defaults for this model overridden by the set's values, validated.
    pub fn to_agent_state(&self) -> ModelResult<AgentModelState> {
        self.expect_scope(ParameterScope::Agent)?;
        let mut state = AgentModelState::default_for(self.kind);
        for (name, value) in &self.values {
            state.set(name, *value);
        }
        state.validate()?;
        Ok(state)
    }

    /// Model-level defaults overridden by the set's values, validated.
    pub fn to_model(&self) -> ModelResult<OperationalModel> {
        self.expect_scope(ParameterScope::Model)?;
        let mut model = OperationalModel::default_for(self.kind);
        for (name, value) in &self.values {
            model.set(name, *value);
        }
        model.validate()?;
        Ok(model)
    }

    fn expect_scope(&self, scope: ParameterScope) -> ModelResult<()> {
        if self.scope == scope {
            Ok(())
        } else {
            Err(CoreError::Config(format!(
                "{} parameter set used where {scope:?} parameters are expected",
                self.kind
            ))
            .into())
        }
    }
}

/// Canonical field names for one block.
pub fn canonical_fields(kind: ModelKind, scope: ParameterScope) -> &'static [&'static str] {
    use crate::{
        CollisionFreeSpeedAgent, CollisionFreeSpeedParams, CollisionFreeSpeedV2Agent,
        GeneralizedCentrifugalForceAgent, GeneralizedCentrifugalForceParams, SocialForceAgent,
        SocialForceParams, VelocityAgent, VelocityParams,
    };

    match (kind, scope) {
        (ModelKind::Velocity, ParameterScope::Model)             => VelocityParams::FIELDS,
        (ModelKind::Velocity, ParameterScope::Agent)             => VelocityAgent::FIELDS,
        (ModelKind::SocialForce, ParameterScope::Model)          => SocialForceParams::FIELDS,
        (ModelKind::SocialForce, ParameterScope::Agent)          => SocialForceAgent::FIELDS,
        (ModelKind::CollisionFreeSpeed, ParameterScope::Model)   => CollisionFreeSpeedParams::FIELDS,
        (ModelKind::CollisionFreeSpeed, ParameterScope::Agent)   => CollisionFreeSpeedAgent::FIELDS,
        (ModelKind::CollisionFreeSpeedV2, ParameterScope::Model) => &[],
        (ModelKind::CollisionFreeSpeedV2, ParameterScope::Agent) => CollisionFreeSpeedV2Agent::FIELDS,
        (ModelKind::GeneralizedCentrifugalForce, ParameterScope::Model) => {
            GeneralizedCentrifugalForceParams::FIELDS
        }
        (ModelKind::GeneralizedCentrifugalForce, ParameterScope::Agent) => {
            GeneralizedCentrifugalForceAgent::FIELDS
        }
    }
}
