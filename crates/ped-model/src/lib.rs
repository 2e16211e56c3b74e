//! `ped-model` — operational models: how an agent moves in one step.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                    |
//! |--------------------|-------------------------------------------------------------|
//! | [`model`]          | `OperationalModel`, `ModelKind`, `AgentModelState` dispatch |
//! | [`velocity`]       | Velocity model                                              |
//! | [`social_force`]   | Social force model                                          |
//! | [`collision_free`] | Collision-free speed model, v1 and v2                       |
//! | [`centrifugal`]    | Generalized centrifugal force model                         |
//! | [`params`]         | Parameter blocks, `ParameterSet` key/value construction     |
//! | [`alias`]          | Deprecated parameter names                                  |
//! | [`context`]        | `AgentView<'a>` — read-only agent snapshot                  |
//! | [`update`]         | `ModelUpdate` — buffered per-agent result                   |
//! | [`error`]          | `ModelError`, `ModelResult<T>`                              |
//!
//! # Design notes
//!
//! The stepper in ped-sim runs in two phases:
//!
//! 1. **Compute phase** (parallel): for every agent, call
//!    `OperationalModel::compute_step` with views of its neighbours and the
//!    nearby walls.  Everything is read through `AgentView`s built from the
//!    pre-step registry; nothing is mutated.
//!
//! 2. **Commit phase** (sequential): write the collected `ModelUpdate`s
//!    back to the registry.
//!
//! `compute_step` is therefore a pure function, and every model is `Copy`
//! plain data, trivially `Send + Sync`.

#[macro_use]
pub mod params;

pub mod alias;
pub mod centrifugal;
pub mod collision_free;
pub mod context;
pub mod error;
pub mod model;
pub mod social_force;
pub mod update;
pub mod velocity;

mod common;


pub use centrifugal::{GeneralizedCentrifugalForceAgent, GeneralizedCentrifugalForceParams};
pub use collision_free::{CollisionFreeSpeedAgent, CollisionFreeSpeedParams, CollisionFreeSpeedV2Agent};
pub use context::AgentView;
pub use error::{ModelError, ModelResult};
pub use model::{AgentModelState, ModelKind, OperationalModel};
pub use params::{ParameterScope, ParameterSet, canonical_fields};
pub use social_force::{SocialForceAgent, SocialForceParams};
pub use update::ModelUpdate;
pub use velocity::{VelocityAgent, VelocityParams};
