//! `ped-agent` — Structure-of-Arrays registry of live agents.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`store`]   | `AgentStore` (SoA arrays keyed by ascending `AgentId`), `AgentRef` |
//! | [`builder`] | `NewAgent` (fluent description of an agent to insert)       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `NewAgent`.        |
//!
//! The store does no validation; the simulation checks parameters and
//! placement before calling [`AgentStore::insert`].

pub mod builder;
pub mod store;


pub use builder::NewAgent;
pub use store::{AgentRef, AgentStore};
