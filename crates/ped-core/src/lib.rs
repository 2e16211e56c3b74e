//! `ped-core` — foundational types for the pedestrian crowd simulator.
//!
//! This crate is a dependency of every other `ped-*` crate.  It intentionally
//! has no `ped-*` dependencies and minimal external ones (only `thiserror`
//! and `tracing`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `StageId`, `JourneyId`                     |
//! | [`point`]       | `Point` — 2-D vector in metres                        |
//! | [`time`]        | `Iteration`, `SimClock`, `SimConfig`                  |
//! | [`log`]         | `LogLevel`, `Logger` (caller-registered callbacks)    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod ids;
pub mod log;
pub mod point;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, JourneyId, StageId};
pub use log::{LogLevel, Logger};
pub use point::Point;
pub use time::{Iteration, SimClock, SimConfig};
