//! `ped-sim` — the simulation stepper for the pedestrian crowd simulator.
//!
//! # Two-phase iteration
//!
//! ```text
//! iterate():
//!   ① Index    — bulk-load an R-tree over all agent positions.
//!   ② Compute  — OperationalModel::compute_step for every agent against the
//!                pre-step snapshot; results buffered
//!                (parallel with the `parallel` feature).
//!   ③ Commit   — write buffered updates in ascending AgentId order, or halt
//!                with state untouched if any update is non-finite.
//!   ④ Stages   — queue pops, completion predicates, transitions.
//!   ⑤ Removal  — agents inside their exit and agents marked by the host.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the compute phase on Rayon's thread pool.         |
//! | `serde`    | Propagates serde derives to the lower crates.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ped_agent::NewAgent;
//! use ped_journey::JourneyDescription;
//! use ped_model::{ModelKind, OperationalModel};
//! use ped_sim::{NoopObserver, SimBuilder};
//! use ped_spatial::GeometryBuilder;
//!
//! let geometry = GeometryBuilder::new([(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)]).build()?;
//! let mut sim = SimBuilder::new(OperationalModel::default_for(ModelKind::CollisionFreeSpeed), geometry)
//!     .build()?;
//! let exit = sim.add_exit_stage([(19.0, 4.0), (20.0, 4.0), (20.0, 6.0), (19.0, 6.0)])?;
//! let journey = sim.add_journey(JourneyDescription::new([exit]))?;
//! sim.add_agent(NewAgent::new(journey, exit, (1.0, 5.0)))?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Simulation;
