//! `ped-journey` — stages, transitions, journeys, and stage evaluation.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`stage`]      | `Stage` (waypoint, queue, notifiable queue, exit), `QueueState` |
//! | [`transition`] | `Transition` (fixed, round robin, least congested), `TransitionState` |
//! | [`journey`]    | `JourneyDescription`, validated `Journey`                  |
//! | [`graph`]      | `StageGraph` (stage + journey tables, per-step `evaluate`) |
//! | [`error`]      | `JourneyError`, `JourneyResult<T>`                         |
//!
//! # Routing model (summary)
//!
//! Every agent follows one journey and has one current stage.  When the
//! stage's completion predicate holds (or a queue pop releases the agent),
//! the journey's transition for that stage picks the next one:
//!
//! ```text
//! waypoint         completed when |pos - center| <= radius
//! queue            front member completed on reaching slot 0, or on pop
//! notifiable queue completed only on pop
//! exit             never completed; the agent is removed once inside
//! ```

pub mod error;
pub mod graph;
pub mod journey;
pub mod stage;
pub mod transition;

#[cfg(test)]
mod tests;

pub use error::{JourneyError, JourneyResult};
pub use graph::StageGraph;
pub use journey::{Journey, JourneyDescription};
pub use stage::{QUEUE_SLOT_TOLERANCE, QueueState, Stage};
pub use transition::{Transition, TransitionState};
