//! Simulation observer trait for progress reporting and data collection.

use ped_core::Iteration;

use crate::Simulation;

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] at key
/// points in the iteration loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers get the simulation read-only;
/// output writers record snapshots through its accessors.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_iteration_end(&mut self, sim: &Simulation) {
///         if sim.iteration_count().is_multiple_of(self.interval) {
///             println!("{}: {} agents", sim.iteration_count(), sim.agent_count());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before each iteration.
    fn on_iteration_start(&mut self, _iteration: Iteration) {}

    /// Called after each completed iteration.
    fn on_iteration_end(&mut self, _sim: &Simulation) {}

    /// Called every `config.snapshot_interval` iterations with the state
    /// *before* that iteration runs, so iteration 0 is the initial placement.
    fn on_snapshot(&mut self, _sim: &Simulation) {}

    /// Called once when `run` stops, whatever the reason.
    fn on_sim_end(&mut self, _sim: &Simulation) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
