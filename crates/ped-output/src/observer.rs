//! `TrajectoryObserver<W>` — bridges `SimObserver` to a `TrajectoryWriter`.

use std::collections::BTreeMap;

use ped_core::{AgentId, JourneyId, StageId};
use ped_sim::{SimObserver, Simulation};

use crate::row::{StageRow, TrajectoryRow};
use crate::writer::TrajectoryWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent trajectories and stage assignments to
/// any [`TrajectoryWriter`] backend.
///
/// Trajectory rows are written at every snapshot and once more for the final
/// state.  Stage rows are written whenever an agent's journey or stage
/// differs from what was last recorded for it, checked after every
/// iteration.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct TrajectoryObserver<W: TrajectoryWriter> {
    writer:        W,
    assignments:   BTreeMap<AgentId, (JourneyId, StageId)>,
    last_snapshot: Option<u64>,
    last_error:    Option<OutputError>,
}

impl<W: TrajectoryWriter> TrajectoryObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            assignments:   BTreeMap::new(),
            last_snapshot: None,
            last_error:    None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_snapshot(&mut self, sim: &Simulation) {
        let iteration = sim.iteration_count();
        self.last_snapshot = Some(iteration);
        let time = sim.elapsed_time();
        let rows: Vec<TrajectoryRow> = sim
            .agents()
            .map(|a| TrajectoryRow {
                iteration,
                time,
                agent_id: a.id().0,
                x:        a.position().x,
                y:        a.position().y,
                ori_x:    a.orientation().x,
                ori_y:    a.orientation().y,
                speed:    a.speed(),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_trajectory(&rows);
            self.store_err(result);
        }
    }

    fn record_stages(&mut self, sim: &Simulation) {
        for id in sim.removed_agents_in_last_iteration() {
            self.assignments.remove(id);
        }
        let iteration = sim.iteration_count();
        let mut rows = Vec::new();
        for a in sim.agents() {
            let now = (a.journey(), a.stage());
            if self.assignments.insert(a.id(), now) != Some(now) {
                rows.push(StageRow {
                    iteration,
                    agent_id:   a.id().0,
                    journey_id: now.0.0,
                    stage_id:   now.1.0,
                });
            }
        }
        if !rows.is_empty() {
            let result = self.writer.write_stages(&rows);
            self.store_err(result);
        }
    }
}

impl<W: TrajectoryWriter> SimObserver for TrajectoryObserver<W> {
    fn on_snapshot(&mut self, sim: &Simulation) {
        self.write_snapshot(sim);
        self.record_stages(sim);
    }

    fn on_iteration_end(&mut self, sim: &Simulation) {
        self.record_stages(sim);
    }

    fn on_sim_end(&mut self, sim: &Simulation) {
        if self.last_snapshot != Some(sim.iteration_count()) {
            self.write_snapshot(sim);
        }
        let result = self.writer.finish();
        self.store_err(result);
    }
}
