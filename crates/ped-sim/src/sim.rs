//! The `Simulation` struct and its iteration loop.

use std::collections::BTreeSet;

use ped_agent::{AgentRef, AgentStore, NewAgent};
use ped_core::{AgentId, JourneyId, Logger, Point, SimClock, SimConfig, StageId};
use ped_journey::{Journey, JourneyDescription, Stage, StageGraph};
use ped_model::{AgentModelState, AgentView, ModelError, ModelResult, ModelUpdate, OperationalModel};
use ped_spatial::{Geometry, NeighborIndex, Polygon, brute_force_within};

use crate::{SimError, SimObserver, SimResult};

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Simulation` holds all state and advances it one iteration per
/// [`iterate`](Self::iterate) call:
///
/// 1. **Index**: bulk-load an R-tree over the current agent positions.
/// 2. **Compute** (optionally parallel with the `parallel` feature): every
///    agent's model update is computed from the pre-step snapshot and
///    buffered.  Nothing is written yet.
/// 3. **Commit**: buffered updates are written in slot order.  If any
///    update failed, nothing is written and the simulation halts.
/// 4. **Stages**: queue pops, completion predicates and transitions, on the
///    committed positions.
/// 5. **Removal**: agents inside their exit, and agents marked by the
///    host, leave the registry.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    config:   SimConfig,
    clock:    SimClock,
    model:    OperationalModel,
    geometry: Geometry,
    agents:   AgentStore,
    graph:    StageGraph,
    logger:   Logger,

    /// Agents the host asked to remove at the end of the next iteration.
    marked:       BTreeSet<AgentId>,
    removed_last: Vec<AgentId>,
    halted:       bool,
}

impl Simulation {
    pub(crate) fn new(
        config:   SimConfig,
        model:    OperationalModel,
        geometry: Geometry,
        logger:   Logger,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            model,
            geometry,
            agents: AgentStore::new(),
            graph: StageGraph::new(),
            logger,
            marked: BTreeSet::new(),
            removed_last: Vec::new(),
            halted: false,
        }
    }

    // ── Stages and journeys ───────────────────────────────────────────────

    pub fn add_waypoint_stage(&mut self, center: impl Into<Point>, radius: f64) -> SimResult<StageId> {
        Ok(self.graph.add_waypoint(center.into(), radius)?)
    }

    /// Auto-releasing queue: the front agent moves on once it stands on the
    /// first slot.  `slots` are ordered front to back.
    pub fn add_queue_stage<P: Into<Point>>(&mut self, slots: impl IntoIterator<Item = P>) -> SimResult<StageId> {
        Ok(self.graph.add_queue(slots.into_iter().map(Into::into).collect())?)
    }

    /// Queue released only through [`pop_queue`](Self::pop_queue).
    pub fn add_notifiable_queue_stage<P: Into<Point>>(
        &mut self,
        slots: impl IntoIterator<Item = P>,
    ) -> SimResult<StageId> {
        Ok(self.graph.add_notifiable_queue(slots.into_iter().map(Into::into).collect())?)
    }

    pub fn add_exit_stage<P: Into<Point>>(&mut self, area: impl IntoIterator<Item = P>) -> SimResult<StageId> {
        let polygon = Polygon::new(area)?;
        Ok(self.graph.add_exit(polygon)?)
    }

    pub fn add_journey(&mut self, journey: JourneyDescription) -> SimResult<JourneyId> {
        Ok(self.graph.add_journey(journey)?)
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Validate and insert an agent.
    ///
    /// The parameter block must belong to the simulation's model and be in
    /// range; the position must lie in the walkable area; the orientation
    /// must be non-zero (it is stored normalised); the starting stage must
    /// belong to the journey; the initial speed must not exceed the
    /// parameter block's `max_speed()`.  All models except the social force
    /// model also reject an agent overlapping a wall or another agent; the
    /// social force model only rejects a centre on a wall or on another
    /// agent.
    ///
    /// On error the registry is unchanged.
    pub fn add_agent(&mut self, agent: NewAgent) -> SimResult<AgentId> {
        self.model.validate_agent(&agent.model)?;
        let position = agent.position;
        if !position.is_finite() || !self.geometry.contains(position) {
            return Err(SimError::OutsideGeometry { x: position.x, y: position.y });
        }
        if !agent.velocity.is_finite() {
            return Err(SimError::InvalidAgent("velocity is not finite".into()));
        }
        let max_speed = agent.model.max_speed();
        if agent.velocity.norm() > max_speed {
            return Err(SimError::InvalidAgent(format!(
                "initial speed {:.3} exceeds the model bound {max_speed:.3}",
                agent.velocity.norm()
            )));
        }
        let orientation = agent.orientation.to_unit("orientation")?;
        let (journey, stage) = (agent.journey, agent.stage);
        self.graph.check_membership(journey, stage)?;

        let id = self.agents.next_id();
        self.check_placement(id, position, orientation, &agent.model)?;

        let destination = self.graph.join(id, stage);
        let inserted = self.agents.insert(NewAgent { orientation, ..agent }, destination);
        self.logger.debug(format_args!(
            "{inserted} added at ({:.3}, {:.3}), {journey} {stage}",
            position.x, position.y
        ));
        Ok(inserted)
    }

    fn check_placement(
        &self,
        id:          AgentId,
        position:    Point,
        orientation: Point,
        params:      &AgentModelState,
    ) -> SimResult<()> {
        let candidate = AgentView {
            id,
            position,
            orientation,
            velocity: Point::ZERO,
            destination: position,
            params,
        };
        let r = params.radius();
        let overlapping: Vec<AgentView<'_>> = (0..self.agents.len())
            .map(|slot| self.agents.view(slot))
            .filter(|other| position.distance(other.position) < r + other.radius())
            .collect();
        let wall_distance = self.geometry.distance_to_boundary(position);
        self.model.check_placement(&candidate, &overlapping, wall_distance)?;
        Ok(())
    }

    /// Remove an agent immediately.
    pub fn remove_agent(&mut self, id: AgentId) -> SimResult<()> {
        let stage = self.agents.get(id).ok_or(SimError::UnknownAgent(id))?.stage();
        self.graph.leave(id, stage);
        self.agents.remove(id);
        self.marked.remove(&id);
        self.logger.debug(format_args!("{id} removed"));
        Ok(())
    }

    /// Schedule an agent for removal at the end of the next iteration,
    /// together with the agents leaving through exits.
    pub fn mark_agent_for_removal(&mut self, id: AgentId) -> SimResult<()> {
        if !self.agents.contains(id) {
            return Err(SimError::UnknownAgent(id));
        }
        self.marked.insert(id);
        Ok(())
    }

    /// Move an agent onto another journey, starting at `stage`.
    pub fn switch_agent_journey(&mut self, id: AgentId, journey: JourneyId, stage: StageId) -> SimResult<()> {
        let slot = self.agents.slot_of(id).ok_or(SimError::UnknownAgent(id))?;
        self.graph.check_membership(journey, stage)?;

        let old_stage = self.agents.stages()[slot];
        self.graph.leave(id, old_stage);
        let destination = self.graph.join(id, stage);
        self.agents.set_journey(slot, journey, stage);
        self.agents.set_destination(slot, destination);
        self.logger.debug(format_args!("{id} switched to {journey} at {stage}"));
        Ok(())
    }

    /// Request the release of the front `count` agents of a queue stage.
    ///
    /// Applied during stage evaluation of the next [`iterate`](Self::iterate).
    pub fn pop_queue(&mut self, stage: StageId, count: usize) -> SimResult<()> {
        self.graph.pop(stage, count)?;
        self.logger.debug(format_args!("pop {count} requested on {stage}"));
        Ok(())
    }

    /// Copy of an agent's parameter block.
    pub fn agent_model(&self, id: AgentId) -> SimResult<AgentModelState> {
        self.agents
            .get(id)
            .map(|a| *a.model())
            .ok_or(SimError::UnknownAgent(id))
    }

    /// Replace an agent's parameter block, validated like `add_agent`.
    pub fn set_agent_model(&mut self, id: AgentId, state: AgentModelState) -> SimResult<()> {
        let slot = self.agents.slot_of(id).ok_or(SimError::UnknownAgent(id))?;
        self.model.validate_agent(&state)?;
        self.agents.set_model(slot, state);
        Ok(())
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance the simulation by one iteration.
    ///
    /// # Errors
    ///
    /// [`SimError::NonFinite`] if any agent's update is not finite.  The
    /// step is abandoned before anything is written, and every later call
    /// returns [`SimError::Halted`].
    pub fn iterate(&mut self) -> SimResult<()> {
        if self.halted {
            return Err(SimError::Halted);
        }
        let _span = tracing::trace_span!("iterate", iteration = self.clock.iteration.0).entered();

        // ── Compute (read-only) ───────────────────────────────────────────
        let updates = match self.compute_updates() {
            Ok(u) => u,
            Err(e) => {
                self.halted = true;
                self.logger.error(format_args!("iteration {} aborted: {e}", self.clock.iteration));
                return Err(e);
            }
        };

        // ── Commit ────────────────────────────────────────────────────────
        self.agents.commit(&updates);

        // ── Stages ────────────────────────────────────────────────────────
        let mut removed = self.graph.evaluate(&mut self.agents, &self.logger);
        for id in &removed {
            self.logger.debug(format_args!("{id} reached its exit"));
        }

        // ── Removal ───────────────────────────────────────────────────────
        removed.extend(std::mem::take(&mut self.marked).into_iter().filter(|id| self.agents.contains(*id)));
        removed.sort_unstable();
        removed.dedup();
        for &id in &removed {
            if let Some(a) = self.agents.get(id) {
                let stage = a.stage();
                self.graph.leave(id, stage);
            }
        }
        self.agents.remove_many(&removed);
        self.removed_last = removed;

        self.clock.advance();
        Ok(())
    }

    /// Buffered model updates for every agent, in slot order.  The first
    /// failing slot decides the error, whichever path computed it.
    pub(crate) fn compute_updates(&self) -> SimResult<Vec<ModelUpdate>> {
        let index = NeighborIndex::build(self.agents.positions());
        let step = |slot: usize| self.update_for(&index, slot);

        #[cfg(not(feature = "parallel"))]
        let results: Vec<ModelResult<ModelUpdate>> = (0..self.agents.len()).map(step).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<ModelResult<ModelUpdate>> = {
            use rayon::prelude::*;
            (0..self.agents.len()).into_par_iter().map(step).collect()
        };

        Self::collect_updates(results)
    }

    /// Serial reference for the parallel compute phase.
    #[cfg(all(test, feature = "parallel"))]
    pub(crate) fn compute_updates_serial(&self) -> SimResult<Vec<ModelUpdate>> {
        let index = NeighborIndex::build(self.agents.positions());
        Self::collect_updates((0..self.agents.len()).map(|slot| self.update_for(&index, slot)).collect())
    }

    fn update_for(&self, index: &NeighborIndex, slot: usize) -> ModelResult<ModelUpdate> {
        let agent = self.agents.view(slot);
        let neighbors: Vec<AgentView<'_>> = index
            .within_excluding(agent.position, self.model.neighbor_cutoff(), slot)
            .into_iter()
            .map(|s| self.agents.view(s))
            .collect();
        let walls = self.geometry.walls_within(agent.position, self.model.wall_cutoff());
        self.model.compute_step(&agent, &neighbors, &walls, self.clock.dt)
    }

    fn collect_updates(results: Vec<ModelResult<ModelUpdate>>) -> SimResult<Vec<ModelUpdate>> {
        results
            .into_iter()
            .collect::<ModelResult<Vec<_>>>()
            .map_err(|e| match e {
                ModelError::NonFinite { agent, what } => SimError::NonFinite { agent, what },
                other => SimError::Model(other),
            })
    }

    /// Iterate until no agents remain or `config.max_iterations` is reached.
    ///
    /// Observer hooks fire around every iteration; see [`SimObserver`].
    /// `on_sim_end` is called even when an iteration fails.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let result = self.run_inner(observer);
        observer.on_sim_end(self);
        result
    }

    fn run_inner<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while !self.agents.is_empty() && self.iteration_count() < self.config.max_iterations {
            if self.clock.iteration.is_multiple_of(self.config.snapshot_interval) {
                observer.on_snapshot(self);
            }
            observer.on_iteration_start(self.clock.iteration);
            self.iterate()?;
            observer.on_iteration_end(self);
        }
        Ok(())
    }

    // ── Read-only accessors ───────────────────────────────────────────────

    pub fn agent(&self, id: AgentId) -> Option<AgentRef<'_>> {
        self.agents.get(id)
    }

    /// All live agents in ascending id order.
    pub fn agents(&self) -> impl ExactSizeIterator<Item = AgentRef<'_>> + '_ {
        self.agents.iter()
    }

    /// Ids of agents whose centre lies within `radius` of `center`,
    /// ascending.
    pub fn agents_in_range(&self, center: impl Into<Point>, radius: f64) -> Vec<AgentId> {
        let ids = self.agents.ids();
        brute_force_within(self.agents.positions(), center.into(), radius)
            .into_iter()
            .map(|slot| ids[slot])
            .collect()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Completed iterations.
    pub fn iteration_count(&self) -> u64 {
        self.clock.iteration.0
    }

    /// Simulated seconds, `iteration_count * dt`.
    pub fn elapsed_time(&self) -> f64 {
        self.clock.elapsed_time()
    }

    pub fn delta_time(&self) -> f64 {
        self.clock.dt
    }

    /// Agents removed by the most recent iteration, ascending.
    pub fn removed_agents_in_last_iteration(&self) -> &[AgentId] {
        &self.removed_last
    }

    /// `true` after a numerical failure.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn model(&self) -> &OperationalModel {
        &self.model
    }

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.graph.stage(id)
    }

    pub fn journey(&self, id: JourneyId) -> Option<&Journey> {
        self.graph.journey(id)
    }

    pub fn queue_len(&self, stage: StageId) -> SimResult<usize> {
        Ok(self.graph.queue_len(stage)?)
    }

    /// Queued agents of a queue stage, front first.
    pub fn queue_members(&self, stage: StageId) -> SimResult<&[AgentId]> {
        Ok(self.graph.queue_members(stage)?)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}
