//! `StageGraph`: stage table, journey table, and per-step evaluation.
//!
//! # Evaluation order
//!
//! [`StageGraph::evaluate`] runs after the kinematic commit of a step, on
//! post-integration positions:
//!
//! 1. Recount occupancy (agents whose current stage is each stage).
//! 2. Apply pending queue pops, queues in ascending stage id, members
//!    front first.
//! 3. Check every other agent's completion predicate in ascending agent id.
//! 4. Refresh every agent's destination (queue members get their slot).
//! 5. Return the agents standing inside their current exit.
//!
//! An agent takes at most one transition per step.  Removal of exited agents
//! is left to the caller, so the registry is never mutated while it is
//! being walked.

use ped_agent::AgentStore;
use ped_core::{AgentId, JourneyId, Logger, Point, StageId};
use ped_spatial::Polygon;

use crate::stage::QUEUE_SLOT_TOLERANCE;
use crate::{Journey, JourneyDescription, JourneyError, JourneyResult, QueueState, Stage};

#[derive(Clone, Debug, Default)]
pub struct StageGraph {
    stages:    Vec<Stage>,
    journeys:  Vec<Journey>,
    occupancy: Vec<usize>,
}

impl StageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──────────────────────────────────────────────────────

    fn push_stage(&mut self, stage: Stage) -> JourneyResult<StageId> {
        let id = StageId::try_from(self.stages.len())
            .map_err(|_| JourneyError::InvalidStage("too many stages".into()))?;
        self.stages.push(stage);
        self.occupancy.push(0);
        Ok(id)
    }

    pub fn add_waypoint(&mut self, center: Point, radius: f64) -> JourneyResult<StageId> {
        self.push_stage(Stage::waypoint(center, radius)?)
    }

    pub fn add_queue(&mut self, slots: Vec<Point>) -> JourneyResult<StageId> {
        self.push_stage(Stage::Queue(QueueState::new(slots)?))
    }

    pub fn add_notifiable_queue(&mut self, slots: Vec<Point>) -> JourneyResult<StageId> {
        self.push_stage(Stage::NotifiableQueue(QueueState::new(slots)?))
    }

    pub fn add_exit(&mut self, area: Polygon) -> JourneyResult<StageId> {
        self.push_stage(Stage::exit(area))
    }

    pub fn add_journey(&mut self, desc: JourneyDescription) -> JourneyResult<JourneyId> {
        let journey = Journey::validate(desc, &self.stages)?;
        let id = JourneyId::try_from(self.journeys.len())
            .map_err(|_| JourneyError::InvalidStage("too many journeys".into()))?;
        self.journeys.push(journey);
        Ok(id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.get(id.index())
    }

    pub fn journey(&self, id: JourneyId) -> Option<&Journey> {
        self.journeys.get(id.index())
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn journey_count(&self) -> usize {
        self.journeys.len()
    }

    /// Agents whose current stage is `stage`, as of the last update.
    pub fn occupancy(&self, stage: StageId) -> usize {
        self.occupancy.get(stage.index()).copied().unwrap_or(0)
    }

    /// `Ok` if `stage` belongs to `journey`.
    pub fn check_membership(&self, journey: JourneyId, stage: StageId) -> JourneyResult<()> {
        let j = self.journey(journey).ok_or(JourneyError::UnknownJourney(journey))?;
        if self.stage(stage).is_none() {
            return Err(JourneyError::UnknownStage(stage));
        }
        if j.contains(stage) {
            Ok(())
        } else {
            Err(JourneyError::StageNotInJourney { journey, stage })
        }
    }

    pub fn queue_len(&self, stage: StageId) -> JourneyResult<usize> {
        Ok(self.queue(stage)?.len())
    }

    /// Queued agents, front first.
    pub fn queue_members(&self, stage: StageId) -> JourneyResult<&[AgentId]> {
        Ok(self.queue(stage)?.members())
    }

    fn queue(&self, stage: StageId) -> JourneyResult<&QueueState> {
        self.stage(stage)
            .ok_or(JourneyError::UnknownStage(stage))?
            .queue()
            .ok_or(JourneyError::NotAQueue(stage))
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Register `agent` as heading to `stage` and return its destination.
    /// Queues append the agent at the back.
    ///
    /// The stage must exist; callers check with
    /// [`check_membership`](Self::check_membership) first.
    pub fn join(&mut self, agent: AgentId, stage: StageId) -> Point {
        self.occupancy[stage.index()] += 1;
        let s = &mut self.stages[stage.index()];
        match s.queue_mut() {
            Some(q) => {
                q.push(agent);
                q.slot_for(q.len() - 1)
            }
            None => s.target(),
        }
    }

    /// Undo [`join`](Self::join) for an agent leaving `stage` (removed,
    /// switched, or transitioned).
    pub fn leave(&mut self, agent: AgentId, stage: StageId) {
        if let Some(n) = self.occupancy.get_mut(stage.index()) {
            *n = n.saturating_sub(1);
        }
        if let Some(q) = self.stages.get_mut(stage.index()).and_then(Stage::queue_mut) {
            q.remove(agent);
        }
    }

    /// Request the release of the front `count` agents of a queue.
    ///
    /// Takes effect in the next [`evaluate`](Self::evaluate).  Requests
    /// accumulate until then; pops beyond the queue length are discarded.
    pub fn pop(&mut self, stage: StageId, count: usize) -> JourneyResult<()> {
        self.stages
            .get_mut(stage.index())
            .ok_or(JourneyError::UnknownStage(stage))?
            .queue_mut()
            .ok_or(JourneyError::NotAQueue(stage))?
            .request_pop(count);
        Ok(())
    }

    // ── Evaluation ────────────────────────────────────────────────────────

    /// Run stage completion and transitions for one step.  Returns the
    /// agents to remove, in ascending id order.
    pub fn evaluate(&mut self, store: &mut AgentStore, logger: &Logger) -> Vec<AgentId> {
        self.recount(store);
        let mut moved = vec![false; store.len()];

        // Pops, queue by queue.
        for stage_idx in 0..self.stages.len() {
            let released = match self.stages[stage_idx].queue_mut() {
                Some(q) => q.take_pops(),
                None => continue,
            };
            let stage = StageId(stage_idx as u32);
            for agent in released {
                let Some(slot) = store.slot_of(agent) else { continue };
                if self.advance(store, slot, stage, logger) {
                    moved[slot] = true;
                } else {
                    logger.warning(format!(
                        "{agent} popped from {stage}, but its journey has no transition from it; it stays queued"
                    ));
                }
            }
        }

        // Completion predicates, agent by agent.
        let mut exits = Vec::new();
        for slot in 0..store.len() {
            if moved[slot] {
                continue;
            }
            let stage = store.stages()[slot];
            let Some(s) = self.stages.get(stage.index()) else { continue };
            let pos = store.positions()[slot];
            let id = store.ids()[slot];

            let done = match s {
                Stage::Waypoint { center, radius } => pos.distance(*center) <= *radius,
                Stage::Queue(q) => {
                    q.members().first() == Some(&id)
                        && pos.distance(q.slot_for(0)) <= QUEUE_SLOT_TOLERANCE
                }
                Stage::NotifiableQueue(_) => false,
                Stage::Exit { area, .. } => {
                    if area.contains(pos) {
                        exits.push(id);
                    }
                    false
                }
            };
            if done {
                moved[slot] = self.advance(store, slot, stage, logger);
            }
        }

        self.refresh_destinations(store);
        exits
    }

    /// Move the agent in `slot` along its journey's transition out of
    /// `stage`.  Returns `false`, leaving the agent untouched, when the
    /// stage has no outgoing transition.
    fn advance(
        &mut self,
        store:  &mut AgentStore,
        slot:   usize,
        stage:  StageId,
        logger: &Logger,
    ) -> bool {
        let journey = store.journeys()[slot];
        let Some(rule) = self
            .journeys
            .get_mut(journey.index())
            .and_then(|j| j.transition_mut(stage))
        else {
            return false;
        };
        let next = rule.next(&self.occupancy);
        let agent = store.ids()[slot];

        self.leave(agent, stage);
        let destination = self.join(agent, next);
        store.set_stage(slot, next);
        store.set_destination(slot, destination);
        logger.debug(format_args!("{agent}: {stage} -> {next}"));
        true
    }

    fn recount(&mut self, store: &AgentStore) {
        self.occupancy.iter_mut().for_each(|n| *n = 0);
        for stage in store.stages() {
            if let Some(n) = self.occupancy.get_mut(stage.index()) {
                *n += 1;
            }
        }
    }

    fn refresh_destinations(&self, store: &mut AgentStore) {
        for slot in 0..store.len() {
            if let Some(s) = self.stages.get(store.stages()[slot].index()) {
                if s.queue().is_none() {
                    store.set_destination(slot, s.target());
                }
            }
        }
        for q in self.stages.iter().filter_map(Stage::queue) {
            for (i, agent) in q.members().iter().enumerate() {
                if let Some(slot) = store.slot_of(*agent) {
                    store.set_destination(slot, q.slot_for(i));
                }
            }
        }
    }
}
