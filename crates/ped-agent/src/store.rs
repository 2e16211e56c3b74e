//! Core agent storage.
//!
//! # Layout
//!
//! Every `Vec` holds one entry per live agent, at the same *slot*.  Slots
//! are ordered by ascending `AgentId`: ids only ever grow, so insertion is a
//! push, and removal keeps the relative order.  Iterating slots therefore
//! visits agents in id order, which is what makes a step deterministic.
//!
//! Slots are not stable across removals; ids are.  Look up a slot with
//! [`AgentStore::slot_of`] (binary search) when holding an id across steps.

use ped_core::{AgentId, JourneyId, Point, StageId};
use ped_model::{AgentModelState, AgentView, ModelUpdate};

use crate::NewAgent;

/// Structure-of-Arrays storage for all live agents.
#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    next_id: u64,

    ids: Vec<AgentId>,

    // ── Kinematic state ───────────────────────────────────────────────────
    position:    Vec<Point>,
    /// Unit heading.
    orientation: Vec<Point>,
    velocity:    Vec<Point>,

    // ── Routing state ─────────────────────────────────────────────────────
    journey:     Vec<JourneyId>,
    stage:       Vec<StageId>,
    /// Point the model steers towards, refreshed by stage evaluation.
    destination: Vec<Point>,

    // ── Model parameters ──────────────────────────────────────────────────
    model: Vec<AgentModelState>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id the next insertion will receive.
    #[inline]
    pub fn next_id(&self) -> AgentId {
        AgentId(self.next_id)
    }

    // ── Insertion / removal ───────────────────────────────────────────────

    /// Append an agent and return its fresh id.
    ///
    /// `agent.orientation` must already be a unit vector and `destination`
    /// the point its starting stage assigns; the simulation guarantees both.
    pub fn insert(&mut self, agent: NewAgent, destination: Point) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;

        self.ids.push(id);
        self.position.push(agent.position);
        self.orientation.push(agent.orientation);
        self.velocity.push(agent.velocity);
        self.journey.push(agent.journey);
        self.stage.push(agent.stage);
        self.destination.push(destination);
        self.model.push(agent.model);
        id
    }

    /// Remove one agent.  Returns `false` if the id is not live.
    pub fn remove(&mut self, id: AgentId) -> bool {
        self.remove_many(&[id]) == 1
    }

    /// Remove every live agent in `ids` (unknown ids are ignored) in a
    /// single pass.  Returns the number removed.
    pub fn remove_many(&mut self, ids: &[AgentId]) -> usize {
        let mut keep = vec![true; self.len()];
        let mut removed = 0;
        for id in ids {
            if let Some(slot) = self.slot_of(*id) {
                if keep[slot] {
                    keep[slot] = false;
                    removed += 1;
                }
            }
        }
        if removed == 0 {
            return 0;
        }

        retain_by_mask(&mut self.ids, &keep);
        retain_by_mask(&mut self.position, &keep);
        retain_by_mask(&mut self.orientation, &keep);
        retain_by_mask(&mut self.velocity, &keep);
        retain_by_mask(&mut self.journey, &keep);
        retain_by_mask(&mut self.stage, &keep);
        retain_by_mask(&mut self.destination, &keep);
        retain_by_mask(&mut self.model, &keep);
        removed
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Slot of a live agent, found by binary search over the sorted ids.
    #[inline]
    pub fn slot_of(&self, id: AgentId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.slot_of(id).is_some()
    }

    pub fn get(&self, id: AgentId) -> Option<AgentRef<'_>> {
        self.slot_of(id).map(|slot| AgentRef { store: self, slot })
    }

    /// Read-only handle for the agent in `slot`.
    ///
    /// # Panics
    /// Panics if `slot >= len()`.
    pub fn at(&self, slot: usize) -> AgentRef<'_> {
        assert!(slot < self.len(), "slot {slot} out of range");
        AgentRef { store: self, slot }
    }

    /// All live agents in ascending id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = AgentRef<'_>> + '_ {
        (0..self.len()).map(move |slot| AgentRef { store: self, slot })
    }

    // ── Column access ─────────────────────────────────────────────────────

    pub fn ids(&self) -> &[AgentId] {
        &self.ids
    }

    pub fn positions(&self) -> &[Point] {
        &self.position
    }

    pub fn orientations(&self) -> &[Point] {
        &self.orientation
    }

    pub fn velocities(&self) -> &[Point] {
        &self.velocity
    }

    pub fn journeys(&self) -> &[JourneyId] {
        &self.journey
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stage
    }

    pub fn destinations(&self) -> &[Point] {
        &self.destination
    }

    pub fn models(&self) -> &[AgentModelState] {
        &self.model
    }

    /// Model input for the agent in `slot`.
    #[inline]
    pub fn view(&self, slot: usize) -> AgentView<'_> {
        AgentView {
            id:          self.ids[slot],
            position:    self.position[slot],
            orientation: self.orientation[slot],
            velocity:    self.velocity[slot],
            destination: self.destination[slot],
            params:      &self.model[slot],
        }
    }

    // ── Mutation (commit phase only) ──────────────────────────────────────

    /// Write one buffered model result per slot.
    ///
    /// # Panics
    /// Panics if `updates.len() != len()`.
    pub fn commit(&mut self, updates: &[ModelUpdate]) {
        assert_eq!(updates.len(), self.len(), "one update per agent");
        for (slot, u) in updates.iter().enumerate() {
            self.position[slot] = u.position;
            self.orientation[slot] = u.orientation;
            self.velocity[slot] = u.velocity;
        }
    }

    #[inline]
    pub fn set_stage(&mut self, slot: usize, stage: StageId) {
        self.stage[slot] = stage;
    }

    #[inline]
    pub fn set_journey(&mut self, slot: usize, journey: JourneyId, stage: StageId) {
        self.journey[slot] = journey;
        self.stage[slot] = stage;
    }

    #[inline]
    pub fn set_destination(&mut self, slot: usize, destination: Point) {
        self.destination[slot] = destination;
    }

    #[inline]
    pub fn set_model(&mut self, slot: usize, model: AgentModelState) {
        self.model[slot] = model;
    }
}

/// `Vec::retain` visits elements in order, so a parallel mask lines up.
fn retain_by_mask<T>(v: &mut Vec<T>, keep: &[bool]) {
    let mut i = 0;
    v.retain(|_| {
        let k = keep[i];
        i += 1;
        k
    });
}

// ── AgentRef ──────────────────────────────────────────────────────────────────

/// Read-only handle to one live agent.
///
/// Borrowing the store keeps the handle valid: the registry cannot change
/// while one is alive.
#[derive(Copy, Clone)]
pub struct AgentRef<'a> {
    store: &'a AgentStore,
    slot:  usize,
}

impl<'a> AgentRef<'a> {
    #[inline]
    pub fn id(&self) -> AgentId {
        self.store.ids[self.slot]
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.store.position[self.slot]
    }

    #[inline]
    pub fn orientation(&self) -> Point {
        self.store.orientation[self.slot]
    }

    #[inline]
    pub fn velocity(&self) -> Point {
        self.store.velocity[self.slot]
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity().norm()
    }

    #[inline]
    pub fn journey(&self) -> JourneyId {
        self.store.journey[self.slot]
    }

    #[inline]
    pub fn stage(&self) -> StageId {
        self.store.stage[self.slot]
    }

    #[inline]
    pub fn destination(&self) -> Point {
        self.store.destination[self.slot]
    }

    #[inline]
    pub fn model(&self) -> &'a AgentModelState {
        &self.store.model[self.slot]
    }
}

impl std::fmt::Debug for AgentRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRef")
            .field("id", &self.id())
            .field("position", &self.position())
            .field("stage", &self.stage())
            .finish()
    }
}
