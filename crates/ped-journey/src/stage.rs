//! Stages: the checkpoints agents walk through.
//!
//! Stages are owned by the [`StageGraph`](crate::StageGraph) and referred to
//! by `StageId` everywhere else.

use ped_core::{AgentId, Point};
use ped_spatial::Polygon;

use crate::{JourneyError, JourneyResult};

/// Distance within which the front agent of an auto-releasing queue counts
/// as standing on the front slot, metres.
pub const QUEUE_SLOT_TOLERANCE: f64 = 0.1;

/// Waiting line state shared by both queue flavours.
///
/// `members` is FIFO: index 0 is the front.  Member *i* walks to
/// `slots[min(i, n - 1)]`, so overflow piles up at the last slot.
#[derive(Clone, Debug, PartialEq)]
pub struct QueueState {
    slots:        Vec<Point>,
    members:      Vec<AgentId>,
    pending_pops: usize,
}

impl QueueState {
    pub(crate) fn new(slots: Vec<Point>) -> JourneyResult<Self> {
        if slots.is_empty() {
            return Err(JourneyError::InvalidStage("a queue needs at least one slot".into()));
        }
        if slots.iter().any(|p| !p.is_finite()) {
            return Err(JourneyError::InvalidStage("queue slot is not finite".into()));
        }
        Ok(Self { slots, members: Vec::new(), pending_pops: 0 })
    }

    pub fn slots(&self) -> &[Point] {
        &self.slots
    }

    /// Queued agents, front first.
    pub fn members(&self) -> &[AgentId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// `true` once every slot is taken; further members share the last one.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.slots.len()
    }

    /// Releases requested but not yet applied.
    pub fn pending_pops(&self) -> usize {
        self.pending_pops
    }

    /// Slot the member at `index` walks to.
    pub fn slot_for(&self, index: usize) -> Point {
        self.slots[index.min(self.slots.len() - 1)]
    }

    pub(crate) fn push(&mut self, agent: AgentId) {
        self.members.push(agent);
    }

    pub(crate) fn remove(&mut self, agent: AgentId) -> bool {
        match self.members.iter().position(|m| *m == agent) {
            Some(i) => {
                self.members.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn request_pop(&mut self, count: usize) {
        self.pending_pops = self.pending_pops.saturating_add(count);
    }

    /// Front members to release now; the request is cleared, surplus pops
    /// included.
    pub(crate) fn take_pops(&mut self) -> Vec<AgentId> {
        let n = std::mem::take(&mut self.pending_pops).min(self.members.len());
        self.members[..n].to_vec()
    }
}

/// A routing checkpoint.
#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
    /// Completed when the agent is within `radius` of `center`.
    Waypoint { center: Point, radius: f64 },
    /// Waiting line whose front agent leaves as soon as it reaches the front
    /// slot.  Also honours explicit pops.
    Queue(QueueState),
    /// Waiting line that only releases agents on explicit pops.
    NotifiableQueue(QueueState),
    /// Terminal area.  Agents whose current stage is the exit are removed
    /// once inside `area`; they steer towards `centroid`.
    Exit { area: Polygon, centroid: Point },
}

impl Stage {
    pub(crate) fn waypoint(center: Point, radius: f64) -> JourneyResult<Self> {
        if !center.is_finite() {
            return Err(JourneyError::InvalidStage("waypoint center is not finite".into()));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(JourneyError::InvalidStage(format!(
                "waypoint radius must be finite and > 0, got {radius}"
            )));
        }
        Ok(Stage::Waypoint { center, radius })
    }

    pub(crate) fn exit(area: Polygon) -> Self {
        let centroid = area.centroid();
        Stage::Exit { area, centroid }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Stage::Exit { .. })
    }

    pub fn queue(&self) -> Option<&QueueState> {
        match self {
            Stage::Queue(q) | Stage::NotifiableQueue(q) => Some(q),
            _ => None,
        }
    }

    pub(crate) fn queue_mut(&mut self) -> Option<&mut QueueState> {
        match self {
            Stage::Queue(q) | Stage::NotifiableQueue(q) => Some(q),
            _ => None,
        }
    }

    /// Steering target for a non-queue stage, or the back slot of a queue.
    pub fn target(&self) -> Point {
        match self {
            Stage::Waypoint { center, .. } => *center,
            Stage::Queue(q) | Stage::NotifiableQueue(q) => q.slot_for(q.len()),
            Stage::Exit { centroid, .. } => *centroid,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Stage::Waypoint { .. }   => "waypoint",
            Stage::Queue(_)          => "queue",
            Stage::NotifiableQueue(_) => "notifiable queue",
            Stage::Exit { .. }       => "exit",
        }
    }
}
