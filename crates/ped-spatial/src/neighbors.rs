//! Per-iteration neighbour index over agent positions.
//!
//! The index is rebuilt from scratch at the start of every iteration with
//! `RTree::bulk_load`, which is O(N log N) and cheaper than tracking moves.
//! Queries return *slots*: positions in the slice passed to
//! [`NeighborIndex::build`], which the caller maps back to agents.
//!
//! [`brute_force_within`] is the linear-scan reference.  Both paths use the
//! same inclusive distance predicate and return slots in ascending order, so
//! they agree exactly.

use rstar::{PointDistance, RTree, RTreeObject};

use ped_core::Point;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the agent R-tree.
#[derive(Clone, Copy)]
struct AgentEntry {
    point: [f64; 2],
    slot:  u32,
}

impl RTreeObject for AgentEntry {
    type Envelope = rstar::AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        rstar::AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        Point::from(self.point).distance_squared(Point::from(*point))
    }
}

// ── NeighborIndex ─────────────────────────────────────────────────────────────

/// Radius queries over a snapshot of agent positions.
pub struct NeighborIndex {
    tree: RTree<AgentEntry>,
    len:  usize,
}

impl NeighborIndex {
    /// Bulk-load an index over `positions`.  Slot `i` refers to
    /// `positions[i]`.
    pub fn build(positions: &[Point]) -> Self {
        let entries: Vec<AgentEntry> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| AgentEntry { point: p.to_array(), slot: i as u32 })
            .collect();
        Self { tree: RTree::bulk_load(entries), len: positions.len() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots whose position lies within `radius` of `center` (inclusive),
    /// in ascending slot order.  A negative or NaN radius matches nothing.
    pub fn within(&self, center: Point, radius: f64) -> Vec<usize> {
        if !(radius >= 0.0) {
            return Vec::new();
        }
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance(center.to_array(), radius * radius)
            .map(|e| e.slot as usize)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Like [`within`](Self::within) but without `exclude`; used to drop the
    /// querying agent from its own neighbour list.
    pub fn within_excluding(&self, center: Point, radius: f64, exclude: usize) -> Vec<usize> {
        let mut slots = self.within(center, radius);
        slots.retain(|&s| s != exclude);
        slots
    }

    /// Slot nearest to `center`, or `None` for an empty index.
    pub fn nearest(&self, center: Point) -> Option<usize> {
        self.tree.nearest_neighbor(&center.to_array()).map(|e| e.slot as usize)
    }
}

/// Linear scan with the same predicate as [`NeighborIndex::within`].
pub fn brute_force_within(positions: &[Point], center: Point, radius: f64) -> Vec<usize> {
    if !(radius >= 0.0) {
        return Vec::new();
    }
    let r2 = radius * radius;
    positions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.distance_squared(center) <= r2)
        .map(|(i, _)| i)
        .collect()
}
