//! Plain data row types written by output backends.

/// One agent's kinematic state at a snapshot iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRow {
    pub iteration: u64,
    /// Simulated seconds.
    pub time:      f64,
    pub agent_id:  u64,
    pub x:         f64,
    pub y:         f64,
    pub ori_x:     f64,
    pub ori_y:     f64,
    pub speed:     f64,
}

/// An agent's journey and stage, recorded when either changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRow {
    pub iteration:  u64,
    pub agent_id:   u64,
    pub journey_id: u32,
    pub stage_id:   u32,
}
