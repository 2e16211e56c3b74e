//! The `TrajectoryWriter` trait implemented by all backend writers.

use crate::{OutputResult, StageRow, TrajectoryRow};

/// Sink for trajectory and stage-assignment rows.
///
/// Driven by [`TrajectoryObserver`][crate::TrajectoryObserver], which stores
/// errors and hands them out through `take_error`.
pub trait TrajectoryWriter {
    /// Write one snapshot's worth of agent rows.
    fn write_trajectory(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()>;

    /// Write stage-assignment changes.
    fn write_stages(&mut self, rows: &[StageRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
