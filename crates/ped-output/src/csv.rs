//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `trajectory.csv`: `iteration,time,agent_id,x,y,ori_x,ori_y,speed`
//! - `stages.csv`: `iteration,agent_id,journey_id,stage_id`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TrajectoryWriter;
use crate::{OutputResult, StageRow, TrajectoryRow};

/// Writes trajectories to two CSV files.
pub struct CsvTrajectoryWriter {
    trajectory: Writer<File>,
    stages:     Writer<File>,
    finished:   bool,
}

impl CsvTrajectoryWriter {
    /// Create (or truncate) the two CSV files in `dir` and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trajectory = Writer::from_path(dir.join("trajectory.csv"))?;
        trajectory.write_record(["iteration", "time", "agent_id", "x", "y", "ori_x", "ori_y", "speed"])?;

        let mut stages = Writer::from_path(dir.join("stages.csv"))?;
        stages.write_record(["iteration", "agent_id", "journey_id", "stage_id"])?;

        Ok(Self {
            trajectory,
            stages,
            finished: false,
        })
    }
}

impl TrajectoryWriter for CsvTrajectoryWriter {
    fn write_trajectory(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        for row in rows {
            self.trajectory.write_record(&[
                row.iteration.to_string(),
                format!("{:.4}", row.time),
                row.agent_id.to_string(),
                format!("{:.6}", row.x),
                format!("{:.6}", row.y),
                format!("{:.6}", row.ori_x),
                format!("{:.6}", row.ori_y),
                format!("{:.6}", row.speed),
            ])?;
        }
        Ok(())
    }

    fn write_stages(&mut self, rows: &[StageRow]) -> OutputResult<()> {
        for row in rows {
            self.stages.write_record(&[
                row.iteration.to_string(),
                row.agent_id.to_string(),
                row.journey_id.to_string(),
                row.stage_id.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trajectory.flush()?;
        self.stages.flush()?;
        Ok(())
    }
}
