//! SQLite output backend (feature `sqlite`).
//!
//! Creates `trajectory.sqlite` in the configured output directory with four
//! tables:
//! - `metadata`: `key`/`value` pairs (`version`, `fps`, `dt`)
//! - `geometry`: the walkable area as one WKT polygon
//! - `trajectory_data`: one row per agent per snapshot
//! - `stages`: stage-assignment changes

use std::fmt::Write as _;
use std::path::Path;

use rusqlite::Connection;

use ped_core::Point;
use ped_sim::Simulation;
use ped_spatial::Geometry;

use crate::writer::TrajectoryWriter;
use crate::{OutputResult, StageRow, TrajectoryRow};

/// Schema version stored under `metadata.version`.
pub const SCHEMA_VERSION: u32 = 1;

/// Writes trajectories to an SQLite database.
pub struct SqliteTrajectoryWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteTrajectoryWriter {
    /// Create (or replace) `trajectory.sqlite` in `dir`, initialise the
    /// schema and store the run's metadata.
    ///
    /// `fps` is the number of snapshots per simulated second.
    pub fn new(dir: &Path, fps: f64, dt: f64, geometry_wkt: &str) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("trajectory.sqlite"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS metadata;
             DROP TABLE IF EXISTS geometry;
             DROP TABLE IF EXISTS trajectory_data;
             DROP TABLE IF EXISTS stages;
             CREATE TABLE metadata (
                 key   TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );
             CREATE TABLE geometry (
                 wkt TEXT NOT NULL
             );
             CREATE TABLE trajectory_data (
                 frame INTEGER NOT NULL,
                 time  REAL    NOT NULL,
                 id    INTEGER NOT NULL,
                 pos_x REAL    NOT NULL,
                 pos_y REAL    NOT NULL,
                 ori_x REAL    NOT NULL,
                 ori_y REAL    NOT NULL,
                 speed REAL    NOT NULL
             );
             CREATE INDEX frame_idx ON trajectory_data (frame);
             CREATE TABLE stages (
                 frame      INTEGER NOT NULL,
                 id         INTEGER NOT NULL,
                 journey_id INTEGER NOT NULL,
                 stage_id   INTEGER NOT NULL
             );",
        )?;

        {
            let mut stmt = conn.prepare("INSERT INTO metadata (key, value) VALUES (?1, ?2)")?;
            stmt.execute(rusqlite::params!["version", SCHEMA_VERSION.to_string()])?;
            stmt.execute(rusqlite::params!["fps", fps.to_string()])?;
            stmt.execute(rusqlite::params!["dt", dt.to_string()])?;
        }
        conn.execute("INSERT INTO geometry (wkt) VALUES (?1)", rusqlite::params![geometry_wkt])?;

        Ok(Self { conn, finished: false })
    }

    /// [`new`](Self::new) with the frame rate, time step and geometry taken
    /// from `sim`.
    pub fn for_simulation(dir: &Path, sim: &Simulation) -> OutputResult<Self> {
        let config = sim.config();
        let fps = 1.0 / (config.dt * config.snapshot_interval as f64);
        Self::new(dir, fps, config.dt, &geometry_wkt(sim.geometry()))
    }
}

impl TrajectoryWriter for SqliteTrajectoryWriter {
    fn write_trajectory(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trajectory_data \
                 (frame, time, id, pos_x, pos_y, ori_x, ori_y, speed) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.iteration as i64,
                    row.time,
                    row.agent_id as i64,
                    row.x,
                    row.y,
                    row.ori_x,
                    row.ori_y,
                    row.speed,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_stages(&mut self, rows: &[StageRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO stages (frame, id, journey_id, stage_id) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.iteration as i64,
                    row.agent_id as i64,
                    row.journey_id,
                    row.stage_id,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

// ── WKT ───────────────────────────────────────────────────────────────────────

/// The walkable area as a WKT `POLYGON`: the outer ring first, then one ring
/// per obstacle.  Rings are closed by repeating their first vertex.
pub fn geometry_wkt(geometry: &Geometry) -> String {
    let mut wkt = String::from("POLYGON (");
    let rings = std::iter::once(geometry.outer()).chain(geometry.obstacles());
    for (i, ring) in rings.enumerate() {
        if i > 0 {
            wkt.push_str(", ");
        }
        push_ring(&mut wkt, ring.vertices());
    }
    wkt.push(')');
    wkt
}

fn push_ring(wkt: &mut String, vertices: &[Point]) {
    wkt.push('(');
    for (i, p) in vertices.iter().chain(vertices.first()).enumerate() {
        if i > 0 {
            wkt.push_str(", ");
        }
        // Writing to a String cannot fail.
        let _ = write!(wkt, "{} {}", p.x, p.y);
    }
    wkt.push(')');
}
