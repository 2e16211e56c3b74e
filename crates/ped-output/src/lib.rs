//! `ped-output` — trajectory writers for the pedestrian crowd simulator.
//!
//! The engine never writes files itself; [`TrajectoryObserver`] reads the
//! simulation through its read-only accessors at every snapshot and hands
//! rows to a [`TrajectoryWriter`].
//!
//! | Backend                    | Feature  | Files created                    |
//! |----------------------------|----------|----------------------------------|
//! | [`CsvTrajectoryWriter`]    | always   | `trajectory.csv`, `stages.csv`   |
//! | `SqliteTrajectoryWriter`   | `sqlite` | `trajectory.sqlite` (with metadata and geometry WKT) |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ped_output::{CsvTrajectoryWriter, TrajectoryObserver};
//!
//! let writer = CsvTrajectoryWriter::new(Path::new("./output"))?;
//! let mut obs = TrajectoryObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod writer;


pub use csv::CsvTrajectoryWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TrajectoryObserver;
pub use row::{StageRow, TrajectoryRow};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteTrajectoryWriter, geometry_wkt};
pub use writer::TrajectoryWriter;
