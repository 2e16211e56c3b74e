//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Iteration` counter.
//! The mapping to simulated seconds is held in `SimClock`:
//!
//!   elapsed_time = iteration * dt
//!
//! Elapsed time is always derived from the integer counter rather than
//! accumulated, so it carries no floating-point drift however long the run.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Iteration ────────────────────────────────────────────────────────────────

/// An absolute iteration counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iteration(pub u64);

impl Iteration {
    pub const ZERO: Iteration = Iteration(0);

    #[inline]
    pub fn is_multiple_of(self, n: u64) -> bool {
        n != 0 && self.0 % n == 0
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current iteration and converts it to simulated seconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per iteration.
    pub dt: f64,
    /// The current iteration, advanced by `SimClock::advance()` after each
    /// completed step.
    pub iteration: Iteration,
}

impl SimClock {
    pub fn new(dt: f64) -> Self {
        Self { dt, iteration: Iteration::ZERO }
    }

    /// Advance the clock by one iteration.
    #[inline]
    pub fn advance(&mut self) {
        self.iteration = Iteration(self.iteration.0 + 1);
    }

    /// Simulated seconds since iteration 0.
    #[inline]
    pub fn elapsed_time(&self) -> f64 {
        self.iteration.0 as f64 * self.dt
    }

    /// How many iterations span `secs` seconds? (rounds up)
    #[inline]
    pub fn iterations_for_secs(&self, secs: f64) -> u64 {
        (secs / self.dt).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t = {:.2} s)", self.iteration, self.elapsed_time())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically deserialised by the host application (with the `serde`
/// feature) and handed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds per iteration.  Default: 0.01.
    pub dt: f64,

    /// Upper bound on iterations performed by `Simulation::run`.  Stepping
    /// manually with `iterate()` ignores it.
    pub max_iterations: u64,

    /// Snapshot every N iterations.  1 = every iteration.
    pub snapshot_interval: u64,
}

impl SimConfig {
    /// Reject non-finite or non-positive `dt` and a zero snapshot interval.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(CoreError::Config(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        if self.snapshot_interval == 0 {
            return Err(CoreError::Config("snapshot_interval must be at least 1".into()));
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt:                0.01,
            max_iterations:    u64::MAX,
            snapshot_interval: 1,
        }
    }
}
