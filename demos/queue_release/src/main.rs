//! queue_release — fifteen pedestrians wait in a notifiable queue and are
//! let through to the exit one at a time by the host.
//!
//! Run with `RUST_LOG=ped=debug` to see every stage transition.  Pass an
//! output directory as the first argument to write `trajectory.csv` and
//! `stages.csv` there.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ped_agent::NewAgent;
use ped_core::{Iteration, Point, SimConfig, StageId};
use ped_journey::{JourneyDescription, Transition};
use ped_model::{ModelKind, OperationalModel};
use ped_output::{CsvTrajectoryWriter, TrajectoryObserver};
use ped_sim::{NoopObserver, SimBuilder, SimObserver, Simulation};
use ped_spatial::GeometryBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:        usize = 15;
const SLOT_SPACING:       f64   = 0.6;
const POP_INTERVAL_SECS:  f64   = 1.5;
const MAX_ITERATIONS:     u64   = 10_000;
const SNAPSHOT_INTERVAL:  u64   = 10;

// ── Scenario ──────────────────────────────────────────────────────────────────

struct Scenario {
    sim:       Simulation,
    queue:     StageId,
    pop_every: u64,
}

/// 20 m × 10 m hall, queue running left from a gate at x = 12, exit on the
/// right wall.
fn build() -> Result<Scenario> {
    let geometry = GeometryBuilder::new([(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)]).build()?;
    let config = SimConfig {
        max_iterations:    MAX_ITERATIONS,
        snapshot_interval: SNAPSHOT_INTERVAL,
        ..Default::default()
    };
    let pop_every = config.make_clock().iterations_for_secs(POP_INTERVAL_SECS);
    let mut sim = SimBuilder::new(OperationalModel::default_for(ModelKind::CollisionFreeSpeed), geometry)
        .config(config)
        .build()?;

    let slots: Vec<Point> = (0..AGENT_COUNT)
        .map(|i| Point::new(12.0 - i as f64 * SLOT_SPACING, 5.0))
        .collect();
    let queue = sim.add_notifiable_queue_stage(slots)?;
    let exit = sim.add_exit_stage([(19.0, 4.0), (20.0, 4.0), (20.0, 6.0), (19.0, 6.0)])?;
    let journey = sim.add_journey(
        JourneyDescription::new([queue, exit]).with_transition(queue, Transition::fixed(exit)),
    )?;

    // Five columns of three, the first column closest to the gate so the
    // queue fills front to back.
    for i in 0..AGENT_COUNT {
        let x = 10.0 - 1.5 * (i / 3) as f64;
        let y = 3.0 + 2.0 * (i % 3) as f64;
        sim.add_agent(NewAgent::new(journey, queue, (x, y)))?;
    }
    Ok(Scenario { sim, queue, pop_every })
}

/// Step until everyone has left, popping the queue front every
/// `POP_INTERVAL_SECS` of simulated time.  Returns the iterations at which pops were
/// requested.
fn drive<O: SimObserver>(scenario: &mut Scenario, observer: &mut O) -> Result<Vec<u64>> {
    let mut pops = Vec::new();
    let result = drive_inner(scenario, observer, &mut pops);
    observer.on_sim_end(&scenario.sim);
    result.map(|()| pops)
}

fn drive_inner<O: SimObserver>(scenario: &mut Scenario, observer: &mut O, pops: &mut Vec<u64>) -> Result<()> {
    let sim = &mut scenario.sim;
    while sim.agent_count() > 0 && sim.iteration_count() < MAX_ITERATIONS {
        let it = sim.iteration_count();
        if it % SNAPSHOT_INTERVAL == 0 {
            observer.on_snapshot(sim);
        }
        if it > 0 && it % scenario.pop_every == 0 && sim.queue_len(scenario.queue)? > 0 {
            sim.pop_queue(scenario.queue, 1)?;
            pops.push(it);
        }
        observer.on_iteration_start(Iteration(it));
        sim.iterate()?;
        observer.on_iteration_end(sim);
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== queue_release — pedestrian crowd simulation ===");
    let mut scenario = build()?;
    println!("Agents: {AGENT_COUNT}  |  pop every {} iterations", scenario.pop_every);
    println!();

    let out_dir = std::env::args().nth(1).map(PathBuf::from);

    let t0 = Instant::now();
    let pops = match &out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let mut obs = TrajectoryObserver::new(CsvTrajectoryWriter::new(dir)?);
            let pops = drive(&mut scenario, &mut obs)?;
            if let Some(e) = obs.take_error() {
                eprintln!("output error: {e}");
            }
            pops
        }
        None => drive(&mut scenario, &mut NoopObserver)?,
    };
    let wall = t0.elapsed();

    let sim = &scenario.sim;
    println!("Simulation complete in {:.3} s (wall clock)", wall.as_secs_f64());
    println!("  iterations     : {}", sim.iteration_count());
    println!("  simulated time : {:.2} s", sim.elapsed_time());
    println!("  pops requested : {}", pops.len());
    println!("  agents left    : {}", sim.agent_count());
    if let Some(dir) = out_dir {
        println!("  output         : {}", dir.display());
    }

    tracing::info!(target: "ped", remaining = sim.agent_count(), "queue_release finished");
    Ok(())
}
