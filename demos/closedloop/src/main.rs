//! closedloop — smallest runnable scenario for the rust_clc framework.
//!
//! One connected ego on a two-lane road, boxed in behind a slow leader,
//! with synthetic 10 Hz beacon/intent traces (noise, latency, drops) played
//! into the decision loop.  Expected arc: an early coordination DEFER while
//! a peer's intent is live, then an EXECUTE onto the open lane, then mostly
//! cooldown/no-op decisions as the world settles.

mod scenario;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;

use clc_comm::VehicleMap;
use clc_core::SimConfig;
use clc_output::{CsvWriter, LogObserver};
use clc_sim::{ClosedLoopBuilder, FeatureToggles, LoopConfig};

use scenario::{build_world, generate_traces, DemoMobility, DemoTopology};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const STEP_SECS: f64 = 0.1;
const DURATION_SECS: f64 = 30.0;
const DROP_PROBABILITY: f64 = 0.08;
const OUT_DIR: &str = "out/closedloop";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== closedloop — rust_clc cooperative lane-change demo ===");
    println!("Duration: {DURATION_SECS} s  |  Step: {STEP_SECS} s  |  Seed: {SEED}");
    println!();

    // 1. Synthetic world and traces.
    let world = build_world(STEP_SECS);
    let (rx_events, tx_events) = generate_traces(&world, DURATION_SECS, DROP_PROBABILITY, SEED);
    println!(
        "Traces: {} delivered / {} attempted messages",
        rx_events.len(),
        tx_events.len()
    );

    let vehicles = VehicleMap::from_pairs(
        world
            .vehicles
            .iter()
            .map(|v| (v.label.clone(), v.node))
            .collect::<Vec<_>>(),
    );
    let shared = Rc::new(RefCell::new(world));

    // 2. Loop configuration: defaults everywhere, full controller.
    let config = LoopConfig {
        sim: SimConfig { step_secs: STEP_SECS, duration_secs: DURATION_SECS },
        toggles: FeatureToggles::full(),
        ..LoopConfig::default()
    };

    // 3. Output pipeline.
    let out_dir = Path::new(OUT_DIR);
    std::fs::create_dir_all(out_dir)?;
    let writer = CsvWriter::new(out_dir)?;
    let mut observer = LogObserver::new(writer);

    // 4. Assemble and run.
    let mut sim = ClosedLoopBuilder::new(
        config,
        DemoMobility(shared.clone()),
        DemoTopology(shared.clone()),
        vehicles,
    )
    .events(rx_events)
    .tx_log(tx_events)
    .controlled(vec!["av0".to_owned()])
    .build()?;

    let summary = sim.run(&mut observer)?;
    if let Some(e) = observer.take_error() {
        eprintln!("output error: {e}");
    }

    println!();
    println!(
        "Done: {} ticks, {} decisions, {} lane change(s)",
        summary.ticks, summary.decisions, summary.lane_changes
    );
    println!("Logs in {OUT_DIR}/: actions.csv, mobility.csv, rollouts.csv");

    Ok(())
}
