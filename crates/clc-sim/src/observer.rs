//! Run observer trait for logging and data collection.

use clc_comm::LinkQualitySample;
use clc_core::{LaneId, LaneIndex, Tick, VehicleId, VehicleState};
use clc_decision::{Decision, RiskTriple};

/// Everything that went into (and came out of) one agent's gate call.
///
/// The core does not persist decisions; this record is the one chance an
/// output layer gets to capture them.
#[derive(Clone, Debug)]
pub struct DecisionRecord {
    /// Simulated time of the decision, seconds.
    pub t: f64,
    /// Mobility-side vehicle label.
    pub vehicle: String,
    /// Network-side node id.
    pub node: VehicleId,
    pub current_lane: LaneId,
    pub target_lane: LaneId,
    pub target_lane_index: LaneIndex,
    pub decision: Decision,
    pub link: LinkQualitySample,
    pub risk: RiskTriple,
    pub coordination_ok: bool,
}

/// Callbacks invoked by [`ClosedLoop::run`][crate::ClosedLoop::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait LoopObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick, _now: f64) {}

    /// Called once per vehicle per tick with its current mobility state.
    ///
    /// `node` is `None` for vehicles absent from the identity map — they
    /// still move, they just are not addressable on the radio.
    fn on_vehicle_state(
        &mut self,
        _now: f64,
        _vehicle: &str,
        _node: Option<VehicleId>,
        _state: &VehicleState,
        _controlled: bool,
    ) {
    }

    /// Called once per controlled vehicle per tick with the full decision
    /// record.
    fn on_decision(&mut self, _record: &DecisionRecord) {}

    /// Called for each logged point of the chosen leader's rollout.
    fn on_rollout_point(
        &mut self,
        _now: f64,
        _node: VehicleId,
        _track: VehicleId,
        _step: usize,
        _x: f64,
        _y: f64,
    ) {
    }

    /// Called once after the final tick completes.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`LoopObserver`] that does nothing.  Use when you need to call `run`
/// but don't want callbacks.
pub struct NoopObserver;

impl LoopObserver for NoopObserver {}
