//! `LogObserver<W>` — bridges `LoopObserver` to an `OutputWriter`.

use clc_core::{Tick, VehicleId, VehicleState};
use clc_sim::{DecisionRecord, LoopObserver};

use crate::row::{ActionRow, MobilityRow, RolloutRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`LoopObserver`] that writes every decision, mobility state, and
/// rollout point to an [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the run completes, check for errors with
/// [`take_error`][Self::take_error].
pub struct LogObserver<W: OutputWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> LogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> LoopObserver for LogObserver<W> {
    fn on_vehicle_state(
        &mut self,
        now: f64,
        vehicle: &str,
        node: Option<VehicleId>,
        state: &VehicleState,
        controlled: bool,
    ) {
        let row = MobilityRow {
            t: now,
            vehicle: vehicle.to_owned(),
            node: node.unwrap_or(VehicleId::INVALID).0,
            x: state.kin.x,
            y: state.kin.y,
            speed: state.kin.speed,
            heading: state.kin.heading,
            lane: state.lane.to_string(),
            controlled,
        };
        let result = self.writer.write_mobility(&row);
        self.store_err(result);
    }

    fn on_decision(&mut self, record: &DecisionRecord) {
        let row = ActionRow {
            t: record.t,
            vehicle: record.vehicle.clone(),
            node: record.node.0,
            current_lane: record.current_lane.to_string(),
            target_lane: record.target_lane.to_string(),
            target_lane_index: record.target_lane_index.0,
            action: record.decision.action.as_str(),
            reason: record.decision.reason.as_str(),
            pdr: record.link.pdr,
            latency_p95: record.link.latency_p95,
            min_ttc: record.risk.min_ttc,
            min_th: record.risk.min_th,
            min_gap: record.risk.min_gap,
            coordination_ok: record.coordination_ok,
        };
        let result = self.writer.write_action(&row);
        self.store_err(result);
    }

    fn on_rollout_point(
        &mut self,
        now: f64,
        node: VehicleId,
        track: VehicleId,
        step: usize,
        x: f64,
        y: f64,
    ) {
        let row = RolloutRow {
            t: now,
            node: node.0,
            track: track.0,
            step,
            x,
            y,
        };
        let result = self.writer.write_rollout(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
