//! The `ClosedLoop` struct and its tick loop.

use rustc_hash::{FxHashMap, FxHashSet};

use clc_comm::{
    CommConfig, IntentRegistry, LinkQualityEstimator, LinkQualitySample, MsgKind, NeighborRecord,
    NeighborTable, RxEvent, VehicleMap,
};
use clc_core::{SimClock, SimConfig, VehicleId};
use clc_decision::{Action, DecisionGate, GateConfig, LaneScorer, RiskTriple, ScorerConfig};
use clc_predict::{risk, TrackerConfig, TrajectoryTracker};

use crate::observer::{DecisionRecord, LoopObserver};
use crate::ports::{LaneTopologyPort, MobilityPort};
use crate::toggles::FeatureToggles;
use crate::{SimError, SimResult};

/// How many leading rollout points are reported per decision for offline
/// prediction-accuracy metrics.
const ROLLOUT_LOG_POINTS: usize = 10;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Full configuration of one closed-loop run.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LoopConfig {
    pub sim: SimConfig,
    pub scorer: ScorerConfig,
    pub tracker: TrackerConfig,
    pub gate: GateConfig,
    pub comm: CommConfig,
    pub toggles: FeatureToggles,
    /// Duration handed to the mobility port with each lane-change command.
    pub maneuver_secs: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            scorer: ScorerConfig::default(),
            tracker: TrackerConfig::default(),
            gate: GateConfig::default(),
            comm: CommConfig::default(),
            toggles: FeatureToggles::full(),
            maneuver_secs: 1.0,
        }
    }
}

// ── Run summary ───────────────────────────────────────────────────────────────

/// Aggregate counters returned by [`ClosedLoop::run`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Gate invocations across all controlled vehicles and ticks.
    pub decisions: u64,
    /// Lane-change commands actually issued.
    pub lane_changes: u64,
}

// ── ClosedLoop ────────────────────────────────────────────────────────────────

/// The closed-loop runner.  Owns every piece of mutable decision state for
/// the lifetime of the run; nothing here is global or shared.
///
/// Create via [`ClosedLoopBuilder`][crate::ClosedLoopBuilder].
pub struct ClosedLoop<M: MobilityPort, T: LaneTopologyPort> {
    pub(crate) config: LoopConfig,
    pub(crate) clock: SimClock,
    pub(crate) mobility: M,
    pub(crate) topology: T,
    pub(crate) vehicles: VehicleMap,
    /// Controlled vehicle labels, sorted — the per-tick decision order.
    pub(crate) controlled: Vec<String>,
    /// Delivered-message stream, ascending `t_rx`; `cursor` marks the next
    /// event not yet absorbed.
    pub(crate) events: Vec<RxEvent>,
    pub(crate) cursor: usize,
    pub(crate) link: LinkQualityEstimator,
    pub(crate) scorer: LaneScorer,
    pub(crate) tracker: TrajectoryTracker,
    pub(crate) gate: DecisionGate,
    /// Per-receiver latest-neighbor-state caches.
    pub(crate) neighbors: FxHashMap<VehicleId, NeighborTable>,
    /// Per-receiver intent registries.
    pub(crate) intents: FxHashMap<VehicleId, IntentRegistry>,
    /// Per-agent time of the last EXECUTEd change.  Absent = never.
    pub(crate) last_execute: FxHashMap<VehicleId, f64>,
    pub(crate) lane_changes: u64,
    pub(crate) decisions: u64,
}

impl<M: MobilityPort, T: LaneTopologyPort> ClosedLoop<M, T> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.sim.end_tick()`.
    pub fn run<O: LoopObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let end = self.config.sim.end_tick();
        while self.clock.current_tick < end {
            self.process_tick(observer)?;
            self.clock.advance();
        }
        observer.on_run_end(self.clock.current_tick);
        Ok(self.summary())
    }

    /// Run exactly `n` ticks from the current position (ignores the
    /// configured duration).  Useful for tests and incremental stepping.
    pub fn run_ticks<O: LoopObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<RunSummary> {
        for _ in 0..n {
            self.process_tick(observer)?;
            self.clock.advance();
        }
        Ok(self.summary())
    }

    /// Counters so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.clock.current_tick.0,
            decisions: self.decisions,
            lane_changes: self.lane_changes,
        }
    }

    /// The neighbor table of `node`, if it has received anything yet.
    pub fn neighbor_table(&self, node: VehicleId) -> Option<&NeighborTable> {
        self.neighbors.get(&node)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: LoopObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let tick = self.clock.current_tick;
        let now = self.clock.now_secs();
        observer.on_tick_start(tick, now);

        // ── Phase 1: advance the mobility collaborator ────────────────────
        self.mobility.advance();
        let mut present = self.mobility.vehicle_ids();
        present.sort_unstable();

        // ── Phase 2: absorb the message stream up to now ──────────────────
        //
        // Every event with t_rx ≤ now lands in its receiver's tables before
        // any decision below reads them.
        self.absorb_events(now);

        // ── Phase 3: mobility observation rows ────────────────────────────
        for label in &present {
            if let Some(state) = self.mobility.state(label) {
                let node = self.vehicles.get(label);
                let controlled = self.controlled.binary_search(label).is_ok();
                observer.on_vehicle_state(now, label, node, &state, controlled);
            }
        }

        // ── Phase 4: decisions, in sorted label order ─────────────────────
        for i in 0..self.controlled.len() {
            let label = self.controlled[i].clone();
            if present.binary_search(&label).is_err() {
                continue; // not in the simulation yet (or already gone)
            }
            self.decide_for(&label, now, observer)?;
        }

        Ok(())
    }

    /// Drain all events with `t_rx ≤ now` into the per-receiver tables.
    ///
    /// Events arrive pre-sorted by `t_rx` (the builder sorts), so a single
    /// cursor sweep preserves non-decreasing receive-time order.
    fn absorb_events(&mut self, now: f64) {
        while self.cursor < self.events.len() && self.events[self.cursor].t_rx <= now {
            let ev = &self.events[self.cursor];

            self.neighbors.entry(ev.receiver).or_default().update(
                ev.sender,
                NeighborRecord {
                    kin: ev.kin,
                    lane_index: ev.lane_index,
                    kind: ev.kind,
                    target_lane: ev.target_lane,
                    received_at: ev.t_rx,
                },
            );

            if ev.kind == MsgKind::Intent && ev.target_lane.is_valid() {
                let ttl = self.config.comm.intent_ttl_secs;
                self.intents
                    .entry(ev.receiver)
                    .or_insert_with(|| IntentRegistry::new(ttl))
                    .update(ev.sender, ev.t_rx, ev.target_lane);
            }

            self.cursor += 1;
        }
    }

    /// One agent's full decision pipeline for this tick.
    fn decide_for<O: LoopObserver>(
        &mut self,
        label: &str,
        now: f64,
        observer: &mut O,
    ) -> SimResult<()> {
        let Some(state) = self.mobility.state(label) else {
            return Ok(()); // left the network between listing and lookup
        };
        let node = self.vehicles.node(label).map_err(SimError::from)?;

        // ── Lane scoring ──────────────────────────────────────────────────
        let candidates = self.topology.candidate_lanes(&state.lane);
        let mut contexts = FxHashMap::default();
        let mut penalties = FxHashMap::default();
        for lane in &candidates {
            contexts.insert(lane.clone(), self.topology.lane_context(label, &state, lane));
            penalties.insert(lane.clone(), self.topology.lane_penalty(lane));
        }
        let ranked = self.scorer.rank(&state.lane, &candidates, &contexts, &penalties);
        let target = ranked.target;
        let target_index = target.index();

        // ── Link quality ──────────────────────────────────────────────────
        let link = if self.config.toggles.link_adaptation {
            self.link.query(node, now)
        } else {
            LinkQualitySample::PERFECT
        };

        // ── Neighbor scan: tracker feed + neighbor id set ─────────────────
        let mut neighbor_ids: FxHashSet<VehicleId> = FxHashSet::default();
        if let Some(table) = self.neighbors.get(&node) {
            for (sender, rec, age) in table.iter_with_age(now) {
                neighbor_ids.insert(sender);
                if self.config.toggles.prediction {
                    self.tracker.observe(sender, now, &rec.kin, age, link.pdr);
                }
            }
        }

        // ── Coordination ──────────────────────────────────────────────────
        let coordination_ok = if !self.config.toggles.intent_coordination || target == state.lane
        {
            true
        } else {
            match self.intents.get_mut(&node) {
                Some(registry) => {
                    !registry.has_conflict(now, &neighbor_ids, target_index, node)
                }
                None => true, // never heard an intent: nothing to conflict with
            }
        };

        // ── Target-lane leader: smallest positive projected gap ───────────
        //
        // Ties broken by sender id so map iteration order cannot leak into
        // the outcome.
        let mut leader: Option<(f64, VehicleId)> = None;
        if target_index.is_valid() {
            if let Some(table) = self.neighbors.get(&node) {
                for (sender, rec, _) in table.iter_with_age(now) {
                    if rec.lane_index != target_index {
                        continue;
                    }
                    let gap = state.kin.longitudinal_gap_to(rec.kin.x, rec.kin.y);
                    if gap <= 0.0 {
                        continue;
                    }
                    let better = match leader {
                        None => true,
                        Some((best_gap, best_id)) => {
                            gap < best_gap || (gap == best_gap && sender < best_id)
                        }
                    };
                    if better {
                        leader = Some((gap, sender));
                    }
                }
            }
        }

        // ── Risk ──────────────────────────────────────────────────────────
        let risk = if self.config.toggles.prediction {
            match leader.map(|(_, id)| id).filter(|id| self.tracker.contains(*id)) {
                Some(lead) => {
                    let rollout = self.tracker.rollout(lead);
                    for (step, point) in rollout.iter().take(ROLLOUT_LOG_POINTS).enumerate() {
                        observer.on_rollout_point(now, node, lead, step, point.x, point.y);
                    }
                    let assessment = risk::assess(&state.kin, &rollout);
                    RiskTriple {
                        min_ttc: assessment.min_ttc,
                        min_th: assessment.min_th,
                        min_gap: assessment.min_gap(),
                    }
                }
                None => RiskTriple::NO_TRACK,
            }
        } else if let Some((gap, _)) = leader {
            // Instantaneous proxy: no rollout, just the current gap against
            // the ego's own speed.
            let denom = state.kin.speed.max(0.1);
            RiskTriple {
                min_ttc: gap / denom,
                min_th: gap / denom,
                min_gap: gap,
            }
        } else {
            RiskTriple::NO_TRACK
        };

        // ── Gate ──────────────────────────────────────────────────────────
        let last = self
            .last_execute
            .get(&node)
            .copied()
            .unwrap_or(f64::NEG_INFINITY);
        let decision = self.gate.decide(now, last, &risk, &link, coordination_ok);
        self.decisions += 1;

        if decision.action == Action::Execute && target != state.lane {
            self.mobility
                .change_lane(label, &target, self.config.maneuver_secs);
            self.last_execute.insert(node, now);
            self.lane_changes += 1;
        }

        observer.on_decision(&DecisionRecord {
            t: now,
            vehicle: label.to_owned(),
            node,
            current_lane: state.lane.clone(),
            target_lane: target,
            target_lane_index: target_index,
            decision,
            link,
            risk,
            coordination_ok,
        });

        Ok(())
    }
}
