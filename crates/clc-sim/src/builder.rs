//! Fluent builder for constructing a [`ClosedLoop`].

use rustc_hash::FxHashMap;

use clc_comm::{LinkQualityEstimator, RxEvent, TxEvent, VehicleMap};
use clc_decision::{DecisionGate, LaneScorer};
use clc_predict::TrajectoryTracker;

use crate::engine::{ClosedLoop, LoopConfig};
use crate::ports::{LaneTopologyPort, MobilityPort};
use crate::{SimError, SimResult};

/// Fluent builder for [`ClosedLoop<M, T>`].
///
/// # Required inputs
///
/// - [`LoopConfig`] — tick step, duration, component tunables, toggles
/// - `M: MobilityPort` — the mobility collaborator
/// - `T: LaneTopologyPort` — lane adjacency and local observations
///   (use [`ConservativeTopology`][crate::ConservativeTopology] when no
///   geometry source exists)
/// - [`VehicleMap`] — vehicle label → node id
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                        |
/// |-------------------|------------------------------------------------|
/// | `.events(v)`      | Empty delivered-message stream                 |
/// | `.tx_log(v)`      | Empty attempted-transmission log               |
/// | `.controlled(v)`  | Every label in the vehicle map                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = ClosedLoopBuilder::new(config, mobility, topology, vehicle_map)
///     .events(rx_events)
///     .tx_log(tx_events)
///     .controlled(vec!["av0".into()])
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct ClosedLoopBuilder<M: MobilityPort, T: LaneTopologyPort> {
    config: LoopConfig,
    mobility: M,
    topology: T,
    vehicles: VehicleMap,
    events: Vec<RxEvent>,
    tx_log: Vec<TxEvent>,
    controlled: Option<Vec<String>>,
}

impl<M: MobilityPort, T: LaneTopologyPort> ClosedLoopBuilder<M, T> {
    /// Create a builder with all required inputs.
    pub fn new(config: LoopConfig, mobility: M, topology: T, vehicles: VehicleMap) -> Self {
        Self {
            config,
            mobility,
            topology,
            vehicles,
            events: Vec::new(),
            tx_log: Vec::new(),
            controlled: None,
        }
    }

    /// Supply the delivered-message stream.  Need not be pre-sorted; the
    /// builder sorts by `t_rx`.
    pub fn events(mut self, events: Vec<RxEvent>) -> Self {
        self.events = events;
        self
    }

    /// Supply the attempted-transmission log for link-quality estimation.
    pub fn tx_log(mut self, tx_log: Vec<TxEvent>) -> Self {
        self.tx_log = tx_log;
        self
    }

    /// Restrict decision-making to these vehicle labels.
    ///
    /// If not called, every vehicle in the identity map is controlled.
    pub fn controlled(mut self, labels: Vec<String>) -> Self {
        self.controlled = Some(labels);
        self
    }

    /// Validate the configuration and assemble a ready-to-run [`ClosedLoop`].
    pub fn build(self) -> SimResult<ClosedLoop<M, T>> {
        let config = self.config;

        if config.sim.step_secs <= 0.0 {
            return Err(SimError::Config("step_secs must be positive".into()));
        }
        if config.gate.strict_factor < 1.0 {
            return Err(SimError::Config(
                "strict_factor below 1 would loosen thresholds under bad links".into(),
            ));
        }
        if config.tracker.step_secs <= 0.0 || config.tracker.horizon_secs < config.tracker.step_secs
        {
            return Err(SimError::Config("tracker horizon shorter than one step".into()));
        }

        let mut events = self.events;
        events.sort_by(|a, b| a.t_rx.total_cmp(&b.t_rx));

        let link = LinkQualityEstimator::new(&events, &self.tx_log, config.comm.window_secs);

        let mut controlled = self
            .controlled
            .unwrap_or_else(|| self.vehicles.labels_sorted());
        controlled.sort_unstable();
        controlled.dedup();

        let clock = config.sim.make_clock();
        let scorer = LaneScorer::new(config.scorer);
        let tracker = TrajectoryTracker::new(config.tracker);
        let gate = DecisionGate::new(config.gate);

        Ok(ClosedLoop {
            config,
            clock,
            mobility: self.mobility,
            topology: self.topology,
            vehicles: self.vehicles,
            controlled,
            events,
            cursor: 0,
            link,
            scorer,
            tracker,
            gate,
            neighbors: FxHashMap::default(),
            intents: FxHashMap::default(),
            last_execute: FxHashMap::default(),
            lane_changes: 0,
            decisions: 0,
        })
    }
}
