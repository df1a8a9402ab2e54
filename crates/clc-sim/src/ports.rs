//! Collaborator ports.
//!
//! The core performs no I/O and runs no simulator of its own; mobility and
//! lane topology are reached through these traits.  Implementations are
//! selected at composition time — there is no runtime capability probing,
//! and a missing capability is expressed by plugging in the conservative
//! default, not by swallowing errors.

use clc_core::{LaneId, VehicleState};
use clc_decision::LaneContext;

/// The external mobility tool: per-tick vehicle state in, lane-change
/// commands out.
pub trait MobilityPort {
    /// Step the external simulation by one tick.
    fn advance(&mut self);

    /// Labels of every vehicle currently in the simulation.  Order may be
    /// arbitrary; the orchestrator sorts before iterating.
    fn vehicle_ids(&self) -> Vec<String>;

    /// Kinematic state of `vehicle`, or `None` if it has left the network.
    fn state(&self, vehicle: &str) -> Option<VehicleState>;

    /// Command a lane change to `target`, to be completed within
    /// `duration_secs`.
    fn change_lane(&mut self, vehicle: &str, target: &LaneId, duration_secs: f64);
}

/// Lane adjacency and per-lane local observations.
pub trait LaneTopologyPort {
    /// Legally reachable lanes from `lane`, including `lane` itself.
    /// The returned order is the scorer's tie-break order.
    fn candidate_lanes(&self, lane: &LaneId) -> Vec<LaneId>;

    /// Leader/follower gaps and speeds observable on `lane` from the ego's
    /// position.
    fn lane_context(&self, vehicle: &str, state: &VehicleState, lane: &LaneId) -> LaneContext;

    /// Static penalty for `lane` (e.g. lane-marking restrictions).
    fn lane_penalty(&self, _lane: &LaneId) -> f64 {
        0.0
    }
}

/// Topology fallback for when no lane-geometry collaborator is available:
/// the only candidate is the current lane and every context reads as
/// closed.  An agent composed with this never changes lanes — conservative
/// by construction.
pub struct ConservativeTopology;

impl LaneTopologyPort for ConservativeTopology {
    fn candidate_lanes(&self, lane: &LaneId) -> Vec<LaneId> {
        vec![lane.clone()]
    }

    fn lane_context(&self, _vehicle: &str, _state: &VehicleState, lane: &LaneId) -> LaneContext {
        LaneContext::closed(lane.clone())
    }
}
