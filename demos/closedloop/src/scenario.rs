//! Synthetic two-lane scenario: a shared in-process "world" standing in for
//! the external mobility and topology tools, plus a deterministic trace
//! generator standing in for the network simulator.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use clc_comm::{MsgKind, RxEvent, TxEvent};
use clc_core::{Kinematics, LaneId, LaneIndex, VehicleId, VehicleState};
use clc_decision::LaneContext;
use clc_sim::{LaneTopologyPort, MobilityPort};

/// Beyond this range nothing is observable on a candidate lane; an empty
/// lane reports it as the open gap.
const SCAN_RANGE_M: f64 = 150.0;

/// Beacon cadence of every ambient vehicle, seconds.
const BEACON_PERIOD_SECS: f64 = 0.1;

// ── World ─────────────────────────────────────────────────────────────────────

pub struct DemoVehicle {
    pub label: String,
    pub node: VehicleId,
    pub kin: Kinematics,
    pub lane: LaneId,
}

/// All vehicle state, advanced kinematically each tick.  Ambient vehicles
/// hold speed and lane; only the controlled ego receives lane commands.
pub struct World {
    pub vehicles: Vec<DemoVehicle>,
    pub step_secs: f64,
}

pub type SharedWorld = Rc<RefCell<World>>;

impl World {
    fn advance(&mut self) {
        for vehicle in &mut self.vehicles {
            vehicle.kin = vehicle.kin.propagate(self.step_secs);
        }
    }

    fn find(&self, label: &str) -> Option<&DemoVehicle> {
        self.vehicles.iter().find(|v| v.label == label)
    }
}

/// Ego on the right lane boxed in behind a slow leader; the left lane is
/// open ahead with a same-speed follower well behind.
pub fn build_world(step_secs: f64) -> World {
    let lane0 = LaneId::new("main_0");
    let lane1 = LaneId::new("main_1");
    let vehicle = |label: &str, node: u32, x: f64, speed: f64, lane: &LaneId| DemoVehicle {
        label: label.to_owned(),
        node: VehicleId(node),
        kin: Kinematics::new(x, 0.0, speed, 0.0),
        lane: lane.clone(),
    };

    World {
        vehicles: vec![
            vehicle("av0", 0, 0.0, 12.0, &lane0),
            vehicle("veh1", 1, 18.0, 9.0, &lane0),  // slow leader ahead of the ego
            vehicle("veh2", 2, 45.0, 11.0, &lane1), // distant leader on the open lane
            vehicle("veh3", 3, -15.0, 12.0, &lane1), // follower pacing the ego
            vehicle("veh4", 4, -8.0, 12.0, &lane0), // follower behind the ego
        ],
        step_secs,
    }
}

// ── Ports backed by the shared world ──────────────────────────────────────────

pub struct DemoMobility(pub SharedWorld);

impl MobilityPort for DemoMobility {
    fn advance(&mut self) {
        self.0.borrow_mut().advance();
    }

    fn vehicle_ids(&self) -> Vec<String> {
        self.0.borrow().vehicles.iter().map(|v| v.label.clone()).collect()
    }

    fn state(&self, vehicle: &str) -> Option<VehicleState> {
        self.0
            .borrow()
            .find(vehicle)
            .map(|v| VehicleState::new(v.kin, v.lane.clone()))
    }

    fn change_lane(&mut self, vehicle: &str, target: &LaneId, _duration_secs: f64) {
        // Instant switch — lateral dynamics are not this demo's business.
        let mut world = self.0.borrow_mut();
        if let Some(v) = world.vehicles.iter_mut().find(|v| v.label == vehicle) {
            v.lane = target.clone();
        }
    }
}

pub struct DemoTopology(pub SharedWorld);

impl LaneTopologyPort for DemoTopology {
    fn candidate_lanes(&self, lane: &LaneId) -> Vec<LaneId> {
        let mut candidates = vec![lane.clone()];
        let idx = lane.index();
        if idx.is_valid() {
            if idx.0 > 0 {
                candidates.push(lane.sibling(idx.0 - 1));
            }
            if idx.0 + 1 < 2 {
                candidates.push(lane.sibling(idx.0 + 1));
            }
        }
        candidates
    }

    fn lane_context(&self, vehicle: &str, state: &VehicleState, lane: &LaneId) -> LaneContext {
        let world = self.0.borrow();
        let mut leader: Option<(f64, f64)> = None; // (gap, speed)
        let mut follower: Option<(f64, f64)> = None;

        for other in world.vehicles.iter().filter(|v| v.label != vehicle && v.lane == *lane) {
            let gap = state.kin.longitudinal_gap_to(other.kin.x, other.kin.y);
            if gap.abs() > SCAN_RANGE_M {
                continue;
            }
            if gap >= 0.0 && leader.is_none_or(|(g, _)| gap < g) {
                leader = Some((gap, other.kin.speed));
            }
            if gap < 0.0 && follower.is_none_or(|(g, _)| -gap < g) {
                follower = Some((-gap, other.kin.speed));
            }
        }

        let (leader_gap, leader_speed) = leader.unwrap_or((SCAN_RANGE_M, 0.0));
        let (follower_gap, follower_speed) = follower.unwrap_or((SCAN_RANGE_M, 0.0));
        LaneContext {
            lane: lane.clone(),
            leader_gap,
            follower_gap,
            leader_speed,
            follower_speed,
        }
    }
}

// ── Trace generation ──────────────────────────────────────────────────────────

/// Fabricate the network simulator's delivered/attempted logs for the run:
/// every ambient vehicle beacons to the ego at 10 Hz with position noise,
/// random per-packet latency, and occasional drops; `veh4` — also stuck on
/// the right lane — declares a lane-1 intent during its early window, which
/// collides with the ego's own plan until it expires.
pub fn generate_traces(
    world: &World,
    duration_secs: f64,
    drop_probability: f64,
    seed: u64,
) -> (Vec<RxEvent>, Vec<TxEvent>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let ego_node = VehicleId(0);
    let mut rx = Vec::new();
    let mut tx = Vec::new();

    let beacons = (duration_secs / BEACON_PERIOD_SECS) as usize;
    for vehicle in world.vehicles.iter().filter(|v| v.node != ego_node) {
        for k in 0..beacons {
            let t_tx = k as f64 * BEACON_PERIOD_SECS;
            // Constant-velocity world: position at t_tx in closed form.
            let kin_at_tx = vehicle.kin.propagate(t_tx);

            let declares_intent =
                vehicle.label == "veh4" && (0.0..1.5).contains(&t_tx) && k % 2 == 0;
            let kind = if declares_intent { MsgKind::Intent } else { MsgKind::Beacon };

            tx.push(TxEvent { t_tx, sender: vehicle.node, kind });
            if rng.gen_range(0.0..1.0) < drop_probability {
                continue;
            }

            rx.push(RxEvent {
                t_tx,
                t_rx: t_tx + rng.gen_range(0.002..0.02),
                sender: vehicle.node,
                receiver: ego_node,
                kind,
                kin: Kinematics {
                    x: kin_at_tx.x + rng.gen_range(-0.25..0.25),
                    y: kin_at_tx.y + rng.gen_range(-0.25..0.25),
                    speed: kin_at_tx.speed + rng.gen_range(-0.1..0.1),
                    heading: kin_at_tx.heading,
                },
                lane_index: vehicle.lane.index(),
                target_lane: if declares_intent { LaneIndex(1) } else { LaneIndex::INVALID },
            });
        }
    }

    (rx, tx)
}
