//! Unit tests for clc-comm.

use clc_core::{Kinematics, LaneIndex, VehicleId};

use crate::{MsgKind, NeighborRecord, RxEvent, TxEvent};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn record(x: f64, received_at: f64) -> NeighborRecord {
    NeighborRecord {
        kin: Kinematics::new(x, 0.0, 10.0, 0.0),
        lane_index: LaneIndex(0),
        kind: MsgKind::Beacon,
        target_lane: LaneIndex::INVALID,
        received_at,
    }
}

fn rx(sender: u32, receiver: u32, t_tx: f64, t_rx: f64) -> RxEvent {
    RxEvent {
        t_tx,
        t_rx,
        sender: VehicleId(sender),
        receiver: VehicleId(receiver),
        kind: MsgKind::Beacon,
        kin: Kinematics::default(),
        lane_index: LaneIndex(0),
        target_lane: LaneIndex::INVALID,
    }
}

fn tx(sender: u32, t_tx: f64) -> TxEvent {
    TxEvent { t_tx, sender: VehicleId(sender), kind: MsgKind::Beacon }
}

// ── NeighborTable ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod neighbors {
    use super::*;
    use crate::NeighborTable;

    #[test]
    fn last_update_wins() {
        let mut table = NeighborTable::new();
        table.update(VehicleId(5), record(1.0, 0.1));
        table.update(VehicleId(5), record(2.0, 0.2));
        table.update(VehicleId(5), record(3.0, 0.3));

        assert_eq!(table.len(), 1);
        let rec = table.get(VehicleId(5)).unwrap();
        assert_eq!(rec.kin.x, 3.0);
        assert_eq!(rec.received_at, 0.3);
    }

    #[test]
    fn age_is_computed_on_read() {
        let mut table = NeighborTable::new();
        table.update(VehicleId(1), record(0.0, 1.0));

        let ages: Vec<f64> = table.iter_with_age(1.5).map(|(_, _, age)| age).collect();
        assert_eq!(ages, vec![0.5]);
        // Same record, later "now": age follows the query, not the store.
        let ages: Vec<f64> = table.iter_with_age(3.0).map(|(_, _, age)| age).collect();
        assert_eq!(ages, vec![2.0]);
    }

    #[test]
    fn sender_ids_sorted() {
        let mut table = NeighborTable::new();
        table.update(VehicleId(9), record(0.0, 0.0));
        table.update(VehicleId(2), record(0.0, 0.0));
        table.update(VehicleId(7), record(0.0, 0.0));
        assert_eq!(
            table.sender_ids_sorted(),
            vec![VehicleId(2), VehicleId(7), VehicleId(9)]
        );
    }
}

// ── IntentRegistry ────────────────────────────────────────────────────────────

#[cfg(test)]
mod intents {
    use rustc_hash::FxHashSet;

    use super::*;
    use crate::IntentRegistry;

    fn neighbors(ids: &[u32]) -> FxHashSet<VehicleId> {
        ids.iter().map(|&i| VehicleId(i)).collect()
    }

    #[test]
    fn ttl_expiry_boundary() {
        let mut reg = IntentRegistry::new(0.5);
        reg.update(VehicleId(7), 1.0, LaneIndex(2));

        // age 0.4 ≤ TTL: live conflict
        assert!(reg.has_conflict(1.4, &neighbors(&[7]), LaneIndex(2), VehicleId(1)));
        // age 0.6 > TTL: expired
        assert!(!reg.has_conflict(1.6, &neighbors(&[7]), LaneIndex(2), VehicleId(1)));
    }

    #[test]
    fn ego_never_conflicts_with_itself() {
        let mut reg = IntentRegistry::new(10.0);
        reg.update(VehicleId(1), 0.0, LaneIndex(2));
        assert!(!reg.has_conflict(0.1, &neighbors(&[1]), LaneIndex(2), VehicleId(1)));
    }

    #[test]
    fn only_neighbors_count() {
        let mut reg = IntentRegistry::new(10.0);
        reg.update(VehicleId(7), 0.0, LaneIndex(2));
        // Sender 7 declared the lane but is not in the neighbor set.
        assert!(!reg.has_conflict(0.1, &neighbors(&[3, 4]), LaneIndex(2), VehicleId(1)));
    }

    #[test]
    fn different_target_lane_is_no_conflict() {
        let mut reg = IntentRegistry::new(10.0);
        reg.update(VehicleId(7), 0.0, LaneIndex(1));
        assert!(!reg.has_conflict(0.1, &neighbors(&[7]), LaneIndex(2), VehicleId(1)));
    }

    #[test]
    fn newer_declaration_replaces_older() {
        let mut reg = IntentRegistry::new(0.5);
        reg.update(VehicleId(7), 0.0, LaneIndex(2));
        reg.update(VehicleId(7), 1.0, LaneIndex(1));
        assert_eq!(reg.len(), 1);
        // Old target lane 2 is gone even though its record would be stale anyway.
        assert!(!reg.has_conflict(1.1, &neighbors(&[7]), LaneIndex(2), VehicleId(9)));
        assert!(reg.has_conflict(1.1, &neighbors(&[7]), LaneIndex(1), VehicleId(9)));
    }
}

// ── LinkQualityEstimator ──────────────────────────────────────────────────────

#[cfg(test)]
mod link {
    use super::*;
    use crate::{LinkQualityEstimator, LinkQualitySample};

    #[test]
    fn unseen_receiver_is_all_zero() {
        let est = LinkQualityEstimator::new(&[], &[], 1.0);
        assert_eq!(est.query(VehicleId(9), 5.0), LinkQualitySample::UNSEEN);
    }

    #[test]
    fn pdr_counts_window_deliveries() {
        // Sender 1 attempted 4 in-window, delivered 2.
        let rx_log = vec![rx(1, 9, 0.2, 0.25), rx(1, 9, 0.6, 0.65)];
        let tx_log = vec![tx(1, 0.2), tx(1, 0.4), tx(1, 0.6), tx(1, 0.8)];
        let est = LinkQualityEstimator::new(&rx_log, &tx_log, 1.0);
        let sample = est.query(VehicleId(9), 1.0);
        assert!((sample.pdr - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pdr_is_clamped_to_unit_interval() {
        // More deliveries than recorded attempts (duplicated delivery rows):
        // clamp rather than report > 1.
        let rx_log = vec![rx(1, 9, 0.1, 0.2), rx(1, 9, 0.1, 0.3), rx(1, 9, 0.1, 0.4)];
        let tx_log = vec![tx(1, 0.1)];
        let est = LinkQualityEstimator::new(&rx_log, &tx_log, 1.0);
        let sample = est.query(VehicleId(9), 1.0);
        assert!(sample.pdr >= 0.0 && sample.pdr <= 1.0);
        assert_eq!(sample.pdr, 1.0);
    }

    #[test]
    fn silent_senders_are_invisible_to_attempted_count() {
        // Sender 2 attempted 10 packets but delivered none to receiver 9:
        // by definition those attempts do not count.
        let rx_log = vec![rx(1, 9, 0.0, 0.5)];
        let mut tx_log = vec![tx(1, 0.4)];
        tx_log.extend((0..10).map(|i| tx(2, 0.1 + i as f64 * 0.05)));
        let est = LinkQualityEstimator::new(&rx_log, &tx_log, 1.0);
        let sample = est.query(VehicleId(9), 1.0);
        assert_eq!(sample.pdr, 1.0);
    }

    #[test]
    fn window_is_left_open_right_closed() {
        let rx_log = vec![rx(1, 9, 0.0, 1.0), rx(1, 9, 0.0, 2.0)];
        let tx_log = vec![tx(1, 0.0)];
        let est = LinkQualityEstimator::new(&rx_log, &tx_log, 1.0);
        // Window (1.0, 2.0]: the delivery at exactly t_rx = 1.0 is outside.
        let sample = est.query(VehicleId(9), 2.0);
        // delivered = 1 (the t_rx = 2.0 one); attempted = 0 in window → pdr 0
        assert_eq!(sample.pdr, 0.0);
        assert!((sample.latency_p95 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn latency_p95_nearest_rank() {
        // 20 deliveries with latencies 0.01..=0.20; nearest-rank p95 = 19th value.
        let rx_log: Vec<RxEvent> = (0..20)
            .map(|i| {
                let lat = 0.01 * (i + 1) as f64;
                rx(1, 9, 0.5 - lat, 0.5)
            })
            .collect();
        let est = LinkQualityEstimator::new(&rx_log, &[tx(1, 0.4)], 1.0);
        let sample = est.query(VehicleId(9), 1.0);
        assert!((sample.latency_p95 - 0.19).abs() < 1e-9);
    }

    #[test]
    fn non_finite_latencies_are_discarded() {
        let mut bad = rx(1, 9, f64::NAN, 0.5);
        bad.t_tx = f64::NAN;
        let rx_log = vec![bad, rx(1, 9, 0.45, 0.5)];
        let est = LinkQualityEstimator::new(&rx_log, &[tx(1, 0.4)], 1.0);
        let sample = est.query(VehicleId(9), 1.0);
        assert!((sample.latency_p95 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn intent_kind_counts_beacon_and_intent_only() {
        assert!(MsgKind::Beacon.counts_for_link_quality());
        assert!(MsgKind::Intent.counts_for_link_quality());
        assert!(!MsgKind::Other(7).counts_for_link_quality());
        assert_eq!(MsgKind::from_code(2), MsgKind::Intent);
        assert_eq!(MsgKind::Other(9).code(), 9);
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{load_rx_events_reader, load_tx_events_reader, load_vehicle_map_reader, CommError};

    const RX_HEADER: &str =
        "t_tx,t_rx,sender_id,receiver_id,msg_type,dropped,x,y,v,psi,lane_idx,target_lane_idx\n";

    #[test]
    fn malformed_rows_are_dropped_not_fatal() {
        let data = format!(
            "{RX_HEADER}\
             0.0,0.05,1,9,1,0,10.0,0.0,8.0,0.0,0,-1\n\
             not,a,valid,row,at,all,x,y,z,w,q,r\n\
             0.1,0.15,1,9,1,0,10.8,0.0,8.0,0.0,0,-1\n"
        );
        let events = load_rx_events_reader(Cursor::new(data)).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn dropped_flag_excludes_row() {
        let data = format!(
            "{RX_HEADER}\
             0.0,0.05,1,9,1,1,10.0,0.0,8.0,0.0,0,-1\n\
             0.1,0.15,1,9,1,0,10.8,0.0,8.0,0.0,0,-1\n"
        );
        let events = load_rx_events_reader(Cursor::new(data)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].t_rx, 0.15);
    }

    #[test]
    fn output_is_sorted_by_receive_time() {
        let data = format!(
            "{RX_HEADER}\
             0.2,0.25,1,9,1,0,1.0,0.0,8.0,0.0,0,-1\n\
             0.0,0.05,2,9,1,0,2.0,0.0,8.0,0.0,0,-1\n\
             0.1,0.15,3,9,2,0,3.0,0.0,8.0,0.0,1,1\n"
        );
        let events = load_rx_events_reader(Cursor::new(data)).unwrap();
        let times: Vec<f64> = events.iter().map(|e| e.t_rx).collect();
        assert_eq!(times, vec![0.05, 0.15, 0.25]);
        assert_eq!(events[2].target_lane, clc_core::LaneIndex::INVALID);
        assert_eq!(events[1].target_lane, clc_core::LaneIndex(1));
    }

    #[test]
    fn tx_loader_parses_and_sorts() {
        let data = "t_tx,sender_id,msg_type\n0.3,1,1\n0.1,2,2\nbroken,row,here\n";
        let events = load_tx_events_reader(Cursor::new(data)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sender, VehicleId(2));
    }

    #[test]
    fn vehicle_map_roundtrip_and_miss() {
        let data = "veh_id,node_id\nav0,0\nveh1,1\n";
        let map = load_vehicle_map_reader(Cursor::new(data)).unwrap();
        assert_eq!(map.node("av0").unwrap(), VehicleId(0));
        assert_eq!(map.get("veh1"), Some(VehicleId(1)));
        match map.node("ghost") {
            Err(CommError::UnmappedVehicle(label)) => assert_eq!(label, "ghost"),
            other => panic!("expected UnmappedVehicle, got {other:?}"),
        }
    }
}
