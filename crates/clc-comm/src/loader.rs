//! CSV trace loaders.
//!
//! The network collaborator writes three artifacts per run:
//!
//! | File            | Row shape                                                  |
//! |-----------------|------------------------------------------------------------|
//! | delivered log   | `t_tx,t_rx,sender_id,receiver_id,msg_type,dropped,x,y,v,psi,lane_idx,target_lane_idx` |
//! | attempted log   | `t_tx,sender_id,msg_type`                                  |
//! | identity map    | `veh_id,node_id`                                           |
//!
//! Malformed rows (unparseable fields, missing required values, non-finite
//! numbers) are **dropped after a warning** — the stream continues; one bad
//! row must not kill a multi-hour replay.  Rows flagged `dropped=1` in the
//! delivered log are excluded silently: they are upstream bookkeeping, not
//! data corruption.  The delivered log is sorted by `t_rx` after loading so
//! downstream draining can rely on non-decreasing receive times.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use clc_core::{Kinematics, LaneIndex, VehicleId};

use crate::{CommResult, MsgKind, RxEvent, TxEvent, VehicleMap};

// ── Raw CSV records ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawRxRow {
    t_tx: Option<f64>,
    t_rx: Option<f64>,
    sender_id: Option<u32>,
    receiver_id: Option<u32>,
    msg_type: Option<u8>,
    #[serde(default)]
    dropped: Option<u8>,
    x: Option<f64>,
    y: Option<f64>,
    v: Option<f64>,
    psi: Option<f64>,
    lane_idx: Option<i64>,
    target_lane_idx: Option<i64>,
}

impl RawRxRow {
    /// Validate and convert; `None` marks a row to drop.
    fn into_event(self) -> Option<RxEvent> {
        let t_tx = self.t_tx?;
        let t_rx = self.t_rx?;
        let (x, y, v, psi) = (self.x?, self.y?, self.v?, self.psi?);
        if ![t_tx, t_rx, x, y, v, psi].iter().all(|f| f.is_finite()) {
            return None;
        }
        Some(RxEvent {
            t_tx,
            t_rx,
            sender: VehicleId(self.sender_id?),
            receiver: VehicleId(self.receiver_id?),
            kind: MsgKind::from_code(self.msg_type?),
            kin: Kinematics::new(x, y, v, psi),
            lane_index: LaneIndex::from_raw(self.lane_idx?),
            target_lane: LaneIndex::from_raw(self.target_lane_idx?),
        })
    }
}

#[derive(Deserialize)]
struct RawTxRow {
    t_tx: Option<f64>,
    sender_id: Option<u32>,
    msg_type: Option<u8>,
}

#[derive(Deserialize)]
struct RawMapRow {
    veh_id: String,
    node_id: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the delivered-message log from a CSV file.
pub fn load_rx_events_csv(path: &Path) -> CommResult<Vec<RxEvent>> {
    load_rx_events_reader(std::fs::File::open(path)?)
}

/// Like [`load_rx_events_csv`] but accepts any `Read` source (pass a
/// `std::io::Cursor` in tests).
pub fn load_rx_events_reader<R: Read>(reader: R) -> CommResult<Vec<RxEvent>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut events = Vec::new();

    for (line, result) in csv_reader.deserialize::<RawRxRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("delivered log row {line}: unparseable, dropping ({e})");
                continue;
            }
        };
        if row.dropped.unwrap_or(0) != 0 {
            continue;
        }
        match row.into_event() {
            Some(ev) => events.push(ev),
            None => log::warn!("delivered log row {line}: missing or non-finite field, dropping"),
        }
    }

    events.sort_by(|a, b| a.t_rx.total_cmp(&b.t_rx));
    Ok(events)
}

/// Load the attempted-transmission log from a CSV file.
pub fn load_tx_events_csv(path: &Path) -> CommResult<Vec<TxEvent>> {
    load_tx_events_reader(std::fs::File::open(path)?)
}

pub fn load_tx_events_reader<R: Read>(reader: R) -> CommResult<Vec<TxEvent>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut events = Vec::new();

    for (line, result) in csv_reader.deserialize::<RawTxRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("attempted log row {line}: unparseable, dropping ({e})");
                continue;
            }
        };
        match (row.t_tx, row.sender_id, row.msg_type) {
            (Some(t_tx), Some(sender), Some(code)) if t_tx.is_finite() => events.push(TxEvent {
                t_tx,
                sender: VehicleId(sender),
                kind: MsgKind::from_code(code),
            }),
            _ => log::warn!("attempted log row {line}: missing or non-finite field, dropping"),
        }
    }

    events.sort_by(|a, b| a.t_tx.total_cmp(&b.t_tx));
    Ok(events)
}

/// Load the vehicle→node identity map from a CSV file.
pub fn load_vehicle_map_csv(path: &Path) -> CommResult<VehicleMap> {
    load_vehicle_map_reader(std::fs::File::open(path)?)
}

pub fn load_vehicle_map_reader<R: Read>(reader: R) -> CommResult<VehicleMap> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut map = VehicleMap::new();

    for (line, result) in csv_reader.deserialize::<RawMapRow>().enumerate() {
        match result {
            Ok(row) => map.insert(row.veh_id, VehicleId(row.node_id)),
            Err(e) => log::warn!("identity map row {line}: unparseable, dropping ({e})"),
        }
    }

    Ok(map)
}
