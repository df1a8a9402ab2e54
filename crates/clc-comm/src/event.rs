//! Inter-vehicle message records.
//!
//! These mirror the network collaborator's log schema: one `TxEvent` per
//! attempted transmission, one `RxEvent` per successful delivery.  Dropped
//! packets appear only in the attempted log.

use clc_core::{Kinematics, LaneIndex, VehicleId};

/// Wire-level message kind.
///
/// Codes follow the trace format: 1 = beacon, 2 = intent.  Anything else is
/// carried through as `Other` so a foreign message can still refresh a
/// neighbor record, but is excluded from link-quality accounting.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MsgKind {
    /// Periodic broadcast of the sender's kinematic state.
    Beacon,
    /// Declaration of the sender's desired target lane.
    Intent,
    /// Unrecognized kind code, preserved verbatim.
    Other(u8),
}

impl MsgKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => MsgKind::Beacon,
            2 => MsgKind::Intent,
            c => MsgKind::Other(c),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            MsgKind::Beacon => 1,
            MsgKind::Intent => 2,
            MsgKind::Other(c) => c,
        }
    }

    /// Kinds that count toward delivery-ratio and latency statistics.
    #[inline]
    pub fn counts_for_link_quality(self) -> bool {
        matches!(self, MsgKind::Beacon | MsgKind::Intent)
    }
}

/// A successfully delivered message, as seen by its receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct RxEvent {
    /// Transmission timestamp (sender clock), seconds.
    pub t_tx: f64,
    /// Reception timestamp, seconds.  The stream is ordered by this field.
    pub t_rx: f64,
    pub sender: VehicleId,
    pub receiver: VehicleId,
    pub kind: MsgKind,
    /// Sender kinematic state as sampled at transmission time.
    pub kin: Kinematics,
    /// Lane the sender occupied at transmission time.
    pub lane_index: LaneIndex,
    /// Declared lane-change target; `INVALID` when none was declared.
    pub target_lane: LaneIndex,
}

impl RxEvent {
    /// One-way latency of this delivery.  May be non-finite if the trace
    /// carried garbage timestamps; consumers must filter.
    #[inline]
    pub fn latency(&self) -> f64 {
        self.t_rx - self.t_tx
    }
}

/// An attempted transmission, whether or not anyone received it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TxEvent {
    pub t_tx: f64,
    pub sender: VehicleId,
    pub kind: MsgKind,
}
