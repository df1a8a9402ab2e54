//! `NeighborTable` — latest-known state of every vehicle a receiver has
//! heard from.
//!
//! One table per receiving agent.  A new message from a sender fully
//! replaces that sender's record — there is no merging, and no automatic
//! eviction.  Staleness is a property computed on read: consumers get the
//! record together with its age against a caller-supplied "now" and decide
//! for themselves how much to trust it (the tracker folds age into its
//! blend weight).  Contrast with [`IntentRegistry`][crate::IntentRegistry],
//! which hard-expires.

use rustc_hash::FxHashMap;

use clc_core::{Kinematics, LaneIndex, VehicleId};

use crate::MsgKind;

/// The last message-borne state received from one sender.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborRecord {
    pub kin: Kinematics,
    /// Lane the sender occupied when it transmitted.
    pub lane_index: LaneIndex,
    /// Kind of the message that produced this record.
    pub kind: MsgKind,
    /// Lane-change target declared in that message; `INVALID` when none.
    pub target_lane: LaneIndex,
    /// Reception timestamp, seconds.
    pub received_at: f64,
}

impl NeighborRecord {
    /// Age of this record at `now`.  Never stored — always recomputed.
    #[inline]
    pub fn age_at(&self, now: f64) -> f64 {
        now - self.received_at
    }
}

/// Latest-state cache keyed by sender.  At most one record per sender.
#[derive(Default, Debug)]
pub struct NeighborTable {
    records: FxHashMap<VehicleId, NeighborRecord>,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the sender's record.  Replace semantics: the previous record
    /// is discarded wholesale.
    pub fn update(&mut self, sender: VehicleId, record: NeighborRecord) {
        self.records.insert(sender, record);
    }

    /// Latest record for `sender`, if any message has been received from it.
    pub fn get(&self, sender: VehicleId) -> Option<&NeighborRecord> {
        self.records.get(&sender)
    }

    /// Iterate all held records together with their age at `now`.
    ///
    /// Iteration order is unspecified; callers needing determinism must
    /// sort (the orchestrator sorts sender ids before tracker updates).
    pub fn iter_with_age(&self, now: f64) -> impl Iterator<Item = (VehicleId, &NeighborRecord, f64)> {
        self.records
            .iter()
            .map(move |(&sender, rec)| (sender, rec, rec.age_at(now)))
    }

    /// All sender ids currently held, sorted ascending.
    pub fn sender_ids_sorted(&self) -> Vec<VehicleId> {
        let mut ids: Vec<VehicleId> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
