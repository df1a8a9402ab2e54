//! `IntentRegistry` — TTL-bounded cache of peers' declared lane-change
//! intents, used for coordination-conflict detection.
//!
//! One registry per receiving agent.  Unlike the neighbor table, records
//! here expire hard: an intent older than the TTL must never veto a lane
//! change, so queries prune before scanning.  Pruning eagerly on every
//! query or lazily on a timer is observably identical; this implementation
//! prunes on query.

use rustc_hash::{FxHashMap, FxHashSet};

use clc_core::{LaneIndex, VehicleId};

/// A received lane-change declaration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntentRecord {
    /// Reception timestamp, seconds.
    pub received_at: f64,
    /// The lane the sender declared it wants to move into.
    pub target_lane: LaneIndex,
}

/// At most one live intent per sender; newer declarations replace older.
#[derive(Debug)]
pub struct IntentRegistry {
    ttl_secs: f64,
    last: FxHashMap<VehicleId, IntentRecord>,
}

impl IntentRegistry {
    pub fn new(ttl_secs: f64) -> Self {
        Self {
            ttl_secs,
            last: FxHashMap::default(),
        }
    }

    /// Upsert the sender's declared intent.
    pub fn update(&mut self, sender: VehicleId, received_at: f64, target_lane: LaneIndex) {
        self.last.insert(sender, IntentRecord { received_at, target_lane });
    }

    /// Drop every record whose age at `now` exceeds the TTL.
    pub fn prune(&mut self, now: f64) {
        let ttl = self.ttl_secs;
        self.last.retain(|_, rec| (now - rec.received_at) <= ttl);
    }

    /// `true` iff some *other* vehicle in `neighbors` holds a live intent
    /// for exactly `target_lane`.
    ///
    /// The ego's own declarations never count as a conflict, whatever the
    /// caller passes in `neighbors`.
    pub fn has_conflict(
        &mut self,
        now: f64,
        neighbors: &FxHashSet<VehicleId>,
        target_lane: LaneIndex,
        ego: VehicleId,
    ) -> bool {
        self.prune(now);
        self.last.iter().any(|(&sender, rec)| {
            sender != ego && neighbors.contains(&sender) && rec.target_lane == target_lane
        })
    }

    /// Number of live records (including any not yet pruned).
    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
