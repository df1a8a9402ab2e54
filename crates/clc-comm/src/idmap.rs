//! `VehicleMap` — the mobility tool's vehicle labels mapped to network node
//! ids.
//!
//! The communication simulator addresses vehicles by integer node id while
//! the mobility tool uses string labels; this map is the only place the two
//! identity spaces meet.  A missing entry for a vehicle we must decide for
//! is a configuration error, surfaced to the caller — never skipped.

use rustc_hash::FxHashMap;

use clc_core::VehicleId;

use crate::{CommError, CommResult};

/// Vehicle label → node id lookup.
#[derive(Default, Debug, Clone)]
pub struct VehicleMap {
    inner: FxHashMap<String, VehicleId>,
}

impl VehicleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, VehicleId)>,
        S: Into<String>,
    {
        Self {
            inner: pairs.into_iter().map(|(label, id)| (label.into(), id)).collect(),
        }
    }

    pub fn insert(&mut self, label: impl Into<String>, id: VehicleId) {
        self.inner.insert(label.into(), id);
    }

    /// Node id for `label`, erroring on a missing mapping.
    pub fn node(&self, label: &str) -> CommResult<VehicleId> {
        self.inner
            .get(label)
            .copied()
            .ok_or_else(|| CommError::UnmappedVehicle(label.to_owned()))
    }

    /// Non-failing lookup for contexts (e.g. mobility logging) where an
    /// unmapped vehicle is acceptable.
    pub fn get(&self, label: &str) -> Option<VehicleId> {
        self.inner.get(label).copied()
    }

    /// All mapped labels, sorted for deterministic iteration.
    pub fn labels_sorted(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.inner.keys().cloned().collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
