//! `clc-comm` — everything the decision core learns from the radio.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`event`]     | `MsgKind`, `RxEvent`, `TxEvent` — the delivered/attempted  |
//! |               | message records of the network-simulation collaborator     |
//! | [`neighbors`] | `NeighborTable` — latest-state cache per receiving agent   |
//! | [`intents`]   | `IntentRegistry` — TTL-bounded lane-change declarations    |
//! | [`link`]      | `LinkQualityEstimator` — windowed PDR / latency p95        |
//! | [`loader`]    | CSV trace ingestion (delivered, attempted, identity map)   |
//! | [`idmap`]     | `VehicleMap` — vehicle label → node id                     |
//! | [`error`]     | `CommError`, `CommResult<T>`                               |
//!
//! # Design notes
//!
//! The two caches have deliberately different staleness policies:
//! `NeighborTable` keeps records forever and reports their age on read (the
//! tracker downweights old beacons smoothly), while `IntentRegistry`
//! hard-expires records after a TTL (a stale intent must never veto a lane
//! change).  The asymmetry is intentional — do not "unify" them.

pub mod error;
pub mod event;
pub mod idmap;
pub mod intents;
pub mod link;
pub mod loader;
pub mod neighbors;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CommError, CommResult};
pub use event::{MsgKind, RxEvent, TxEvent};
pub use idmap::VehicleMap;
pub use intents::{IntentRecord, IntentRegistry};
pub use link::{CommConfig, LinkQualityEstimator, LinkQualitySample};
pub use loader::{load_rx_events_csv, load_rx_events_reader, load_tx_events_csv,
                 load_tx_events_reader, load_vehicle_map_csv, load_vehicle_map_reader};
pub use neighbors::{NeighborRecord, NeighborTable};
