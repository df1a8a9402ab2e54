//! `clc-core` — foundational types for the `rust_clc` cooperative
//! lane-change framework.
//!
//! This crate is a dependency of every other `clc-*` crate.  It intentionally
//! has no `clc-*` dependencies and minimal external ones (only `thiserror`
//! and `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`ids`]     | `VehicleId`, `LaneIndex`                            |
//! | [`lane`]    | `LaneId` — opaque `edge_index` lane labels          |
//! | [`motion`]  | `Kinematics`, `VehicleState`, gap projection        |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                     |
//! | [`error`]   | `ClcError`, `ClcResult`                             |

pub mod error;
pub mod ids;
pub mod lane;
pub mod motion;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ClcError, ClcResult};
pub use ids::{LaneIndex, VehicleId};
pub use lane::LaneId;
pub use motion::{Kinematics, VehicleState};
pub use time::{SimClock, SimConfig, Tick};
