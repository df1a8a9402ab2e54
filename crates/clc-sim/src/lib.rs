//! `clc-sim` — tick loop orchestrator for the rust_clc framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.sim.end_tick():
//!   ① Advance   — step the mobility collaborator one tick.
//!   ② Absorb    — drain every message event with t_rx ≤ now, in
//!                 non-decreasing t_rx order, into the receiver's
//!                 NeighborTable / IntentRegistry.  ALL such events are
//!                 absorbed before any decision below — a decision must
//!                 never see state from its own future.
//!   ③ Decide    — for each controlled vehicle in sorted label order:
//!                 score lanes → query link quality → feed the tracker →
//!                 check intent conflicts → pick the target-lane leader →
//!                 assess risk → gate.  EXECUTE becomes a change_lane
//!                 command on the mobility port.
//!   ④ Observe   — one decision record per controlled vehicle, mobility
//!                 rows for everyone, rollout points for the chosen leader.
//! ```
//!
//! Fully synchronous and single-threaded: every call completes before the
//! next begins, and within one tick agents are processed in a fixed sorted
//! order, so runs are reproducible event-for-event.
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`engine`]   | `ClosedLoop`, `LoopConfig`, `RunSummary`              |
//! | [`builder`]  | `ClosedLoopBuilder`                                   |
//! | [`ports`]    | `MobilityPort`, `LaneTopologyPort`,                   |
//! |              | `ConservativeTopology`                                |
//! | [`toggles`]  | `FeatureToggles` — explicit ablation switches         |
//! | [`observer`] | `LoopObserver`, `DecisionRecord`, `NoopObserver`      |
//! | [`error`]    | `SimError`, `SimResult<T>`                            |

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;
pub mod ports;
pub mod toggles;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::ClosedLoopBuilder;
pub use engine::{ClosedLoop, LoopConfig, RunSummary};
pub use error::{SimError, SimResult};
pub use observer::{DecisionRecord, LoopObserver, NoopObserver};
pub use ports::{ConservativeTopology, LaneTopologyPort, MobilityPort};
pub use toggles::FeatureToggles;
