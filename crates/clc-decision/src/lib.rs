//! `clc-decision` — from lane candidates and risk signals to a single
//! EXECUTE / DEFER / CANCEL action.
//!
//! # Crate layout
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`scorer`] | `LaneScorer` — gap-based candidate ranking            |
//! | [`gate`]   | `DecisionGate` — cooldown, adaptation, safety,        |
//! |            | coordination, in that order                           |
//! | [`error`]  | `DecisionError`, `DecisionResult<T>`                  |

pub mod error;
pub mod gate;
pub mod scorer;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DecisionError, DecisionResult};
pub use gate::{Action, Decision, DecisionGate, GateConfig, Reason, RiskTriple};
pub use scorer::{LaneContext, LaneScorer, RankedLanes, ScorerConfig};
