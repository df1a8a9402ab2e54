//! `clc-predict` — short-horizon trajectory prediction from noisy beacons.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`track`]  | `Track`, `TrackerConfig`, `TrajectoryTracker`           |
//! | [`risk`]   | `TrajectoryPoint`, `RiskAssessment`, [`risk::assess`]   |
//! | [`error`]  | `PredictError`, `PredictResult<T>`                      |
//!
//! # Degraded-mode tracker
//!
//! This is intentionally NOT a covariance-propagating filter.  Beacon-fed
//! tracking needs to survive bursty packet loss with whatever arrived, so
//! the tracker blends each measurement against a constant-velocity
//! prediction with a single scalar weight driven by link quality and beacon
//! age.  When a richer estimator is available upstream, this crate is the
//! explicit fallback.

pub mod error;
pub mod risk;
pub mod track;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PredictError, PredictResult};
pub use risk::{RiskAssessment, TrajectoryPoint};
pub use track::{Track, TrackerConfig, TrajectoryTracker};
