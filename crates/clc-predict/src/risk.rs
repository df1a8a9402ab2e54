//! Rollout points and ego-relative risk metrics.

use clc_core::Kinematics;

/// Closing rates at or below this are treated as "not closing".
const CLOSING_EPS: f64 = 1e-3;
/// Floor for the ego speed in the time-headway denominator.
const SPEED_EPS: f64 = 1e-3;

/// One predicted future state along a rollout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub heading: f64,
    /// Absolute time of this point, seconds.
    pub t: f64,
}

/// Risk metrics of one ego-vs-one-track rollout.
///
/// A zero `min_ttc`/`min_th` means *no qualifying step was found*, not
/// "safe": callers must combine this with the gap gate and coordination
/// signals, never treat it as a standalone green light.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskAssessment {
    /// Minimum time-to-collision across qualifying steps; 0 if none closed.
    pub min_ttc: f64,
    /// Minimum time-headway across qualifying steps; 0 if none had gap > 0.
    pub min_th: f64,
    /// Longitudinal gap at every rollout step, in order.
    pub gaps: Vec<f64>,
}

impl RiskAssessment {
    /// Smallest gap over the rollout, or +∞ for an empty rollout (so the
    /// gap gate cannot fire on a vehicle that was never predicted).
    pub fn min_gap(&self) -> f64 {
        self.gaps.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

/// Assess a neighbor rollout against the ego's current state.
///
/// For each point: the longitudinal gap is the offset projected onto the
/// ego heading; the closing rate is the ego speed minus the neighbor speed
/// projected onto that heading.  TTC is counted only while the gap is open
/// and genuinely closing; TH only while the gap is open.
pub fn assess(ego: &Kinematics, rollout: &[TrajectoryPoint]) -> RiskAssessment {
    let mut gaps = Vec::with_capacity(rollout.len());
    let mut min_ttc = f64::INFINITY;
    let mut min_th = f64::INFINITY;

    for point in rollout {
        let gap = ego.longitudinal_gap_to(point.x, point.y);
        gaps.push(gap);

        let neighbor_along_ego = point.speed * (point.heading - ego.heading).cos();
        let closing = ego.speed - neighbor_along_ego;

        if gap > 0.0 && closing > CLOSING_EPS {
            min_ttc = min_ttc.min(gap / closing);
        }
        if gap > 0.0 {
            min_th = min_th.min(gap / ego.speed.max(SPEED_EPS));
        }
    }

    RiskAssessment {
        min_ttc: if min_ttc.is_finite() { min_ttc } else { 0.0 },
        min_th: if min_th.is_finite() { min_th } else { 0.0 },
        gaps,
    }
}
