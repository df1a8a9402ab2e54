//! `LaneScorer` — rank candidate lanes by locally observable gaps.
//!
//! A pure function of its inputs: no table access, no history.  Feasibility
//! (which lanes are legal from here) is the topology port's problem; the
//! scorer only orders what it is given.

use rustc_hash::FxHashMap;

use clc_core::LaneId;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Scoring weights.  `gap_clip` bounds both gap terms so one empty motorway
/// lane cannot dominate every other signal.
#[derive(Copy, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ScorerConfig {
    pub w_leader: f64,
    pub w_follower: f64,
    /// Gaps are clipped to `[0, gap_clip]` metres before weighting.
    pub gap_clip: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            w_leader: 1.0,
            w_follower: 0.7,
            gap_clip: 80.0,
        }
    }
}

// ── Inputs / outputs ──────────────────────────────────────────────────────────

/// What the topology port can observe about one candidate lane.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneContext {
    pub lane: LaneId,
    /// Gap to the nearest vehicle ahead on that lane, metres.
    pub leader_gap: f64,
    /// Gap to the nearest vehicle behind on that lane, metres.
    pub follower_gap: f64,
    pub leader_speed: f64,
    pub follower_speed: f64,
}

impl LaneContext {
    /// The conservative default when nothing is observable: zero gaps, which
    /// scores the lane as fully occupied.
    pub fn closed(lane: LaneId) -> Self {
        Self {
            lane,
            leader_gap: 0.0,
            follower_gap: 0.0,
            leader_speed: 0.0,
            follower_speed: 0.0,
        }
    }
}

/// Scorer output: every candidate with its score, best first, plus the
/// chosen target.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedLanes {
    pub ranked: Vec<(LaneId, f64)>,
    pub target: LaneId,
}

// ── Scorer ────────────────────────────────────────────────────────────────────

/// Scores candidate lanes; see [`ScorerConfig`] for the weights.
#[derive(Clone, Debug, Default)]
pub struct LaneScorer {
    config: ScorerConfig,
}

impl LaneScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    /// Rank `candidates` for an ego currently on `current_lane`.
    ///
    /// score = w_leader·clip(leader_gap) + w_follower·clip(follower_gap) − penalty
    ///
    /// The sort is stable and descending: equal scores keep the candidate
    /// ordering the caller supplied.  With no candidates at all, the target
    /// falls back to the current lane.
    pub fn rank(
        &self,
        current_lane: &LaneId,
        candidates: &[LaneId],
        contexts: &FxHashMap<LaneId, LaneContext>,
        penalties: &FxHashMap<LaneId, f64>,
    ) -> RankedLanes {
        let mut ranked: Vec<(LaneId, f64)> = candidates
            .iter()
            .map(|lane| {
                let (leader_gap, follower_gap) = match contexts.get(lane) {
                    Some(ctx) => (
                        ctx.leader_gap.clamp(0.0, self.config.gap_clip),
                        ctx.follower_gap.clamp(0.0, self.config.gap_clip),
                    ),
                    None => (0.0, 0.0),
                };
                let penalty = penalties.get(lane).copied().unwrap_or(0.0);
                let score = self.config.w_leader * leader_gap
                    + self.config.w_follower * follower_gap
                    - penalty;
                (lane.clone(), score)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let target = ranked
            .first()
            .map(|(lane, _)| lane.clone())
            .unwrap_or_else(|| current_lane.clone());

        RankedLanes { ranked, target }
    }
}
