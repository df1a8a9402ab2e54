//! Unit tests for clc-decision.

use rustc_hash::FxHashMap;

use clc_core::LaneId;

use crate::{LaneContext, LaneScorer, ScorerConfig};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ctx(lane: &LaneId, leader_gap: f64, follower_gap: f64) -> LaneContext {
    LaneContext {
        lane: lane.clone(),
        leader_gap,
        follower_gap,
        leader_speed: 0.0,
        follower_speed: 0.0,
    }
}

fn contexts(entries: &[(&LaneId, f64, f64)]) -> FxHashMap<LaneId, LaneContext> {
    entries
        .iter()
        .map(|(lane, lead, follow)| ((*lane).clone(), ctx(lane, *lead, *follow)))
        .collect()
}

// ── LaneScorer ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scorer {
    use super::*;

    #[test]
    fn bigger_leader_gap_never_scores_worse() {
        let scorer = LaneScorer::new(ScorerConfig::default());
        let current = LaneId::new("main_0");
        let other = LaneId::new("main_1");
        let candidates = vec![current.clone(), other.clone()];
        let penalties = FxHashMap::default();

        let mut previous = f64::NEG_INFINITY;
        for gap in [0.0, 5.0, 20.0, 79.0] {
            let ctxs = contexts(&[(&current, 10.0, 10.0), (&other, gap, 10.0)]);
            let out = scorer.rank(&current, &candidates, &ctxs, &penalties);
            let score = out
                .ranked
                .iter()
                .find(|(lane, _)| *lane == other)
                .map(|(_, s)| *s)
                .unwrap();
            assert!(score >= previous, "score regressed at leader_gap={gap}");
            previous = score;
        }
    }

    #[test]
    fn gap_clip_caps_the_contribution() {
        let scorer = LaneScorer::new(ScorerConfig::default());
        let current = LaneId::new("main_0");
        let candidates = vec![current.clone()];
        let penalties = FxHashMap::default();

        let at_clip = scorer.rank(
            &current,
            &candidates,
            &contexts(&[(&current, 80.0, 0.0)]),
            &penalties,
        );
        let beyond_clip = scorer.rank(
            &current,
            &candidates,
            &contexts(&[(&current, 500.0, 0.0)]),
            &penalties,
        );
        assert_eq!(at_clip.ranked[0].1, beyond_clip.ranked[0].1);
    }

    #[test]
    fn ties_keep_candidate_order() {
        let scorer = LaneScorer::new(ScorerConfig::default());
        let a = LaneId::new("main_0");
        let b = LaneId::new("main_1");
        let ctxs = contexts(&[(&a, 10.0, 10.0), (&b, 10.0, 10.0)]);
        let penalties = FxHashMap::default();

        let out = scorer.rank(&a, &[a.clone(), b.clone()], &ctxs, &penalties);
        assert_eq!(out.target, a);
        let out = scorer.rank(&a, &[b.clone(), a.clone()], &ctxs, &penalties);
        assert_eq!(out.target, b);
    }

    #[test]
    fn penalty_subtracts_from_score() {
        let scorer = LaneScorer::new(ScorerConfig::default());
        let a = LaneId::new("main_0");
        let b = LaneId::new("main_1");
        let ctxs = contexts(&[(&a, 10.0, 0.0), (&b, 10.0, 0.0)]);
        let penalties: FxHashMap<LaneId, f64> = [(b.clone(), 3.0)].into_iter().collect();

        let out = scorer.rank(&a, &[b.clone(), a.clone()], &ctxs, &penalties);
        assert_eq!(out.target, a);
        assert!((out.ranked[1].1 - 7.0).abs() < 1e-12);
    }

    #[test]
    fn missing_context_scores_as_closed_lane() {
        let scorer = LaneScorer::new(ScorerConfig::default());
        let a = LaneId::new("main_0");
        let b = LaneId::new("main_1");
        let ctxs = contexts(&[(&a, 5.0, 0.0)]); // b has no context

        let out = scorer.rank(&a, &[a.clone(), b.clone()], &ctxs, &FxHashMap::default());
        assert_eq!(out.target, a);
        assert_eq!(out.ranked[1], (b, 0.0));
    }

    #[test]
    fn no_candidates_falls_back_to_current_lane() {
        let scorer = LaneScorer::new(ScorerConfig::default());
        let current = LaneId::new("main_0");
        let out = scorer.rank(&current, &[], &FxHashMap::default(), &FxHashMap::default());
        assert_eq!(out.target, current);
        assert!(out.ranked.is_empty());
    }
}

// ── DecisionGate ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod gate {
    use clc_comm::LinkQualitySample;

    use crate::{Action, DecisionGate, GateConfig, Reason, RiskTriple};

    fn gate() -> DecisionGate {
        DecisionGate::new(GateConfig::default())
    }

    fn safe_risk() -> RiskTriple {
        RiskTriple { min_ttc: 10.0, min_th: 5.0, min_gap: 40.0 }
    }

    #[test]
    fn clear_inputs_execute() {
        let d = gate().decide(10.0, -100.0, &safe_risk(), &LinkQualitySample::PERFECT, true);
        assert_eq!(d.action, Action::Execute);
        assert_eq!(d.reason, Reason::Ok);
        assert_eq!(d.reason.as_str(), "ok");
    }

    #[test]
    fn cooldown_outranks_safety_gate() {
        // Risk that would certainly CANCEL…
        let risk = RiskTriple::NO_TRACK;
        // …but the last execute was 0.5 s ago, inside the 2 s cooldown.
        let d = gate().decide(10.0, 9.5, &risk, &LinkQualitySample::PERFECT, true);
        assert_eq!(d.action, Action::Defer);
        assert_eq!(d.reason, Reason::Cooldown);
    }

    #[test]
    fn cooldown_boundary_is_exclusive() {
        // Exactly cooldown_secs elapsed: gate proceeds past the cooldown.
        let d = gate().decide(12.0, 10.0, &safe_risk(), &LinkQualitySample::PERFECT, true);
        assert_eq!(d.action, Action::Execute);
    }

    #[test]
    fn degraded_link_tightens_thresholds() {
        // Exactly at the nominal thresholds: passes on a clean link…
        let at_nominal = RiskTriple { min_ttc: 2.0, min_th: 1.2, min_gap: 5.0 };
        let clean = gate().decide(10.0, -100.0, &at_nominal, &LinkQualitySample::PERFECT, true);
        assert_eq!(clean.action, Action::Execute);

        // …but PDR 0.5 < 0.85 multiplies them by 1.35 and the same risk fails.
        let lossy = LinkQualitySample { pdr: 0.5, latency_p95: 0.0 };
        let d = gate().decide(10.0, -100.0, &at_nominal, &lossy, true);
        assert_eq!(d.action, Action::Cancel);
        assert_eq!(d.reason, Reason::SafetyGate);
    }

    #[test]
    fn high_latency_also_degrades() {
        let at_nominal = RiskTriple { min_ttc: 2.0, min_th: 1.2, min_gap: 5.0 };
        let slow = LinkQualitySample { pdr: 1.0, latency_p95: 0.3 };
        let d = gate().decide(10.0, -100.0, &at_nominal, &slow, true);
        assert_eq!(d.action, Action::Cancel);
    }

    #[test]
    fn safety_gate_fires_on_any_violated_minimum() {
        let link = LinkQualitySample::PERFECT;
        for risk in [
            RiskTriple { min_ttc: 0.5, ..safe_risk() },
            RiskTriple { min_th: 0.5, ..safe_risk() },
            RiskTriple { min_gap: 1.0, ..safe_risk() },
        ] {
            let d = gate().decide(10.0, -100.0, &risk, &link, true);
            assert_eq!(d.action, Action::Cancel);
            assert_eq!(d.reason, Reason::SafetyGate);
        }
    }

    #[test]
    fn coordination_conflict_defers_after_safety_passes() {
        let d = gate().decide(10.0, -100.0, &safe_risk(), &LinkQualitySample::PERFECT, false);
        assert_eq!(d.action, Action::Defer);
        assert_eq!(d.reason, Reason::CoordinationConflict);
    }

    #[test]
    fn safety_outranks_coordination() {
        let d = gate().decide(10.0, -100.0, &RiskTriple::NO_TRACK, &LinkQualitySample::PERFECT, false);
        assert_eq!(d.reason, Reason::SafetyGate);
    }
}
