//! Unit tests for clc-predict.

use clc_core::{Kinematics, VehicleId};

use crate::{risk, TrackerConfig, TrajectoryTracker};

fn tracker() -> TrajectoryTracker {
    TrajectoryTracker::new(TrackerConfig::default())
}

// ── Blending ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod blending {
    use super::*;

    #[test]
    fn first_observation_seeds_without_blending() {
        let mut tk = tracker();
        let meas = Kinematics::new(20.0, 1.0, 8.0, 0.05);
        // Worst-case trust inputs must not distort the seed.
        tk.observe(VehicleId(3), 0.5, &meas, 10.0, 0.0);

        let track = tk.get(VehicleId(3)).unwrap();
        assert_eq!(track.kin, meas);
        assert_eq!(track.updated_at, 0.5);
    }

    #[test]
    fn alpha_stays_in_bounds_for_any_input() {
        for pdr_step in 0..=10 {
            for age_step in 0..=50 {
                let pdr = pdr_step as f64 / 10.0;
                let age = age_step as f64 / 10.0;
                let alpha = TrajectoryTracker::blend_alpha(pdr, age);
                assert!(
                    (0.1..=0.95).contains(&alpha),
                    "alpha {alpha} out of bounds at pdr={pdr} age={age}"
                );
            }
        }
    }

    #[test]
    fn alpha_rises_with_pdr_and_falls_with_age() {
        assert!((TrajectoryTracker::blend_alpha(1.0, 0.0) - 0.85).abs() < 1e-12);
        assert!((TrajectoryTracker::blend_alpha(0.0, 0.0) - 0.25).abs() < 1e-12);
        // Fully stale beacon: freshness 0 regardless of PDR.
        assert!((TrajectoryTracker::blend_alpha(1.0, 2.0) - 0.25).abs() < 1e-12);
        assert!(
            TrajectoryTracker::blend_alpha(0.9, 0.1) > TrajectoryTracker::blend_alpha(0.9, 0.8)
        );
    }

    #[test]
    fn blend_is_convex_combination_of_measurement_and_prediction() {
        let mut tk = tracker();
        tk.observe(VehicleId(1), 0.0, &Kinematics::new(0.0, 0.0, 10.0, 0.0), 0.0, 1.0);

        // One second later the prior predicts x = 10; the measurement says 12.
        // pdr = 1, age = 0 → α = 0.85.
        tk.observe(VehicleId(1), 1.0, &Kinematics::new(12.0, 0.0, 10.0, 0.0), 0.0, 1.0);

        let track = tk.get(VehicleId(1)).unwrap();
        assert!((track.kin.x - (0.85 * 12.0 + 0.15 * 10.0)).abs() < 1e-9);
        assert_eq!(track.updated_at, 1.0);
    }

    #[test]
    fn out_of_order_observation_does_not_rewind_prediction() {
        let mut tk = tracker();
        tk.observe(VehicleId(1), 1.0, &Kinematics::new(10.0, 0.0, 10.0, 0.0), 0.0, 1.0);
        // "now" earlier than the track's update time: elapsed clamps to 0,
        // so the prediction is just the prior state.
        tk.observe(VehicleId(1), 0.5, &Kinematics::new(14.0, 0.0, 10.0, 0.0), 0.0, 1.0);

        let track = tk.get(VehicleId(1)).unwrap();
        assert!((track.kin.x - (0.85 * 14.0 + 0.15 * 10.0)).abs() < 1e-9);
    }
}

// ── Rollouts ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rollouts {
    use super::*;

    #[test]
    fn unknown_vehicle_rolls_out_empty() {
        assert!(tracker().rollout(VehicleId(9)).is_empty());
    }

    #[test]
    fn rollout_is_constant_velocity_from_step_one() {
        let mut tk = tracker();
        tk.observe(VehicleId(1), 3.0, &Kinematics::new(20.0, 0.0, 8.0, 0.0), 0.0, 1.0);

        let points = tk.rollout(VehicleId(1));
        assert_eq!(points.len(), 20); // 2.0 s horizon / 0.1 s step

        let first = &points[0];
        assert!((first.x - 20.8).abs() < 1e-9);
        assert!((first.t - 3.1).abs() < 1e-9);

        let last = &points[19];
        assert!((last.x - 36.0).abs() < 1e-9);
        assert_eq!(last.speed, 8.0);
    }
}

// ── Risk ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod risk_metrics {
    use super::*;

    /// Reference scenario: ego at the origin doing 10 m/s, lead seeded
    /// at (20, 0) doing 8 m/s on the same heading.  Gap at step k is
    /// 20 + 0.8k (the lead pulls away from the ego's *current* position),
    /// closing rate is 2 m/s, so the minimum TTC sits at the first step.
    #[test]
    fn lead_vehicle_scenario_matches_analytic_ttc() {
        let mut tk = tracker();
        tk.observe(VehicleId(2), 0.0, &Kinematics::new(20.0, 0.0, 8.0, 0.0), 0.0, 1.0);

        let ego = Kinematics::new(0.0, 0.0, 10.0, 0.0);
        let out = risk::assess(&ego, &tk.rollout(VehicleId(2)));

        assert!((out.min_ttc - 20.8 / 2.0).abs() < 1e-9);
        assert!((out.min_th - 20.8 / 10.0).abs() < 1e-9);
        assert_eq!(out.gaps.len(), 20);
        assert!((out.min_gap() - 20.8).abs() < 1e-9);
        // Gap sequence grows by 0.08 m per step.
        assert!(out.gaps.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn receding_neighbor_reports_no_ttc_but_keeps_headway() {
        let mut tk = tracker();
        // Lead is faster than the ego: never closing.
        tk.observe(VehicleId(2), 0.0, &Kinematics::new(20.0, 0.0, 12.0, 0.0), 0.0, 1.0);

        let ego = Kinematics::new(0.0, 0.0, 10.0, 0.0);
        let out = risk::assess(&ego, &tk.rollout(VehicleId(2)));

        assert_eq!(out.min_ttc, 0.0); // no detected threat ≠ safe
        assert!(out.min_th > 0.0);
    }

    #[test]
    fn vehicle_behind_reports_zero_metrics() {
        let mut tk = tracker();
        tk.observe(VehicleId(2), 0.0, &Kinematics::new(-15.0, 0.0, 9.0, 0.0), 0.0, 1.0);

        let ego = Kinematics::new(0.0, 0.0, 10.0, 0.0);
        let out = risk::assess(&ego, &tk.rollout(VehicleId(2)));

        assert_eq!(out.min_ttc, 0.0);
        assert_eq!(out.min_th, 0.0);
        assert!(out.min_gap() < 0.0);
    }

    #[test]
    fn crossing_neighbor_projects_speed_onto_ego_heading() {
        // Neighbor heads perpendicular to the ego: its speed contributes
        // nothing along the ego axis, so closing rate = ego speed.
        let mut tk = tracker();
        tk.observe(
            VehicleId(2),
            0.0,
            &Kinematics::new(20.0, 0.0, 8.0, std::f64::consts::FRAC_PI_2),
            0.0,
            1.0,
        );

        let ego = Kinematics::new(0.0, 0.0, 10.0, 0.0);
        let out = risk::assess(&ego, &tk.rollout(VehicleId(2)));

        // First step: lateral drift only, gap stays 20 → ttc = 20 / 10.
        assert!((out.min_ttc - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_rollout_yields_inert_assessment() {
        let ego = Kinematics::new(0.0, 0.0, 10.0, 0.0);
        let out = risk::assess(&ego, &[]);
        assert_eq!(out.min_ttc, 0.0);
        assert_eq!(out.min_th, 0.0);
        assert!(out.gaps.is_empty());
        assert_eq!(out.min_gap(), f64::INFINITY);
    }
}
