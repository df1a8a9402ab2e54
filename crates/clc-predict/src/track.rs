//! Blended-state tracks and the `TrajectoryTracker`.

use rustc_hash::FxHashMap;

use clc_core::{Kinematics, VehicleId};

use crate::risk::TrajectoryPoint;

/// Lower clamp of the measurement blend weight.
const ALPHA_MIN: f64 = 0.1;
/// Upper clamp of the measurement blend weight.
const ALPHA_MAX: f64 = 0.95;
/// Beacon age (seconds) at which freshness reaches zero.
const FRESHNESS_WINDOW_SECS: f64 = 1.0;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Rollout horizon parameters.
#[derive(Copy, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TrackerConfig {
    /// How far into the future rollouts extend, seconds.
    pub horizon_secs: f64,
    /// Spacing of rollout points, seconds.
    pub step_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            horizon_secs: 2.0,
            step_secs: 0.1,
        }
    }
}

impl TrackerConfig {
    /// Number of discrete rollout steps.
    #[inline]
    pub fn steps(&self) -> usize {
        (self.horizon_secs / self.step_secs) as usize
    }
}

// ── Track ─────────────────────────────────────────────────────────────────────

/// The blended state of one observed vehicle.
///
/// Seeded verbatim from the first measurement, then pulled toward each
/// subsequent measurement by the blend weight.  Tracks live for the whole
/// run; a vehicle that goes silent keeps its last blended state and simply
/// ages.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Track {
    pub kin: Kinematics,
    /// Time of the last observation folded into this track, seconds.
    pub updated_at: f64,
}

// ── TrajectoryTracker ─────────────────────────────────────────────────────────

/// One blended track per observed vehicle, plus constant-velocity rollouts.
pub struct TrajectoryTracker {
    config: TrackerConfig,
    tracks: FxHashMap<VehicleId, Track>,
}

impl TrajectoryTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: FxHashMap::default(),
        }
    }

    /// Blend weight for a measurement given current link PDR and beacon age.
    ///
    /// α = clamp(0.25 + 0.6 · pdr · freshness, 0.1, 0.95), where freshness
    /// decays linearly from 1 to 0 over a one-second window.  High PDR and a
    /// fresh beacon → trust the measurement; a stale beacon on a lossy link
    /// → lean on the prediction.
    pub fn blend_alpha(pdr: f64, age_secs: f64) -> f64 {
        let freshness = (1.0 - age_secs / FRESHNESS_WINDOW_SECS).clamp(0.0, 1.0);
        (0.25 + 0.6 * pdr * freshness).clamp(ALPHA_MIN, ALPHA_MAX)
    }

    /// Fold one measurement into `vehicle`'s track.
    ///
    /// First observation seeds the track directly (no blending — there is
    /// nothing to blend against).  Later observations are combined
    /// component-wise with the constant-velocity prediction:
    /// `state ← α·measurement + (1−α)·prediction`.
    pub fn observe(
        &mut self,
        vehicle: VehicleId,
        now: f64,
        measurement: &Kinematics,
        age_secs: f64,
        link_pdr: f64,
    ) {
        let Some(prior) = self.tracks.get(&vehicle) else {
            self.tracks.insert(vehicle, Track { kin: *measurement, updated_at: now });
            return;
        };

        let predicted = prior.kin.propagate(now - prior.updated_at);
        let alpha = Self::blend_alpha(link_pdr, age_secs);
        let beta = 1.0 - alpha;

        let blended = Kinematics {
            x: alpha * measurement.x + beta * predicted.x,
            y: alpha * measurement.y + beta * predicted.y,
            speed: alpha * measurement.speed + beta * predicted.speed,
            heading: alpha * measurement.heading + beta * predicted.heading,
        };
        self.tracks.insert(vehicle, Track { kin: blended, updated_at: now });
    }

    /// Constant-speed/heading rollout of `vehicle`'s track over the
    /// configured horizon, starting one step into the future.
    ///
    /// Unknown vehicle → empty sequence (a lookup miss, not an error).
    pub fn rollout(&self, vehicle: VehicleId) -> Vec<TrajectoryPoint> {
        let Some(track) = self.tracks.get(&vehicle) else {
            return Vec::new();
        };

        let step = self.config.step_secs;
        let (ux, uy) = track.kin.heading_unit();
        (1..=self.config.steps())
            .map(|k| {
                let dt = k as f64 * step;
                TrajectoryPoint {
                    x: track.kin.x + track.kin.speed * ux * dt,
                    y: track.kin.y + track.kin.speed * uy * dt,
                    speed: track.kin.speed,
                    heading: track.kin.heading,
                    t: track.updated_at + dt,
                }
            })
            .collect()
    }

    /// Current blended state for `vehicle`, if it has ever been observed.
    pub fn get(&self, vehicle: VehicleId) -> Option<&Track> {
        self.tracks.get(&vehicle)
    }

    pub fn contains(&self, vehicle: VehicleId) -> bool {
        self.tracks.contains_key(&vehicle)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
