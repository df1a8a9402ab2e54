//! Planar kinematic state and longitudinal projection helpers.
//!
//! Positions are Cartesian metres in the mobility tool's frame; headings are
//! radians, counter-clockwise from +x.  All values are `f64` — the decision
//! math divides small gaps by small closing rates, and single precision
//! visibly shifts TTC values near the gate thresholds.

use crate::LaneId;

/// Instantaneous kinematic state: position, scalar speed, heading.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Kinematics {
    pub x: f64,
    pub y: f64,
    /// Scalar speed in m/s along `heading`.
    pub speed: f64,
    /// Heading in radians, CCW from +x.
    pub heading: f64,
}

impl Kinematics {
    pub fn new(x: f64, y: f64, speed: f64, heading: f64) -> Self {
        Self { x, y, speed, heading }
    }

    /// Unit vector of `heading`.
    #[inline]
    pub fn heading_unit(&self) -> (f64, f64) {
        (self.heading.cos(), self.heading.sin())
    }

    /// Longitudinal gap to `(px, py)`: the projection of the offset vector
    /// onto this state's heading.  Positive = ahead, negative = behind.
    pub fn longitudinal_gap_to(&self, px: f64, py: f64) -> f64 {
        let (ux, uy) = self.heading_unit();
        ux * (px - self.x) + uy * (py - self.y)
    }

    /// Position after travelling at constant speed and heading for `dt`
    /// seconds.  Negative `dt` is clamped to zero — states never move
    /// backwards in time.
    pub fn propagate(&self, dt: f64) -> Kinematics {
        let dt = dt.max(0.0);
        let (ux, uy) = self.heading_unit();
        Kinematics {
            x: self.x + self.speed * ux * dt,
            y: self.y + self.speed * uy * dt,
            speed: self.speed,
            heading: self.heading,
        }
    }
}

/// Per-tick vehicle state supplied by the mobility port.  Read-only input;
/// the core never owns or retains it across ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    pub kin: Kinematics,
    /// Lane the vehicle currently occupies.
    pub lane: LaneId,
}

impl VehicleState {
    pub fn new(kin: Kinematics, lane: LaneId) -> Self {
        Self { kin, lane }
    }
}
