//! Four-phase trapezoidal path for a single axis.
//!
//! A path is: accelerate from `vi` to `v2` (t1), coast at `v2` (t2),
//! accelerate from `v2` to `vf` (t3), coast at `vf` (t4). Both ramps use
//! the axis acceleration magnitude.
//!
//! - [`solver`] - solve the path equations for two unknowns.
//! - [`vmax`] - solve subject to a velocity cap.
//! - [`sample`] - evaluate position/velocity inside a solved path.

pub mod sample;
pub mod solver;
pub mod vmax;

use serde::{Deserialize, Serialize};

/// Solved (or partially specified) path for one axis.
///
/// Inputs and outputs share the struct: the solver reads the known
/// quantities and overwrites the unknown ones.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    /// Signed displacement to cover.
    pub dist: f64,
    /// Initial velocity.
    pub vi: f64,
    /// Coast velocity between the two ramps.
    pub v2: f64,
    /// Final velocity.
    pub vf: f64,
    /// First ramp duration.
    pub t1: f64,
    /// Coast duration at `v2`.
    pub t2: f64,
    /// Second ramp duration.
    pub t3: f64,
    /// Tail coast duration at `vf`.
    pub t4: f64,
    /// Total duration.
    pub total: f64,
}

impl Path {
    /// Path from `vi` to `vf` over `dist`, all durations zero.
    pub fn new(dist: f64, vi: f64, vf: f64) -> Self {
        Self {
            dist,
            vi,
            vf,
            ..Self::default()
        }
    }

    /// A path that holds velocity `v` forever (used before the first plan).
    pub fn at_rest_velocity(v: f64) -> Self {
        Self {
            vi: v,
            v2: v,
            vf: v,
            ..Self::default()
        }
    }

    /// Sum of the four phase durations.
    #[inline]
    pub fn phase_sum(&self) -> f64 {
        self.t1 + self.t2 + self.t3 + self.t4
    }

    /// Displacement implied by the velocities and durations (trapezoid areas).
    pub fn displacement(&self) -> f64 {
        0.5 * (self.vi + self.v2) * self.t1
            + self.v2 * self.t2
            + 0.5 * (self.v2 + self.vf) * self.t3
            + self.vf * self.t4
    }
}
