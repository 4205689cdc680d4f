//! Plain data types shared by the planner and its callers.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_AXES;
use crate::error::{RouteError, RouteResult};

// ─── Per-Axis Types ─────────────────────────────────────────────────

/// Kinematic limits for one routed axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    /// Maximum acceleration magnitude [units/s²].
    pub amax: f64,
    /// Maximum velocity magnitude [units/s].
    pub vmax: f64,
}

impl AxisLimits {
    pub const fn new(amax: f64, vmax: f64) -> Self {
        Self { amax, vmax }
    }
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self { amax: 1.0, vmax: 1.0 }
    }
}

/// Position and velocity of one axis at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisSample {
    pub position: f64,
    pub velocity: f64,
}

impl AxisSample {
    pub const fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }
}

// ─── Maneuver State ─────────────────────────────────────────────────

/// Time-stamped per-axis samples.
///
/// Used both for the demand (last produced output) and for the endpoint
/// (most recent target). Axes that are not routed are carried untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ManeuverState {
    /// Time at which the samples are valid [s].
    pub time: f64,
    pub axes: [AxisSample; MAX_AXES],
}

impl ManeuverState {
    /// All axes at rest at position zero.
    pub fn at(time: f64) -> Self {
        Self {
            time,
            axes: [AxisSample::default(); MAX_AXES],
        }
    }

    /// Builder-style setter for one axis sample.
    ///
    /// # Panics
    /// Panics if `axis >= MAX_AXES`.
    #[must_use]
    pub fn with_axis(mut self, axis: usize, position: f64, velocity: f64) -> Self {
        self.axes[axis] = AxisSample::new(position, velocity);
        self
    }
}

// ─── Reroute Mode ───────────────────────────────────────────────────

/// Per-tick planning directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerouteMode {
    /// Reuse the committed paths when the endpoint is unchanged, otherwise
    /// replan (short path when nearly done).
    #[default]
    CalcRoute,
    /// Force a full replan, including resynchronisation to `Tsync`.
    NewRoute,
    /// Suspend routing: the previous demand is replaced by a coast at the
    /// endpoint velocity before planning.
    NoNewRoute,
}

// ─── Route Parameters ───────────────────────────────────────────────

/// Route configuration. May be replaced live via
/// [`Route::set_params`](crate::route::Route::set_params).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteParameters {
    /// Time quantum the arrival time is rounded up to [s]. Zero disables.
    pub tsync: f64,
    /// Short-path horizon and default tail coast duration [s].
    pub tcoast: f64,
    /// Indices (0-based) of the axes under trajectory control.
    pub routed_axes: heapless::Vec<usize, MAX_AXES>,
    /// Limits indexed by axis; only routed entries are consulted.
    pub limits: [AxisLimits; MAX_AXES],
}

impl Default for RouteParameters {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl RouteParameters {
    /// Parameters with no routed axes.
    pub fn new(tsync: f64, tcoast: f64) -> Self {
        Self {
            tsync,
            tcoast,
            routed_axes: heapless::Vec::new(),
            limits: [AxisLimits::default(); MAX_AXES],
        }
    }

    /// Add `axis` to the routed set with the given limits.
    pub fn route_axis(mut self, axis: usize, limits: AxisLimits) -> RouteResult<Self> {
        if axis >= MAX_AXES {
            return Err(RouteError::AxisOutOfRange(axis));
        }
        if self.routed_axes.contains(&axis) {
            return Err(RouteError::DuplicateAxis(axis));
        }
        self.routed_axes
            .push(axis)
            .map_err(RouteError::AxisOutOfRange)?;
        self.limits[axis] = limits;
        Ok(self)
    }

    /// Number of routed axes.
    #[inline]
    pub fn num_routed_axes(&self) -> usize {
        self.routed_axes.len()
    }

    /// Check the parameters against the velocities in `current`.
    ///
    /// Rejects negative `Tsync`/`Tcoast`, non-positive limits, bad or
    /// duplicate axis indices, and any routed axis whose current |velocity|
    /// is not strictly below its `Vmax`.
    pub fn validate(&self, current: &ManeuverState) -> RouteResult<()> {
        if !(self.tsync >= 0.0) {
            return Err(RouteError::InvalidSyncPeriod(self.tsync));
        }
        if !(self.tcoast >= 0.0) {
            return Err(RouteError::InvalidCoastTime(self.tcoast));
        }

        for (i, &axis) in self.routed_axes.iter().enumerate() {
            if axis >= MAX_AXES {
                return Err(RouteError::AxisOutOfRange(axis));
            }
            if self.routed_axes[..i].contains(&axis) {
                return Err(RouteError::DuplicateAxis(axis));
            }

            let limits = &self.limits[axis];
            if !(limits.amax > 0.0) {
                return Err(RouteError::NonPositiveAcceleration(limits.amax));
            }
            if !(limits.vmax > 0.0) {
                return Err(RouteError::NonPositiveVelocity(limits.vmax));
            }

            let velocity = current.axes[axis].velocity;
            if !(limits.vmax > velocity.abs()) {
                return Err(RouteError::VelocityAboveLimit {
                    axis,
                    velocity,
                    vmax: limits.vmax,
                });
            }
        }
        Ok(())
    }
}
