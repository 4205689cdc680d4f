//! Route status and error types.
//!
//! The planner reports a closed status set:
//! - `OK`, `NEG_SQRT`, `NEG_TIME` - returned as [`RouteStatus`]; the solved
//!   path is self-consistent and safe to sample.
//! - `BAD_PARAM` - returned as [`RouteError`]; the call is aborted and no
//!   path is updated.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::solver::Unknown;

/// Outcome of a successful solve or tick.
///
/// Ordered from best to worst so that aggregation across axes is `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum RouteStatus {
    /// Path found with all constraints met.
    #[default]
    Ok,
    /// A discriminant went negative and was clamped to zero.
    NegSqrt,
    /// A duration went negative beyond tolerance and was clamped to zero.
    NegTime,
}

impl RouteStatus {
    /// The worse of two statuses.
    #[inline]
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }

    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Closed-set status code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NegSqrt => "NEG_SQRT",
            Self::NegTime => "NEG_TIME",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fatal parameter error (`BAD_PARAM`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Acceleration limit is zero, negative or NaN.
    #[error("acceleration must be positive, got {0}")]
    NonPositiveAcceleration(f64),

    /// Velocity limit is zero, negative or NaN.
    #[error("velocity limit must be positive, got {0}")]
    NonPositiveVelocity(f64),

    /// The two unknowns do not form a solvable pair.
    #[error("unsupported unknown pair ({0:?}, {1:?})")]
    UnsupportedUnknowns(Unknown, Unknown),

    /// Linear solve would divide by a (near) zero velocity term.
    #[error("degenerate divisor solving for {0:?}")]
    DegenerateDivisor(Unknown),

    /// Synchronisation period is negative or NaN.
    #[error("Tsync must be >= 0, got {0}")]
    InvalidSyncPeriod(f64),

    /// Coast time is negative or NaN.
    #[error("Tcoast must be >= 0, got {0}")]
    InvalidCoastTime(f64),

    /// Routed axis index does not fit in the fixed per-axis storage.
    #[error("axis index {0} out of range")]
    AxisOutOfRange(usize),

    /// Axis listed twice in the routed set.
    #[error("axis {0} routed more than once")]
    DuplicateAxis(usize),

    /// Current velocity is not strictly below the axis velocity limit.
    #[error("axis {axis}: |velocity| {velocity} not below Vmax {vmax}")]
    VelocityAboveLimit { axis: usize, velocity: f64, vmax: f64 },
}

impl RouteError {
    /// Closed-set status code. Every `RouteError` is `BAD_PARAM`.
    pub const fn code(&self) -> &'static str {
        "BAD_PARAM"
    }
}

/// Convenience alias used throughout the planner.
pub type RouteResult<T> = Result<T, RouteError>;
