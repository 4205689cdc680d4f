//! Planner-wide constants and tolerance helpers.
//!
//! Single source of truth for the fixed per-axis storage size and the
//! floating-point tolerances used by the solver and the reuse check.

use static_assertions::const_assert;

/// Maximum number of axes a single route can carry.
///
/// All per-axis storage is `[_; MAX_AXES]`, so nothing is allocated after
/// a [`Route`](crate::route::Route) is constructed.
pub const MAX_AXES: usize = 8;

/// Multiplier on `f64::EPSILON` for "is this zero at this scale" checks.
pub const ZERO_SIZE: f64 = 2.0;

/// Position scale for the endpoint-unchanged comparison.
pub const ENDPOINT_POSITION_SCALE: f64 = 40.0;

/// Relative velocity tolerance (fraction of `Vmax`) for the
/// endpoint-unchanged comparison.
pub const ENDPOINT_VELOCITY_FRACTION: f64 = 1.0e-10;

const_assert!(MAX_AXES > 0 && MAX_AXES <= 32);

/// True when `value` is within `ZERO_SIZE * EPSILON * |scale|` of zero.
#[inline]
pub fn is_zero(value: f64, scale: f64) -> bool {
    value.abs() <= (ZERO_SIZE * f64::EPSILON * scale).abs()
}
