//! Prelude module for common re-exports.
//!
//! ```rust
//! use route_planner::prelude::*;
//! ```

// ─── Engine ─────────────────────────────────────────────────────────
pub use crate::route::{Route, RouteReport};

// ─── Data Model ─────────────────────────────────────────────────────
pub use crate::types::{AxisLimits, AxisSample, ManeuverState, RerouteMode, RouteParameters};

// ─── Single-Axis Path ───────────────────────────────────────────────
pub use crate::path::Path;
pub use crate::path::sample::sample;
pub use crate::path::solver::{Unknown, Unknowns, find_path};
pub use crate::path::vmax::find_path_with_vmax;

// ─── Status ─────────────────────────────────────────────────────────
pub use crate::error::{RouteError, RouteResult, RouteStatus};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::MAX_AXES;
