//! Velocity-capped path solve.
//!
//! First solves with no coast at `v2` (t2 = 0). If the resulting `|v2|`
//! exceeds `vmax`, `v2` is pinned at `±vmax` and the path is re-solved with
//! the coast duration free, which introduces a genuine cruise phase.

use tracing::trace;

use super::Path;
use super::solver::{Unknown, Unknowns, find_path};
use crate::error::{RouteError, RouteResult, RouteStatus};

/// Solve `path` for `free` (`Total` or `Tail`) plus `v2`, honouring `vmax`.
///
/// Returns the worse status of the two solves.
pub fn find_path_with_vmax(
    path: &mut Path,
    amax: f64,
    vmax: f64,
    free: Unknown,
) -> RouteResult<RouteStatus> {
    if !matches!(free, Unknown::Total | Unknown::Tail) {
        return Err(RouteError::UnsupportedUnknowns(Unknown::V2, free));
    }
    if !(vmax > 0.0) {
        return Err(RouteError::NonPositiveVelocity(vmax));
    }

    let mut work = *path;
    work.t2 = 0.0;
    let status = find_path(&mut work, amax, Unknowns::pair(Unknown::V2, free)?)?;

    if work.v2.abs() <= vmax {
        *path = work;
        return Ok(status);
    }

    trace!(v2 = work.v2, vmax, "coast velocity capped");
    work.v2 = if work.v2 >= 0.0 { vmax } else { -vmax };
    let capped = find_path(&mut work, amax, Unknowns::pair(Unknown::Cruise, free)?)?;

    *path = work;
    Ok(status.worst(capped))
}
