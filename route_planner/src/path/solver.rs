//! Four-phase path solver.
//!
//! Solves
//!
//! ```text
//! dist = 0.5(vi+v2)t1 + v2·t2 + 0.5(v2+vf)t3 + vf·t4
//!   t1 = |v2-vi| / accel
//!   t3 = |vf-v2| / accel
//!    T = t1 + t2 + t3 + t4
//! ```
//!
//! for any two of `{v2, T, t2, t4}`, the other two being taken from the
//! path. When `v2` is unknown the system is quadratic in `v2` unless `dist`
//! lies between the two critical distances (coast at `vi` or at `vf`), in
//! which case the ramps form one monotonic velocity change and the equation
//! is linear. The sign of the first ramp and the root are picked from where
//! `dist` falls relative to those critical distances.

use tracing::trace;

use super::Path;
use crate::consts::is_zero;
use crate::error::{RouteError, RouteResult, RouteStatus};

/// Relative tolerance on the discriminant before it counts as negative.
const DISCRIMINANT_TOLERANCE: f64 = 1.0e-9;

/// One solvable path quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unknown {
    /// Coast velocity between the ramps.
    V2,
    /// Total duration.
    Total,
    /// Coast duration at `v2` (t2).
    Cruise,
    /// Tail coast duration at `vf` (t4).
    Tail,
}

/// The pair of quantities the solver determines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unknowns {
    V2Total,
    V2Tail,
    V2Cruise,
    TotalTail,
    TotalCruise,
    CruiseTail,
}

impl Unknowns {
    /// Build a pair from two single unknowns, in either order.
    pub fn pair(a: Unknown, b: Unknown) -> RouteResult<Self> {
        use Unknown as U;
        match (a, b) {
            (U::V2, U::Total) | (U::Total, U::V2) => Ok(Self::V2Total),
            (U::V2, U::Tail) | (U::Tail, U::V2) => Ok(Self::V2Tail),
            (U::V2, U::Cruise) | (U::Cruise, U::V2) => Ok(Self::V2Cruise),
            (U::Total, U::Tail) | (U::Tail, U::Total) => Ok(Self::TotalTail),
            (U::Total, U::Cruise) | (U::Cruise, U::Total) => Ok(Self::TotalCruise),
            (U::Cruise, U::Tail) | (U::Tail, U::Cruise) => Ok(Self::CruiseTail),
            _ => Err(RouteError::UnsupportedUnknowns(a, b)),
        }
    }

    /// The two unknowns, `V2` first when present.
    pub const fn members(self) -> (Unknown, Unknown) {
        match self {
            Self::V2Total => (Unknown::V2, Unknown::Total),
            Self::V2Tail => (Unknown::V2, Unknown::Tail),
            Self::V2Cruise => (Unknown::V2, Unknown::Cruise),
            Self::TotalTail => (Unknown::Total, Unknown::Tail),
            Self::TotalCruise => (Unknown::Total, Unknown::Cruise),
            Self::CruiseTail => (Unknown::Cruise, Unknown::Tail),
        }
    }

    /// True when `unknown` is one of the pair.
    pub fn contains(self, unknown: Unknown) -> bool {
        let (a, b) = self.members();
        a == unknown || b == unknown
    }
}

/// Second unknown when `v2` is being solved for.
#[derive(Debug, Clone, Copy)]
enum Companion {
    Total,
    Tail,
    Cruise,
}

/// Pair solved linearly once `v2` is known.
#[derive(Debug, Clone, Copy)]
enum LinearPair {
    TotalTail,
    TotalCruise,
    CruiseTail,
}

/// Solve `path` for `unknowns` with ramp acceleration magnitude `accel`.
///
/// On `Err` the path is left untouched. On `Ok` every duration is
/// non-negative and `total` equals their sum; `NegSqrt`/`NegTime` flag
/// that clamping was needed to get there.
pub fn find_path(path: &mut Path, accel: f64, unknowns: Unknowns) -> RouteResult<RouteStatus> {
    if !(accel > 0.0) {
        return Err(RouteError::NonPositiveAcceleration(accel));
    }

    let mut work = *path;
    let status = match unknowns {
        Unknowns::V2Total => solve_for_v2(&mut work, accel, Companion::Total),
        Unknowns::V2Tail => solve_for_v2(&mut work, accel, Companion::Tail),
        Unknowns::V2Cruise => solve_for_v2(&mut work, accel, Companion::Cruise),
        Unknowns::TotalTail => solve_with_v2(&mut work, accel, LinearPair::TotalTail)?,
        Unknowns::TotalCruise => solve_with_v2(&mut work, accel, LinearPair::TotalCruise)?,
        Unknowns::CruiseTail => solve_with_v2(&mut work, accel, LinearPair::CruiseTail)?,
    };
    let status = status.worst(settle_durations(&mut work));

    trace!(
        ?unknowns,
        dist = work.dist,
        vi = work.vi,
        v2 = work.v2,
        vf = work.vf,
        total = work.total,
        %status,
        "path solved"
    );

    *path = work;
    Ok(status)
}

fn solve_for_v2(p: &mut Path, accel: f64, companion: Companion) -> RouteStatus {
    let (vi, vf, dist) = (p.vi, p.vf, p.dist);

    // Shortest possible ramp time, the v2-independent distance and the
    // longest possible coast at v2.
    let min_accel_time = ((vi - vf) / accel).abs();
    let ramp_dist = 0.5 * (vi + vf) * min_accel_time;
    let (base_dist, max_cruise) = match companion {
        Companion::Total => (ramp_dist + vf * p.t4, p.t2),
        Companion::Tail => (ramp_dist + vf * (p.total - p.t2 - min_accel_time), p.t2),
        Companion::Cruise => (ramp_dist + vf * p.t4, p.total - p.t4 - min_accel_time),
    };

    // Critical distances for v2 == vi and v2 == vf.
    let vi_dist = base_dist + vi * max_cruise;
    let vf_dist = base_dist + vf * max_cruise;

    let mut status = RouteStatus::Ok;

    p.v2 = if dist == vi_dist {
        vi
    } else if dist == vf_dist {
        vf
    } else if (dist < vi_dist && dist > vf_dist) || (dist > vi_dist && dist < vf_dist) {
        // Between the critical distances max_cruise cannot be zero, since
        // that would make them equal.
        let ai = if vf > vi { accel } else { -accel };
        match companion {
            Companion::Total | Companion::Cruise => {
                (dist + 0.5 * (vi * vi - vf * vf) / ai - vf * p.t4) / max_cruise
            }
            Companion::Tail => {
                (dist + 0.5 * (vi - vf) * (vi - vf) / ai - vf * (p.total - p.t2)) / max_cruise
            }
        }
    } else {
        let ai = if dist < vi_dist && dist < vf_dist {
            -accel
        } else {
            accel
        };

        let (lin, disc, scale) = match companion {
            Companion::Total => {
                let half = 0.5 * ai * p.t2;
                let square = 0.5 * (vi * vi + vf * vf);
                let travel = ai * (dist - vf * p.t4);
                (-half, half * half + square + travel, half * half + square + travel.abs())
            }
            Companion::Tail => {
                let half = 0.5 * ai * p.t2;
                let square = 0.5 * (vi - vf) * (vi - vf);
                let travel = ai * (dist - vf * p.total);
                (vf - half, half * half + square + travel, half * half + square + travel.abs())
            }
            Companion::Cruise => {
                let lin = 0.5 * (ai * (p.total - p.t4) + vi + vf);
                let square = 0.5 * (vi * vi + vf * vf);
                let travel = ai * (dist - vf * p.t4);
                (lin, lin * lin - square - travel, lin * lin + square + travel.abs())
            }
        };

        let (v2, root_status) = select_root(ai, lin, disc, scale, companion);
        status = root_status;
        v2
    };

    p.t1 = ((p.v2 - vi) / accel).abs();
    p.t3 = ((vf - p.v2) / accel).abs();
    match companion {
        Companion::Total => p.total = p.t1 + p.t2 + p.t3 + p.t4,
        Companion::Tail => p.t4 = p.total - (p.t1 + p.t2 + p.t3),
        Companion::Cruise => p.t2 = p.total - (p.t1 + p.t3 + p.t4),
    }
    status
}

/// Pick the physical root of the `v2` quadratic.
///
/// The cruise-unknown equation has the opposite orientation to the total
/// and tail ones, so the root choice is mirrored.
fn select_root(
    ai: f64,
    lin: f64,
    disc: f64,
    scale: f64,
    companion: Companion,
) -> (f64, RouteStatus) {
    let status = if disc < -DISCRIMINANT_TOLERANCE * scale {
        RouteStatus::NegSqrt
    } else {
        RouteStatus::Ok
    };
    let root = disc.max(0.0).sqrt();

    let v2 = match companion {
        Companion::Cruise => {
            if ai > 0.0 {
                lin - root
            } else {
                lin + root
            }
        }
        Companion::Total | Companion::Tail => {
            if ai > 0.0 {
                lin + root
            } else {
                lin - root
            }
        }
    };
    (v2, status)
}

fn solve_with_v2(p: &mut Path, accel: f64, pair: LinearPair) -> RouteResult<RouteStatus> {
    p.t1 = ((p.v2 - p.vi) / accel).abs();
    p.t3 = ((p.vf - p.v2) / accel).abs();
    let remaining = p.dist - 0.5 * ((p.vi + p.v2) * p.t1 + (p.v2 + p.vf) * p.t3);
    let velocity_scale = p.vi.abs() + p.v2.abs() + p.vf.abs();

    match pair {
        LinearPair::TotalTail => {
            ensure_divisor(p.vf, velocity_scale, Unknown::Tail)?;
            p.t4 = (remaining - p.v2 * p.t2) / p.vf;
            p.total = p.t1 + p.t2 + p.t3 + p.t4;
        }
        LinearPair::TotalCruise => {
            ensure_divisor(p.v2, velocity_scale, Unknown::Cruise)?;
            p.t2 = (remaining - p.vf * p.t4) / p.v2;
            p.total = p.t1 + p.t2 + p.t3 + p.t4;
        }
        LinearPair::CruiseTail => {
            ensure_divisor(p.v2 - p.vf, velocity_scale, Unknown::Cruise)?;
            p.t2 = (remaining - p.vf * (p.total - p.t1 - p.t3)) / (p.v2 - p.vf);
            p.t4 = p.total - p.t1 - p.t2 - p.t3;
        }
    }
    Ok(RouteStatus::Ok)
}

#[inline]
fn ensure_divisor(divisor: f64, scale: f64, solving: Unknown) -> RouteResult<()> {
    if is_zero(divisor, scale) {
        Err(RouteError::DegenerateDivisor(solving))
    } else {
        Ok(())
    }
}

/// Snap near-zero durations, clamp negative ones and keep `total`
/// consistent with the phase durations.
fn settle_durations(p: &mut Path) -> RouteStatus {
    let scale = p.total;
    for t in [&mut p.t1, &mut p.t2, &mut p.t3, &mut p.t4, &mut p.total] {
        if is_zero(*t, scale) {
            *t = 0.0;
        }
    }

    let negative = p.t1 < 0.0 || p.t2 < 0.0 || p.t3 < 0.0 || p.t4 < 0.0 || p.total < 0.0;
    if negative {
        p.t1 = p.t1.max(0.0);
        p.t2 = p.t2.max(0.0);
        p.t3 = p.t3.max(0.0);
        p.t4 = p.t4.max(0.0);
        p.total = p.phase_sum();
        return RouteStatus::NegTime;
    }

    if !is_zero(p.total - p.phase_sum(), p.total) {
        p.total = p.phase_sum();
        return RouteStatus::NegTime;
    }
    RouteStatus::Ok
}

// ─── Tests ──────────────────────────────────────────────────────────
