//! Shared helpers for the integration suites.

pub mod replanning;
pub mod scenarios;
pub mod synchronization;
pub mod tracking;

use route_planner::prelude::*;

/// Control tick used by the multi-tick suites [s].
pub const DT: f64 = 0.05;

/// Route parameters routing each `(axis, amax, vmax)` entry.
pub fn params(tsync: f64, tcoast: f64, axes: &[(usize, f64, f64)]) -> RouteParameters {
    axes.iter()
        .fold(RouteParameters::new(tsync, tcoast), |p, &(axis, amax, vmax)| {
            p.route_axis(axis, AxisLimits::new(amax, vmax)).unwrap()
        })
}

/// Largest per-tick velocity jump across `axes` between two demands.
pub fn velocity_step(prev: &ManeuverState, next: &ManeuverState, axes: &[usize]) -> f64 {
    axes.iter()
        .map(|&a| (next.axes[a].velocity - prev.axes[a].velocity).abs())
        .fold(0.0, f64::max)
}
