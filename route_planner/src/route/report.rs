//! Human-readable route dump.

use std::fmt;

use super::Route;
use crate::types::{ManeuverState, RerouteMode};

/// Borrowed view of a [`Route`] plus the caller's current states.
///
/// Built by [`Route::report`]; formatting it prints the reroute mode, the
/// parameters, every routed axis path, and the stored and caller states.
pub struct RouteReport<'a> {
    route: &'a Route,
    reroute: RerouteMode,
    endpoint: &'a ManeuverState,
    next: &'a ManeuverState,
}

impl<'a> RouteReport<'a> {
    pub(super) fn new(
        route: &'a Route,
        reroute: RerouteMode,
        endpoint: &'a ManeuverState,
        next: &'a ManeuverState,
    ) -> Self {
        Self {
            route,
            reroute,
            endpoint,
            next,
        }
    }

    fn write_state(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        state: &ManeuverState,
    ) -> fmt::Result {
        write!(f, "{label:<9} T={:.6}", state.time)?;
        for &axis in &self.route.params.routed_axes {
            let s = state.axes[axis];
            write!(f, "  [{axis}] p={:.6} v={:.6}", s.position, s.velocity)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for RouteReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = &self.route.params;
        writeln!(
            f,
            "route: reroute={:?} tsync={} tcoast={} axes={}",
            self.reroute,
            params.tsync,
            params.tcoast,
            params.num_routed_axes()
        )?;

        for &axis in &params.routed_axes {
            let limits = params.limits[axis];
            let p = &self.route.paths[axis];
            writeln!(f, "axis {axis}: amax={} vmax={}", limits.amax, limits.vmax)?;
            writeln!(
                f,
                "  dist={:.6} vi={:.6} vf={:.6} v2={:.6}",
                p.dist, p.vi, p.vf, p.v2
            )?;
            writeln!(
                f,
                "  t1={:.6} t2={:.6} t3={:.6} t4={:.6} T={:.6}",
                p.t1, p.t2, p.t3, p.t4, p.total
            )?;
        }

        self.write_state(f, "demand", &self.route.demand)?;
        self.write_state(f, "endp", &self.route.endpoint)?;
        self.write_state(f, "caller", self.endpoint)?;
        self.write_state(f, "next", self.next)
    }
}
