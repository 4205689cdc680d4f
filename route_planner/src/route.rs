//! Per-maneuver route engine.
//!
//! A [`Route`] owns the parameters, the last demand it produced, the
//! endpoint it last planned for, and one committed [`Path`] per axis. Each
//! control tick [`Route::advance`] decides whether the committed paths can
//! be reused, whether only the tail needs re-timing (short path), or
//! whether every axis must be replanned and resynchronised (full replan),
//! then samples the paths at the requested time.
//!
//! ## Timing
//! Paths are end-anchored: the demand at time `t` is the path sampled at
//! `t - endpoint.time` plus the endpoint position. `endpoint.time` may be
//! moved later by a full replan to the earliest achievable (and, with
//! `tsync > 0`, grid-aligned) arrival time.
//!
//! ## Allocation
//! All per-axis storage is `[_; MAX_AXES]`; `advance` never allocates.

pub mod report;

use tracing::{debug, trace};

use crate::consts::{ENDPOINT_POSITION_SCALE, ENDPOINT_VELOCITY_FRACTION, MAX_AXES, is_zero};
use crate::error::{RouteResult, RouteStatus};
use crate::path::Path;
use crate::path::sample::sample;
use crate::path::solver::{Unknown, Unknowns, find_path};
use crate::path::vmax::find_path_with_vmax;
use crate::types::{ManeuverState, RerouteMode, RouteParameters};

pub use report::RouteReport;

/// Stateful multi-axis route.
#[derive(Debug, Clone)]
pub struct Route {
    params: RouteParameters,
    /// Last demand produced (or set).
    demand: ManeuverState,
    /// Endpoint the committed paths were built for.
    endpoint: ManeuverState,
    paths: [Path; MAX_AXES],
}

impl Route {
    /// Create a route starting from `initial`.
    ///
    /// `initial` becomes both the current demand and the current endpoint.
    /// Fails if the parameters are invalid or any routed axis is already at
    /// or above its velocity limit.
    pub fn new(initial: &ManeuverState, params: RouteParameters) -> RouteResult<Self> {
        params.validate(initial)?;

        let mut paths = [Path::default(); MAX_AXES];
        for &axis in &params.routed_axes {
            paths[axis] = Path::at_rest_velocity(initial.axes[axis].velocity);
        }

        debug!(
            axes = params.num_routed_axes(),
            tsync = params.tsync,
            tcoast = params.tcoast,
            "route created"
        );

        Ok(Self {
            params,
            demand: *initial,
            endpoint: *initial,
            paths,
        })
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn params(&self) -> &RouteParameters {
        &self.params
    }

    /// Replace the parameters.
    ///
    /// Validated against the velocities of the current demand; on error the
    /// previous parameters stay in force.
    pub fn set_params(&mut self, params: RouteParameters) -> RouteResult<()> {
        params.validate(&self.demand)?;
        self.params = params;
        Ok(())
    }

    /// Last demand produced by [`advance`](Self::advance) or set by
    /// [`set_demand`](Self::set_demand).
    #[inline]
    pub fn demand(&self) -> &ManeuverState {
        &self.demand
    }

    /// Overwrite the current demand (warm start). Planning continues from it
    /// on the next replan.
    pub fn set_demand(&mut self, demand: ManeuverState) {
        self.demand = demand;
    }

    /// Endpoint the committed paths were planned for.
    #[inline]
    pub fn endpoint(&self) -> &ManeuverState {
        &self.endpoint
    }

    #[inline]
    pub fn num_routed_axes(&self) -> usize {
        self.params.num_routed_axes()
    }

    /// Committed path of a routed axis.
    pub fn path(&self, axis: usize) -> Option<&Path> {
        if self.params.routed_axes.contains(&axis) {
            self.paths.get(axis)
        } else {
            None
        }
    }

    /// Human-readable dump of the route and the caller's current states.
    pub fn report<'a>(
        &'a self,
        reroute: RerouteMode,
        endpoint: &'a ManeuverState,
        next: &'a ManeuverState,
    ) -> RouteReport<'a> {
        RouteReport::new(self, reroute, endpoint, next)
    }

    // ─── Per-Tick Entry Point ───────────────────────────────────────

    /// Plan toward `endpoint` and produce the demand at `next.time`.
    ///
    /// - `endpoint`: target positions/velocities and arrival time. A full
    ///   replan overwrites `endpoint.time` with the achievable arrival time.
    /// - `next`: `next.time` is the time the demand is wanted for (must not
    ///   decrease between calls); routed axis samples are overwritten with
    ///   the demand.
    ///
    /// Recoverable solver outcomes are aggregated (worst across axes) and
    /// returned; every routed axis still gets a demand. Only parameter
    /// errors abort the tick.
    pub fn advance(
        &mut self,
        reroute: RerouteMode,
        endpoint: &mut ManeuverState,
        next: &mut ManeuverState,
    ) -> RouteResult<RouteStatus> {
        if self.params.routed_axes.is_empty() {
            *next = *endpoint;
            self.demand = *next;
            self.endpoint = *endpoint;
            return Ok(RouteStatus::Ok);
        }

        if reroute == RerouteMode::NoNewRoute {
            self.coast_demand_at_endpoint_velocity(endpoint, next.time);
        }

        let status = if reroute == RerouteMode::CalcRoute && self.endpoint_unchanged(endpoint) {
            trace!(time = next.time, "reusing committed paths");
            RouteStatus::Ok
        } else {
            self.replan(reroute, endpoint, next.time)?
        };

        let offset = next.time - endpoint.time;
        for &axis in &self.params.routed_axes {
            let mut demand = sample(&self.paths[axis], offset);
            demand.position += endpoint.axes[axis].position;
            next.axes[axis] = demand;
        }

        self.demand = *next;
        self.endpoint = *endpoint;
        Ok(status)
    }

    // ─── Internals ──────────────────────────────────────────────────

    /// Replace the stored demand with a coast at the endpoint velocity that
    /// passes through the endpoint position at `next_time`.
    fn coast_demand_at_endpoint_velocity(&mut self, endpoint: &ManeuverState, next_time: f64) {
        let elapsed = next_time - self.demand.time;
        for &axis in &self.params.routed_axes {
            let target = endpoint.axes[axis];
            let demand = &mut self.demand.axes[axis];
            demand.velocity = target.velocity;
            demand.position = target.position - elapsed * target.velocity;
        }
    }

    fn endpoint_unchanged(&self, endpoint: &ManeuverState) -> bool {
        if !is_zero(endpoint.time - self.endpoint.time, endpoint.time) {
            return false;
        }
        self.params.routed_axes.iter().all(|&axis| {
            let new = endpoint.axes[axis];
            let old = self.endpoint.axes[axis];
            is_zero(new.position - old.position, ENDPOINT_POSITION_SCALE)
                && (new.velocity - old.velocity).abs()
                    < self.params.limits[axis].vmax * ENDPOINT_VELOCITY_FRACTION
        })
    }

    fn replan(
        &mut self,
        reroute: RerouteMode,
        endpoint: &mut ManeuverState,
        next_time: f64,
    ) -> RouteResult<RouteStatus> {
        let remaining = endpoint.time - self.demand.time;
        for &axis in &self.params.routed_axes {
            let from = self.demand.axes[axis];
            let to = endpoint.axes[axis];
            let path = &mut self.paths[axis];
            path.dist = to.position - from.position;
            path.vi = from.velocity;
            path.vf = to.velocity;
            path.t2 = 0.0;
            path.t4 = self.params.tcoast;
            path.total = remaining;
        }

        let short_path =
            reroute != RerouteMode::NewRoute && next_time + self.params.tcoast >= endpoint.time;
        if short_path && self.retime_tails() {
            trace!(time = next_time, "short path re-timed");
            return Ok(RouteStatus::Ok);
        }

        self.full_replan(endpoint)
    }

    /// Re-time every axis keeping the arrival time. False if any axis could
    /// not be solved cleanly, in which case a full replan is needed.
    fn retime_tails(&mut self) -> bool {
        for &axis in &self.params.routed_axes {
            let limits = self.params.limits[axis];
            let outcome =
                find_path_with_vmax(&mut self.paths[axis], limits.amax, limits.vmax, Unknown::Tail);
            if !matches!(outcome, Ok(RouteStatus::Ok)) {
                debug!(axis, ?outcome, "short path rejected, replanning");
                return false;
            }
        }
        true
    }

    fn full_replan(&mut self, endpoint: &mut ManeuverState) -> RouteResult<RouteStatus> {
        let mut status = RouteStatus::Ok;
        let mut longest: Option<(usize, f64)> = None;

        for &axis in &self.params.routed_axes {
            let limits = self.params.limits[axis];
            let path = &mut self.paths[axis];
            path.t4 = self.params.tcoast;
            status = status.worst(find_path_with_vmax(
                path,
                limits.amax,
                limits.vmax,
                Unknown::Total,
            )?);
            if longest.is_none_or(|(_, t)| path.total > t) {
                longest = Some((axis, path.total));
            }
        }

        let Some((long_axis, mut total)) = longest else {
            return Ok(status);
        };

        let sync = self.params.tsync > 0.0;
        if sync {
            let tsync = self.params.tsync;
            endpoint.time = ((self.demand.time + total) / tsync).ceil() * tsync;
            total = endpoint.time - self.demand.time;
        } else {
            endpoint.time = self.demand.time + total;
        }

        for &axis in &self.params.routed_axes {
            let path = &mut self.paths[axis];
            path.total = total;
            if sync || axis != long_axis {
                let amax = self.params.limits[axis].amax;
                status = status.worst(find_path(path, amax, Unknowns::V2Cruise)?);
            }
        }

        debug!(
            long_axis,
            total,
            arrival = endpoint.time,
            %status,
            "full replan"
        );
        Ok(status)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
