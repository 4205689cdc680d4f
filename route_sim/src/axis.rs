//! Simulated motor axis driven by a single-axis route.
//!
//! The axis keeps an endpoint (where the current command wants it) and a
//! next point (the demand produced on the last tick). Commands only edit
//! the endpoint or force a reroute; [`SimAxis::process`] advances time,
//! asks the route for the next demand and applies hard limits and homing.
//!
//! Positions handed in and out of the public API are user positions:
//! raw position plus the encoder offset set by
//! [`SimAxis::set_position`]. Hard limits and home are raw.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use route_planner::error::RouteError;
use route_planner::route::Route;
use route_planner::types::{ManeuverState, RerouteMode};

use crate::config::{AxisConfig, RouteConfig};

/// Index of the simulated axis inside its route.
const AXIS: usize = 0;

/// A command the axis refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("high hard limit active")]
    HighLimit,

    #[error("low hard limit active")]
    LowLimit,
}

/// Last direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Plus,
    Minus,
}

/// Per-tick axis report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStatus {
    pub time: f64,
    /// User position (raw + encoder offset).
    pub position: f64,
    pub velocity: f64,
    pub done: bool,
    pub moving: bool,
    pub direction: Direction,
    pub high_limit: bool,
    pub low_limit: bool,
    pub at_home: bool,
    pub homing: bool,
}

/// One simulated motor axis: commands in, one demand per `process` tick out.
pub struct SimAxis {
    route: Route,
    endpoint: ManeuverState,
    next: ManeuverState,
    reroute: RerouteMode,
    low_limit: f64,
    high_limit: f64,
    home: f64,
    encoder_offset: f64,
    homing: bool,
    direction: Direction,
}

impl SimAxis {
    /// Axis at rest at `config.start`, time zero.
    pub fn new(config: &AxisConfig, route: &RouteConfig) -> Result<Self, RouteError> {
        let params = route.parameters().route_axis(AXIS, config.limits())?;
        let endpoint = ManeuverState::at(0.0).with_axis(AXIS, config.start, 0.0);
        let route = Route::new(&endpoint, params)?;

        debug!(start = config.start, "simulated axis created");

        Ok(Self {
            route,
            endpoint,
            next: endpoint,
            reroute: RerouteMode::CalcRoute,
            low_limit: config.low_limit,
            high_limit: config.high_limit,
            home: config.home,
            encoder_offset: 0.0,
            homing: false,
            direction: Direction::Plus,
        })
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn time(&self) -> f64 {
        self.next.time
    }

    /// Current user position.
    #[inline]
    pub fn position(&self) -> f64 {
        self.next.axes[AXIS].position + self.encoder_offset
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.next.axes[AXIS].velocity
    }

    /// Endpoint the axis is heading for, in user units.
    #[inline]
    pub fn target(&self) -> f64 {
        self.endpoint.axes[AXIS].position + self.encoder_offset
    }

    #[inline]
    pub fn is_homing(&self) -> bool {
        self.homing
    }

    #[inline]
    pub fn route(&self) -> &Route {
        &self.route
    }

    // ─── Commands ───────────────────────────────────────────────────

    /// Move to `position` and stop there.
    ///
    /// Relative moves are relative to the current endpoint. Non-zero
    /// `max_velocity` / `acceleration` replace the route limits.
    pub fn move_to(
        &mut self,
        position: f64,
        relative: bool,
        max_velocity: f64,
        acceleration: f64,
    ) -> Result<(), MotionError> {
        let target = if relative {
            position + self.endpoint.axes[AXIS].position
        } else {
            position - self.encoder_offset
        };
        self.check_limits(target - self.raw_position())?;

        self.endpoint.axes[AXIS].position = target;
        self.endpoint.axes[AXIS].velocity = 0.0;
        self.update_limits(max_velocity, acceleration);

        debug!(target, max_velocity, acceleration, "move");
        Ok(())
    }

    /// Run at constant `velocity` after ramping with `acceleration`
    /// (zero keeps the current acceleration limit).
    pub fn jog(&mut self, velocity: f64, acceleration: f64) -> Result<(), MotionError> {
        self.check_limits(velocity)?;
        self.ramp_to_velocity(velocity, acceleration);
        Ok(())
    }

    /// Ramp down to rest.
    pub fn stop(&mut self, acceleration: f64) {
        self.ramp_to_velocity(0.0, acceleration);
    }

    /// Jog toward the home switch; on crossing it the axis returns to home
    /// and stops.
    pub fn home(
        &mut self,
        max_velocity: f64,
        acceleration: f64,
        forwards: bool,
    ) -> Result<(), MotionError> {
        let velocity = if forwards {
            max_velocity.abs()
        } else {
            -max_velocity.abs()
        };
        let result = self.jog(velocity, acceleration);
        self.homing = result.is_ok();
        result
    }

    /// Redefine the current position as `position` (encoder offset).
    pub fn set_position(&mut self, position: f64) {
        self.encoder_offset = position - self.raw_position();
    }

    // ─── Tick ───────────────────────────────────────────────────────

    /// Advance the simulated clock by `dt` and produce the new demand.
    pub fn process(&mut self, dt: f64) -> Result<AxisStatus, RouteError> {
        let last = self.raw_position();
        self.next.time += dt;

        let reroute = self.reroute;
        let status = self
            .route
            .advance(reroute, &mut self.endpoint, &mut self.next)?;
        if reroute == RerouteMode::NewRoute {
            debug!(
                "forced reroute\n{}",
                self.route.report(reroute, &self.endpoint, &self.next)
            );
        }
        if !status.is_ok() {
            warn!(time = self.next.time, %status, "route solved with clamping");
        }
        self.reroute = RerouteMode::CalcRoute;

        let position = self.raw_position();
        let velocity = self.velocity();

        if self.homing && (last - self.home) * (position - self.home) <= 0.0 {
            debug!(home = self.home, "home switch crossed");
            self.homing = false;
            self.retarget(self.home);
        }

        if position > self.high_limit && velocity > 0.0 {
            self.on_limit(self.high_limit, -1.0);
        } else if position < self.low_limit && velocity < 0.0 {
            self.on_limit(self.low_limit, 1.0);
        }

        if velocity > 0.0 {
            self.direction = Direction::Plus;
        } else if velocity < 0.0 {
            self.direction = Direction::Minus;
        }

        let done = velocity == 0.0;
        trace!(time = self.next.time, position, velocity, "axis tick");

        Ok(AxisStatus {
            time: self.next.time,
            position: position + self.encoder_offset,
            velocity,
            done,
            moving: !done,
            direction: self.direction,
            high_limit: position >= self.high_limit,
            low_limit: position <= self.low_limit,
            at_home: position == self.home,
            homing: self.homing,
        })
    }

    // ─── Internals ──────────────────────────────────────────────────

    #[inline]
    fn raw_position(&self) -> f64 {
        self.next.axes[AXIS].position
    }

    /// Reject motion (signed displacement or velocity) further into an
    /// active hard limit.
    fn check_limits(&self, toward: f64) -> Result<(), MotionError> {
        let position = self.raw_position();
        if position >= self.high_limit && toward > 0.0 {
            return Err(MotionError::HighLimit);
        }
        if position <= self.low_limit && toward < 0.0 {
            return Err(MotionError::LowLimit);
        }
        Ok(())
    }

    fn ramp_to_velocity(&mut self, velocity: f64, acceleration: f64) {
        self.update_limits(0.0, acceleration);

        let current = self.next.axes[AXIS];
        let amax = self.route.params().limits[AXIS].amax;
        let delta = velocity - current.velocity;
        let ramp_time = (delta / amax).abs();

        self.endpoint.axes[AXIS].velocity = velocity;
        self.endpoint.axes[AXIS].position =
            current.position + ramp_time * (current.velocity + 0.5 * delta);
        self.reroute = RerouteMode::NewRoute;

        debug!(velocity, ramp_time, "velocity ramp");
    }

    /// Stop at `position` with a fresh plan.
    fn retarget(&mut self, position: f64) {
        self.endpoint.axes[AXIS].position = position;
        self.endpoint.axes[AXIS].velocity = 0.0;
        self.reroute = RerouteMode::NewRoute;
    }

    /// `away` is the sign of travel that leaves the limit.
    fn on_limit(&mut self, limit: f64, away: f64) {
        if self.homing {
            debug!(limit, "hard limit while homing, reversing");
            let speed = self.endpoint.axes[AXIS].velocity.abs();
            self.ramp_to_velocity(away * speed, 0.0);
        } else {
            warn!(limit, "hard limit hit, stopping");
            self.retarget(limit);
        }
    }

    /// Apply non-zero limit overrides. A rejected update leaves the
    /// previous limits in force.
    fn update_limits(&mut self, max_velocity: f64, acceleration: f64) {
        if max_velocity == 0.0 && acceleration == 0.0 {
            return;
        }
        let mut params = self.route.params().clone();
        if max_velocity != 0.0 {
            params.limits[AXIS].vmax = max_velocity.abs();
        }
        if acceleration != 0.0 {
            params.limits[AXIS].amax = acceleration.abs();
        }
        if let Err(e) = self.route.set_params(params) {
            warn!("limit update rejected: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.1;

    fn axis() -> SimAxis {
        let config = AxisConfig {
            low_limit: -20.0,
            high_limit: 20.0,
            home: 3.0,
            ..AxisConfig::default()
        };
        SimAxis::new(&config, &RouteConfig::default()).unwrap()
    }

    fn run(axis: &mut SimAxis, seconds: f64) -> AxisStatus {
        let ticks = (seconds / DT).round() as usize;
        let mut status = axis.process(DT).unwrap();
        for _ in 1..ticks {
            status = axis.process(DT).unwrap();
        }
        status
    }

    #[test]
    fn idle_axis_is_done() {
        let mut axis = axis();
        let status = axis.process(DT).unwrap();
        assert!(status.done);
        assert!(!status.moving);
        assert_eq!(status.position, 0.0);
    }

    #[test]
    fn move_reaches_target_and_stops() {
        let mut axis = axis();
        axis.move_to(5.0, false, 0.0, 0.0).unwrap();
        let status = run(&mut axis, 8.0);
        assert!((status.position - 5.0).abs() < 1e-9);
        assert!(status.done);
        assert_eq!(status.direction, Direction::Plus);
    }

    #[test]
    fn relative_move_adds_to_endpoint() {
        let mut axis = axis();
        axis.move_to(2.0, false, 0.0, 0.0).unwrap();
        axis.move_to(1.5, true, 0.0, 0.0).unwrap();
        assert_eq!(axis.target(), 3.5);
    }

    #[test]
    fn move_overrides_limits() {
        let mut axis = axis();
        axis.move_to(5.0, false, 2.5, 4.0).unwrap();
        let limits = axis.route().params().limits[AXIS];
        assert_eq!((limits.amax, limits.vmax), (4.0, 2.5));
    }

    #[test]
    fn set_position_offsets_reports() {
        let mut axis = axis();
        axis.set_position(100.0);
        let status = axis.process(DT).unwrap();
        assert_eq!(status.position, 100.0);

        // Absolute moves are in user units.
        axis.move_to(101.0, false, 0.0, 0.0).unwrap();
        let status = run(&mut axis, 5.0);
        assert!((status.position - 101.0).abs() < 1e-9);
        assert!((axis.raw_position() - 1.0).abs() < 1e-9);
    }
}
