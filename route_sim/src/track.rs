//! Multi-axis tracking harness.
//!
//! Every target moves at its axis sky rate; each segment adds a per-axis
//! offset (position plus rate). A segment first slews: the target is
//! evaluated at the route's planned arrival time, with `NEW_ROUTE` on the
//! first tick and `CALC_ROUTE` after, until the demand time reaches the
//! arrival time. It then tracks for the segment duration with the target
//! evaluated at the demand time. A slew that has not arrived within
//! `max_slew` aborts the run.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use route_planner::error::{RouteError, RouteStatus};
use route_planner::route::Route;
use route_planner::types::{AxisSample, ManeuverState, RerouteMode};

use crate::config::{TargetConfig, TrackConfig};

/// Failure of a tracking run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The route never caught the target.
    #[error("segment {segment}: slew not complete after {ticks} ticks")]
    SlewTimeout { segment: usize, ticks: usize },
}

/// One tick of the harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Demand time.
    pub time: f64,
    pub segment: usize,
    pub slewing: bool,
    pub status: RouteStatus,
    /// Demand per configured axis.
    pub demand: Vec<AxisSample>,
    /// Target (as handed to the route) per configured axis.
    pub target: Vec<AxisSample>,
    /// Target time after planning (the arrival time while slewing).
    pub target_time: f64,
}

struct Harness<'a> {
    config: &'a TrackConfig,
    route: Route,
    next: ManeuverState,
    records: Vec<TraceRecord>,
}

impl Harness<'_> {
    /// Target for `segment` at `time`, offset rates counted from `reference`.
    fn target(&self, segment: &TargetConfig, time: f64, reference: f64) -> ManeuverState {
        let mut state = ManeuverState::at(time);
        for (i, (axis, offset)) in self.config.axes.iter().zip(&segment.offsets).enumerate() {
            state.axes[i] = AxisSample::new(
                axis.sky_rate * time + offset.position + offset.rate * (time - reference),
                axis.sky_rate + offset.rate,
            );
        }
        state
    }

    fn step(
        &mut self,
        index: usize,
        mode: RerouteMode,
        endpoint: &mut ManeuverState,
        slewing: bool,
    ) -> Result<(), TrackError> {
        let status = self.route.advance(mode, endpoint, &mut self.next)?;
        if !status.is_ok() {
            warn!(time = self.next.time, %status, "route solved with clamping");
        }

        let n = self.config.axes.len();
        self.records.push(TraceRecord {
            time: self.next.time,
            segment: index,
            slewing,
            status,
            demand: self.next.axes[..n].to_vec(),
            target: endpoint.axes[..n].to_vec(),
            target_time: endpoint.time,
        });
        Ok(())
    }

    fn run_segment(&mut self, index: usize, segment: &TargetConfig) -> Result<(), TrackError> {
        let tick = self.config.tick;
        let max_ticks = (self.config.max_slew / tick).ceil() as usize;
        let mut mode = RerouteMode::NewRoute;
        let mut arrival = self.next.time;

        let mut ticks = 0;
        let reference = loop {
            if ticks == max_ticks {
                return Err(TrackError::SlewTimeout {
                    segment: index,
                    ticks,
                });
            }
            ticks += 1;

            let reference = arrival;
            let mut endpoint = self.target(segment, arrival, reference);
            self.step(index, mode, &mut endpoint, true)?;
            mode = RerouteMode::CalcRoute;

            arrival = endpoint.time;
            self.next.time += tick;
            if arrival <= self.next.time {
                break reference;
            }
        };
        debug!(segment = index, arrival, ticks, "slew complete");

        let end = self.next.time + segment.duration;
        while self.next.time < end {
            let mut endpoint = self.target(segment, self.next.time, reference);
            self.step(index, RerouteMode::CalcRoute, &mut endpoint, false)?;
            self.next.time += tick;
        }
        Ok(())
    }
}

/// Run every configured segment from rest at time zero.
pub fn run_track(config: &TrackConfig) -> Result<Vec<TraceRecord>, TrackError> {
    let start = ManeuverState::at(0.0);
    let route = Route::new(&start, config.parameters()?)?;

    info!(
        service = %config.shared.service_name,
        axes = config.axes.len(),
        segments = config.targets.len(),
        "tracking started"
    );

    let mut harness = Harness {
        config,
        route,
        next: start,
        records: Vec::new(),
    };
    for (index, segment) in config.targets.iter().enumerate() {
        harness.run_segment(index, segment)?;
    }
    Ok(harness.records)
}
