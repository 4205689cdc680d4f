//! Closed-loop tracking: slew onto a target moving at a constant rate,
//! then follow it tick by tick.

use route_planner::prelude::*;

use super::{DT, params, velocity_step};

const AMAX: f64 = 0.12;
const VMAX: f64 = 0.6;
const AXES: [usize; 3] = [0, 1, 2];

/// Base rate every target moves at.
const SKY_RATE: [f64; 3] = [10.0 / 3600.0, 0.0, 0.0];

/// Target offsets `(position, rate)` per axis for each segment.
const SEGMENTS: [[(f64, f64); 3]; 3] = [
    [(-100.0 / 3600.0, 10.0 / 3600.0), (10.0 / 3600.0, 0.0), (-100.0 / 3600.0, 10.0 / 3600.0)],
    [(-100.0 / 3600.0, 10.0 / 3600.0), (0.0, 0.0), (-100.0 / 3600.0, 10.0 / 3600.0)],
    [(0.5, 0.0), (-0.25, 0.0), (0.1, -10.0 / 3600.0)],
];

const TRACK_TIME: f64 = 10.0;

/// Target for `time`, with the segment offset rate counted from `reference`.
fn target(segment: &[(f64, f64); 3], time: f64, reference: f64) -> ManeuverState {
    let mut state = ManeuverState::at(time);
    for axis in AXES {
        let (offset, rate) = segment[axis];
        state.axes[axis] = AxisSample::new(
            SKY_RATE[axis] * time + offset + rate * (time - reference),
            SKY_RATE[axis] + rate,
        );
    }
    state
}

#[test]
fn slew_then_track_follows_the_target() {
    let axes = AXES.map(|a| (a, AMAX, VMAX));
    let mut route = Route::new(&ManeuverState::at(0.0), params(TSYNC, 1.0, &axes)).unwrap();
    let mut next = ManeuverState::at(0.0);

    for segment in &SEGMENTS {
        let mut mode = RerouteMode::NewRoute;
        let mut endpoint_time = next.time;
        let mut reference;
        let mut slew_ticks = 0;

        // Slew: the target is re-evaluated at the planned arrival time until
        // the demand catches up with it.
        loop {
            reference = endpoint_time;
            let mut endpoint = target(segment, endpoint_time, reference);
            let prev = next;
            let status = route.advance(mode, &mut endpoint, &mut next).unwrap();
            mode = RerouteMode::CalcRoute;

            assert_eq!(status, RouteStatus::Ok);
            assert!(velocity_step(&prev, &next, &AXES) <= AMAX * DT + 1e-9);
            assert_on_grid(endpoint.time);

            endpoint_time = endpoint.time;
            next.time += DT;
            slew_ticks += 1;
            if endpoint_time <= next.time {
                break;
            }
        }
        assert!(slew_ticks > 1);

        // Track: the endpoint is the target at the demand time.
        let track_end = next.time + TRACK_TIME;
        while next.time < track_end {
            let mut endpoint = target(segment, next.time, reference);
            let prev = next;
            let status = route
                .advance(RerouteMode::CalcRoute, &mut endpoint, &mut next)
                .unwrap();

            assert_eq!(status, RouteStatus::Ok);
            assert!(velocity_step(&prev, &next, &AXES) <= AMAX * DT + 1e-9);
            for axis in AXES {
                let err = (next.axes[axis].position - endpoint.axes[axis].position).abs();
                assert!(err < 1e-9, "axis {axis} lags by {err}");
                assert!((next.axes[axis].velocity - endpoint.axes[axis].velocity).abs() < 1e-9);
            }
            next.time += DT;
        }
    }
}

const TSYNC: f64 = 0.05;

fn assert_on_grid(time: f64) {
    let cycles = time / TSYNC;
    assert!((cycles - cycles.round()).abs() < 1e-6, "{time} off the sync grid");
}
