//! Multi-axis arrival: shared total time, Tsync rounding and the
//! displacement identity on every re-solved axis.

use route_planner::prelude::*;

use super::{DT, params};

const TSYNC: f64 = 0.05;

fn assert_on_grid(time: f64, period: f64) {
    let cycles = time / period;
    assert!(
        (cycles - cycles.round()).abs() < 1e-9,
        "{time} is not a multiple of {period}"
    );
}

#[test]
fn all_axes_share_the_longest_duration() {
    let axes = [(0, 2.0, 3.0), (1, 1.0, 1.0), (2, 0.5, 0.5)];
    let mut route = Route::new(&ManeuverState::at(0.0), params(0.0, 0.0, &axes)).unwrap();
    let mut endpoint = ManeuverState::at(0.0)
        .with_axis(0, 10.0, 0.0)
        .with_axis(1, -2.0, 0.0)
        .with_axis(2, 0.3, 0.0);
    let mut next = ManeuverState::at(0.0);

    let status = route
        .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
        .unwrap();
    assert_eq!(status, RouteStatus::Ok);

    // Axis 0 is the slowest: 3 s of ramps plus 5.5/3 s cruising.
    let arrival = 3.0 + 5.5 / 3.0;
    assert!((endpoint.time - arrival).abs() < 1e-9);

    for &(axis, _, vmax) in &axes {
        let path = route.path(axis).unwrap();
        assert!((path.total - arrival).abs() < 1e-9);
        assert!((path.displacement() - path.dist).abs() < 1e-9);
        assert!(path.v2.abs() <= vmax + 1e-12);
    }
}

#[test]
fn arrival_time_is_rounded_up_to_tsync() {
    let axes = [(0, 2.0, 3.0), (1, 1.0, 1.0)];
    let mut route = Route::new(&ManeuverState::at(0.0), params(TSYNC, 0.0, &axes)).unwrap();
    let mut endpoint = ManeuverState::at(0.0)
        .with_axis(0, 10.0, 0.0)
        .with_axis(1, 2.0, 0.0);
    let mut next = ManeuverState::at(0.0);

    let status = route
        .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
        .unwrap();
    assert_eq!(status, RouteStatus::Ok);

    // 4.8333 s rounds up to 97 periods.
    assert_on_grid(endpoint.time, TSYNC);
    assert!((endpoint.time - 4.85).abs() < 1e-9);

    // The longest axis was re-solved too and now cruises just under Vmax.
    let lead = route.path(0).unwrap();
    assert!(lead.v2 < 3.0);
    for axis in [0, 1] {
        let path = route.path(axis).unwrap();
        assert!((path.total - endpoint.time).abs() < 1e-9);
        assert!((path.displacement() - path.dist).abs() < 1e-9);
    }

    // Every axis lands on its endpoint at the arrival time.
    next.time = endpoint.time;
    route
        .advance(RerouteMode::CalcRoute, &mut endpoint, &mut next)
        .unwrap();
    assert!((next.axes[0].position - 10.0).abs() < 1e-9);
    assert!((next.axes[1].position - 2.0).abs() < 1e-9);
    assert!(next.axes[0].velocity.abs() < 1e-9);
    assert!(next.axes[1].velocity.abs() < 1e-9);
}

#[test]
fn sync_rounds_the_absolute_arrival_time() {
    // Start off-grid: the arrival instant, not the duration, is aligned.
    let start = ManeuverState::at(0.013);
    let axes = [(0, 1.0, 1.0)];
    let mut route = Route::new(&start, params(TSYNC, 0.0, &axes)).unwrap();
    let mut endpoint = ManeuverState::at(0.0).with_axis(0, 1.0, 0.0);
    let mut next = ManeuverState::at(0.013 + DT);

    route
        .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
        .unwrap();
    assert_on_grid(endpoint.time, TSYNC);
    assert!(endpoint.time >= 0.013 + 2.0);
    assert!(endpoint.time < 0.013 + 2.0 + TSYNC);
}
