//! Per-tick replanning: reuse of committed paths, retargeting mid-move,
//! short-path re-timing and suspended routing.

use route_planner::prelude::*;

use super::{DT, params, velocity_step};

fn single_axis_route(tcoast: f64) -> Route {
    Route::new(&ManeuverState::at(0.0), params(0.0, tcoast, &[(0, 2.0, 3.0)])).unwrap()
}

#[test]
fn unchanged_endpoint_reuses_committed_path() {
    let mut route = single_axis_route(0.0);
    let mut endpoint = ManeuverState::at(0.0).with_axis(0, 10.0, 0.0);
    let mut next = ManeuverState::at(0.0);
    route
        .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
        .unwrap();

    let arrival = endpoint.time;
    let committed = *route.path(0).unwrap();

    for tick in 1..120 {
        let prev = next;
        next.time = f64::from(tick) * DT;
        let status = route
            .advance(RerouteMode::CalcRoute, &mut endpoint, &mut next)
            .unwrap();

        assert_eq!(status, RouteStatus::Ok);
        assert_eq!(endpoint.time, arrival);
        assert_eq!(route.path(0).unwrap(), &committed);
        assert!(velocity_step(&prev, &next, &[0]) <= 2.0 * DT + 1e-9);
    }

    assert_eq!(next.axes[0], AxisSample::new(10.0, 0.0));
    assert_eq!(route.demand(), &next);
}

#[test]
fn repeated_tick_with_same_time_is_identical() {
    let mut route = Route::new(
        &ManeuverState::at(0.0),
        params(0.05, 1.0, &[(0, 2.0, 3.0), (2, 0.5, 1.0)]),
    )
    .unwrap();
    let mut endpoint = ManeuverState::at(0.0)
        .with_axis(0, 10.0, 0.0)
        .with_axis(2, -3.0, 0.1);
    let mut next = ManeuverState::at(0.0);
    route
        .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
        .unwrap();

    for tick in 1..160 {
        if tick == 40 {
            endpoint.axes[0].position = 4.0;
        }
        next.time = f64::from(tick) * DT;
        let first = route
            .advance(RerouteMode::CalcRoute, &mut endpoint, &mut next)
            .unwrap();
        let (next_once, endpoint_once) = (next, endpoint);

        let second = route
            .advance(RerouteMode::CalcRoute, &mut endpoint, &mut next)
            .unwrap();

        assert_eq!(second, first);
        assert_eq!(next, next_once);
        assert_eq!(endpoint, endpoint_once);
        assert_eq!(route.demand(), &next);
    }
}

#[test]
fn retarget_mid_move_stays_continuous() {
    let mut route = single_axis_route(0.0);
    let mut endpoint = ManeuverState::at(0.0).with_axis(0, 10.0, 0.0);
    let mut next = ManeuverState::at(0.0);
    route
        .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
        .unwrap();

    for tick in 1..200 {
        if tick == 20 {
            endpoint.axes[0].position = -5.0;
        }
        let prev = next;
        next.time = f64::from(tick) * DT;
        let status = route
            .advance(RerouteMode::CalcRoute, &mut endpoint, &mut next)
            .unwrap();

        assert_eq!(status, RouteStatus::Ok);
        assert!(velocity_step(&prev, &next, &[0]) <= 2.0 * DT + 1e-9);
        assert!(next.axes[0].velocity.abs() <= 3.0 + 1e-9);
    }

    assert!(endpoint.time < 200.0 * DT);
    assert!((next.axes[0].position + 5.0).abs() < 1e-9);
    assert!(next.axes[0].velocity.abs() < 1e-9);
}

#[test]
fn coast_time_is_appended_to_the_move() {
    let mut route = single_axis_route(0.5);
    let mut endpoint = ManeuverState::at(0.0).with_axis(0, 10.0, 0.0);
    let mut next = ManeuverState::at(0.0);
    route
        .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
        .unwrap();

    let path = route.path(0).unwrap();
    assert_eq!(path.t4, 0.5);
    assert!((endpoint.time - (3.5 + 5.5 / 3.0)).abs() < 1e-9);
}

#[test]
fn no_new_route_coasts_onto_a_moving_endpoint() {
    let mut route = single_axis_route(0.0);
    let mut endpoint = ManeuverState::at(1.0).with_axis(0, 1.5, 0.5);
    let mut next = ManeuverState::at(1.0);

    let status = route
        .advance(RerouteMode::NoNewRoute, &mut endpoint, &mut next)
        .unwrap();
    assert_eq!(status, RouteStatus::Ok);
    assert!((next.axes[0].position - 1.5).abs() < 1e-12);
    assert!((next.axes[0].velocity - 0.5).abs() < 1e-12);

    // A coast is a straight line: v2 equals the endpoint velocity.
    let path = route.path(0).unwrap();
    assert!((path.v2 - 0.5).abs() < 1e-12);
    assert!((path.vi - 0.5).abs() < 1e-12);

    // Routing resumes on the next tick against the moving target.
    endpoint = ManeuverState::at(1.05).with_axis(0, 1.525, 0.5);
    next.time = 1.05;
    let status = route
        .advance(RerouteMode::CalcRoute, &mut endpoint, &mut next)
        .unwrap();
    assert_eq!(status, RouteStatus::Ok);
    assert!((next.axes[0].position - 1.525).abs() < 1e-12);
    assert!((next.axes[0].velocity - 0.5).abs() < 1e-12);
}

#[test]
fn bad_parameters_abort_the_tick() {
    let mut route = single_axis_route(0.0);
    let mut bad = route.params().clone();
    bad.limits[0].amax = 0.0;
    assert_eq!(route.set_params(bad).unwrap_err().code(), "BAD_PARAM");

    // The rejected update left the route usable.
    let mut endpoint = ManeuverState::at(0.0).with_axis(0, 1.0, 0.0);
    let mut next = ManeuverState::at(0.0);
    assert!(
        route
            .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
            .is_ok()
    );
}

#[test]
fn unrouted_axes_are_left_alone() {
    let mut route = single_axis_route(0.0);
    let mut endpoint = ManeuverState::at(0.0)
        .with_axis(0, 4.0, 0.0)
        .with_axis(3, 99.0, 7.0);
    let mut next = ManeuverState::at(0.5).with_axis(3, -1.0, -2.0);

    route
        .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
        .unwrap();
    assert_eq!(next.axes[3], AxisSample::new(-1.0, -2.0));
    assert!(next.axes[0].position > 0.0 && next.axes[0].position < 4.0);
}
