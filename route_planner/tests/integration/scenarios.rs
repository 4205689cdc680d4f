//! Reference single-axis scenarios for the path solver and the
//! velocity-capped planner.

use route_planner::prelude::*;

const TOL: f64 = 1e-9;

#[test]
fn scenario_a_capped_move_cruises_at_vmax() {
    let mut path = Path::new(10.0, 0.0, 0.0);
    let status = find_path_with_vmax(&mut path, 2.0, 3.0, Unknown::Total).unwrap();

    assert_eq!(status, RouteStatus::Ok);
    assert_eq!(path.v2, 3.0);
    assert!((path.t1 - 1.5).abs() < TOL);
    assert!((path.t3 - 1.5).abs() < TOL);
    // 4.5 units are covered on the ramps, 5.5 at 3 units/s.
    assert!((path.t2 - 5.5 / 3.0).abs() < TOL);
    assert!((path.total - (3.0 + 5.5 / 3.0)).abs() < TOL);
    assert_eq!(path.t4, 0.0);
    assert!((path.displacement() - 10.0).abs() < TOL);
}

#[test]
fn scenario_b_zero_distance_is_trivial() {
    let mut path = Path::new(0.0, 0.0, 0.0);
    let status = find_path(&mut path, 2.0, Unknowns::V2Total).unwrap();

    assert_eq!(status, RouteStatus::Ok);
    assert_eq!(path, Path::new(0.0, 0.0, 0.0));
}

#[test]
fn scenario_c_zero_acceleration_is_bad_param() {
    let mut path = Path::new(10.0, 0.0, 0.0);
    let before = path;
    let err = find_path(&mut path, 0.0, Unknowns::V2Total).unwrap_err();

    assert_eq!(err.code(), "BAD_PARAM");
    assert_eq!(path, before);
}

#[test]
fn scenario_d_tighter_cap_lengthens_cruise() {
    let mut path = Path::new(10.0, 0.0, 0.0);
    let status = find_path_with_vmax(&mut path, 2.0, 2.0, Unknown::Total).unwrap();

    assert_eq!(status, RouteStatus::Ok);
    assert_eq!(path.v2, 2.0);
    assert!(path.t2 > 0.0);
    assert!((path.t2 - 4.0).abs() < TOL);
    assert!((path.displacement() - 10.0).abs() < TOL);
}

#[test]
fn sampled_profile_spans_start_to_end() {
    let mut path = Path::new(10.0, 0.0, 0.0);
    find_path_with_vmax(&mut path, 2.0, 3.0, Unknown::Total).unwrap();

    let start = sample(&path, -path.total);
    let end = sample(&path, 0.0);
    assert!((start.position + 10.0).abs() < TOL);
    assert!(start.velocity.abs() < TOL);
    assert_eq!(end.position, 0.0);
    assert_eq!(end.velocity, 0.0);

    // Monotonic approach with |v| <= vmax everywhere.
    let mut last = start.position;
    let steps = 200;
    for i in 1..=steps {
        let t = -path.total + path.total * f64::from(i) / f64::from(steps);
        let s = sample(&path, t);
        assert!(s.position >= last - TOL);
        assert!(s.velocity.abs() <= 3.0 + TOL);
        last = s.position;
    }
}
