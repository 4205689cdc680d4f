//! Evaluate a solved path at a time offset.
//!
//! Offsets are measured backward from the end of the path: `0` is the
//! instant the tail coast ends, negative values are earlier. Position is
//! relative to the end position.

use super::Path;
use crate::types::AxisSample;

/// Position (relative to the end of the path) and velocity at offset `t`.
///
/// Phases are walked from the end: tail coast at `vf`, second ramp, coast
/// at `v2`, first ramp, then constant-`vi` extrapolation before the start.
/// Offsets after the end extrapolate at `vf`. At or before `-total` the
/// velocity is exactly `vi`.
pub fn sample(path: &Path, t: f64) -> AxisSample {
    if t <= -path.total && t < -path.t4 {
        return AxisSample::new(path.vi * (t + path.total) - path.displacement(), path.vi);
    }

    let accel1 = if path.t1 != 0.0 {
        (path.v2 - path.vi) / path.t1
    } else {
        0.0
    };
    let accel2 = if path.t3 != 0.0 {
        (path.vf - path.v2) / path.t3
    } else {
        0.0
    };

    // Tail coast.
    if t >= -path.t4 {
        return AxisSample::new(path.vf * t, path.vf);
    }
    let t = t + path.t4;
    let mut position = -path.vf * path.t4;

    // Second ramp.
    if t >= -path.t3 {
        let velocity = path.vf + accel2 * t;
        position += 0.5 * (velocity + path.vf) * t;
        return AxisSample::new(position, velocity);
    }
    let t = t + path.t3;
    position -= 0.5 * (path.v2 + path.vf) * path.t3;

    // Coast at v2.
    if t >= -path.t2 {
        position += path.v2 * t;
        return AxisSample::new(position, path.v2);
    }
    let t = t + path.t2;
    position -= path.v2 * path.t2;

    // First ramp.
    if t > -path.t1 {
        let velocity = path.v2 + accel1 * t;
        position += 0.5 * (velocity + path.v2) * t;
        return AxisSample::new(position, velocity);
    }
    let t = t + path.t1;
    position -= 0.5 * (path.vi + path.v2) * path.t1;

    // Before the start.
    position += path.vi * t;
    AxisSample::new(position, path.vi)
}
