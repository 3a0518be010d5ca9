//! Pointer-angle math for the platter surface

use std::f64::consts::{PI, TAU};

/// Degrees per radian
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// A point in screen space
///
/// Unit-agnostic: terminal cells and pixels both work as long as center and
/// pointer share the same space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Angle of `point` around `center`, in radians
pub fn angle_to(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x)
}

/// Normalize an angle into `(-PI, PI]`
///
/// Closed-form modulo rather than a subtract loop, so it terminates for any
/// finite input no matter how far out of range.
pub fn normalize_angle(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
