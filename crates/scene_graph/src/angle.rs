//! Angle helpers shared by [`Transform`](crate::Transform) and its users.

use std::f32::consts::{PI, TAU};

/// Wraps an angle in radians into the half-open range `(-π, π]`.
///
/// Angles already inside the range are returned untouched, so wrapping is
/// idempotent bit-for-bit. `NaN` propagates; `±∞` maps to `0`.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return if angle.is_nan() { angle } else { 0.0 };
    }

    if angle > -PI && angle <= PI {
        return angle;
    }

    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// Normalizes an angle in degrees into `[0, 360)`.
///
/// Negative inputs wrap up into the positive range.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let normalized = degrees % 360.0;
    let normalized = if normalized < 0.0 {
        normalized + 360.0
    } else {
        normalized
    };
    // -1e-8 % 360 + 360 rounds to exactly 360.0 in f32
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
