use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use std::f64::consts::PI;

use crate::utils::constants::{DIRECTION_EPSILON_SQ, WORLD_DOWN, WORLD_EAST, WORLD_UP};

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor.clamp(0.0, 1.0)
}

/// Fraction of `value` between `start` and `end`, clamped to [0, 1].
///
/// Returns 0 when the range is empty.
#[inline]
pub fn inverse_lerp(start: f64, end: f64, value: f64) -> f64 {
    let span = end - start;
    if span.abs() < f64::EPSILON {
        return 0.0;
    }
    ((value - start) / span).clamp(0.0, 1.0)
}

/// Shortest signed difference `target - current` in degrees, in [-180, 180]
pub fn delta_angle_deg(current: f64, target: f64) -> f64 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Wrap `index + offset` into `[0, count)`
#[inline]
pub fn wrap_index(index: isize, count: usize) -> usize {
    index.rem_euclid(count as isize) as usize
}

/// Build an attitude whose body x axis points along `forward` and whose body z axis
/// points as close to world-down as possible (FRD body in NED world).
///
/// `forward` must be non-degenerate. When it is vertical, world east is used as the right axis.
pub fn look_rotation(forward: &Vector3<f64>) -> UnitQuaternion<f64> {
    let forward = forward.normalize();

    let mut right = WORLD_DOWN.cross(&forward);
    if right.norm_squared() < DIRECTION_EPSILON_SQ {
        right = WORLD_EAST - forward * forward.dot(&WORLD_EAST);
    }
    let right = right.normalize();
    let down = forward.cross(&right);

    let basis = Matrix3::from_columns(&[forward, right, down]);
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis))
}

/// Signed bank angle of a body (radians), positive with the right wing down.
///
/// Measured as the rotation of the body up axis away from world up about the body forward axis.
pub fn bank_angle(right: &Vector3<f64>, up: &Vector3<f64>) -> f64 {
    (-right.dot(&WORLD_UP)).atan2(up.dot(&WORLD_UP))
}

/// Clamp a value to `[-limit, limit]`, mapping NaN to zero
#[inline]
pub fn clamp_symmetric(value: f64, limit: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-limit, limit)
}
