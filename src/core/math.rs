//! Angle and scalar helpers.
//!
//! All angles are in radians, counter-clockwise positive, 0 = agent forward.
//!
//! Two symmetric wraps exist because the sensors and the controllers disagree
//! on which end of the half-turn is closed:
//! - [`normalize_angle`] wraps to [-π, π) and is used for turn decisions.
//! - [`normalize_angle_upper`] wraps to (-π, π] and is used for landmark bearings.

use std::f32::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f32 = 2.0 * PI;

/// Normalize angle to [0, 2π).
///
/// # Example
/// ```
/// use jhund::core::math::normalize_angle_positive;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle_positive(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
/// assert!(normalize_angle_positive(2.0 * PI).abs() < 1e-5);
/// ```
#[inline]
pub fn normalize_angle_positive(angle: f32) -> f32 {
    let a = angle.rem_euclid(TWO_PI);
    // rem_euclid can round up to exactly TWO_PI for tiny negative inputs
    if a >= TWO_PI { 0.0 } else { a }
}

/// Normalize angle to [-π, π).
///
/// # Example
/// ```
/// use jhund::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(PI / 2.0) - PI / 2.0).abs() < 1e-6);
/// assert!((normalize_angle(PI) + PI).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TWO_PI;
    if a >= PI {
        a -= TWO_PI;
    } else if a < -PI {
        a += TWO_PI;
    }
    a
}

/// Normalize angle to (-π, π].
#[inline]
pub fn normalize_angle_upper(angle: f32) -> f32 {
    let mut a = angle % TWO_PI;
    if a > PI {
        a -= TWO_PI;
    } else if a <= -PI {
        a += TWO_PI;
    }
    a
}

/// Signed shortest rotation from `from` to `to`, in [-π, π).
///
/// Positive result means counter-clockwise rotation from `from` to `to`.
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Magnitude of the shortest rotation between two angles, in [0, π].
#[inline]
pub fn smallest_angle_between(a: f32, b: f32) -> f32 {
    angle_diff(a, b).abs()
}

/// Unsigned forward difference `a - b` measured counter-clockwise, in [0, 2π).
///
/// Unlike [`angle_diff`] this never picks the shorter way round: the result is
/// how far one must rotate counter-clockwise from `b` to reach `a`.
///
/// # Example
/// ```
/// use jhund::core::math::forward_angle_diff;
/// use std::f32::consts::PI;
///
/// // From -90° counter-clockwise to +90° is half a turn
/// assert!((forward_angle_diff(PI / 2.0, -PI / 2.0) - PI).abs() < 1e-5);
/// // From +90° counter-clockwise to 0° is three quarters of a turn
/// assert!((forward_angle_diff(0.0, PI / 2.0) - 1.5 * PI).abs() < 1e-5);
/// ```
#[inline]
pub fn forward_angle_diff(a: f32, b: f32) -> f32 {
    let diff = normalize_angle_positive(a) - normalize_angle_positive(b);
    if diff < 0.0 { diff + TWO_PI } else { diff }
}

/// Midpoint of the shorter arc between two angles.
///
/// A naive `(a + b) / 2` is wrong across the ±π seam; this walks half of the
/// signed shortest difference from `a`.
#[inline]
pub fn shortest_arc_midpoint(a: f32, b: f32) -> f32 {
    normalize_angle(a + angle_diff(a, b) / 2.0)
}

/// Sign of a value with zero mapped to zero.
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Square of a value.
#[inline]
pub fn sq(x: f32) -> f32 {
    x * x
}
