//! Screen-space vector and angle helpers
//!
//! Angles follow screen conventions: 0° points east and angles grow
//! clockwise, because the Y axis points down. Every motion routine in `sim`
//! goes through these helpers so the convention lives in one place.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

#[inline]
pub fn to_radians(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

#[inline]
pub fn to_degrees(rad: f32) -> f32 {
    rad * 180.0 / std::f32::consts::PI
}

/// Wrap radians into [0, 2π)
#[inline]
pub fn wrap_radians(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap degrees into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Clockwise bearing (radians, [0, 2π)) from `from` to `to`
pub fn points_angle_rad(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    wrap_radians(d.y.atan2(d.x))
}

/// Clockwise bearing (degrees, [0, 360)) from `from` to `to`
pub fn points_angle_deg(from: Vec2, to: Vec2) -> f32 {
    wrap_degrees(to_degrees(points_angle_rad(from, to)))
}

/// Clockwise heading of a vector in degrees
pub fn vector_angle_deg(v: Vec2) -> f32 {
    points_angle_deg(Vec2::ZERO, v)
}

/// Unit vector pointing along `angle_deg`
#[inline]
pub fn heading(angle_deg: f32) -> Vec2 {
    let a = to_radians(angle_deg);
    Vec2::new(a.cos(), a.sin())
}

/// Rotate `v` clockwise (on screen) by `angle_deg`
pub fn rotate_vector(v: Vec2, angle_deg: f32) -> Vec2 {
    let (s, c) = to_radians(angle_deg).sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// Scale `v` to length `scalar`. `None` for a zero-length input.
pub fn normalize(v: Vec2, scalar: f32) -> Option<Vec2> {
    let m = v.length();
    if m > 0.0 { Some(v / m * scalar) } else { None }
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Uniform integer in `[min, max]`, both ends inclusive. Bounds may be given
/// in either order.
pub fn random_int(rng: &mut impl Rng, min: i32, max: i32) -> i32 {
    if min == max {
        return min;
    }
    let (lo, hi) = if min < max { (min, max) } else { (max, min) };
    rng.random_range(lo..=hi)
}

/// Uniform float between `min` and `max`. Returns `min` exactly when the
/// bounds are equal; reversed bounds sample the same interval.
pub fn random_float(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if min == max {
        return min;
    }
    min + rng.random::<f32>() * (max - min)
}
