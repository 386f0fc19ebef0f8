//! World-space math for the top-down view (coordinates are view pixels).

pub use glam::Vec2;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Wrap an angle in radians into (-PI, PI].
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};

    if !angle.is_finite() {
        return 0.0;
    }
    angle %= TAU;
    if angle > PI {
        angle -= TAU;
    }
    if angle <= -PI {
        angle += TAU;
    }
    angle
}
