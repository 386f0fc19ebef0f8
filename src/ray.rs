use crate::geometry::Vec2;

/// Origin plus direction. The direction's magnitude is the cast reach, so a
/// ray behaves like the segment `origin -> origin + direction`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ray {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl Ray {
    #[inline]
    pub const fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Ray of length `reach` pointing along `angle` (radians).
    pub fn at_angle(origin: Vec2, angle: f32, reach: f32) -> Self {
        Self {
            origin,
            direction: Vec2::from_angle(angle) * reach,
        }
    }

    /// Far end of the ray.
    #[inline]
    pub fn tip(&self) -> Vec2 {
        self.origin + self.direction
    }
}
