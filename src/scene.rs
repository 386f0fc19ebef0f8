use crate::error::GeometryError;
use crate::geometry::Vec2;

/// Static obstacle edge. Endpoints are distinct and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    a: Vec2,
    b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Result<Self, GeometryError> {
        if !a.is_finite() || !b.is_finite() {
            return Err(GeometryError::InvalidGeometry(format!(
                "segment endpoints must be finite, got {a:?} -> {b:?}"
            )));
        }
        if a == b {
            return Err(GeometryError::InvalidGeometry(format!(
                "zero-length segment at ({}, {})",
                a.x, a.y
            )));
        }
        Ok(Self { a, b })
    }

    #[inline]
    pub fn a(&self) -> Vec2 {
        self.a
    }

    #[inline]
    pub fn b(&self) -> Vec2 {
        self.b
    }

    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }
}

/// Ordered obstacle set. Order is construction order and is what
/// first-in-order casting iterates.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    segments: Vec<Segment>,
}

impl Scene {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Build a scene from raw endpoint pairs, rejecting the first degenerate one.
    pub fn from_endpoints<I>(endpoints: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = ([f32; 2], [f32; 2])>,
    {
        let segments = endpoints
            .into_iter()
            .map(|(a, b)| Segment::new(a.into(), b.into()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// The square room the visualizer starts with.
    pub fn default_room() -> Self {
        let corners = [
            ([300.0, 100.0], [300.0, 300.0]),
            ([300.0, 100.0], [100.0, 100.0]),
            ([100.0, 100.0], [100.0, 300.0]),
            ([100.0, 300.0], [300.0, 300.0]),
        ];
        let segments = corners
            .iter()
            .map(|&(a, b)| Segment {
                a: a.into(),
                b: b.into(),
            })
            .collect();
        Self { segments }
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_segment_is_rejected() {
        let p = Vec2::new(10.0, 10.0);
        assert!(matches!(
            Segment::new(p, p),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn non_finite_segment_is_rejected() {
        let a = Vec2::new(f32::NAN, 0.0);
        let b = Vec2::new(1.0, 1.0);
        assert!(Segment::new(a, b).is_err());
        assert!(Segment::new(b, Vec2::new(f32::INFINITY, 2.0)).is_err());
    }

    #[test]
    fn from_endpoints_keeps_order_and_fails_on_degenerate() {
        let scene =
            Scene::from_endpoints([([0.0, 0.0], [1.0, 0.0]), ([5.0, 5.0], [5.0, 9.0])]).unwrap();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.segments()[1].b(), Vec2::new(5.0, 9.0));
        assert_eq!(scene.segments()[1].length(), 4.0);

        let bad = Scene::from_endpoints([([0.0, 0.0], [1.0, 0.0]), ([2.0, 2.0], [2.0, 2.0])]);
        assert!(bad.is_err());
    }

    #[test]
    fn default_room_is_closed_square() {
        let room = Scene::default_room();
        assert_eq!(room.len(), 4);
        assert!(room.segments().iter().all(|s| s.length() == 200.0));
    }
}
