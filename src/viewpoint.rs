use crate::error::GeometryError;
use crate::geometry::{Vec2, wrap_angle};
use crate::ray::Ray;

/// The movable eye. Owns the ray fan and keeps every ray anchored at its
/// position and rotated to its heading.
#[derive(Debug, Clone)]
pub struct Viewpoint {
    position: Vec2,
    heading: f32,      // radians, 0 along +X, positive turns towards +Y
    reach: f32,        // length of every ray in the fan
    offsets: Vec<f32>, // per-ray angle from heading, left to right
    rays: Vec<Ray>,
    heading_ray: Ray,
}

impl Viewpoint {
    /// Spread `count` rays `fov / count` apart, starting at `-fov / 2`.
    ///
    /// Ray `count / 2` lies on the heading, so the fan reaches one step
    /// further left than right. A single ray points along the heading.
    pub fn fan(
        position: Vec2,
        heading: f32,
        fov: f32,
        count: usize,
        reach: f32,
    ) -> Result<Self, GeometryError> {
        if count == 0 {
            return Err(GeometryError::InvalidGeometry(
                "ray fan needs at least one ray".into(),
            ));
        }
        if !fov.is_finite() || fov < 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "field of view must be finite and non-negative, got {fov}"
            )));
        }
        let step = fov / count as f32;
        let half = 0.5 * fov;
        let offsets = if count == 1 {
            vec![0.0]
        } else {
            (0..count).map(|i| -half + i as f32 * step).collect()
        };
        Self::with_offsets(position, heading, offsets, reach)
    }

    /// Fan with explicit angular offsets (radians from heading), in column order.
    pub fn with_offsets(
        position: Vec2,
        heading: f32,
        offsets: Vec<f32>,
        reach: f32,
    ) -> Result<Self, GeometryError> {
        if !position.is_finite() || !heading.is_finite() {
            return Err(GeometryError::InvalidGeometry(format!(
                "viewpoint must be finite, got {position:?} heading {heading}"
            )));
        }
        if !(reach.is_finite() && reach > 0.0) {
            return Err(GeometryError::InvalidGeometry(format!(
                "ray reach must be positive, got {reach}"
            )));
        }
        if offsets.iter().any(|o| !o.is_finite()) {
            return Err(GeometryError::InvalidGeometry(
                "ray offsets must be finite".into(),
            ));
        }

        let mut viewpoint = Self {
            position,
            heading: 0.0,
            reach,
            rays: vec![Ray::default(); offsets.len()],
            offsets,
            heading_ray: Ray::default(),
        };
        viewpoint.move_to(position.x, position.y);
        viewpoint.set_heading(heading);
        Ok(viewpoint)
    }

    /// Relocate the eye. Ray origins follow, directions are left alone.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        for ray in &mut self.rays {
            ray.origin = self.position;
        }
        self.heading_ray.origin = self.position;
    }

    /// Point the fan at `heading` radians and recompute every direction.
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = wrap_angle(heading);
        for (ray, &offset) in self.rays.iter_mut().zip(&self.offsets) {
            ray.direction = Vec2::from_angle(self.heading + offset) * self.reach;
        }
        self.heading_ray.direction = Vec2::from_angle(self.heading) * self.reach;
    }

    pub fn rotate(&mut self, delta: f32) {
        self.set_heading(self.heading + delta);
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    #[inline]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    #[inline]
    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Forward-axis reference ray, drawn in the top-down view.
    #[inline]
    pub fn heading_ray(&self) -> &Ray {
        &self.heading_ray
    }
}
