use serde::Deserialize;

use crate::caster::Hit;
use crate::viewpoint::Viewpoint;

/// Distance correction applied before columns are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FishEye {
    /// Multiply by the cosine of the ray's angle from the heading.
    #[default]
    Cosine,
    /// Raw Euclidean distance.
    Off,
}

/// Per-ray distances in fan order. `None` means the ray hit nothing.
pub type DistanceProfile = Vec<Option<f32>>;

/// One vertical strip of the projected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    pub x: u32,
    pub width: u32,
    pub top: u32,
    pub height: u32,
    /// Grey level, 255 for touching distance, 0 for empty.
    pub shade: u8,
}

impl Column {
    /// True for the dark column drawn where a ray hit nothing.
    pub fn is_empty(&self) -> bool {
        self.shade == 0
    }
}

/// Build the distance profile from a fan's hits.
///
/// `hits` must be in the same order as the viewpoint's rays.
pub fn distance_profile(
    viewpoint: &Viewpoint,
    hits: &[Option<Hit>],
    fish_eye: FishEye,
) -> DistanceProfile {
    hits.iter()
        .zip(viewpoint.offsets())
        .enumerate()
        .map(|(i, (hit, &offset))| {
            let hit = hit.as_ref()?;
            let corrected = correct(hit.distance, offset, fish_eye);
            tracing::trace!(ray = i, raw = hit.distance, ?corrected, "ray distance");
            corrected
        })
        .collect()
}

/// Fish-eye correction for a ray `offset` radians off the heading.
///
/// A ray pointing sideways or backwards has no depth in front of the
/// viewer, so with cosine correction it projects as a miss.
#[inline]
pub fn correct(distance: f32, offset: f32, fish_eye: FishEye) -> Option<f32> {
    match fish_eye {
        FishEye::Cosine => {
            let c = offset.cos();
            (c > 0.0).then(|| distance * c)
        }
        FishEye::Off => Some(distance),
    }
}

/// Maps a distance profile onto the strip display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub width: u32,
    pub height: u32,
    /// Distances at or beyond this are drawn darkest and shortest.
    pub depth_clamp: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, depth_clamp: f32) -> Self {
        Self {
            width,
            height,
            depth_clamp: if depth_clamp > 0.0 { depth_clamp } else { 255.0 },
        }
    }

    /// Grey level for a corrected distance: 255 at zero, 0 at the clamp.
    pub fn shade(&self, distance: f32) -> u8 {
        let d = if distance.is_finite() { distance } else { self.depth_clamp };
        let t = d.clamp(0.0, self.depth_clamp) / self.depth_clamp;
        (255.0 - t * 255.0).round() as u8
    }

    pub fn columns(&self, profile: &[Option<f32>]) -> Vec<Column> {
        if profile.is_empty() {
            return Vec::new();
        }
        let column_w = (self.width / profile.len() as u32).max(1);
        let top = self.height / 4;

        profile
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                let x = index as u32 * column_w;
                match sample {
                    None => Column {
                        index,
                        x,
                        width: column_w,
                        top: 0,
                        height: self.height,
                        shade: 0,
                    },
                    Some(distance) => {
                        let shade = self.shade(*distance);
                        Column {
                            index,
                            x,
                            width: column_w,
                            top,
                            height: shade as u32 * self.height / (2 * 255),
                            shade,
                        }
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    fn hit(distance: f32) -> Option<Hit> {
        Some(Hit {
            point: Vec2::ZERO,
            segment: 0,
            distance,
        })
    }

    #[test]
    fn miss_becomes_dark_full_height_column() {
        let projection = Projection::new(800, 600, 255.0);
        let columns = projection.columns(&[None]);
        assert_eq!(columns.len(), 1);
        let c = columns[0];
        assert!(c.is_empty());
        assert_eq!((c.top, c.height, c.width), (0, 600, 800));
    }

    #[test]
    fn zero_distance_is_brightest_and_tallest() {
        let projection = Projection::new(800, 600, 255.0);
        let columns = projection.columns(&[Some(0.0), Some(100.0), Some(1000.0)]);
        assert_eq!(columns[0].shade, 255);
        assert_eq!(columns[0].height, 300);
        assert_eq!(columns[0].top, 150);
        assert!(columns[1].shade < 255 && columns[1].shade > 0);
        assert!(columns[1].height < columns[0].height);
        assert_eq!(columns[2].shade, 0);
        assert_eq!(columns[2].height, 0);
    }

    #[test]
    fn columns_split_width_evenly() {
        let projection = Projection::new(800, 600, 255.0);
        let columns = projection.columns(&vec![Some(10.0); 60]);
        assert!(columns.iter().all(|c| c.width == 13));
        assert_eq!(columns[59].x, 59 * 13);
        assert_eq!(columns[7].index, 7);
    }

    #[test]
    fn cosine_correction_uses_ray_offset() {
        let offsets = vec![-FRAC_PI_3, 0.0, FRAC_PI_3];
        let vp = Viewpoint::with_offsets(Vec2::ZERO, 0.0, offsets, 300.0).unwrap();
        let profile = distance_profile(&vp, &[hit(100.0), hit(100.0), None], FishEye::Cosine);
        assert!((profile[0].unwrap() - 50.0).abs() < 1e-3);
        assert!((profile[1].unwrap() - 100.0).abs() < 1e-3);
        assert_eq!(profile[2], None);

        let raw = distance_profile(&vp, &[hit(100.0), None, None], FishEye::Off);
        assert_eq!(raw[0], Some(100.0));
    }

    #[test]
    fn rays_behind_the_viewer_project_as_misses() {
        let vp = Viewpoint::with_offsets(
            Vec2::ZERO,
            0.0,
            vec![PI, FRAC_PI_2 + 0.01, 1.0],
            300.0,
        )
        .unwrap();
        let hits = [hit(250.0), hit(250.0), hit(250.0)];

        let profile = distance_profile(&vp, &hits, FishEye::Cosine);
        assert_eq!(profile[0], None);
        assert_eq!(profile[1], None);
        assert!((profile[2].unwrap() - 250.0 * 1f32.cos()).abs() < 1e-3);

        let columns = Projection::new(800, 600, 255.0).columns(&profile);
        assert!(columns[0].is_empty());
        assert_ne!(columns[0].shade, 255);

        // without correction the far wall stays a far wall
        let raw = distance_profile(&vp, &hits, FishEye::Off);
        assert_eq!(raw[0], Some(250.0));
    }

    #[test]
    fn non_finite_distance_is_darkest() {
        let projection = Projection::new(800, 600, 255.0);
        assert_eq!(projection.shade(f32::NAN), 0);
        assert_eq!(projection.shade(-5.0), 255);
    }
}
