use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Deserialize;

use crate::geometry::Vec2;
use crate::ray::Ray;
use crate::scene::{Scene, Segment};

/// How a single winner is picked when a ray crosses several segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// Closest crossing to the ray origin; equal distances keep scene order.
    #[default]
    Nearest,
    /// First segment in scene order that is crossed at all, however far.
    FirstInOrder,
}

/// A ray's winning crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub point: Vec2,
    /// Index of the crossed segment in scene order.
    pub segment: usize,
    /// Euclidean distance from the ray origin to `point`.
    pub distance: f32,
}

/// Intersect the ray span `origin..=tip` with a segment.
///
/// Both parameters are inclusive, so touching an endpoint, the ray origin or
/// the ray tip counts. Parallel and collinear pairs never hit.
pub fn cast(ray: &Ray, segment: &Segment) -> Option<Vec2> {
    let (x1, y1) = (ray.origin.x, ray.origin.y);
    let (x2, y2) = (x1 + ray.direction.x, y1 + ray.direction.y);
    let (x3, y3) = (segment.a().x, segment.a().y);
    let (x4, y4) = (segment.b().x, segment.b().y);

    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    let u_a = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denom;
    let u_b = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denom;

    if !(0.0..=1.0).contains(&u_a) || !(0.0..=1.0).contains(&u_b) {
        return None;
    }

    let point = Vec2::new(x1 + u_a * (x2 - x1), y1 + u_a * (y2 - y1));
    point.is_finite().then_some(point)
}

/// Cast one ray against the whole scene and apply `policy`.
pub fn cast_all(ray: &Ray, scene: &Scene, policy: HitPolicy) -> Option<Hit> {
    let mut crossings = scene
        .segments()
        .iter()
        .enumerate()
        .filter_map(|(segment, s)| {
            cast(ray, s).map(|point| Hit {
                point,
                segment,
                distance: ray.origin.distance(point),
            })
        });

    match policy {
        HitPolicy::FirstInOrder => crossings.next(),
        HitPolicy::Nearest => crossings.fold(None, |best: Option<Hit>, hit| match best {
            Some(b) if b.distance <= hit.distance => Some(b),
            _ => Some(hit),
        }),
    }
}

/// Cast every ray of a fan. Rays are independent so they run on the rayon
/// pool; the result is in ray order.
pub fn cast_fan(rays: &[Ray], scene: &Scene, policy: HitPolicy) -> Vec<Option<Hit>> {
    rays.par_iter()
        .map(|ray| cast_all(ray, scene, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: [f32; 2], b: [f32; 2]) -> Segment {
        Segment::new(a.into(), b.into()).unwrap()
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn crossing_reports_point() {
        let ray = Ray::new(Vec2::new(100.0, 200.0), Vec2::new(300.0, 0.0));
        let wall = seg([300.0, 100.0], [300.0, 300.0]);
        let hit = cast(&ray, &wall).unwrap();
        assert!(approx(hit, Vec2::new(300.0, 200.0)));
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(Vec2::new(100.0, 200.0), Vec2::new(-300.0, 0.0));
        let wall = seg([300.0, 100.0], [300.0, 300.0]);
        assert_eq!(cast(&ray, &wall), None);
    }

    #[test]
    fn parallel_and_collinear_never_hit() {
        let ray = Ray::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(cast(&ray, &seg([0.0, 5.0], [10.0, 5.0])), None);
        // collinear and overlapping
        assert_eq!(cast(&ray, &seg([2.0, 0.0], [8.0, 0.0])), None);
    }

    #[test]
    fn too_short_ray_misses() {
        let ray = Ray::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(cast(&ray, &seg([20.0, -5.0], [20.0, 5.0])), None);
    }

    #[test]
    fn bounds_are_inclusive() {
        let ray = Ray::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        // segment endpoint touches the ray
        let at_end = cast(&ray, &seg([5.0, 0.0], [5.0, 5.0])).unwrap();
        assert!(approx(at_end, Vec2::new(5.0, 0.0)));
        // segment passes through the ray tip
        let at_tip = cast(&ray, &seg([10.0, -1.0], [10.0, 1.0])).unwrap();
        assert!(approx(at_tip, Vec2::new(10.0, 0.0)));
        // segment passes through the ray origin
        let at_origin = cast(&ray, &seg([0.0, -1.0], [0.0, 1.0])).unwrap();
        assert!(approx(at_origin, Vec2::ZERO));
    }

    #[test]
    fn nearest_and_first_in_order_disagree() {
        let ray = Ray::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        let far = seg([80.0, -10.0], [80.0, 10.0]);
        let near = seg([20.0, -10.0], [20.0, 10.0]);
        let scene = Scene::new(vec![far, near]);

        let first = cast_all(&ray, &scene, HitPolicy::FirstInOrder).unwrap();
        assert_eq!(first.segment, 0);
        assert!(approx(first.point, Vec2::new(80.0, 0.0)));

        let nearest = cast_all(&ray, &scene, HitPolicy::Nearest).unwrap();
        assert_eq!(nearest.segment, 1);
        assert!((nearest.distance - 20.0).abs() < 1e-3);
    }

    #[test]
    fn nearest_tie_keeps_scene_order() {
        let ray = Ray::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        // two segments meeting at the same crossing point
        let scene = Scene::new(vec![
            seg([50.0, 0.0], [50.0, 10.0]),
            seg([50.0, -10.0], [50.0, 0.0]),
        ]);
        assert_eq!(cast_all(&ray, &scene, HitPolicy::Nearest).unwrap().segment, 0);
    }

    #[test]
    fn empty_scene_never_hits() {
        let ray = Ray::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        assert_eq!(cast_all(&ray, &Scene::default(), HitPolicy::Nearest), None);
    }

    #[test]
    fn cast_fan_keeps_ray_order() {
        let scene = Scene::default_room();
        let origin = Vec2::new(200.0, 200.0);
        let rays: Vec<Ray> = (0..32)
            .map(|i| Ray::at_angle(origin, i as f32 * 0.2, 300.0))
            .collect();
        let fan = cast_fan(&rays, &scene, HitPolicy::Nearest);
        let serial: Vec<_> = rays
            .iter()
            .map(|r| cast_all(r, &scene, HitPolicy::Nearest))
            .collect();
        assert_eq!(fan, serial);
        assert!(fan.iter().all(Option::is_some));
    }
}
