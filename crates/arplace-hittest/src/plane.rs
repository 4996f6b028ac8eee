//! Infinite plane intersections.

use arplace_core::{Pt3, Ray3, Real, Vec3};
use serde::{Deserialize, Serialize};

use crate::HitTestError;

/// Parallelism tolerance for ray/plane tests.
const PARALLEL_EPS: Real = 1e-12;

/// Options for hit tests against an assumed horizontal floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfinitePlaneOptions {
    /// Minimum downward component of the (unit) ray direction.
    ///
    /// Rays pointing up, or only slightly down, would hit the plane far away
    /// or behind the observer; they are rejected.
    pub min_downward_slope: Real,
}

impl Default for InfinitePlaneOptions {
    fn default() -> Self {
        Self {
            min_downward_slope: 0.03,
        }
    }
}

impl InfinitePlaneOptions {
    pub fn validate(&self) -> Result<(), HitTestError> {
        let s = self.min_downward_slope;
        if !s.is_finite() || !(0.0..1.0).contains(&s) {
            return Err(HitTestError::InvalidSlope(s));
        }
        Ok(())
    }
}

/// Intersect a ray with the plane through `point_on_plane` with normal `normal`.
///
/// Returns `None` when the ray is parallel to the plane or the intersection
/// lies behind the ray origin.
pub fn intersect_plane(ray: &Ray3, point_on_plane: &Pt3, normal: &Vec3) -> Option<Pt3> {
    let denom = ray.dir.dot(normal);
    if denom.abs() < PARALLEL_EPS {
        return None;
    }
    let t = (point_on_plane - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.at(t))
}

/// Intersect a ray with the horizontal plane `y = plane_y`.
///
/// A horizontal ray only "hits" when its origin already lies on the plane, in
/// which case the origin is returned. Intersections behind the origin are
/// rejected.
pub fn intersect_horizontal_plane(ray: &Ray3, plane_y: Real) -> Option<Pt3> {
    if ray.dir.y.abs() < PARALLEL_EPS {
        return ((ray.origin.y - plane_y).abs() < PARALLEL_EPS).then_some(ray.origin);
    }
    let t = (plane_y - ray.origin.y) / ray.dir.y;
    if t < 0.0 {
        return None;
    }
    Some(ray.at(t))
}

/// Hit test against an infinite horizontal plane through `point_on_plane`.
///
/// Only downward-looking rays are accepted (see
/// [`InfinitePlaneOptions::min_downward_slope`]).
pub fn hit_test_infinite_horizontal_plane(
    ray: &Ray3,
    point_on_plane: &Pt3,
    opts: &InfinitePlaneOptions,
) -> Option<Pt3> {
    if ray.dir.y > -opts.min_downward_slope {
        return None;
    }
    intersect_horizontal_plane(ray, point_on_plane.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(origin: Pt3, dir: Vec3) -> Ray3 {
        Ray3::new(origin, dir).unwrap()
    }

    #[test]
    fn downward_ray_hits_floor() {
        let r = ray(Pt3::new(0.0, 1.5, 1.5), Vec3::new(0.0, -1.0, -1.0));
        let hit = hit_test_infinite_horizontal_plane(
            &r,
            &Pt3::origin(),
            &InfinitePlaneOptions::default(),
        )
        .unwrap();
        assert!((hit - Pt3::origin()).norm() < 1e-12);
    }

    #[test]
    fn plane_height_follows_point_on_plane() {
        let r = ray(Pt3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, -1.0));
        let hit = hit_test_infinite_horizontal_plane(
            &r,
            &Pt3::new(5.0, 0.5, 5.0),
            &InfinitePlaneOptions::default(),
        )
        .unwrap();
        assert!((hit.y - 0.5).abs() < 1e-12);
        assert!((hit.z + 1.5).abs() < 1e-12);
    }

    #[test]
    fn shallow_and_upward_rays_are_rejected() {
        let opts = InfinitePlaneOptions::default();
        let level = ray(Pt3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -0.01, -1.0));
        let up = ray(Pt3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -1.0));
        assert!(hit_test_infinite_horizontal_plane(&level, &Pt3::origin(), &opts).is_none());
        assert!(hit_test_infinite_horizontal_plane(&up, &Pt3::origin(), &opts).is_none());
        // Without the slope guard the shallow ray does reach the floor.
        assert!(intersect_horizontal_plane(&level, 0.0).is_some());
    }

    #[test]
    fn horizontal_ray_special_case() {
        let r = ray(Pt3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(intersect_horizontal_plane(&r, 0.0), Some(Pt3::origin()));
        assert_eq!(intersect_horizontal_plane(&r, 1.0), None);
    }

    #[test]
    fn intersections_behind_origin_are_rejected() {
        let r = ray(Pt3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(intersect_horizontal_plane(&r, 0.0).is_none());
        assert!(intersect_plane(&r, &Pt3::origin(), &Vec3::y()).is_none());
    }

    #[test]
    fn general_plane_intersection() {
        let r = ray(Pt3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = intersect_plane(&r, &Pt3::new(2.0, 7.0, 7.0), &Vec3::x()).unwrap();
        assert!((hit - Pt3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
        assert!(intersect_plane(&r, &Pt3::origin(), &Vec3::y()).is_none());
    }

    #[test]
    fn slope_validation() {
        assert!(InfinitePlaneOptions::default().validate().is_ok());
        let bad = InfinitePlaneOptions {
            min_downward_slope: 1.5,
        };
        assert_eq!(bad.validate(), Err(HitTestError::InvalidSlope(1.5)));
    }
}
