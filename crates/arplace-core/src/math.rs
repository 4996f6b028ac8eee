use nalgebra::{Isometry3, Point2, Point3, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates (screen pixels).
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;
/// Unit quaternion rotation using [`Real`].
pub type UnitQuat = UnitQuaternion<Real>;

/// A half-line in world space.
///
/// `dir` is kept unit-length by [`Ray3::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray3 {
    pub origin: Pt3,
    pub dir: Vec3,
}

impl Ray3 {
    /// Build a ray, normalizing the direction.
    ///
    /// Returns `None` for a zero or non-finite direction.
    pub fn new(origin: Pt3, dir: Vec3) -> Option<Self> {
        let n = dir.norm();
        if !n.is_finite() || n <= Real::EPSILON {
            return None;
        }
        Some(Self {
            origin,
            dir: dir / n,
        })
    }

    /// Point at signed distance `t` along the ray.
    pub fn at(&self, t: Real) -> Pt3 {
        self.origin + self.dir * t
    }

    /// Signed distance along the ray of the orthogonal projection of `p`.
    pub fn project_distance(&self, p: &Pt3) -> Real {
        self.dir.dot(&(p - self.origin))
    }

    /// Perpendicular distance from `p` to the supporting line of the ray.
    pub fn distance_to_line(&self, p: &Pt3) -> Real {
        (p - self.origin).cross(&self.dir).norm()
    }
}

/// Limit the length of `v` to `max_len`, preserving its direction.
///
/// Vectors already shorter than `max_len` are returned unchanged.
pub fn clamp_length(v: &Vec3, max_len: Real) -> Vec3 {
    let len = v.norm();
    if len > max_len && len > 0.0 {
        v * (max_len / len)
    } else {
        *v
    }
}

/// Rescale `v` to length `len`. A zero vector stays zero.
pub fn with_length(v: &Vec3, len: Real) -> Vec3 {
    let n = v.norm();
    if n <= Real::EPSILON {
        return *v;
    }
    v * (len / n)
}

/// Arithmetic mean of a set of values, `None` when empty.
pub fn mean<'a>(values: impl IntoIterator<Item = &'a Real>) -> Option<Real> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as Real)
}

/// Centroid of a set of points, `None` when empty.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Pt3>) -> Option<Pt3> {
    let (sum, count) = points
        .into_iter()
        .fold((Vec3::zeros(), 0usize), |(s, c), p| (s + p.coords, c + 1));
    (count > 0).then(|| Pt3::from(sum / count as Real))
}

/// Wrap an angle (radians) into `(-π, π]`.
pub fn wrap_angle(a: Real) -> Real {
    let two_pi = std::f64::consts::TAU;
    let mut r = a.rem_euclid(two_pi);
    if r > std::f64::consts::PI {
        r -= two_pi;
    }
    r
}
