use nalgebra::{RealField, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Maps viewing directions (computer-vision camera frame) onto the normalized
/// image plane and back.
pub trait ProjectionModel<S: RealField + Copy> {
    /// `None` for directions that do not reach the image plane.
    fn project_dir(&self, dir_c: &Vector3<S>) -> Option<Vector2<S>>;
    /// Direction through a normalized image point; not necessarily unit length.
    fn unproject_dir(&self, n: &Vector2<S>) -> Vector3<S>;
}

/// Perspective projection onto `z = 1`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Pinhole;

impl<S: RealField + Copy> ProjectionModel<S> for Pinhole {
    fn project_dir(&self, dir_c: &Vector3<S>) -> Option<Vector2<S>> {
        let z = dir_c.z;
        (z > S::zero()).then(|| dir_c.xy() / z)
    }

    fn unproject_dir(&self, n: &Vector2<S>) -> Vector3<S> {
        n.push(S::one())
    }
}
