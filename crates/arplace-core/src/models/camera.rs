use nalgebra::{Point2, RealField, Vector3};
use serde::{Deserialize, Serialize};

use super::{DistortionModel, IntrinsicsModel, ProjectionModel};

/// Screen camera assembled from a projection, a lens and intrinsics.
///
/// Works in the computer-vision camera frame (+Z forward, +Y down).
/// [`crate::Pose::ray_through_pixel`] converts to the tracking frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Camera<S, P, D, K>
where
    S: RealField + Copy,
    P: ProjectionModel<S>,
    D: DistortionModel<S>,
    K: IntrinsicsModel<S>,
{
    pub projection: P,
    pub lens: D,
    pub intrinsics: K,
    #[serde(skip)]
    _scalar: core::marker::PhantomData<S>,
}

impl<S, P, D, K> Camera<S, P, D, K>
where
    S: RealField + Copy,
    P: ProjectionModel<S>,
    D: DistortionModel<S>,
    K: IntrinsicsModel<S>,
{
    pub fn new(projection: P, lens: D, intrinsics: K) -> Self {
        Self {
            projection,
            lens,
            intrinsics,
            _scalar: core::marker::PhantomData,
        }
    }

    /// Pixel at which a camera-frame point is imaged.
    ///
    /// `None` for points on or behind the image plane.
    pub fn project_to_pixel(&self, p_c: &Vector3<S>) -> Option<Point2<S>> {
        if p_c.z <= S::zero() {
            return None;
        }
        let ideal = self.projection.project_dir(p_c)?;
        Some(self.intrinsics.normalized_to_pixel(&self.lens.distort(&ideal)))
    }

    /// Point on the `z = 1` plane that images at `px`.
    ///
    /// `None` when the lens model cannot be inverted at `px`.
    pub fn backproject_pixel(&self, px: &Point2<S>) -> Option<Vector3<S>> {
        let observed = self.intrinsics.pixel_to_normalized(px);
        let dir = self.projection.unproject_dir(&self.lens.undistort(&observed)?);
        Some(dir / dir.z)
    }
}
