use anyhow::{Result, ensure};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::{BrownConrady5, Camera, DistortionModel, FxFyCxCySkew, Pinhole};
use crate::Real;

/// Lens model selected at runtime from configuration.
///
/// Serialized with a `model` tag, e.g. `{"model": "none"}` or
/// `{"model": "brown_conrady5", "k1": -0.1, ...}`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LensDistortion {
    /// Rectified frames, which is what AR sessions usually deliver.
    #[default]
    None,
    BrownConrady5(BrownConrady5<Real>),
}

impl DistortionModel<Real> for LensDistortion {
    fn distort(&self, n: &Vector2<Real>) -> Vector2<Real> {
        match self {
            Self::None => *n,
            Self::BrownConrady5(bc) => bc.distort(n),
        }
    }

    fn undistort(&self, n_dist: &Vector2<Real>) -> Option<Vector2<Real>> {
        match self {
            Self::None => Some(*n_dist),
            Self::BrownConrady5(bc) => bc.undistort(n_dist),
        }
    }
}

/// Screen camera as delivered alongside a recorded session.
///
/// The projection is always pinhole; only the lens model varies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraParams {
    pub intrinsics: FxFyCxCySkew<Real>,
    #[serde(default)]
    pub distortion: LensDistortion,
}

/// Camera type used by the placement pipeline.
pub type CameraModel = Camera<Real, Pinhole, LensDistortion, FxFyCxCySkew<Real>>;

impl CameraParams {
    /// Rectified pinhole camera with intrinsics `k`.
    pub fn pinhole(k: FxFyCxCySkew<Real>) -> Self {
        Self {
            intrinsics: k,
            distortion: LensDistortion::None,
        }
    }

    /// Reject intrinsics that cannot be inverted and non-finite lens terms.
    pub fn validate(&self) -> Result<()> {
        let k = &self.intrinsics;
        for (name, f) in [("fx", k.fx), ("fy", k.fy)] {
            ensure!(f.is_finite() && f > 0.0, "{name} must be positive, got {f}");
        }
        ensure!(
            [k.cx, k.cy, k.skew].iter().all(|v| v.is_finite()),
            "principal point and skew must be finite"
        );
        if let LensDistortion::BrownConrady5(bc) = &self.distortion {
            ensure!(
                [bc.k1, bc.k2, bc.k3, bc.p1, bc.p2].iter().all(|v| v.is_finite()),
                "distortion coefficients must be finite"
            );
        }
        Ok(())
    }

    pub fn build(&self) -> CameraModel {
        Camera::new(Pinhole, self.distortion, self.intrinsics)
    }
}
