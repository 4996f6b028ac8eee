use nalgebra::{RealField, Vector2};
use serde::{Deserialize, Serialize};

/// Lens distortion on the normalized image plane.
pub trait DistortionModel<S: RealField + Copy> {
    fn distort(&self, n: &Vector2<S>) -> Vector2<S>;
    /// `None` where the inverse cannot be recovered.
    fn undistort(&self, n_dist: &Vector2<S>) -> Option<Vector2<S>>;
}

/// Brown–Conrady model: radial terms `k1..k3`, tangential terms `p1, p2`.
///
/// There is no closed-form inverse; [`DistortionModel::undistort`] runs a
/// fixed-point iteration seeded with the distorted point and gives up when it
/// has not converged within `iters` steps. Strong distortion makes the
/// iteration diverge towards the image corners.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BrownConrady5<S: RealField> {
    pub k1: S,
    pub k2: S,
    pub k3: S,
    pub p1: S,
    pub p2: S,
    /// Upper bound on undistortion iterations; 0 selects 8.
    pub iters: u32,
}

impl<S: RealField + Copy> BrownConrady5<S> {
    fn radial_gain(&self, r2: S) -> S {
        S::one() + r2 * (self.k1 + r2 * (self.k2 + r2 * self.k3))
    }

    fn tangential_shift(&self, n: &Vector2<S>, r2: S) -> Vector2<S> {
        let two = S::one() + S::one();
        let cross = two * n.x * n.y;
        Vector2::new(
            self.p1 * cross + self.p2 * (r2 + two * n.x * n.x),
            self.p1 * (r2 + two * n.y * n.y) + self.p2 * cross,
        )
    }

    fn max_iters(&self) -> u32 {
        if self.iters == 0 { 8 } else { self.iters }
    }
}

impl<S: RealField + Copy> DistortionModel<S> for BrownConrady5<S> {
    fn distort(&self, n: &Vector2<S>) -> Vector2<S> {
        let r2 = n.norm_squared();
        n * self.radial_gain(r2) + self.tangential_shift(n, r2)
    }

    fn undistort(&self, n_dist: &Vector2<S>) -> Option<Vector2<S>> {
        let tol: S = nalgebra::convert(1e-14);
        let accept: S = nalgebra::convert(1e-9);
        let mut n = *n_dist;
        for _ in 0..self.max_iters() {
            let residual = self.distort(&n) - n_dist;
            n -= residual;
            if residual.norm_squared() <= tol * tol {
                break;
            }
        }
        // NaN fails the comparison as well.
        let residual = (self.distort(&n) - n_dist).norm();
        (residual <= accept).then_some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_coefficients_are_identity() {
        let d = BrownConrady5::<f64>::default();
        let n = Vector2::new(0.3, -0.2);
        assert_eq!(d.distort(&n), n);
        assert_eq!(d.undistort(&n), Some(n));
    }

    #[test]
    fn undistort_inverts_mild_distortion() {
        let d = BrownConrady5 {
            k1: -0.12,
            k2: 0.03,
            k3: 0.0,
            p1: 0.001,
            p2: -0.0008,
            iters: 20,
        };
        let n = Vector2::new(0.4, 0.25);
        let back = d.undistort(&d.distort(&n)).unwrap();
        assert!((back - n).norm() < 1e-9);
    }

    #[test]
    fn diverging_undistortion_is_rejected() {
        let d = BrownConrady5 {
            k1: 1.0,
            ..BrownConrady5::default()
        };
        // Image corner of a wide 400 px focal camera.
        assert!(d.undistort(&Vector2::new(1.6, -0.9)).is_none());
        assert!(d.undistort(&Vector2::new(0.05, 0.02)).is_some());
    }
}
