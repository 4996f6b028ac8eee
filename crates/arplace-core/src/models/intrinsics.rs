use nalgebra::{Point2, RealField, Vector2};
use serde::{Deserialize, Serialize};

/// Affine map between the normalized image plane and screen pixels.
pub trait IntrinsicsModel<S: RealField + Copy> {
    fn normalized_to_pixel(&self, n: &Vector2<S>) -> Point2<S>;
    fn pixel_to_normalized(&self, px: &Point2<S>) -> Vector2<S>;
}

/// Focal lengths, principal point and skew, all in pixels.
///
/// For AR frames the principal point sits close to the viewport centre.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FxFyCxCySkew<S: RealField + Copy> {
    pub fx: S,
    pub fy: S,
    pub cx: S,
    pub cy: S,
    pub skew: S,
}

impl<S: RealField + Copy> FxFyCxCySkew<S> {
    pub fn principal_point(&self) -> Point2<S> {
        Point2::new(self.cx, self.cy)
    }
}

impl<S: RealField + Copy> IntrinsicsModel<S> for FxFyCxCySkew<S> {
    fn normalized_to_pixel(&self, n: &Vector2<S>) -> Point2<S> {
        let offset = Vector2::new(self.fx * n.x + self.skew * n.y, self.fy * n.y);
        self.principal_point() + offset
    }

    fn pixel_to_normalized(&self, px: &Point2<S>) -> Vector2<S> {
        let d = px - self.principal_point();
        let y = d.y / self.fy;
        Vector2::new((d.x - self.skew * y) / self.fx, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skewed_intrinsics_invert() {
        let k = FxFyCxCySkew {
            fx: 900.0,
            fy: 880.0,
            cx: 320.0,
            cy: 240.0,
            skew: 1.5,
        };
        let n = Vector2::new(0.12, -0.3);
        let px = k.normalized_to_pixel(&n);
        assert!((k.pixel_to_normalized(&px) - n).norm() < 1e-12);
        assert_eq!(k.pixel_to_normalized(&k.principal_point()), Vector2::zeros());
    }
}
