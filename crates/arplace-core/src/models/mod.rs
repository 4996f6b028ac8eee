//! Screen camera models.
//!
//! A pixel is produced from a camera-frame direction in three steps, each
//! behind its own trait so they can be swapped independently:
//! [`ProjectionModel`] onto the `z = 1` plane, [`DistortionModel`] on that
//! plane, then [`IntrinsicsModel`] into pixels. [`Camera`] composes them.
//!
//! [`CameraParams`] is the JSON form read from session recordings and builds
//! the [`CameraModel`] used by the placement pipeline.

mod camera;
mod distortion;
mod intrinsics;
mod params;
mod projection;

pub use camera::*;
pub use distortion::*;
pub use intrinsics::*;
pub use params::*;
pub use projection::*;

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn wide_k() -> FxFyCxCySkew<f64> {
        FxFyCxCySkew {
            fx: 800.0,
            fy: 810.0,
            cx: 640.0,
            cy: 360.0,
            skew: 0.0,
        }
    }

    fn reprojection_error(cam: &CameraModel, px: Point2<f64>, depth: f64) -> f64 {
        let on_plane = cam.backproject_pixel(&px).expect("pixel backprojects");
        let back = cam
            .project_to_pixel(&(on_plane * depth))
            .expect("backprojected point is in front");
        (back - px).norm()
    }

    #[test]
    fn rectified_camera_reprojects_exactly() {
        let cam = CameraParams::pinhole(wide_k()).build();
        for px in [Point2::new(1000.0, 200.0), Point2::new(0.0, 719.0)] {
            assert!(reprojection_error(&cam, px, 2.5) < 1e-9);
        }
    }

    #[test]
    fn distorted_camera_reprojects_within_tolerance() {
        let params = CameraParams {
            intrinsics: wide_k(),
            distortion: LensDistortion::BrownConrady5(BrownConrady5 {
                k1: -0.1,
                k2: 0.02,
                k3: 0.0,
                p1: 0.0005,
                p2: -0.0005,
                iters: 12,
            }),
        };
        let cam = params.build();
        let err = reprojection_error(&cam, Point2::new(900.0, 500.0), 3.0);
        assert!(err < 1e-6, "err={err}");
    }

    #[test]
    fn distortion_defaults_to_none_when_omitted() {
        let json = r#"{"intrinsics": {"fx": 500.0, "fy": 500.0, "cx": 320.0, "cy": 240.0, "skew": 0.0}}"#;
        let params: CameraParams = serde_json::from_str(json).unwrap();
        assert!(matches!(params.distortion, LensDistortion::None));
        assert!(params.validate().is_ok());

        let tagged = serde_json::to_string(&CameraParams {
            distortion: LensDistortion::BrownConrady5(BrownConrady5::default()),
            ..params
        })
        .unwrap();
        assert!(tagged.contains(r#""model":"brown_conrady5""#));
    }

    #[test]
    fn validate_rejects_degenerate_intrinsics() {
        let mut params = CameraParams::pinhole(wide_k());
        params.intrinsics.fx = 0.0;
        assert!(params.validate().is_err());

        let mut params = CameraParams::pinhole(wide_k());
        params.intrinsics.cy = f64::NAN;
        assert!(params.validate().is_err());

        let mut params = CameraParams::pinhole(wide_k());
        params.distortion = LensDistortion::BrownConrady5(BrownConrady5 {
            k1: f64::INFINITY,
            ..BrownConrady5::default()
        });
        assert!(params.validate().is_err());
    }
}
