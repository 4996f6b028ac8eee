//! Synthetic observer poses, anchors and feature clouds.

use nalgebra::{Translation3, UnitQuaternion};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    AnchorId, CameraModel, CameraParams, FeaturePoint, FeatureQuality, FxFyCxCySkew, Iso3,
    Pose, Pt3, Real, SurfaceAnchor, TrackingFrame, Vec2, Vec3, Viewport,
};

/// Distortion-free pinhole camera with its principal point at the viewport centre.
pub fn camera_for_viewport(viewport: &Viewport, focal_px: Real) -> CameraModel {
    let c = viewport.center();
    CameraParams::pinhole(FxFyCxCySkew {
        fx: focal_px,
        fy: focal_px,
        cx: c.x,
        cy: c.y,
        skew: 0.0,
    })
    .build()
}

/// Observer at `eye` looking at `target` with world +Y as up.
///
/// Falls back to world −Z as up when looking straight up or down.
pub fn look_at(eye: Pt3, target: Pt3) -> Pose {
    let dir = (target - eye).normalize();
    let up = if dir.cross(&Vec3::y()).norm() < 1e-6 {
        -Vec3::z()
    } else {
        Vec3::y()
    };
    // `look_at_rh` builds camera_from_world with the camera looking along −Z.
    Pose::new(Iso3::look_at_rh(&eye, &target, &up).inverse())
}

/// Observer poses on a horizontal circle around `target`, all looking at it.
///
/// Yaw starts at `yaw_start_rad` (0 = on the +Z side of the target) and
/// advances by `yaw_step_rad` per pose.
pub fn orbit_poses(
    target: Pt3,
    radius: Real,
    height: Real,
    n_poses: usize,
    yaw_start_rad: Real,
    yaw_step_rad: Real,
) -> Vec<Pose> {
    (0..n_poses)
        .map(|idx| {
            let yaw = yaw_start_rad + yaw_step_rad * idx as Real;
            let offset = UnitQuaternion::from_scaled_axis(Vec3::y() * yaw) * Vec3::z() * radius;
            let eye = target + offset + Vec3::y() * height;
            look_at(eye, target)
        })
        .collect()
}

/// Horizontal anchor at `center` whose extent is `size` (width, depth).
pub fn floor_anchor(id: AnchorId, center: Pt3, size: Vec2) -> SurfaceAnchor {
    SurfaceAnchor::horizontal(id, center, size)
}

/// Anchor rotated about world +Y by `yaw` radians.
pub fn rotated_floor_anchor(id: AnchorId, center: Pt3, size: Vec2, yaw: Real) -> SurfaceAnchor {
    SurfaceAnchor {
        id,
        world_from_anchor: Iso3::from_parts(
            Translation3::from(center.coords),
            UnitQuaternion::from_scaled_axis(Vec3::y() * yaw),
        ),
        center: Vec3::zeros(),
        extent: size,
    }
}

/// Uniformly scattered feature points inside an axis-aligned box.
///
/// Ids are assigned sequentially starting at `first_id`.
pub fn scatter_features(
    seed: u64,
    count: usize,
    min: Pt3,
    max: Pt3,
    quality: FeatureQuality,
    first_id: u64,
) -> Vec<FeaturePoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sample = |lo: Real, hi: Real| {
        if hi > lo {
            rng.random_range(lo..hi)
        } else {
            lo
        }
    };
    (0..count)
        .map(|i| {
            let p = Pt3::new(
                sample(min.x, max.x),
                sample(min.y, max.y),
                sample(min.z, max.z),
            );
            FeaturePoint::new(first_id + i as u64, p, quality)
        })
        .collect()
}

/// Assemble a tracking frame with a valid observer pose.
pub fn frame(
    timestamp: Real,
    camera: Pose,
    anchors: Vec<SurfaceAnchor>,
    features: Vec<FeaturePoint>,
) -> TrackingFrame {
    TrackingFrame {
        timestamp,
        camera: Some(camera),
        anchors,
        features,
    }
}
