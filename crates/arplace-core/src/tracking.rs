//! Tracking data consumed from an external AR session.
//!
//! Everything here is produced by the tracking subsystem (visual-inertial
//! odometry, plane detection) and is read-only to the placement logic. A
//! [`TrackingFrame`] is a per-frame snapshot; nothing in it should be assumed
//! to survive into the next frame.

use nalgebra::Translation3;
use serde::{Deserialize, Serialize};

use crate::{
    Camera, DistortionModel, IntrinsicsModel, Iso3, ProjectionModel, Pt2, Pt3, Ray3, Real,
    UnitQuat, Vec2, Vec3,
};

/// Observer (camera) pose in world space.
///
/// The camera looks along its local −Z axis with +Y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub world_from_camera: Iso3,
}

impl Pose {
    pub fn new(world_from_camera: Iso3) -> Self {
        Self { world_from_camera }
    }

    /// Pose at `position` with the given orientation.
    pub fn from_parts(position: Pt3, rotation: UnitQuat) -> Self {
        Self::new(Iso3::from_parts(
            Translation3::from(position.coords),
            rotation,
        ))
    }

    /// Camera centre in world coordinates.
    pub fn position(&self) -> Pt3 {
        Pt3::from(self.world_from_camera.translation.vector)
    }

    pub fn rotation(&self) -> UnitQuat {
        self.world_from_camera.rotation
    }

    /// Viewing direction (local −Z) in world coordinates.
    pub fn forward(&self) -> Vec3 {
        self.world_from_camera.rotation * -Vec3::z()
    }

    /// Local +Y in world coordinates.
    pub fn up(&self) -> Vec3 {
        self.world_from_camera.rotation * Vec3::y()
    }

    /// World-space ray from the camera centre through a screen pixel.
    ///
    /// The pixel is backprojected with `camera` (computer-vision frame), then
    /// flipped into the graphics frame (Y up, −Z forward) and rotated into
    /// world space. `None` when the pixel cannot be backprojected, e.g. outside
    /// the region where the lens model is invertible.
    pub fn ray_through_pixel<P, D, K>(
        &self,
        camera: &Camera<Real, P, D, K>,
        px: &Pt2,
    ) -> Option<Ray3>
    where
        P: ProjectionModel<Real>,
        D: DistortionModel<Real>,
        K: IntrinsicsModel<Real>,
    {
        let d_cv = camera.backproject_pixel(px)?;
        let d_cam = Vec3::new(d_cv.x, -d_cv.y, -d_cv.z);
        Ray3::new(self.position(), self.world_from_camera.rotation * d_cam)
    }
}

/// Stable identifier of a [`SurfaceAnchor`] within a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnchorId({})", self.0)
    }
}

/// A detected planar region.
///
/// The plane is the anchor-local `y = 0` plane. Its bounded region is the
/// rectangle centred at `center` spanning `extent.x` along local X and
/// `extent.y` along local Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceAnchor {
    pub id: AnchorId,
    pub world_from_anchor: Iso3,
    /// Centre of the detected extent in anchor coordinates.
    pub center: Vec3,
    /// Width (local X) and depth (local Z) of the detected extent.
    pub extent: Vec2,
}

impl SurfaceAnchor {
    /// Horizontal anchor at `origin` with its extent centred on the origin.
    pub fn horizontal(id: AnchorId, origin: Pt3, extent: Vec2) -> Self {
        Self {
            id,
            world_from_anchor: Iso3::translation(origin.x, origin.y, origin.z),
            center: Vec3::zeros(),
            extent,
        }
    }

    /// Plane normal (local +Y) in world coordinates.
    pub fn normal(&self) -> Vec3 {
        self.world_from_anchor.rotation * Vec3::y()
    }

    /// Anchor origin in world coordinates.
    pub fn origin(&self) -> Pt3 {
        Pt3::from(self.world_from_anchor.translation.vector)
    }

    /// Whether an anchor-local point lies within the detected extent.
    ///
    /// Only the in-plane coordinates (X, Z) are checked.
    pub fn contains_local(&self, p_local: &Pt3) -> bool {
        const EPS: Real = 1e-9;
        let dx = (p_local.x - self.center.x).abs();
        let dz = (p_local.z - self.center.z).abs();
        dx <= 0.5 * self.extent.x + EPS && dz <= 0.5 * self.extent.y + EPS
    }
}

/// Confidence class of a tracked feature point.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FeatureQuality {
    /// Raw, unfiltered detection.
    #[default]
    Raw,
    /// Tracked consistently across frames.
    High,
}

/// A single tracked 3D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeaturePoint {
    pub id: u64,
    pub position: Pt3,
    #[serde(default)]
    pub quality: FeatureQuality,
}

impl FeaturePoint {
    pub fn new(id: u64, position: Pt3, quality: FeatureQuality) -> Self {
        Self {
            id,
            position,
            quality,
        }
    }
}

/// Per-frame snapshot delivered by the tracking subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingFrame {
    /// Capture time in seconds.
    #[serde(default)]
    pub timestamp: Real,
    /// Observer pose; `None` while tracking is unavailable.
    #[serde(default)]
    pub camera: Option<Pose>,
    #[serde(default)]
    pub anchors: Vec<SurfaceAnchor>,
    #[serde(default)]
    pub features: Vec<FeaturePoint>,
}

impl TrackingFrame {
    /// Whether the frame carries an observer pose.
    pub fn has_tracking(&self) -> bool {
        self.camera.is_some()
    }

    /// Look up a live anchor by id.
    ///
    /// Returns `None` once the tracking subsystem has removed the anchor.
    pub fn anchor(&self, id: AnchorId) -> Option<&SurfaceAnchor> {
        self.anchors.iter().find(|a| a.id == id)
    }
}

/// Screen (view) size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: Real,
    pub height: Real,
}

impl Viewport {
    pub fn new(width: Real, height: Real) -> Self {
        Self { width, height }
    }

    /// Centre of the view, the default screen anchor for the reticle.
    pub fn center(&self) -> Pt2 {
        Pt2::new(0.5 * self.width, 0.5 * self.height)
    }
}
