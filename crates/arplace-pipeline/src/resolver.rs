//! Tiered world-position resolution.
//!
//! Given a screen point, the resolver tries progressively weaker sources of
//! 3D information and returns the first confident one:
//!
//! 1. detected surface anchors, within their extents;
//! 2. high-quality feature points inside a narrow cone (remembered only);
//! 3. an infinite horizontal plane through the previous object position;
//! 4. the remembered feature hit from tier 2;
//! 5. the feature point closest to the ray, regardless of quality.
//!
//! Only tiers 1 and 3 report `hit_surface = true`.

use arplace_core::{
    AnchorId, Camera, DistortionModel, IntrinsicsModel, ProjectionModel, Pt2, Pt3, Ray3, Real,
    SurfaceAnchor, TrackingFrame,
};
use arplace_hittest::{
    hit_test_anchors, hit_test_closest_feature, hit_test_features,
    hit_test_infinite_horizontal_plane,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;

/// Which tier produced a resolved position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitSource {
    ExistingPlane,
    HighQualityFeature,
    InfinitePlane,
    UnfilteredFeature,
}

/// Outcome of a resolution.
///
/// `surface` is a weak reference: resolve it against a live frame with
/// [`ResolutionResult::surface_anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub position: Option<Pt3>,
    pub surface: Option<AnchorId>,
    /// Whether the position lies on a real or assumed surface.
    pub hit_surface: bool,
    pub source: Option<HitSource>,
}

impl ResolutionResult {
    /// Nothing resolved.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
    }

    /// The hit anchor, if it is still part of `frame`.
    pub fn surface_anchor<'a>(&self, frame: &'a TrackingFrame) -> Option<&'a SurfaceAnchor> {
        self.surface.and_then(|id| frame.anchor(id))
    }

    fn hit(position: Pt3, surface: Option<AnchorId>, hit_surface: bool, source: HitSource) -> Self {
        Self {
            position: Some(position),
            surface,
            hit_surface,
            source: Some(source),
        }
    }
}

/// A single resolution request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveRequest {
    pub screen_point: Pt2,
    /// Height reference for the infinite plane; the world origin if `None`.
    pub previous_object_position: Option<Pt3>,
    /// Whether this caller wants the infinite plane ahead of feature hits.
    pub allow_infinite_plane: bool,
}

impl ResolveRequest {
    pub fn at(screen_point: Pt2) -> Self {
        Self {
            screen_point,
            previous_object_position: None,
            allow_infinite_plane: false,
        }
    }

    pub fn with_previous_position(mut self, position: Option<Pt3>) -> Self {
        self.previous_object_position = position;
        self
    }

    pub fn allow_infinite_plane(mut self, allow: bool) -> Self {
        self.allow_infinite_plane = allow;
        self
    }
}

/// Stateless tiered resolver.
#[derive(Debug, Clone, Default)]
pub struct WorldPositionResolver {
    config: ResolverConfig,
}

impl WorldPositionResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn set_drag_on_infinite_planes(&mut self, enabled: bool) {
        self.config.drag_on_infinite_planes = enabled;
    }

    /// Resolve the world position under `request.screen_point`.
    ///
    /// A frame without an observer pose, or a screen point the camera cannot
    /// backproject, resolves to the empty result.
    pub fn resolve<P, D, K>(
        &self,
        frame: &TrackingFrame,
        camera: &Camera<Real, P, D, K>,
        request: &ResolveRequest,
    ) -> ResolutionResult
    where
        P: ProjectionModel<Real>,
        D: DistortionModel<Real>,
        K: IntrinsicsModel<Real>,
    {
        let Some(pose) = frame.camera else {
            debug!("resolve skipped: no observer pose");
            return ResolutionResult::empty();
        };
        let Some(ray) = pose.ray_through_pixel(camera, &request.screen_point) else {
            debug!("resolve skipped: {:?} does not backproject", request.screen_point);
            return ResolutionResult::empty();
        };
        self.resolve_ray(frame, &ray, request)
    }

    /// Resolve along an explicit world-space ray.
    pub fn resolve_ray(
        &self,
        frame: &TrackingFrame,
        ray: &Ray3,
        request: &ResolveRequest,
    ) -> ResolutionResult {
        if let Some(hit) = hit_test_anchors(ray, &frame.anchors).first() {
            trace!("tier 1: {} at {:?}", hit.anchor, hit.position);
            return ResolutionResult::hit(
                hit.position,
                Some(hit.anchor),
                true,
                HitSource::ExistingPlane,
            );
        }

        let feature = hit_test_features(ray, &frame.features, &self.config.feature_query)
            .first()
            .map(|h| h.position);

        let prefer_plane = request.allow_infinite_plane && self.config.drag_on_infinite_planes;
        if prefer_plane || feature.is_none() {
            let on_plane = request.previous_object_position.unwrap_or_else(Pt3::origin);
            if let Some(p) =
                hit_test_infinite_horizontal_plane(ray, &on_plane, &self.config.infinite_plane)
            {
                trace!("tier 3: infinite plane y={} at {:?}", on_plane.y, p);
                return ResolutionResult::hit(p, None, true, HitSource::InfinitePlane);
            }
        }

        if let Some(p) = feature {
            trace!("tier 4: high-quality feature at {:?}", p);
            return ResolutionResult::hit(p, None, false, HitSource::HighQualityFeature);
        }

        match hit_test_closest_feature(ray, &frame.features) {
            Some(hit) => {
                trace!("tier 5: unfiltered feature {}", hit.feature_id);
                ResolutionResult::hit(hit.position, None, false, HitSource::UnfilteredFeature)
            }
            None => {
                debug!("resolve: nothing hit");
                ResolutionResult::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arplace_core::{
        FeaturePoint, FeatureQuality, Vec2, Vec3, Viewport, synthetic::scene,
    };

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    fn centre_request() -> ResolveRequest {
        ResolveRequest::at(viewport().center())
    }

    #[test]
    fn anchor_hit_wins_over_features() {
        let camera = scene::camera_for_viewport(&viewport(), 1000.0);
        let pose = scene::look_at(Pt3::new(0.0, 1.5, 1.5), Pt3::origin());
        let anchor = scene::floor_anchor(AnchorId(1), Pt3::origin(), Vec2::new(1.0, 1.0));
        // High-quality feature right on the line of sight, in front of the anchor.
        let feature = FeaturePoint::new(9, Pt3::new(0.0, 0.75, 0.75), FeatureQuality::High);
        let frame = scene::frame(0.0, pose, vec![anchor], vec![feature]);

        let res = WorldPositionResolver::default().resolve(&frame, &camera, &centre_request());
        let p = res.position.unwrap();
        assert!(p.coords.norm() < 1e-9);
        assert!(res.hit_surface);
        assert_eq!(res.surface, Some(AnchorId(1)));
        assert_eq!(res.source, Some(HitSource::ExistingPlane));
        assert_eq!(res.surface_anchor(&frame).map(|a| a.id), Some(AnchorId(1)));
    }

    #[test]
    fn feature_hit_when_no_anchor() {
        let camera = scene::camera_for_viewport(&viewport(), 1000.0);
        let pose = scene::look_at(Pt3::new(0.0, 1.0, 0.0), Pt3::new(0.0, 1.0, -2.0));
        let feature = FeaturePoint::new(1, Pt3::new(0.0, 1.0, -2.0), FeatureQuality::High);
        let frame = scene::frame(0.0, pose, vec![], vec![feature]);

        let res = WorldPositionResolver::default().resolve(&frame, &camera, &centre_request());
        assert!((res.position.unwrap() - Pt3::new(0.0, 1.0, -2.0)).norm() < 1e-9);
        assert!(!res.hit_surface);
        assert_eq!(res.surface, None);
        assert_eq!(res.source, Some(HitSource::HighQualityFeature));
    }

    #[test]
    fn infinite_plane_preferred_only_when_enabled_and_allowed() {
        let origin = Pt3::new(0.0, 1.5, 0.0);
        let ray = Ray3::new(origin, Vec3::new(0.0, -1.0, -1.0)).unwrap();
        let feature = FeaturePoint::new(1, ray.at(1.0), FeatureQuality::High);
        let frame = scene::frame(
            0.0,
            scene::look_at(origin, origin + ray.dir),
            vec![],
            vec![feature],
        );

        let mut resolver = WorldPositionResolver::default();
        let allowed = centre_request().allow_infinite_plane(true);

        // Toggle off: feature wins even if the caller allows the plane.
        let res = resolver.resolve_ray(&frame, &ray, &allowed);
        assert_eq!(res.source, Some(HitSource::HighQualityFeature));

        resolver.set_drag_on_infinite_planes(true);
        let res = resolver.resolve_ray(&frame, &ray, &allowed);
        assert_eq!(res.source, Some(HitSource::InfinitePlane));
        assert!(res.hit_surface);
        assert_eq!(res.surface, None);
        assert!((res.position.unwrap() - Pt3::new(0.0, 0.0, -1.5)).norm() < 1e-9);

        // Toggle on but not requested: feature again.
        let res = resolver.resolve_ray(&frame, &ray, &centre_request());
        assert_eq!(res.source, Some(HitSource::HighQualityFeature));
    }

    #[test]
    fn infinite_plane_uses_previous_position_height() {
        let ray = Ray3::new(Pt3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, -1.0)).unwrap();
        let frame = TrackingFrame::default();
        let req = centre_request().with_previous_position(Some(Pt3::new(3.0, 0.5, 3.0)));

        let res = WorldPositionResolver::default().resolve_ray(&frame, &ray, &req);
        assert_eq!(res.source, Some(HitSource::InfinitePlane));
        assert!((res.position.unwrap() - Pt3::new(0.0, 0.5, -1.5)).norm() < 1e-9);
    }

    #[test]
    fn unfiltered_feature_is_last_resort() {
        // Looking level: the infinite plane is rejected, the only feature is
        // raw quality and far outside the cone.
        let ray = Ray3::new(Pt3::new(0.0, 1.0, 0.0), -Vec3::z()).unwrap();
        let feature = FeaturePoint::new(4, Pt3::new(3.0, 1.0, -3.0), FeatureQuality::Raw);
        let frame = TrackingFrame {
            features: vec![feature],
            ..TrackingFrame::default()
        };

        let res = WorldPositionResolver::default().resolve_ray(&frame, &ray, &centre_request());
        assert_eq!(res.source, Some(HitSource::UnfilteredFeature));
        assert!(!res.hit_surface);
        assert!((res.position.unwrap() - Pt3::new(0.0, 1.0, -3.0)).norm() < 1e-9);
    }

    #[test]
    fn nothing_to_hit_is_empty() {
        let ray = Ray3::new(Pt3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -1.0)).unwrap();
        let res = WorldPositionResolver::default().resolve_ray(
            &TrackingFrame::default(),
            &ray,
            &centre_request(),
        );
        assert!(res.is_empty());
        assert_eq!(res, ResolutionResult::empty());
    }

    #[test]
    fn missing_pose_is_empty() {
        let camera = scene::camera_for_viewport(&viewport(), 1000.0);
        let mut frame = TrackingFrame::default();
        frame.anchors.push(scene::floor_anchor(
            AnchorId(1),
            Pt3::origin(),
            Vec2::new(100.0, 100.0),
        ));
        let res = WorldPositionResolver::default().resolve(&frame, &camera, &centre_request());
        assert!(res.is_empty());
    }

    #[test]
    fn removed_anchor_reference_resolves_to_none() {
        let camera = scene::camera_for_viewport(&viewport(), 1000.0);
        let pose = scene::look_at(Pt3::new(0.0, 1.5, 1.5), Pt3::origin());
        let anchor = scene::floor_anchor(AnchorId(5), Pt3::origin(), Vec2::new(1.0, 1.0));
        let mut frame = scene::frame(0.0, pose, vec![anchor], vec![]);

        let res = WorldPositionResolver::default().resolve(&frame, &camera, &centre_request());
        assert_eq!(res.surface, Some(AnchorId(5)));
        frame.anchors.clear();
        assert!(res.surface_anchor(&frame).is_none());
    }
}
