//! Hit tests against detected surface anchors, limited to their extents.

use arplace_core::{AnchorId, Pt3, Ray3, Real, SurfaceAnchor};
use log::trace;

use crate::plane::intersect_plane;

/// A ray hit on a surface anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    /// Anchor that was hit.
    pub anchor: AnchorId,
    /// Hit position in world coordinates.
    pub position: Pt3,
    /// Hit position in anchor coordinates.
    pub local: Pt3,
    /// Distance from the ray origin.
    pub distance: Real,
}

/// Hit test a single anchor, honouring its bounded extent.
///
/// The anchor plane is treated as two-sided. Hits behind the ray origin,
/// outside the detected extent, or from rays parallel to the plane are
/// rejected.
pub fn hit_test_anchor(ray: &Ray3, anchor: &SurfaceAnchor) -> Option<PlaneHit> {
    let position = intersect_plane(ray, &anchor.origin(), &anchor.normal())?;
    let local = anchor.world_from_anchor.inverse_transform_point(&position);
    if !anchor.contains_local(&local) {
        trace!("{}: hit outside extent at {:?}", anchor.id, local);
        return None;
    }
    Some(PlaneHit {
        anchor: anchor.id,
        position,
        local,
        distance: (position - ray.origin).norm(),
    })
}

/// Hit test all anchors; hits are sorted by distance from the ray origin.
pub fn hit_test_anchors<'a>(
    ray: &Ray3,
    anchors: impl IntoIterator<Item = &'a SurfaceAnchor>,
) -> Vec<PlaneHit> {
    let mut hits: Vec<PlaneHit> = anchors
        .into_iter()
        .filter_map(|anchor| hit_test_anchor(ray, anchor))
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
