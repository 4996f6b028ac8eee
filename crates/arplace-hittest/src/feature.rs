//! Probes against the tracked feature-point cloud.

use arplace_core::{FeatureQuality, FeaturePoint, Pt3, Ray3, Real};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::HitTestError;

/// Parameters of the constrained feature probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureQuery {
    /// Half-angle (degrees) of the cone around the ray that features must lie in.
    pub cone_half_angle_deg: Real,
    /// Closest accepted distance from the ray origin.
    pub min_distance: Real,
    /// Farthest accepted distance from the ray origin.
    pub max_distance: Real,
    /// Features below this quality are ignored.
    pub min_quality: FeatureQuality,
    pub max_results: usize,
}

impl Default for FeatureQuery {
    fn default() -> Self {
        Self {
            cone_half_angle_deg: 18.0,
            min_distance: 0.1,
            max_distance: 20.0,
            min_quality: FeatureQuality::High,
            max_results: 1,
        }
    }
}

impl FeatureQuery {
    pub fn validate(&self) -> Result<(), HitTestError> {
        let a = self.cone_half_angle_deg;
        if !a.is_finite() || a <= 0.0 || a > 180.0 {
            return Err(HitTestError::InvalidConeAngle(a));
        }
        let (min, max) = (self.min_distance, self.max_distance);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(HitTestError::InvalidDistanceRange { min, max });
        }
        if self.max_results == 0 {
            return Err(HitTestError::ZeroMaxResults);
        }
        Ok(())
    }
}

/// A feature-cloud hit.
///
/// `position` is the feature projected onto the ray, so it always lies on the
/// ray; `feature` is the tracked point itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureHit {
    pub position: Pt3,
    pub distance_to_ray_origin: Real,
    pub feature: Pt3,
    pub feature_id: u64,
    pub feature_distance_to_ray: Real,
}

impl FeatureHit {
    fn project(ray: &Ray3, f: &FeaturePoint) -> Self {
        let t = ray.project_distance(&f.position);
        let position = ray.at(t);
        Self {
            position,
            distance_to_ray_origin: t,
            feature: f.position,
            feature_id: f.id,
            feature_distance_to_ray: (f.position - position).norm(),
        }
    }
}

/// Constrained probe: features inside a cone around the ray, within a
/// distance band, at or above the requested quality.
///
/// Hits are ordered by distance from the ray origin and capped at
/// `query.max_results`. The query is assumed valid (see
/// [`FeatureQuery::validate`]).
pub fn hit_test_features<'a>(
    ray: &Ray3,
    features: impl IntoIterator<Item = &'a FeaturePoint>,
    query: &FeatureQuery,
) -> Vec<FeatureHit> {
    let max_angle = query.cone_half_angle_deg.to_radians();
    let mut hits: Vec<FeatureHit> = features
        .into_iter()
        .filter(|f| f.quality >= query.min_quality)
        .filter_map(|f| {
            let hit = FeatureHit::project(ray, f);
            let d = hit.distance_to_ray_origin;
            if d < query.min_distance || d > query.max_distance {
                return None;
            }
            let to_feature = f.position - ray.origin;
            let angle = ray.dir.angle(&to_feature);
            (angle <= max_angle).then_some(hit)
        })
        .collect();
    hits.sort_by(|a, b| a.distance_to_ray_origin.total_cmp(&b.distance_to_ray_origin));
    hits.truncate(query.max_results);
    trace!("feature probe: {} hit(s)", hits.len());
    hits
}

/// Unfiltered probe: the feature closest to the ray's supporting line.
///
/// Quality, distance and direction are ignored, so the hit may lie behind
/// the ray origin.
pub fn hit_test_closest_feature<'a>(
    ray: &Ray3,
    features: impl IntoIterator<Item = &'a FeaturePoint>,
) -> Option<FeatureHit> {
    features
        .into_iter()
        .map(|f| FeatureHit::project(ray, f))
        .min_by(|a, b| a.feature_distance_to_ray.total_cmp(&b.feature_distance_to_ray))
}
