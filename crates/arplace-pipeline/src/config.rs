//! Serializable configuration for resolution, the reticle and placement.

use arplace_core::Real;
use arplace_hittest::{FeatureQuery, HitTestError, InfinitePlaneOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid pipeline configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("feature query: {0}")]
    FeatureQuery(#[source] HitTestError),
    #[error("infinite plane: {0}")]
    InfinitePlane(#[source] HitTestError),
    #[error("reticle smoothing window must be at least 1")]
    ZeroSmoothingWindow,
    #[error("max object distance must be positive and finite, got {0}")]
    InvalidMaxDistance(Real),
    #[error("distance history must hold at least 1 sample")]
    ZeroDistanceHistory,
    #[error("marker size must be positive and finite, got {0}")]
    InvalidMarkerSize(Real),
}

/// Configuration of [`WorldPositionResolver`](crate::WorldPositionResolver).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Constrained feature probe used as the second tier.
    pub feature_query: FeatureQuery,
    pub infinite_plane: InfinitePlaneOptions,
    /// Prefer the infinite plane over feature hits for requests that allow it.
    pub drag_on_infinite_planes: bool,
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.feature_query
            .validate()
            .map_err(ConfigError::FeatureQuery)?;
        self.infinite_plane
            .validate()
            .map_err(ConfigError::InfinitePlane)
    }
}

/// What the reticle does when a tracking update resolves nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReticleMissPolicy {
    /// Stay visible at the last resolved position.
    #[default]
    KeepLastPosition,
    /// Hide until the next successful resolution.
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReticleConfig {
    /// Number of recent positions averaged into the displayed position.
    pub smoothing_window: usize,
    pub miss_policy: ReticleMissPolicy,
}

impl Default for ReticleConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 8,
            miss_policy: ReticleMissPolicy::KeepLastPosition,
        }
    }
}

/// Top-level configuration of a [`PlacementController`](crate::PlacementController).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub resolver: ResolverConfig,
    pub reticle: ReticleConfig,
    /// Placed objects never end up farther than this from the observer.
    pub max_object_distance: Real,
    /// Number of recent drag distances used for distance filtering.
    pub distance_history: usize,
    /// Edge length of the square marker inserted for each placed object.
    pub marker_size: Real,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            reticle: ReticleConfig::default(),
            max_object_distance: 30.0,
            distance_history: 10,
            marker_size: 0.08,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.validate()?;
        if self.reticle.smoothing_window == 0 {
            return Err(ConfigError::ZeroSmoothingWindow);
        }
        let d = self.max_object_distance;
        if !d.is_finite() || d <= 0.0 {
            return Err(ConfigError::InvalidMaxDistance(d));
        }
        if self.distance_history == 0 {
            return Err(ConfigError::ZeroDistanceHistory);
        }
        let s = self.marker_size;
        if !s.is_finite() || s <= 0.0 {
            return Err(ConfigError::InvalidMarkerSize(s));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = PlacementConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_object_distance, 30.0);
        assert_eq!(cfg.reticle.smoothing_window, 8);
        assert!(!cfg.resolver.drag_on_infinite_planes);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: PlacementConfig = serde_json::from_str(
            r#"{ "max_object_distance": 5.0, "resolver": { "drag_on_infinite_planes": true } }"#,
        )
        .unwrap();
        assert_eq!(cfg.max_object_distance, 5.0);
        assert!(cfg.resolver.drag_on_infinite_planes);
        assert_eq!(cfg.resolver.feature_query, FeatureQuery::default());
        assert_eq!(cfg.reticle.miss_policy, ReticleMissPolicy::KeepLastPosition);
    }

    #[test]
    fn empty_nested_sections_take_defaults() {
        let cfg: PlacementConfig = serde_json::from_str(
            r#"{ "resolver": { "infinite_plane": {}, "feature_query": {} }, "reticle": {} }"#,
        )
        .unwrap();
        assert_eq!(cfg.resolver.infinite_plane, InfinitePlaneOptions::default());
        assert_eq!(cfg.resolver.feature_query, FeatureQuery::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut cfg = PlacementConfig {
            max_object_distance: -1.0,
            ..PlacementConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidMaxDistance(-1.0)));

        cfg = PlacementConfig::default();
        cfg.reticle.smoothing_window = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroSmoothingWindow));

        cfg = PlacementConfig::default();
        cfg.resolver.feature_query.max_results = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::FeatureQuery(HitTestError::ZeroMaxResults))
        );
    }
}
