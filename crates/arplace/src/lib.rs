//! High-level entry crate for `arplace`.
//!
//! `arplace` decides where AR content goes. Given a fixed screen point and a
//! stream of tracking frames it resolves the best available world position
//! with a tiered hit-test strategy, drives a focus reticle that previews the
//! next placement, and places objects no farther than a configured distance
//! from the observer.
//!
//! ## Session API
//!
//! ```no_run
//! use arplace::prelude::*;
//! use arplace::core::synthetic::scene;
//!
//! # fn main() -> anyhow::Result<()> {
//! let viewport = Viewport::new(1280.0, 720.0);
//! let camera = scene::camera_for_viewport(&viewport, 1000.0);
//! let mut session =
//!     PlacementSession::new(PlacementConfig::default(), camera, &viewport, InMemoryScene::new())?;
//!
//! let pose = scene::look_at(Pt3::new(0.0, 1.5, 1.5), Pt3::origin());
//! let floor = scene::floor_anchor(AnchorId(1), Pt3::origin(), Vec2::new(2.0, 2.0));
//! if let Some(res) = session.on_frame(scene::frame(0.0, pose, vec![floor], vec![])) {
//!     println!("reticle at {:?} (surface: {})", res.position, res.hit_surface);
//! }
//! session.tap();
//! # Ok(())
//! # }
//! ```
//!
//! ## Low-level building blocks
//!
//! ```no_run
//! use arplace::core::{FeatureQuality, FeaturePoint, Pt3, Ray3, Vec3};
//! use arplace::hittest::{hit_test_features, FeatureQuery};
//!
//! let ray = Ray3::new(Pt3::new(0.0, 1.0, 0.0), -Vec3::z()).unwrap();
//! let cloud = [FeaturePoint::new(1, Pt3::new(0.0, 1.0, -2.0), FeatureQuality::High)];
//! let hits = hit_test_features(&ray, &cloud, &FeatureQuery::default());
//! println!("{} hit(s)", hits.len());
//! ```
//!
//! ## Module Organization
//!
//! - **[`core`]**: math types, camera models, tracking data, synthetic scenes
//! - **[`hittest`]**: anchor, infinite-plane and feature-cloud hit tests
//! - **[`pipeline`]**: resolver, reticle, placement controller, sessions, replay
//! - **[`prelude`]**: convenient re-exports for common use cases

/// Math types, camera models and tracking data.
pub mod core {
    pub use arplace_core::*;
}

/// Pure ray hit tests.
pub mod hittest {
    pub use arplace_hittest::*;
}

/// Resolution, reticle, placement and replay.
pub mod pipeline {
    pub use arplace_pipeline::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use arplace::prelude::*;`.
pub mod prelude {
    pub use crate::core::{
        AnchorId, CameraModel, CameraParams, FeaturePoint, FeatureQuality, Iso3, Pose, Pt2, Pt3,
        SurfaceAnchor, TrackingFrame, Vec2, Vec3, Viewport,
    };

    pub use crate::hittest::{FeatureQuery, InfinitePlaneOptions};

    pub use crate::pipeline::{
        HitSource, InMemoryScene, ObjectId, PlacementConfig, PlacementController,
        PlacementSession, ReplayInput, ReplayReport, ResolutionResult, ResolveRequest,
        ReticleMissPolicy, SceneGraph, WorldPositionResolver, main_context, run_replay,
    };
}
