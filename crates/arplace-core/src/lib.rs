//! Core math, camera and tracking primitives for `arplace`.
//!
//! This crate provides the foundational building blocks used by all other
//! crates in the workspace:
//!
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt3`, and friends),
//! - composable camera models (projection + distortion + intrinsics),
//! - the tracking data model consumed from an external AR session
//!   ([`Pose`], [`SurfaceAnchor`], [`FeaturePoint`], [`TrackingFrame`]),
//! - screen-to-world rays ([`Ray3`], [`Pose::ray_through_pixel`]).
//!
//! Camera pipeline (conceptually):
//! `pixel = intrinsics(distortion(projection(dir)))`
//!
//! Camera intrinsics follow the computer-vision convention (+Z forward, +Y
//! down). Poses follow the graphics convention used by AR frameworks: the
//! camera looks along its local −Z axis with +Y up. [`Pose::ray_through_pixel`]
//! bridges the two.
//!
//! # Modules
//!
//! - \[`math`\]: basic type aliases and vector helpers.
//! - \[`models`\]: camera model traits and serializable parameters.
//! - \[`tracking`\]: poses, anchors, feature points and frames.
//! - \[`synthetic`\]: deterministic scene builders (tests/examples).
//!
//! # Example
//!
//! ```no_run
//! use arplace_core::{synthetic::scene, Pt3, Viewport};
//!
//! let viewport = Viewport::new(1280.0, 720.0);
//! let camera = scene::camera_for_viewport(&viewport, 1000.0);
//! let pose = scene::look_at(Pt3::new(0.0, 1.5, 1.5), Pt3::origin());
//! let ray = pose.ray_through_pixel(&camera, &viewport.center()).unwrap();
//! assert!(ray.dir.y < 0.0);
//! ```

/// Linear algebra type aliases and helpers.
mod math;
/// Camera models and distortion utilities.
mod models;
/// Deterministic synthetic scene helpers.
///
/// Used by workspace tests and the CLI test-suite to build tracking frames
/// with known geometry.
pub mod synthetic;
/// Tracking data consumed from the AR session.
mod tracking;

pub use math::*;
pub use models::*;
pub use tracking::*;
