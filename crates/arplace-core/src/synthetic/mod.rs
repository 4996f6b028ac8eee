//! Deterministic synthetic data generation helpers.
//!
//! This module provides small, reusable building blocks for constructing
//! synthetic tracking frames used in tests and examples:
//! - pinhole cameras matching a viewport,
//! - look-at and orbiting observer poses,
//! - horizontal surface anchors,
//! - seeded feature-point clouds.
//!
//! The helpers are deterministic (explicit seeds; stable point ordering).
//!
//! # Example
//!
//! ```no_run
//! use arplace_core::{synthetic::scene, AnchorId, Pt3, Vec2};
//!
//! let pose = scene::look_at(Pt3::new(0.0, 1.5, 1.5), Pt3::origin());
//! let floor = scene::floor_anchor(AnchorId(1), Pt3::origin(), Vec2::new(1.0, 1.0));
//! let frame = scene::frame(0.0, pose, vec![floor], Vec::new());
//! assert!(frame.has_tracking());
//! ```

pub mod scene;
