//! World-position resolution, reticle tracking and object placement.
//!
//! This crate turns per-frame tracking data into decisions about where AR
//! content goes:
//!
//! - [`WorldPositionResolver`] runs the tiered hit-test strategy for one
//!   screen point (anchors, feature cloud, infinite plane, unfiltered
//!   features).
//! - [`Reticle`] smooths, scales and orients the focus indicator.
//! - [`PlacementController`] owns the reticle and placed objects and emits
//!   [`SceneCommand`]s through a fire-and-forget [`SceneDispatcher`].
//! - [`MainContext`] owns the [`SceneGraph`] and applies those commands.
//! - [`PlacementSession`] and [`run_replay`] drive the whole thing from a
//!   recorded event stream.
//!
//! # Example
//!
//! ```no_run
//! use arplace_core::{synthetic::scene, AnchorId, Pt3, Vec2, Viewport};
//! use arplace_pipeline::{InMemoryScene, PlacementConfig, PlacementSession};
//!
//! # fn main() -> anyhow::Result<()> {
//! let viewport = Viewport::new(1280.0, 720.0);
//! let camera = scene::camera_for_viewport(&viewport, 1000.0);
//! let mut session =
//!     PlacementSession::new(PlacementConfig::default(), camera, &viewport, InMemoryScene::new())?;
//!
//! let pose = scene::look_at(Pt3::new(0.0, 1.5, 1.5), Pt3::origin());
//! let floor = scene::floor_anchor(AnchorId(1), Pt3::origin(), Vec2::new(2.0, 2.0));
//! session.on_frame(scene::frame(0.0, pose, vec![floor], vec![]));
//! let placed = session.tap();
//! assert!(placed.is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod placement;
pub mod replay;
pub mod resolver;
pub mod reticle;
pub mod scene;
pub mod session;

pub use config::{ConfigError, PlacementConfig, ReticleConfig, ReticleMissPolicy, ResolverConfig};
pub use dispatch::{MainContext, SceneDispatcher, main_context};
pub use placement::{ObjectId, PlacedObject, PlacementController};
pub use replay::{
    FrameReport, ObjectReport, ReplayEvent, ReplayInput, ReplayReport, ReticleSnapshot,
    run_replay,
};
pub use resolver::{HitSource, ResolutionResult, ResolveRequest, WorldPositionResolver};
pub use reticle::{Reticle, ReticleMode, ReticleStage, scale_for_distance, yaw_for_camera};
pub use scene::{InMemoryScene, NodeId, NodeKind, SceneCommand, SceneGraph, SceneNode};
pub use session::PlacementSession;
