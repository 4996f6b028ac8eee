//! A controller bundled with its main context, driven one event at a time.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use arplace_core::{CameraModel, Pt2, Pt3, TrackingFrame, Viewport};
use log::info;

use crate::config::PlacementConfig;
use crate::dispatch::{MainContext, main_context};
use crate::placement::{ObjectId, PlacementController};
use crate::resolver::{HitSource, ResolutionResult};
use crate::reticle::Reticle;
use crate::scene::SceneGraph;

/// Single-threaded placement session.
///
/// Every operation drains the dispatch queue before returning, so the scene
/// graph reflects all submitted commands between calls.
#[derive(Debug)]
pub struct PlacementSession<G> {
    controller: PlacementController,
    context: MainContext<G>,
    current_frame: Option<TrackingFrame>,
    hit_counts: BTreeMap<HitSource, usize>,
    frames: usize,
    misses: usize,
}

impl<G: SceneGraph> PlacementSession<G> {
    /// Start a session whose reticle follows the centre of `viewport`.
    pub fn new(
        config: PlacementConfig,
        camera: CameraModel,
        viewport: &Viewport,
        scene: G,
    ) -> Result<Self> {
        let (dispatcher, context) = main_context(scene);
        let mut controller = PlacementController::new(config, camera, dispatcher)
            .context("invalid placement configuration")?;
        controller.set_screen_anchor(viewport.center());
        let mut session = Self {
            controller,
            context,
            current_frame: None,
            hit_counts: BTreeMap::new(),
            frames: 0,
            misses: 0,
        };
        session.context.drain();
        info!(
            "placement session started ({}x{} viewport)",
            viewport.width, viewport.height
        );
        Ok(session)
    }

    /// Feed a tracking frame; it becomes the session's current frame.
    pub fn on_frame(&mut self, frame: TrackingFrame) -> Option<ResolutionResult> {
        let result = self.controller.on_tracking_update(&frame);
        self.frames += 1;
        match result.and_then(|r| r.source) {
            Some(source) => *self.hit_counts.entry(source).or_default() += 1,
            None => self.misses += 1,
        }
        self.current_frame = Some(frame);
        self.context.drain();
        result
    }

    /// Place a new object at the reticle.
    pub fn tap(&mut self) -> Option<ObjectId> {
        let frame = self.current_frame.as_ref()?;
        let placed = self.controller.on_commit_trigger(frame);
        self.context.drain();
        placed
    }

    pub fn drag(&mut self, object: ObjectId, screen_point: Pt2, filter: bool) -> Option<Pt3> {
        let frame = self.current_frame.as_ref()?;
        let moved = self.controller.drag_object(object, screen_point, frame, filter);
        self.context.drain();
        moved
    }

    pub fn replace_reticle(&mut self) -> Reticle {
        let retired = self.controller.replace_reticle();
        self.context.drain();
        retired
    }

    pub fn controller(&self) -> &PlacementController {
        &self.controller
    }

    pub fn scene(&self) -> &G {
        self.context.scene()
    }

    pub fn current_frame(&self) -> Option<&TrackingFrame> {
        self.current_frame.as_ref()
    }

    /// Resolutions per producing tier.
    pub fn hit_counts(&self) -> &BTreeMap<HitSource, usize> {
        &self.hit_counts
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Frames that resolved nothing or were skipped.
    pub fn misses(&self) -> usize {
        self.misses
    }
}
