//! Offline replay of recorded tracking sessions.

use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use arplace_core::{CameraParams, Pt2, Pt3, Real, TrackingFrame, Viewport};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::PlacementConfig;
use crate::placement::ObjectId;
use crate::resolver::{HitSource, ResolutionResult};
use crate::reticle::{Reticle, ReticleMode, ReticleStage};
use crate::scene::{InMemoryScene, NodeId};
use crate::session::PlacementSession;

/// One recorded input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// New tracking frame from the AR session.
    Frame(TrackingFrame),
    /// Place an object at the reticle.
    Tap,
    /// Drag a placed object to a screen point. Objects are numbered from 0
    /// in placement order.
    Drag {
        object: ObjectId,
        screen_point: Pt2,
        #[serde(default)]
        filter: bool,
    },
    ReplaceReticle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayInput {
    pub camera: CameraParams,
    pub viewport: Viewport,
    pub events: Vec<ReplayEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReticleSnapshot {
    pub node: NodeId,
    pub stage: ReticleStage,
    pub mode: ReticleMode,
    pub visible: bool,
    pub position: Option<Pt3>,
    pub yaw: Real,
    pub scale: Real,
}

impl From<&Reticle> for ReticleSnapshot {
    fn from(r: &Reticle) -> Self {
        Self {
            node: r.node(),
            stage: r.stage(),
            mode: r.mode(),
            visible: r.is_visible(),
            position: r.position(),
            yaw: r.yaw(),
            scale: r.scale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub timestamp: Real,
    pub resolution: Option<ResolutionResult>,
    pub reticle: ReticleSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectReport {
    pub id: ObjectId,
    pub node: NodeId,
    pub position: Pt3,
    pub distance_from_observer: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub frames: Vec<FrameReport>,
    pub objects: Vec<ObjectReport>,
    /// Nodes present in the scene graph after the last event.
    pub scene_nodes: usize,
    pub hit_counts: BTreeMap<HitSource, usize>,
    pub misses: usize,
}

/// Run every event of `input` through a fresh placement session.
///
/// Fails on invalid camera parameters, viewport or configuration, and on
/// drags that reference objects which were never placed.
pub fn run_replay(input: &ReplayInput, config: &PlacementConfig) -> Result<ReplayReport> {
    input.camera.validate()?;
    let Viewport { width, height } = input.viewport;
    ensure!(
        width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
        "viewport must have a positive size, got {width}x{height}"
    );

    let mut session =
        PlacementSession::new(*config, input.camera.build(), &input.viewport, InMemoryScene::new())?;
    let mut frames = Vec::new();

    for (idx, event) in input.events.iter().enumerate() {
        match event {
            ReplayEvent::Frame(frame) => {
                let resolution = session.on_frame(frame.clone());
                frames.push(FrameReport {
                    timestamp: frame.timestamp,
                    resolution,
                    reticle: session.controller().reticle().into(),
                });
            }
            ReplayEvent::Tap => {
                if session.tap().is_none() {
                    debug!("event {idx}: tap placed nothing");
                }
            }
            ReplayEvent::Drag {
                object,
                screen_point,
                filter,
            } => {
                ensure!(
                    session.controller().object(*object).is_some(),
                    "event {idx}: drag of unknown object {}",
                    object.0
                );
                if session.drag(*object, *screen_point, *filter).is_none() {
                    debug!("event {idx}: drag of {object:?} resolved nothing");
                }
            }
            ReplayEvent::ReplaceReticle => {
                session.replace_reticle();
            }
        }
    }

    let objects: Vec<ObjectReport> = session
        .controller()
        .objects()
        .filter(|o| o.attached_to_scene)
        .map(|o| ObjectReport {
            id: o.id,
            node: o.node,
            position: o.position(),
            distance_from_observer: o.distance_from_observer,
        })
        .collect();
    info!(
        "replayed {} event(s): {} frame(s), {} object(s)",
        input.events.len(),
        frames.len(),
        objects.len()
    );

    Ok(ReplayReport {
        frames,
        objects,
        scene_nodes: session.scene().len(),
        hit_counts: session.hit_counts().clone(),
        misses: session.misses(),
    })
}
