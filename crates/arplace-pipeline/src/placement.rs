//! Reticle tracking and distance-clamped object placement.

use std::collections::{BTreeMap, VecDeque};

use arplace_core::{
    CameraModel, Iso3, Pose, Pt2, Pt3, Real, TrackingFrame, clamp_length, mean, with_length,
};
use log::{debug, info};
use nalgebra::Translation3;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, PlacementConfig, ReticleMissPolicy};
use crate::dispatch::SceneDispatcher;
use crate::resolver::{ResolutionResult, ResolveRequest, WorldPositionResolver};
use crate::reticle::Reticle;
use crate::scene::{NodeId, NodeKind, SceneCommand};

/// Identifier of a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Virtual content placed (or about to be placed) in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub node: NodeId,
    pub transform: Iso3,
    /// Distance from the observer at the last commit or drag.
    pub distance_from_observer: Real,
    /// Whether the insert command for `node` has been dispatched.
    pub attached_to_scene: bool,
}

impl PlacedObject {
    pub fn position(&self) -> Pt3 {
        Pt3::from(self.transform.translation.vector)
    }
}

/// Drives the reticle from tracking updates and places objects.
///
/// All scene changes leave through the [`SceneDispatcher`]; nothing here
/// waits for them to be applied.
#[derive(Debug)]
pub struct PlacementController {
    config: PlacementConfig,
    resolver: WorldPositionResolver,
    camera: CameraModel,
    dispatcher: SceneDispatcher,
    screen_anchor: Option<Pt2>,
    reticle: Reticle,
    objects: BTreeMap<ObjectId, PlacedObject>,
    recent_distances: VecDeque<Real>,
    next_node: u64,
    next_object: u64,
}

impl PlacementController {
    /// Validate `config` and install the first (hidden) reticle.
    pub fn new(
        config: PlacementConfig,
        camera: CameraModel,
        dispatcher: SceneDispatcher,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let first = NodeId(0);
        let mut controller = Self {
            config,
            resolver: WorldPositionResolver::new(config.resolver),
            camera,
            dispatcher,
            screen_anchor: None,
            reticle: Reticle::new(first, &config.reticle),
            objects: BTreeMap::new(),
            recent_distances: VecDeque::with_capacity(config.distance_history),
            next_node: 1,
            next_object: 0,
        };
        controller.insert_reticle_node(first);
        Ok(controller)
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn reticle(&self) -> &Reticle {
        &self.reticle
    }

    pub fn screen_anchor(&self) -> Option<Pt2> {
        self.screen_anchor
    }

    /// Fix the screen point the reticle follows, usually the view centre.
    pub fn set_screen_anchor(&mut self, point: Pt2) {
        self.screen_anchor = Some(point);
    }

    pub fn set_drag_on_infinite_planes(&mut self, enabled: bool) {
        self.resolver.set_drag_on_infinite_planes(enabled);
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.values()
    }

    /// Drag distances used for position filtering, oldest first.
    pub fn recent_distances(&self) -> impl Iterator<Item = Real> + '_ {
        self.recent_distances.iter().copied()
    }

    fn allocate_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn insert_reticle_node(&self, node: NodeId) {
        self.dispatcher.submit(SceneCommand::Insert {
            node,
            kind: NodeKind::Reticle,
            transform: Iso3::identity(),
            scale: 1.0,
            visible: false,
        });
    }

    /// Swap in a fresh reticle; the old node is hidden and removed first.
    ///
    /// Returns the retired reticle.
    pub fn replace_reticle(&mut self) -> Reticle {
        let old_node = self.reticle.node();
        self.dispatcher.submit(SceneCommand::SetVisible {
            node: old_node,
            visible: false,
        });
        self.dispatcher.submit(SceneCommand::Remove(old_node));

        let node = self.allocate_node();
        self.insert_reticle_node(node);
        let mut old = std::mem::replace(&mut self.reticle, Reticle::new(node, &self.config.reticle));
        old.retire();
        debug!("reticle {:?} replaced by {:?}", old_node, node);
        old
    }

    /// Re-resolve the reticle position for a new tracking frame.
    ///
    /// Returns `None` (and changes nothing) until a screen anchor is set or
    /// while the frame has no observer pose.
    pub fn on_tracking_update(&mut self, frame: &TrackingFrame) -> Option<ResolutionResult> {
        let Some(screen_point) = self.screen_anchor else {
            debug!("tracking update skipped: no screen anchor yet");
            return None;
        };
        let Some(pose) = frame.camera else {
            debug!("tracking update skipped: no observer pose");
            return None;
        };

        let request =
            ResolveRequest::at(screen_point).with_previous_position(self.reticle.position());
        let result = self.resolver.resolve(frame, &self.camera, &request);
        let was_visible = self.reticle.is_visible();
        let node = self.reticle.node();

        match result.position {
            Some(position) => {
                let surface = result.surface_anchor(frame);
                if self.reticle.update(position, surface, Some(&pose)) {
                    debug!("reticle reached new surface {:?}", result.surface);
                }
                if let Some(transform) = self.reticle.transform() {
                    self.dispatcher.submit(SceneCommand::SetTransform {
                        node,
                        transform,
                        scale: self.reticle.scale(),
                    });
                }
                self.reticle.set_visible(true);
            }
            None => {
                let keep = self.config.reticle.miss_policy == ReticleMissPolicy::KeepLastPosition
                    && self.reticle.last_position().is_some();
                self.reticle.set_visible(keep);
            }
        }

        if self.reticle.is_visible() != was_visible {
            self.dispatcher.submit(SceneCommand::SetVisible {
                node,
                visible: self.reticle.is_visible(),
            });
        }
        Some(result)
    }

    /// Allocate a new, not yet attached object.
    pub fn spawn_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        let node = self.allocate_node();
        self.objects.insert(
            id,
            PlacedObject {
                id,
                node,
                transform: Iso3::identity(),
                distance_from_observer: 0.0,
                attached_to_scene: false,
            },
        );
        id
    }

    /// Place `object` at `target`, no farther than the configured maximum
    /// from the observer.
    ///
    /// The object takes the observer's orientation. Its node is inserted on
    /// the first commit only; later commits move it. Returns the final
    /// position, or `None` without an observer pose or for unknown objects.
    pub fn commit_placement(
        &mut self,
        object: ObjectId,
        target: &Pt3,
        observer: Option<&Pose>,
    ) -> Option<Pt3> {
        let Some(pose) = observer else {
            debug!("commit of {:?} skipped: no observer pose", object);
            return None;
        };
        let Some(obj) = self.objects.get_mut(&object) else {
            debug!("commit of unknown {:?}", object);
            return None;
        };
        self.recent_distances.clear();

        let observer_pos = pose.position();
        let offset = clamp_length(&(target - observer_pos), self.config.max_object_distance);
        let position = observer_pos + offset;
        obj.transform = Iso3::from_parts(Translation3::from(position.coords), pose.rotation());
        obj.distance_from_observer = offset.norm();
        publish(&self.dispatcher, obj, self.config.marker_size);
        Some(position)
    }

    /// Tap handler: place a new object at the reticle's last position.
    pub fn on_commit_trigger(&mut self, frame: &TrackingFrame) -> Option<ObjectId> {
        let Some(pose) = frame.camera else {
            debug!("commit trigger ignored: no observer pose");
            return None;
        };
        let Some(target) = self.reticle.last_position() else {
            debug!("commit trigger ignored: reticle has no position yet");
            return None;
        };
        let id = self.spawn_object();
        self.commit_placement(id, &target, Some(&pose))?;
        Some(id)
    }

    /// Move `object` to the world position under `screen_point`.
    ///
    /// The infinite plane through the object's current position is allowed
    /// when dragging on infinite planes is enabled. With `filter_position`
    /// the distance from the observer is replaced by the mean of the recent
    /// drag distances, which damps depth jitter.
    pub fn drag_object(
        &mut self,
        object: ObjectId,
        screen_point: Pt2,
        frame: &TrackingFrame,
        filter_position: bool,
    ) -> Option<Pt3> {
        let pose = frame.camera?;
        let current = self.objects.get(&object)?.position();

        let request = ResolveRequest::at(screen_point)
            .with_previous_position(Some(current))
            .allow_infinite_plane(true);
        let result = self.resolver.resolve(frame, &self.camera, &request);
        let Some(target) = result.position else {
            debug!("drag of {:?}: nothing under {:?}", object, screen_point);
            return None;
        };

        let observer_pos = pose.position();
        let mut offset = clamp_length(&(target - observer_pos), self.config.max_object_distance);
        if self.recent_distances.len() == self.config.distance_history {
            self.recent_distances.pop_front();
        }
        self.recent_distances.push_back(offset.norm());
        if filter_position {
            if let Some(avg) = mean(&self.recent_distances) {
                offset = with_length(&offset, avg);
            }
        }

        let position = observer_pos + offset;
        let obj = self.objects.get_mut(&object)?;
        obj.transform.translation = Translation3::from(position.coords);
        obj.distance_from_observer = offset.norm();
        publish(&self.dispatcher, obj, self.config.marker_size);
        Some(position)
    }
}

/// Insert the object's node once, afterwards only move it.
fn publish(dispatcher: &SceneDispatcher, obj: &mut PlacedObject, scale: Real) {
    if obj.attached_to_scene {
        dispatcher.submit(SceneCommand::SetTransform {
            node: obj.node,
            transform: obj.transform,
            scale,
        });
    } else {
        dispatcher.submit(SceneCommand::Insert {
            node: obj.node,
            kind: NodeKind::PlacedObject,
            transform: obj.transform,
            scale,
            visible: true,
        });
        obj.attached_to_scene = true;
        info!("{:?} placed at {:?}", obj.id, obj.position());
    }
}
