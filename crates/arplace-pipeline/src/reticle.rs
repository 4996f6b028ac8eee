//! The focus reticle: an on-screen indicator of where the next object lands.

use std::collections::{BTreeSet, VecDeque};
use std::f64::consts::FRAC_PI_2;

use arplace_core::{
    AnchorId, Iso3, Pose, Pt3, Real, SurfaceAnchor, UnitQuat, Vec3, centroid, wrap_angle,
};
use log::{debug, trace};
use nalgebra::Translation3;
use serde::{Deserialize, Serialize};

use crate::config::ReticleConfig;
use crate::scene::NodeId;

/// Tilt (radians from horizontal) where the yaw starts following the camera's up vector.
const TILT_BLEND_START: Real = 0.65 * FRAC_PI_2;
/// Tilt where the yaw fully follows the camera's up vector.
const TILT_BLEND_END: Real = 0.75 * FRAC_PI_2;
/// Distance below which the reticle scales linearly with distance.
const NEAR_SCALE_DISTANCE: Real = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReticleStage {
    /// Created, never positioned.
    Uninitialized,
    /// Positioned at least once.
    Active,
    /// Superseded by a replacement; further updates are ignored.
    Replaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReticleMode {
    /// Floating on features or an assumed plane.
    Searching,
    /// Resting on a detected surface anchor.
    OnSurface,
}

/// Reticle state.
///
/// Scene mutations are not performed here; the owning controller reads
/// [`Reticle::transform`] and [`Reticle::is_visible`] and dispatches them.
#[derive(Debug, Clone)]
pub struct Reticle {
    node: NodeId,
    stage: ReticleStage,
    mode: ReticleMode,
    visible: bool,
    position: Option<Pt3>,
    last_position: Option<Pt3>,
    last_position_on_surface: Option<Pt3>,
    recent_positions: VecDeque<Pt3>,
    window: usize,
    surface_orientation: Option<UnitQuat>,
    visited_anchors: BTreeSet<AnchorId>,
    yaw: Real,
    scale: Real,
}

impl Reticle {
    pub fn new(node: NodeId, config: &ReticleConfig) -> Self {
        Self {
            node,
            stage: ReticleStage::Uninitialized,
            mode: ReticleMode::Searching,
            visible: false,
            position: None,
            last_position: None,
            last_position_on_surface: None,
            recent_positions: VecDeque::with_capacity(config.smoothing_window),
            window: config.smoothing_window.max(1),
            surface_orientation: None,
            visited_anchors: BTreeSet::new(),
            yaw: 0.0,
            scale: 1.0,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn stage(&self) -> ReticleStage {
        self.stage
    }

    pub fn mode(&self) -> ReticleMode {
        self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_retired(&self) -> bool {
        self.stage == ReticleStage::Replaced
    }

    /// Smoothed display position.
    pub fn position(&self) -> Option<Pt3> {
        self.position
    }

    /// Last resolved position, unsmoothed. Used as the placement target.
    pub fn last_position(&self) -> Option<Pt3> {
        self.last_position
    }

    pub fn last_position_on_surface(&self) -> Option<Pt3> {
        self.last_position_on_surface
    }

    /// Rotation of the anchor the reticle rests on, if any.
    pub fn surface_orientation(&self) -> Option<UnitQuat> {
        self.surface_orientation
    }

    pub fn yaw(&self) -> Real {
        self.yaw
    }

    pub fn scale(&self) -> Real {
        self.scale
    }

    /// World transform of the reticle node, once it has a position.
    pub fn transform(&self) -> Option<Iso3> {
        self.position.map(|p| {
            Iso3::from_parts(
                Translation3::from(p.coords),
                UnitQuat::from_axis_angle(&Vec3::y_axis(), self.yaw),
            )
        })
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Mark this reticle as superseded. Terminal.
    pub fn retire(&mut self) {
        self.stage = ReticleStage::Replaced;
        self.visible = false;
    }

    /// Move the reticle to a newly resolved position.
    ///
    /// Returns `true` when `surface` is visited for the first time, the cue
    /// for a highlight animation. Retired reticles ignore updates.
    pub fn update(
        &mut self,
        position: Pt3,
        surface: Option<&SurfaceAnchor>,
        camera: Option<&Pose>,
    ) -> bool {
        if self.is_retired() {
            debug!("update ignored on retired reticle {:?}", self.node);
            return false;
        }
        self.stage = ReticleStage::Active;
        self.last_position = Some(position);

        if self.recent_positions.len() == self.window {
            self.recent_positions.pop_front();
        }
        self.recent_positions.push_back(position);
        self.position = centroid(&self.recent_positions);

        let first_visit = match surface {
            Some(anchor) => {
                self.mode = ReticleMode::OnSurface;
                self.last_position_on_surface = Some(position);
                self.surface_orientation = Some(anchor.world_from_anchor.rotation);
                self.visited_anchors.insert(anchor.id)
            }
            None => {
                self.mode = ReticleMode::Searching;
                self.surface_orientation = None;
                false
            }
        };

        if let (Some(pose), Some(displayed)) = (camera, self.position) {
            self.scale = scale_for_distance((displayed - pose.position()).norm());
            self.yaw = yaw_for_camera(pose);
        }
        trace!(
            "reticle {:?} at {:?} ({:?}, scale {:.3})",
            self.node, self.position, self.mode, self.scale
        );
        first_visit
    }
}

/// Scale that keeps the reticle roughly constant on screen.
pub fn scale_for_distance(distance: Real) -> Real {
    if distance < NEAR_SCALE_DISTANCE {
        distance / NEAR_SCALE_DISTANCE
    } else {
        0.25 * distance + 0.825
    }
}

/// Heading (rotation about world +Y) of a horizontal direction; 0 faces −Z.
fn heading(v: &Vec3) -> Real {
    (-v.x).atan2(-v.z)
}

/// Shift `angle` by multiples of π/2 until it is within π/4 of `reference`.
///
/// The reticle is square, so quarter turns are indistinguishable.
fn normalize_for_minimal_rotation(angle: Real, reference: Real) -> Real {
    let quarters = ((reference - angle) / FRAC_PI_2).round();
    angle + quarters * FRAC_PI_2
}

/// Reticle yaw for an observer pose.
///
/// Follows the viewing direction while the camera is roughly level. Looking
/// steeply up or down the forward heading becomes unstable, so the yaw blends
/// towards the heading of the camera's up vector instead.
pub fn yaw_for_camera(pose: &Pose) -> Real {
    let forward = pose.forward();
    let tilt = forward.y.clamp(-1.0, 1.0).asin().abs();
    // Looking down the up vector points away from the observer; looking up it
    // points back towards them.
    let up = if forward.y <= 0.0 { pose.up() } else { -pose.up() };
    let up_heading = heading(&up);

    if tilt < TILT_BLEND_START {
        wrap_angle(heading(&forward))
    } else if tilt < TILT_BLEND_END {
        let w = (tilt - TILT_BLEND_START) / (TILT_BLEND_END - TILT_BLEND_START);
        let fwd = normalize_for_minimal_rotation(heading(&forward), up_heading);
        wrap_angle(fwd * (1.0 - w) + up_heading * w)
    } else {
        wrap_angle(up_heading)
    }
}
