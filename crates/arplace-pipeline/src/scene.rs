//! Scene-graph abstraction owned by the main context.

use std::collections::BTreeMap;

use arplace_core::{Iso3, Real};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Handle of a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Reticle,
    PlacedObject,
}

/// A scene mutation, applied on the main context.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    Insert {
        node: NodeId,
        kind: NodeKind,
        transform: Iso3,
        scale: Real,
        visible: bool,
    },
    Remove(NodeId),
    SetTransform {
        node: NodeId,
        transform: Iso3,
        scale: Real,
    },
    SetVisible {
        node: NodeId,
        visible: bool,
    },
}

/// Rendering-side scene graph.
///
/// Implementations only ever run on the main context; mutations of unknown
/// nodes are ignored.
pub trait SceneGraph {
    fn insert(&mut self, node: NodeId, kind: NodeKind, transform: Iso3, scale: Real, visible: bool);
    fn remove(&mut self, node: NodeId);
    fn set_transform(&mut self, node: NodeId, transform: Iso3, scale: Real);
    fn set_visible(&mut self, node: NodeId, visible: bool);
    fn contains(&self, node: NodeId) -> bool;

    fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::Insert {
                node,
                kind,
                transform,
                scale,
                visible,
            } => self.insert(node, kind, transform, scale, visible),
            SceneCommand::Remove(node) => self.remove(node),
            SceneCommand::SetTransform {
                node,
                transform,
                scale,
            } => self.set_transform(node, transform, scale),
            SceneCommand::SetVisible { node, visible } => self.set_visible(node, visible),
        }
    }
}

/// State of a node in [`InMemoryScene`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub transform: Iso3,
    pub scale: Real,
    pub visible: bool,
}

/// A scene graph that just records node state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScene {
    nodes: BTreeMap<NodeId, SceneNode>,
    insertions: usize,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of successful insertions over the scene's lifetime.
    pub fn insertions(&self) -> usize {
        self.insertions
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }
}

impl SceneGraph for InMemoryScene {
    fn insert(&mut self, node: NodeId, kind: NodeKind, transform: Iso3, scale: Real, visible: bool) {
        if self.nodes.contains_key(&node) {
            warn!("duplicate insert of {:?} ignored", node);
            return;
        }
        self.nodes.insert(
            node,
            SceneNode {
                kind,
                transform,
                scale,
                visible,
            },
        );
        self.insertions += 1;
    }

    fn remove(&mut self, node: NodeId) {
        if self.nodes.remove(&node).is_none() {
            debug!("remove of unknown {:?}", node);
        }
    }

    fn set_transform(&mut self, node: NodeId, transform: Iso3, scale: Real) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.transform = transform;
            n.scale = scale;
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.visible = visible;
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }
}
