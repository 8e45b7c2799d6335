//! Minimal scene model consumed by the snapping engines.
//!
//! Absolute (stage) coordinates throughout. The host rendering engine
//! stays the source of truth for painting, hit-testing and event
//! dispatch; this model carries just enough geometry for snapping: a
//! settable anchor position per node and the derived axis-aligned
//! client rect.

use crate::guideline::Guideline;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene nodes.
pub type NodeId = Uuid;
/// Unique identifier for layers.
pub type LayerId = Uuid;

/// Scene-graph category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Primitive drawable shape; contributes snap candidates.
    Shape,
    /// Container node; skipped by the candidate collector.
    Group,
}

/// A node placed on a layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    /// Unique identifier.
    pub id: NodeId,
    /// User-assigned label, kept for host bookkeeping only.
    pub name: String,
    /// Scene-graph category.
    pub kind: NodeKind,
    /// Absolute anchor position (settable).
    pub position: Point,
    /// Displacement from the anchor to the client rect origin. Zero for
    /// plain top-left-anchored shapes; transformed shapes report the
    /// offset of their axis-aligned box relative to the anchor.
    pub offset: Vec2,
    /// Client rect width.
    pub width: f64,
    /// Client rect height.
    pub height: f64,
}

impl SceneNode {
    /// Create a node with a zero anchor offset.
    pub fn new(kind: NodeKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            kind,
            position,
            offset: Vec2::ZERO,
            width,
            height,
        }
    }

    /// Set the user-assigned name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the anchor-to-box displacement.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Absolute axis-aligned bounding box.
    ///
    /// Moving [`SceneNode::position`] moves this box rigidly, which is
    /// the algebra the drag correction relies on.
    pub fn client_rect(&self) -> Rect {
        Rect::from_origin_size(self.position + self.offset, Size::new(self.width, self.height))
    }

    /// Move the anchor to a new absolute position.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

/// An ordered collection of nodes plus the transient guideline markers
/// produced while one of its nodes is dragged or resized.
///
/// Markers are an owned collection here: their lifecycle is tracked by
/// ownership, never by re-querying the scene by a reserved name, so
/// sibling scans can never collide with markers or user-named nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier.
    pub id: LayerId,
    nodes: Vec<SceneNode>,
    #[serde(skip)]
    guidelines: Vec<Guideline>,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes: Vec::new(),
            guidelines: Vec::new(),
        }
    }

    /// Add a node; returns its id.
    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Remove a node by id.
    pub fn remove_node(&mut self, id: NodeId) -> Option<SceneNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(index))
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get a mutable node by id.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Child nodes in insertion order.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Attach a guideline marker.
    pub fn add_guideline(&mut self, guideline: Guideline) {
        self.guidelines.push(guideline);
    }

    /// Drop every guideline marker.
    pub fn clear_guidelines(&mut self) {
        self.guidelines.clear();
    }

    /// Current guideline markers.
    pub fn guidelines(&self) -> &[Guideline] {
        &self.guidelines
    }
}

/// The root of the scene: a fixed-size canvas with ordered layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    /// Stage width in pixels.
    pub width: f64,
    /// Stage height in pixels.
    pub height: f64,
    layers: Vec<Layer>,
}

impl Stage {
    /// Create a stage with no layers.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Append an empty layer; returns its id.
    pub fn add_layer(&mut self) -> LayerId {
        let layer = Layer::new();
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// Get a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Get a mutable layer by id.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Layers in stacking order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Find a node anywhere on the stage.
    pub fn find_node(&self, id: NodeId) -> Option<&SceneNode> {
        self.layers.iter().find_map(|l| l.node(id))
    }

    /// Find a mutable node anywhere on the stage.
    pub fn find_node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.layers.iter_mut().find_map(|l| l.node_mut(id))
    }

    /// Total number of guideline markers across all layers.
    pub fn guideline_count(&self) -> usize {
        self.layers.iter().map(|l| l.guidelines().len()).sum()
    }
}
