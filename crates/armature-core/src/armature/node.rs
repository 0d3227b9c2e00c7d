//! Node types for the armature tree

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::BakedGeometry;
use crate::transformation::Transformation;

/// What a node contributes when the tree is baked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum NodeKind {
    /// Plain jointed node (only transforms its children)
    #[default]
    Group,
    /// Node carrying geometry that is emitted at bake time
    Geometry(Arc<BakedGeometry>),
}

/// A node in the armature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub name: String,
    pub kind: NodeKind,
    /// Transformation relative to the parent node
    pub transformation: Transformation,
    /// Named anchors in this node's local space
    pub(crate) points: HashMap<String, Vec3>,
    /// Local point fixed during pose solving (set on attachment)
    pub(crate) anchor: Option<Vec3>,
    /// Points that must not move during the current pose operation (local space)
    #[serde(skip)]
    pub(crate) held: Vec<Vec3>,
    /// Point being aimed or stretched (local space)
    #[serde(skip)]
    pub(crate) grabbed: Option<Vec3>,
}

impl Node {
    /// Create a new plain node
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    /// Create a new geometry-bearing node
    pub fn with_geometry(name: impl Into<String>, geometry: Arc<BakedGeometry>) -> Self {
        Self::with_kind(name, NodeKind::Geometry(geometry))
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            transformation: Transformation::IDENTITY,
            points: HashMap::new(),
            anchor: None,
            held: Vec::new(),
            grabbed: None,
        }
    }

    /// Geometry carried by this node, if any
    pub fn geometry(&self) -> Option<&Arc<BakedGeometry>> {
        match &self.kind {
            NodeKind::Geometry(geometry) => Some(geometry),
            NodeKind::Group => None,
        }
    }

    pub fn anchor(&self) -> Option<Vec3> {
        self.anchor
    }

    /// Points currently held (local space)
    pub fn held(&self) -> &[Vec3] {
        &self.held
    }

    /// Point currently grabbed (local space)
    pub fn grabbed(&self) -> Option<Vec3> {
        self.grabbed
    }

    /// Whether any hold or grab is active
    pub fn is_constrained(&self) -> bool {
        !self.held.is_empty() || self.grabbed.is_some()
    }

    /// Names of all points registered on this node
    pub fn point_names(&self) -> impl Iterator<Item = &str> {
        self.points.keys().map(String::as_str)
    }
}
