//! Armature (scene graph) of jointed nodes

mod node;
mod point;
mod pose;
mod queries;
mod solve;
mod transforms;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::BakedGeometry;

pub use node::{Node, NodeKind};
pub use point::{Point, Target};
pub use solve::{scale_axis, shortest_arc};

/// Raw armature data for deserialization (used internally)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArmatureData {
    name: String,
    nodes: HashMap<Uuid, Node>,
    children: HashMap<Uuid, Vec<Uuid>>,
    parent: HashMap<Uuid, Uuid>,
}

/// Armature (node tree)
///
/// Nodes live in an arena keyed by id. `children` is the owning forward edge
/// (insertion ordered), `parent` the lookup-only back edge. A node has at most
/// one parent.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "ArmatureData")]
pub struct Armature {
    pub name: String,
    /// All nodes
    pub(crate) nodes: HashMap<Uuid, Node>,
    /// Children mapping: parent -> [child] in insertion order
    pub(crate) children: HashMap<Uuid, Vec<Uuid>>,
    /// Parent mapping: child -> parent
    pub(crate) parent: HashMap<Uuid, Uuid>,
    /// Name to ID index (O(1) lookup)
    pub(crate) name_index: HashMap<String, Uuid>,
}

impl From<Armature> for ArmatureData {
    fn from(armature: Armature) -> Self {
        Self {
            name: armature.name,
            nodes: armature.nodes,
            children: armature.children,
            parent: armature.parent,
        }
    }
}

impl From<ArmatureData> for Armature {
    fn from(data: ArmatureData) -> Self {
        let mut armature = Self {
            name: data.name,
            nodes: data.nodes,
            children: data.children,
            parent: data.parent,
            name_index: HashMap::new(),
        };
        armature.rebuild_indices();
        armature
    }
}

impl<'de> Deserialize<'de> for Armature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = ArmatureData::deserialize(deserializer)?;
        Ok(Armature::from(data))
    }
}

impl Default for Armature {
    fn default() -> Self {
        Self::new("armature")
    }
}

impl Armature {
    /// Create a new empty armature
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: HashMap::new(),
            children: HashMap::new(),
            parent: HashMap::new(),
            name_index: HashMap::new(),
        }
    }

    /// Rebuild the name index (call after deserialization)
    pub fn rebuild_indices(&mut self) {
        self.name_index.clear();
        for (id, node) in &self.nodes {
            self.name_index.insert(node.name.clone(), *id);
        }
    }

    /// Insert a node (unparented) and return its id
    pub fn insert_node(&mut self, node: Node) -> Uuid {
        let id = node.id;
        self.name_index.insert(node.name.clone(), id);
        self.nodes.insert(id, node);
        id
    }

    /// Add a new plain node
    pub fn add_node(&mut self, name: impl Into<String>) -> Uuid {
        self.insert_node(Node::new(name))
    }

    /// Add a new geometry-bearing node
    pub fn add_geometry_node(&mut self, name: impl Into<String>, geometry: BakedGeometry) -> Uuid {
        self.insert_node(Node::with_geometry(name, Arc::new(geometry)))
    }

    /// Get a node by ID
    pub fn node(&self, id: Uuid) -> Result<&Node, ArmatureError> {
        self.nodes.get(&id).ok_or(ArmatureError::NodeNotFound(id))
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, id: Uuid) -> Result<&mut Node, ArmatureError> {
        self.nodes.get_mut(&id).ok_or(ArmatureError::NodeNotFound(id))
    }

    /// Make `child` a child of `parent`
    ///
    /// A child that already has a parent is moved. Connections that would make
    /// a node its own ancestor are rejected.
    pub fn add_child(&mut self, parent_id: Uuid, child_id: Uuid) -> Result<(), ArmatureError> {
        self.node(parent_id)?;
        self.node(child_id)?;

        if self.is_ancestor(child_id, parent_id) {
            return Err(ArmatureError::WouldCreateCycle);
        }

        self.detach(child_id);
        self.children.entry(parent_id).or_default().push(child_id);
        self.parent.insert(child_id, parent_id);

        tracing::debug!(%parent_id, %child_id, "added child");
        Ok(())
    }

    /// Detach a node from its parent, making it a root. Returns the old parent.
    pub fn detach(&mut self, child_id: Uuid) -> Option<Uuid> {
        let parent_id = self.parent.remove(&child_id)?;
        if let Some(children) = self.children.get_mut(&parent_id) {
            children.retain(|id| *id != child_id);
        }
        Some(parent_id)
    }

    /// Remove a node and all its descendants
    pub fn remove_node(&mut self, id: Uuid) -> Result<(), ArmatureError> {
        self.node(id)?;
        self.detach(id);

        let to_remove = self.depth_first(id);
        for node_id in &to_remove {
            if let Some(node) = self.nodes.remove(node_id)
                && self.name_index.get(&node.name) == Some(node_id)
            {
                self.name_index.remove(&node.name);
                // Fall back to a surviving node with the same name
                if let Some(other) = self.nodes.values().find(|n| n.name == node.name) {
                    self.name_index.insert(other.name.clone(), other.id);
                }
            }
            self.children.remove(node_id);
            self.parent.remove(node_id);
        }

        tracing::debug!(%id, removed = to_remove.len(), "removed subtree");
        Ok(())
    }

    /// A name not used by any node, built from `base` and a numeric suffix
    pub fn unique_name(&self, base: &str, start: usize) -> String {
        (start..)
            .map(|n| format!("{base}{n}"))
            .find(|name| !self.name_index.contains_key(name))
            .unwrap_or_else(|| base.to_string())
    }

    /// Validate the tree structure
    ///
    /// Checks that every referenced id exists, that `parent` and `children`
    /// agree and that no node is its own ancestor.
    pub fn validate(&self) -> Result<(), Vec<ArmatureError>> {
        let mut errors = Vec::new();

        for (parent_id, children) in &self.children {
            if !self.nodes.contains_key(parent_id) {
                errors.push(ArmatureError::NodeNotFound(*parent_id));
            }
            for child_id in children {
                if !self.nodes.contains_key(child_id) {
                    errors.push(ArmatureError::NodeNotFound(*child_id));
                }
                if self.parent.get(child_id) != Some(parent_id) {
                    errors.push(ArmatureError::InconsistentParent {
                        child: *child_id,
                        parent: *parent_id,
                    });
                }
            }
        }

        for (child_id, parent_id) in &self.parent {
            if !self.nodes.contains_key(child_id) {
                errors.push(ArmatureError::NodeNotFound(*child_id));
            }
            let listed = self
                .children
                .get(parent_id)
                .is_some_and(|children| children.iter().filter(|id| *id == child_id).count() == 1);
            if !listed {
                errors.push(ArmatureError::InconsistentParent {
                    child: *child_id,
                    parent: *parent_id,
                });
            }
        }

        // A chain longer than the node count must revisit a node
        for id in self.nodes.keys() {
            let mut current = self.parent.get(id).copied();
            let mut steps = 0;
            while let Some(parent_id) = current {
                steps += 1;
                if parent_id == *id || steps > self.nodes.len() {
                    errors.push(ArmatureError::CycleDetected(*id));
                    break;
                }
                current = self.parent.get(&parent_id).copied();
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Armature-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArmatureError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),
    #[error("No node named '{0}'")]
    NamedNodeNotFound(String),
    #[error("Point '{name}' not found on node {node}")]
    PointNotFound { node: Uuid, name: String },
    #[error("Cannot attach a point to another point on the same node")]
    SelfAttachment,
    #[error("Connection would create a cycle")]
    WouldCreateCycle,
    #[error("Node {0} is its own ancestor")]
    CycleDetected(Uuid),
    #[error("Node {child} and its parent {parent} disagree about the link")]
    InconsistentParent { child: Uuid, parent: Uuid },
    #[error("Nothing has been grabbed")]
    NoGrab,
    #[error("No held point or anchor to rotate about")]
    NoAnchor,
    #[error("Over-constrained: {0} held points remain besides the anchor")]
    OverConstrained(usize),
    #[error("Grabbed point or target has no direction from the rotation anchor")]
    DegenerateTarget,
}
