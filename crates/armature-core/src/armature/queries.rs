//! Query methods for Armature

use uuid::Uuid;

use super::{Armature, ArmatureError};
use super::node::Node;

impl Armature {
    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes (arbitrary order)
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the parent ID of a node
    pub fn parent_of(&self, id: Uuid) -> Option<Uuid> {
        self.parent.get(&id).copied()
    }

    /// Direct children of a node in insertion order
    pub fn children_of(&self, id: Uuid) -> &[Uuid] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find a node by name (O(1) lookup)
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.name_index.get(name).and_then(|id| self.nodes.get(id))
    }

    /// Find a node ID by name (O(1) lookup)
    pub fn find_id_by_name(&self, name: &str) -> Option<Uuid> {
        self.name_index.get(name).copied()
    }

    /// Find a node ID by name, failing if no node has that name
    pub fn id_by_name(&self, name: &str) -> Result<Uuid, ArmatureError> {
        self.find_id_by_name(name)
            .ok_or_else(|| ArmatureError::NamedNodeNotFound(name.to_string()))
    }

    /// Root nodes (nodes without parents), sorted by name for stable output
    pub fn roots(&self) -> Vec<Uuid> {
        let mut roots: Vec<&Node> = self
            .nodes
            .values()
            .filter(|n| !self.parent.contains_key(&n.id))
            .collect();
        roots.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        roots.into_iter().map(|n| n.id).collect()
    }

    /// The chain of node IDs from a node up to its root (node first)
    pub fn chain_to_root(&self, id: Uuid) -> Vec<Uuid> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent_id) = self.parent_of(current) {
            chain.push(parent_id);
            current = parent_id;
        }
        chain
    }

    /// Check if `ancestor_id` is `descendant_id` or one of its ancestors
    pub fn is_ancestor(&self, ancestor_id: Uuid, descendant_id: Uuid) -> bool {
        let mut current = Some(descendant_id);
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Depth from root (root = 0)
    pub fn depth(&self, id: Uuid) -> usize {
        self.chain_to_root(id).len() - 1
    }

    /// All node IDs of a subtree in depth-first, insertion order
    pub fn depth_first(&self, root_id: Uuid) -> Vec<Uuid> {
        let mut result = Vec::new();
        self.collect_depth_first(root_id, &mut result);
        result
    }

    fn collect_depth_first(&self, id: Uuid, result: &mut Vec<Uuid>) {
        result.push(id);
        for child_id in self.children_of(id) {
            self.collect_depth_first(*child_id, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Armature, Uuid, Uuid, Uuid) {
        let mut armature = Armature::new("test");
        let root = armature.add_node("root");
        let child = armature.add_node("child");
        let grandchild = armature.add_node("grandchild");
        armature.add_child(root, child).unwrap();
        armature.add_child(child, grandchild).unwrap();
        (armature, root, child, grandchild)
    }

    #[test]
    fn test_chain_and_depth() {
        let (armature, root, child, grandchild) = chain();
        assert_eq!(armature.chain_to_root(grandchild), vec![grandchild, child, root]);
        assert_eq!(armature.depth(root), 0);
        assert_eq!(armature.depth(grandchild), 2);
        assert!(armature.is_ancestor(root, grandchild));
        assert!(!armature.is_ancestor(grandchild, root));
    }

    #[test]
    fn test_depth_first_preserves_insertion_order() {
        let mut armature = Armature::new("test");
        let root = armature.add_node("root");
        let names = ["c", "a", "b"];
        let ids: Vec<Uuid> = names.iter().map(|n| armature.add_node(*n)).collect();
        for id in &ids {
            armature.add_child(root, *id).unwrap();
        }

        let order = armature.depth_first(root);
        assert_eq!(order[0], root);
        assert_eq!(&order[1..], ids.as_slice());
    }

    #[test]
    fn test_roots_and_lookup() {
        let (mut armature, root, _, _) = chain();
        let other = armature.add_node("another");
        assert_eq!(armature.roots(), vec![other, root]);
        assert_eq!(armature.find_id_by_name("child"), armature.children_of(root).first().copied());
        assert_eq!(
            armature.id_by_name("missing"),
            Err(ArmatureError::NamedNodeNotFound("missing".to_string()))
        );
    }
}
