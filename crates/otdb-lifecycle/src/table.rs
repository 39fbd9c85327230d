//! In-memory node table for a single tree
//!
//! Provides [`NodeTable`], the node storage the structural algorithms
//! operate on. Children keep insertion order.

use crate::error::StructureError;
use otdb_node::{Node, NodeId, TreeId};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Nodes of one tree with parent/child links
#[derive(Debug, Clone)]
pub struct NodeTable {
    tree_id: TreeId,
    nodes: BTreeMap<NodeId, Node>,
    children: HashMap<NodeId, Vec<NodeId>>,
    root: Option<NodeId>,
    next_id: u32,
}

impl NodeTable {
    /// Create empty table for a tree
    #[inline]
    #[must_use]
    pub fn new(tree_id: TreeId) -> Self {
        Self {
            tree_id,
            nodes: BTreeMap::new(),
            children: HashMap::new(),
            root: None,
            next_id: 1,
        }
    }

    /// Owning tree
    #[inline]
    #[must_use]
    pub fn tree_id(&self) -> TreeId {
        self.tree_id
    }

    /// Root node id
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if table holds no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Lookup node by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Lookup node by id, failing if absent
    ///
    /// # Errors
    /// Returns [`StructureError::NodeNotFound`] if the id is unknown
    pub fn require(&self, id: NodeId) -> Result<&Node, StructureError> {
        self.nodes.get(&id).ok_or(StructureError::NodeNotFound(id))
    }

    /// Iterate all nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Child ids in insertion order
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map_or(&[][..], Vec::as_slice)
    }

    /// Child nodes in insertion order
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.children(id).iter().filter_map(|c| self.nodes.get(c))
    }

    /// Insert a node, assigning a fresh id
    ///
    /// A node without parent becomes the root.
    ///
    /// # Errors
    /// - `NodeNotFound` if the parent is unknown
    /// - `SecondRoot` if the tree already has a root
    /// - `DuplicateSlot` if a sibling already has the same name and index
    pub fn insert(&mut self, mut node: Node) -> Result<NodeId, StructureError> {
        match node.parent_id {
            None => {
                if let Some(root) = self.root {
                    return Err(StructureError::SecondRoot(root));
                }
            }
            Some(parent) => {
                self.require(parent)?;
                self.check_slot_free(parent, &node, None)?;
            }
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.node_id = id;
        node.tree_id = self.tree_id;

        match node.parent_id {
            None => self.root = Some(id),
            Some(parent) => self.children.entry(parent).or_default().push(id),
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Insert a new node or update an existing one in place
    ///
    /// Updates keep the node's position; the parent link cannot be changed.
    ///
    /// # Errors
    /// Same as [`NodeTable::insert`], and `DuplicateSlot` if a rename
    /// collides with a sibling.
    pub fn upsert(&mut self, node: Node) -> Result<NodeId, StructureError> {
        let id = node.node_id;
        let Some(existing) = self.nodes.get(&id) else {
            return self.insert(node);
        };
        if let Some(parent) = existing.parent_id {
            self.check_slot_free(parent, &node, Some(id))?;
        }
        let parent_id = existing.parent_id;
        let mut updated = node;
        updated.tree_id = self.tree_id;
        updated.parent_id = parent_id;
        self.nodes.insert(id, updated);
        Ok(id)
    }

    fn check_slot_free(
        &self,
        parent: NodeId,
        node: &Node,
        ignore: Option<NodeId>,
    ) -> Result<(), StructureError> {
        let taken = self
            .child_nodes(parent)
            .any(|c| Some(c.node_id) != ignore && c.same_slot(node));
        if taken {
            Err(StructureError::DuplicateSlot {
                parent,
                slot: node.display_name(),
            })
        } else {
            Ok(())
        }
    }

    /// Ids of `id` and all descendants, parents before children
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(&current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Node and descendants up to `depth` levels, breadth-first
    ///
    /// `depth = 0` yields the node alone.
    ///
    /// # Errors
    /// Returns `NodeNotFound` if `root` is unknown
    pub fn item_list(&self, root: NodeId, depth: u32) -> Result<Vec<Node>, StructureError> {
        let mut out = vec![self.require(root)?.clone()];
        let mut queue = VecDeque::from([(root, 0u32)]);
        while let Some((current, level)) = queue.pop_front() {
            if level >= depth {
                continue;
            }
            for child in self.child_nodes(current) {
                out.push(child.clone());
                queue.push_back((child.node_id, level + 1));
            }
        }
        Ok(out)
    }

    /// Nodes whose name matches a pattern with at most one `*`
    ///
    /// # Errors
    /// Returns `InvalidPattern` if the pattern has more than one wildcard
    pub fn find(&self, pattern: &str) -> Result<Vec<Node>, StructureError> {
        let matcher = NamePattern::parse(pattern)?;
        Ok(self
            .nodes
            .values()
            .filter(|n| matcher.matches(&n.name))
            .cloned()
            .collect())
    }

    /// Remove a node and all its descendants, returning them
    ///
    /// # Errors
    /// Returns `NodeNotFound` if `id` is unknown
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<Vec<Node>, StructureError> {
        let parent = self.require(id)?.parent_id;
        let ids = self.subtree(id);
        if let Some(parent) = parent {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|&c| c != id);
            }
        } else {
            self.root = None;
        }
        let mut removed = Vec::with_capacity(ids.len());
        for node_id in ids {
            self.children.remove(&node_id);
            if let Some(node) = self.nodes.remove(&node_id) {
                removed.push(node);
            }
        }
        Ok(removed)
    }
}

/// Name matcher with a single optional wildcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    prefix: String,
    suffix: Option<String>,
}

impl NamePattern {
    /// Parse pattern such as `Beam*`, `*former` or `Station`
    ///
    /// # Errors
    /// Returns `InvalidPattern` if the pattern has more than one `*`
    pub fn parse(pattern: &str) -> Result<Self, StructureError> {
        let mut parts = pattern.splitn(3, '*');
        let prefix = parts.next().unwrap_or_default().to_string();
        let suffix = parts.next().map(str::to_string);
        if parts.next().is_some() {
            return Err(StructureError::InvalidPattern(pattern.to_string()));
        }
        Ok(Self { prefix, suffix })
    }

    /// Check a name against the pattern
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match &self.suffix {
            None => name == self.prefix,
            Some(suffix) => {
                name.len() >= self.prefix.len() + suffix.len()
                    && name.starts_with(&self.prefix)
                    && name.ends_with(suffix.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otdb_node::ParamType;

    fn station_table() -> (NodeTable, NodeId, NodeId) {
        let mut table = NodeTable::new(TreeId(1));
        let root = table.insert(Node::group("Observation")).unwrap();
        let station = table
            .insert(Node::group("Station").with_index(1).with_parent(root))
            .unwrap();
        table
            .insert(Node::leaf("clock", ParamType::Unsigned).with_parent(station))
            .unwrap();
        (table, root, station)
    }

    #[test]
    fn insert_assigns_ids_and_root() {
        let (table, root, station) = station_table();
        assert_eq!(table.root(), Some(root));
        assert_ne!(root, station);
        assert_eq!(table.get(station).unwrap().tree_id, TreeId(1));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn insert_rejects_second_root() {
        let (mut table, root, _) = station_table();
        let result = table.insert(Node::group("Other"));
        assert_eq!(result, Err(StructureError::SecondRoot(root)));
    }

    #[test]
    fn insert_rejects_duplicate_slot() {
        let (mut table, root, _) = station_table();
        let result = table.insert(Node::group("Station").with_index(1).with_parent(root));
        assert!(matches!(result, Err(StructureError::DuplicateSlot { .. })));

        let ok = table.insert(Node::group("Station").with_index(2).with_parent(root));
        assert!(ok.is_ok());
    }

    #[test]
    fn insert_rejects_unknown_parent() {
        let (mut table, _, _) = station_table();
        let result = table.insert(Node::group("X").with_parent(NodeId(77)));
        assert_eq!(result, Err(StructureError::NodeNotFound(NodeId(77))));
    }

    #[test]
    fn upsert_updates_in_place() {
        let (mut table, _, station) = station_table();
        let mut node = table.get(station).unwrap().clone();
        node.description = "core station".into();
        node.parent_id = None;
        table.upsert(node).unwrap();

        let stored = table.get(station).unwrap();
        assert_eq!(stored.description, "core station");
        assert!(stored.parent_id.is_some());
    }

    #[test]
    fn item_list_depths() {
        let (table, root, _) = station_table();
        assert_eq!(table.item_list(root, 0).unwrap().len(), 1);
        assert_eq!(table.item_list(root, 1).unwrap().len(), 2);
        assert_eq!(table.item_list(root, 5).unwrap().len(), 3);
    }

    #[test]
    fn remove_subtree_detaches() {
        let (mut table, root, station) = station_table();
        let removed = table.remove_subtree(station).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(table.children(root).is_empty());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn find_with_wildcard() {
        let (table, _, _) = station_table();
        assert_eq!(table.find("Sta*").unwrap().len(), 1);
        assert_eq!(table.find("*").unwrap().len(), 3);
        assert_eq!(table.find("clock").unwrap().len(), 1);
        assert!(table.find("*a*").is_err());
    }

    #[test]
    fn pattern_needs_room_for_both_ends() {
        let pattern = NamePattern::parse("ab*ba").unwrap();
        assert!(pattern.matches("abba"));
        assert!(!pattern.matches("aba"));
    }
}
