//! Node value type
//!
//! Provides [`Node`], one element of a configuration tree: either a leaf
//! parameter, a group, or a reference to a component defined in the catalog.

use crate::ids::{NodeId, TreeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character that marks a stored name as a component reference (`#RCU`)
pub const COMPONENT_MARKER: char = '#';

/// Classification of a node, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeKind {
    /// Parameter carrying a value
    #[default]
    Leaf,

    /// Container of other nodes
    Group,

    /// Reference to an externally defined component, resolved on demand
    ComponentRef,
}

impl NodeKind {
    /// Whether nodes of this kind can have children
    #[inline]
    #[must_use]
    pub fn can_have_children(self) -> bool {
        !matches!(self, Self::Leaf)
    }
}

/// Value type of a leaf parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParamType {
    /// No value (groups and references)
    #[default]
    None,
    Bool,
    Int,
    Unsigned,
    Float,
    Text,
    /// Timestamp
    Time,
    /// Vector of texts
    TextVector,
    /// Vector of integers
    IntVector,
}

/// Convert a raw stored index (`-1`/`0` sentinels) to an array position
#[inline]
#[must_use]
pub fn index_from_raw(raw: i32) -> Option<u32> {
    u32::try_from(raw).ok().filter(|&i| i > 0)
}

/// Split `Foo[3]` into `("Foo", Some(3))`
///
/// Names without a well-formed trailing index come back unchanged.
#[must_use]
pub fn parse_indexed_name(raw: &str) -> (&str, Option<u32>) {
    let Some(body) = raw.strip_suffix(']') else {
        return (raw, None);
    };
    let Some(open) = body.rfind('[') else {
        return (raw, None);
    };
    match body[open + 1..].parse::<i32>() {
        Ok(idx) => (&body[..open], index_from_raw(idx)),
        Err(_) => (raw, None),
    }
}

/// One element of a configuration tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node identity within its tree
    pub node_id: NodeId,

    /// Owning tree
    pub tree_id: TreeId,

    /// Parent node, `None` for a root
    pub parent_id: Option<NodeId>,

    /// Base name without index or marker
    pub name: String,

    /// Array position, `None` when not an array element
    pub index: Option<u32>,

    /// Leaf, group or component reference
    pub kind: NodeKind,

    /// Value type (leaves only)
    pub value_type: ParamType,

    /// Value or allowed range
    pub limits: String,

    /// Physical unit
    pub unit: String,

    /// Free-form description
    pub description: String,

    /// Number of replicas to create when the tree is instantiated
    pub instances: u16,

    /// Archival relevance level; leaves below the prune level are dropped
    pub pruning: u16,
}

impl Node {
    /// Create an unsaved node of the given kind
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            node_id: NodeId::UNSAVED,
            tree_id: TreeId::CATALOG,
            parent_id: None,
            name: name.into(),
            index: None,
            kind,
            value_type: ParamType::None,
            limits: String::new(),
            unit: String::new(),
            description: String::new(),
            instances: 1,
            pruning: 0,
        }
    }

    /// Create an unsaved leaf parameter
    #[inline]
    #[must_use]
    pub fn leaf(name: impl Into<String>, value_type: ParamType) -> Self {
        let mut node = Self::new(name, NodeKind::Leaf);
        node.value_type = value_type;
        node
    }

    /// Create an unsaved group
    #[inline]
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    /// Create an unsaved component reference
    #[inline]
    #[must_use]
    pub fn component_ref(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::ComponentRef)
    }

    /// Build a node from a name as the store spells it
    ///
    /// A leading [`COMPONENT_MARKER`] makes a component reference, and a
    /// trailing `[n]` becomes the index. Anything else is a node of
    /// `fallback` kind.
    #[must_use]
    pub fn from_raw_name(raw: &str, fallback: NodeKind) -> Self {
        let (kind, rest) = match raw.strip_prefix(COMPONENT_MARKER) {
            Some(stripped) => (NodeKind::ComponentRef, stripped),
            None => (fallback, raw),
        };
        let (base, index) = parse_indexed_name(rest);
        let mut node = Self::new(base, kind);
        node.index = index;
        node
    }

    /// Set identity, returning self
    #[inline]
    #[must_use]
    pub fn with_id(mut self, tree_id: TreeId, node_id: NodeId) -> Self {
        self.tree_id = tree_id;
        self.node_id = node_id;
        self
    }

    /// Set parent, returning self
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Set array index, returning self
    #[inline]
    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    /// Set instance count, returning self
    #[inline]
    #[must_use]
    pub fn with_instances(mut self, instances: u16) -> Self {
        self.instances = instances;
        self
    }

    /// Set limits, returning self
    #[inline]
    #[must_use]
    pub fn with_limits(mut self, limits: impl Into<String>) -> Self {
        self.limits = limits.into();
        self
    }

    /// Set pruning level, returning self
    #[inline]
    #[must_use]
    pub fn with_pruning(mut self, pruning: u16) -> Self {
        self.pruning = pruning;
        self
    }

    /// Set description, returning self
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this node is an element of a replicated array
    #[inline]
    #[must_use]
    pub fn is_array_element(&self) -> bool {
        self.index.is_some()
    }

    /// Whether this node is a root
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether two nodes occupy the same sibling slot (name and index)
    #[inline]
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        self.name == other.name && self.index == other.index
    }

    /// Name with bracketed index for array elements
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.index {
            Some(idx) => format!("{}[{idx}]", self.name),
            None => self.name.clone(),
        }
    }

    /// Name as the store spells it, with marker for component references
    #[must_use]
    pub fn raw_name(&self) -> String {
        match self.kind {
            NodeKind::ComponentRef => format!("{COMPONENT_MARKER}{}", self.display_name()),
            _ => self.display_name(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.raw_name(), self.tree_id, self.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_index_sentinels() {
        assert_eq!(index_from_raw(-1), None);
        assert_eq!(index_from_raw(0), None);
        assert_eq!(index_from_raw(4), Some(4));
    }

    #[test]
    fn parse_indexed_names() {
        assert_eq!(parse_indexed_name("Foo[3]"), ("Foo", Some(3)));
        assert_eq!(parse_indexed_name("Foo"), ("Foo", None));
        assert_eq!(parse_indexed_name("Foo[-1]"), ("Foo", None));
        assert_eq!(parse_indexed_name("Foo[x]"), ("Foo[x]", None));
        assert_eq!(parse_indexed_name("Foo]"), ("Foo]", None));
    }

    #[test]
    fn from_raw_name_detects_reference() {
        let node = Node::from_raw_name("#RCU", NodeKind::Leaf);
        assert_eq!(node.kind, NodeKind::ComponentRef);
        assert_eq!(node.name, "RCU");
        assert_eq!(node.raw_name(), "#RCU");
    }

    #[test]
    fn from_raw_name_with_index() {
        let node = Node::from_raw_name("Station[2]", NodeKind::Group);
        assert_eq!(node.kind, NodeKind::Group);
        assert_eq!(node.name, "Station");
        assert_eq!(node.index, Some(2));
        assert_eq!(node.display_name(), "Station[2]");
    }

    #[test]
    fn same_slot_compares_name_and_index() {
        let a = Node::group("Station").with_index(1);
        let b = Node::group("Station").with_index(1).with_id(TreeId(1), NodeId(9));
        let c = Node::group("Station").with_index(2);
        assert!(a.same_slot(&b));
        assert!(!a.same_slot(&c));
    }

    #[test]
    fn kind_children() {
        assert!(!NodeKind::Leaf.can_have_children());
        assert!(NodeKind::Group.can_have_children());
        assert!(NodeKind::ComponentRef.can_have_children());
    }

    #[test]
    fn node_serde_roundtrip() {
        let node = Node::leaf("clock", ParamType::Unsigned).with_limits("200");
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
