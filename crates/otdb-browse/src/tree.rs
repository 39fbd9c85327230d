//! Navigable tree
//!
//! A [`NavigableTree`] is the client-side view of one remote tree or
//! namespace store. Nodes live in an arena and refer to each other by
//! [`NavNodeId`]; parents own their ordered child lists and children keep a
//! plain id back to their parent. Child lists only grow.
//!
//! Every node carries a [`Materialization`] state. A node moves from
//! `Unmaterialized` to `Materializing` exactly once, before any remote call
//! is made for it, and ends `Materialized` whether or not the fetch worked.
//!
//! Each linked child is announced on the tree's change channel as a
//! [`TreeEvent::NodeInserted`].

use crate::error::{BrowseError, BrowseResult};
use crate::manager::ManagerKind;
use otdb_node::{Node, NodePath, ParamType};
use std::fmt;
use tokio::sync::broadcast;

/// Index of a node within its [`NavigableTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavNodeId(usize);

impl NavNodeId {
    /// Position in the arena
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NavNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Progress of fetching a node's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Materialization {
    #[default]
    Unmaterialized,
    Materializing,
    Materialized,
}

/// One node of a navigable tree
#[derive(Debug, Clone)]
pub struct NavNode {
    node: Node,
    parent: Option<NavNodeId>,
    children: Vec<NavNodeId>,
    state: Materialization,
    leaf: Option<bool>,
}

impl NavNode {
    /// Wrapped store node
    #[inline]
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Parent id, `None` for the root
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NavNodeId> {
        self.parent
    }

    /// Child ids in insertion order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NavNodeId] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> Materialization {
        self.state
    }

    /// Explicit leaf flag; `None` until known
    #[inline]
    #[must_use]
    pub fn leaf(&self) -> Option<bool> {
        self.leaf
    }

    #[inline]
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.state == Materialization::Materialized
    }
}

/// Store and name prefix a namespace tree lists from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceScope {
    pub store: String,
    /// Path the tree root stands for
    pub base: NodePath,
}

/// Notification sent on a tree's change channel
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    /// A node was linked below an existing parent
    NodeInserted {
        id: NavNodeId,
        node: Node,
        /// Display names from below the root down to the node
        path: NodePath,
        index_in_parent: usize,
    },
}

/// Arena of lazily materialized nodes
#[derive(Debug)]
pub struct NavigableTree {
    kind: ManagerKind,
    nodes: Vec<NavNode>,
    scope: Option<NamespaceScope>,
    events: broadcast::Sender<TreeEvent>,
}

impl NavigableTree {
    /// Create tree with an unmaterialized root
    #[must_use]
    pub fn new(kind: ManagerKind, root: Node, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            kind,
            nodes: vec![NavNode {
                node: root,
                parent: None,
                children: Vec::new(),
                state: Materialization::Unmaterialized,
                leaf: None,
            }],
            scope: None,
            events,
        }
    }

    /// Create tree whose root stands for "nothing selected"
    ///
    /// The root is materialized with no children, so expanding it never
    /// reaches a service.
    #[must_use]
    pub fn placeholder(kind: ManagerKind, name: &str, event_capacity: usize) -> Self {
        let mut tree = Self::new(kind, Node::group(name), event_capacity);
        tree.nodes[0].state = Materialization::Materialized;
        tree.nodes[0].leaf = Some(true);
        tree
    }

    /// With namespace scope
    #[must_use]
    pub fn with_scope(mut self, scope: NamespaceScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Manager variant that built this tree
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ManagerKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn scope(&self) -> Option<&NamespaceScope> {
        self.scope.as_ref()
    }

    /// Root id
    #[inline]
    #[must_use]
    pub fn root(&self) -> NavNodeId {
        NavNodeId(0)
    }

    /// Number of nodes, root included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NavNodeId) -> Option<&NavNode> {
        self.nodes.get(id.0)
    }

    /// Lookup node, failing if the id is foreign to this tree
    ///
    /// # Errors
    /// Returns [`BrowseError::UnknownNode`]
    pub fn require(&self, id: NavNodeId) -> BrowseResult<&NavNode> {
        self.nodes.get(id.0).ok_or(BrowseError::UnknownNode(id))
    }

    /// Child ids of a node; empty for unknown ids
    #[must_use]
    pub fn children(&self, id: NavNodeId) -> &[NavNodeId] {
        self.get(id).map_or(&[][..], NavNode::children)
    }

    /// First child whose name equals `name`
    #[must_use]
    pub fn find_child(&self, parent: NavNodeId, name: &str) -> Option<NavNodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].node.name == name)
    }

    /// Display-name path from below the root down to `id`
    #[must_use]
    pub fn path_of(&self, id: NavNodeId) -> NodePath {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(nav) = self.get(cur) else { break };
            if nav.parent.is_none() {
                break;
            }
            segments.push(nav.node.display_name());
            current = nav.parent;
        }
        segments.reverse();
        NodePath::new(segments)
    }

    /// Pre-order iteration over every node
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Receive insertion events from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TreeEvent> {
        self.events.subscribe()
    }

    /// Claim a node for materialization
    ///
    /// Returns `true` only for the caller that moves the node out of
    /// `Unmaterialized`; every later call returns `false`.
    pub fn begin_materialization(&mut self, id: NavNodeId) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(nav) if nav.state == Materialization::Unmaterialized => {
                nav.state = Materialization::Materializing;
                true
            }
            _ => false,
        }
    }

    /// Mark a claimed node as done
    pub fn finish_materialization(&mut self, id: NavNodeId) {
        if let Some(nav) = self.nodes.get_mut(id.0) {
            nav.state = Materialization::Materialized;
        }
    }

    /// Set the explicit leaf flag
    pub fn set_leaf(&mut self, id: NavNodeId, leaf: bool) {
        if let Some(nav) = self.nodes.get_mut(id.0) {
            nav.leaf = Some(leaf);
        }
    }

    /// Link a fetched node as the last child of `parent`
    ///
    /// # Errors
    /// Returns [`BrowseError::UnknownNode`] if `parent` is not in this tree
    pub fn append_child(&mut self, parent: NavNodeId, node: Node) -> BrowseResult<NavNodeId> {
        self.link(parent, node, Materialization::Unmaterialized, None)
    }

    fn link(
        &mut self,
        parent: NavNodeId,
        node: Node,
        state: Materialization,
        leaf: Option<bool>,
    ) -> BrowseResult<NavNodeId> {
        self.require(parent)?;
        let id = NavNodeId(self.nodes.len());
        self.nodes.push(NavNode {
            node,
            parent: Some(parent),
            children: Vec::new(),
            state,
            leaf,
        });
        let siblings = &mut self.nodes[parent.0].children;
        siblings.push(id);
        let index_in_parent = siblings.len() - 1;

        // No subscribers is fine
        let _ = self.events.send(TreeEvent::NodeInserted {
            id,
            node: self.nodes[id.0].node.clone(),
            path: self.path_of(id),
            index_in_parent,
        });
        Ok(id)
    }

    /// Walk `segments` down from `parent`, creating what is missing
    ///
    /// Existing children are matched by name and reused; a reused node that
    /// gains children is flagged non-leaf. Missing segments are synthesized
    /// as materialized nodes, the last one a leaf and the others groups.
    /// Returns the ids of the nodes created, outermost first.
    ///
    /// # Errors
    /// Returns [`BrowseError::UnknownNode`] if `parent` is not in this tree
    pub fn merge_path<S: AsRef<str>>(
        &mut self,
        parent: NavNodeId,
        segments: &[S],
    ) -> BrowseResult<Vec<NavNodeId>> {
        self.require(parent)?;
        let mut created = Vec::new();
        let mut current = parent;

        for (depth, segment) in segments.iter().enumerate() {
            let segment = segment.as_ref();
            let is_last = depth + 1 == segments.len();

            if created.is_empty() {
                if let Some(existing) = self.find_child(current, segment) {
                    if !is_last {
                        self.set_leaf(existing, false);
                    }
                    current = existing;
                    continue;
                }
            }

            let node = if is_last {
                Node::leaf(segment, ParamType::None)
            } else {
                Node::group(segment)
            };
            current = self.link(current, node, Materialization::Materialized, Some(is_last))?;
            created.push(current);
        }

        if !segments.is_empty() {
            self.set_leaf(parent, false);
        }
        Ok(created)
    }
}

/// Pre-order iterator over a [`NavigableTree`]
#[derive(Debug)]
pub struct Walk<'a> {
    tree: &'a NavigableTree,
    stack: Vec<NavNodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NavNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
