//! Tree manager protocol
//!
//! A [`TreeManager`] knows how to name nodes, decide leafness, fetch
//! children and build a root for one kind of store. Managers hold no node
//! data; everything they learn is written into the [`NavigableTree`] they
//! are handed.

use crate::config::BrowseConfig;
use crate::error::{BrowseError, BrowseResult};
use crate::tree::{NavNode, NavNodeId, NavigableTree};
use async_trait::async_trait;
use otdb_node::{Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Manager variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManagerKind {
    /// Primary instrument catalog and its template/instance trees
    Instrument,
    /// Component (template building block) catalog
    Component,
    /// Delimited-name parameter stores
    Namespace,
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Instrument => "instrument",
            Self::Component => "component",
            Self::Namespace => "namespace",
        };
        f.write_str(name)
    }
}

/// Store-identifying arguments for [`TreeManager::root_node`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RootArgs {
    /// Nothing selected
    #[default]
    None,
    /// Numeric tree or component id
    Id(u64),
    /// Named store entry, optionally at a location inside it
    Descriptor {
        display_name: String,
        identifier: String,
        location: Option<String>,
    },
}

impl RootArgs {
    /// Parse the string tuple form
    ///
    /// One numeric element is an [`RootArgs::Id`], two or three elements a
    /// [`RootArgs::Descriptor`]. Everything else is [`RootArgs::None`].
    #[must_use]
    pub fn parse(args: &[&str]) -> Self {
        match args {
            [id] => id.trim().parse().map_or(Self::None, Self::Id),
            [display_name, identifier] => Self::descriptor(display_name, identifier, None),
            [display_name, identifier, location] => {
                Self::descriptor(display_name, identifier, Some(*location))
            }
            _ => Self::None,
        }
    }

    /// Create descriptor arguments
    #[must_use]
    pub fn descriptor(display_name: &str, identifier: &str, location: Option<&str>) -> Self {
        Self::Descriptor {
            display_name: display_name.to_string(),
            identifier: identifier.to_string(),
            location: location.filter(|l| !l.is_empty()).map(str::to_string),
        }
    }

    /// Arguments that select nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None | Self::Id(0) => true,
            Self::Id(_) => false,
            Self::Descriptor { identifier, .. } => identifier.trim().is_empty(),
        }
    }
}

/// Materialization protocol shared by every manager variant
#[async_trait]
pub trait TreeManager: Send + Sync {
    /// Variant of this manager
    fn kind(&self) -> ManagerKind;

    /// Configuration the manager was built with
    fn config(&self) -> &BrowseConfig;

    /// Display name of a node
    ///
    /// Array elements carry their bracketed index and component references
    /// the configured marker.
    fn name_for_node(&self, node: &NavNode) -> String {
        let inner = node.node();
        if inner.kind == NodeKind::ComponentRef {
            format!("{}{}", self.config().component_marker, inner.display_name())
        } else {
            inner.display_name()
        }
    }

    /// Whether the node can have no children
    ///
    /// The explicit flag wins once materialization has set it; until then
    /// the node kind decides.
    fn is_node_leaf(&self, node: &NavNode) -> bool {
        node.leaf().unwrap_or_else(|| !node.node().kind.can_have_children())
    }

    /// Fetch and link the children of `id`; returns the number of nodes added
    ///
    /// Only the first call for a node does any work. Failures are logged
    /// and leave the node materialized as a leaf without children.
    async fn materialize_children(&self, tree: &mut NavigableTree, id: NavNodeId) -> usize;

    /// Build a tree for the store entry `args` identifies
    ///
    /// Empty or unusable arguments yield a placeholder tree.
    ///
    /// # Errors
    /// Returns an error if a remote call fails while building a real root
    async fn root_node(&self, args: &RootArgs) -> BrowseResult<NavigableTree>;

    /// Placeholder tree for "nothing selected"
    fn placeholder(&self) -> NavigableTree {
        let config = self.config();
        NavigableTree::placeholder(self.kind(), &config.placeholder_name, config.event_capacity)
    }
}

/// Expand a node on behalf of the presentation layer
///
/// # Errors
/// - `WrongManager` if `tree` was built by another manager variant
/// - `UnknownNode` if `id` is not in `tree`
pub async fn expand(
    manager: &dyn TreeManager,
    tree: &mut NavigableTree,
    id: NavNodeId,
) -> BrowseResult<usize> {
    if tree.kind() != manager.kind() {
        return Err(BrowseError::WrongManager {
            expected: manager.kind(),
            actual: tree.kind(),
        });
    }
    tree.require(id)?;
    Ok(manager.materialize_children(tree, id).await)
}

/// Link fetched nodes below `parent` in order; returns how many were linked
pub(crate) fn link_children(tree: &mut NavigableTree, parent: NavNodeId, nodes: Vec<Node>) -> usize {
    nodes
        .into_iter()
        .filter_map(|node| tree.append_child(parent, node).ok())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_id() {
        assert_eq!(RootArgs::parse(&["42"]), RootArgs::Id(42));
        assert_eq!(RootArgs::parse(&["abc"]), RootArgs::None);
        assert!(RootArgs::parse(&["0"]).is_empty());
    }

    #[test]
    fn parse_descriptor() {
        assert_eq!(
            RootArgs::parse(&["Parameters", "params"]),
            RootArgs::Descriptor {
                display_name: "Parameters".into(),
                identifier: "params".into(),
                location: None,
            }
        );
        let args = RootArgs::parse(&["Parameters", "params", "LOFAR.ObsSW"]);
        assert!(matches!(args, RootArgs::Descriptor { location: Some(ref l), .. } if l == "LOFAR.ObsSW"));
        assert!(RootArgs::parse(&["Parameters", " "]).is_empty());
    }

    #[test]
    fn parse_other_shapes() {
        assert_eq!(RootArgs::parse(&[]), RootArgs::None);
        assert_eq!(RootArgs::parse(&["a", "b", "c", "d"]), RootArgs::None);
        assert!(RootArgs::None.is_empty());
    }

    #[test]
    fn kind_display() {
        assert_eq!(ManagerKind::Instrument.to_string(), "instrument");
        assert_eq!(ManagerKind::Namespace.to_string(), "namespace");
    }
}
