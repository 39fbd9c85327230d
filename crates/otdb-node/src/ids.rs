//! Numeric identifiers for trees and nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node, unique within its owning tree
///
/// `NodeId(0)` marks a node that has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for a node the store has not assigned an id to
    pub const UNSAVED: Self = Self(0);

    /// Check if the store has assigned this id
    #[inline]
    #[must_use]
    pub fn is_saved(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Identifier of a tree
///
/// `TreeId(0)` is reserved for the component catalog, which holds component
/// definitions but is not itself a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TreeId(pub u32);

impl TreeId {
    /// The component catalog pseudo-tree
    pub const CATALOG: Self = Self(0);

    /// Check if this id refers to the component catalog
    #[inline]
    #[must_use]
    pub fn is_catalog(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TreeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
