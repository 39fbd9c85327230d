//! OTDB Node Model
//!
//! Value types shared by every layer of the observation configuration tree
//! client.
//!
//! # Core Concepts
//!
//! - [`Node`]: One tree element, a leaf parameter, group or component reference
//! - [`NodeKind`]: Explicit node classification set at construction
//! - [`NodeId`] / [`TreeId`]: Numeric identities assigned by the store
//! - [`NodePath`]: Delimited addressing for namespace stores
//!
//! # Example
//!
//! ```rust
//! use otdb_node::{Node, NodeKind};
//!
//! let node = Node::from_raw_name("#RCU", NodeKind::Leaf);
//! assert_eq!(node.kind, NodeKind::ComponentRef);
//! assert_eq!(node.name, "RCU");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod ids;
mod node;
mod path;

// Re-exports
pub use ids::{NodeId, TreeId};
pub use node::{
    index_from_raw, parse_indexed_name, Node, NodeKind, ParamType, COMPONENT_MARKER,
};
pub use path::{NodePath, PathError, DEFAULT_SEPARATOR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
