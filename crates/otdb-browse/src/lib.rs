//! OTDB Browse
//!
//! Lazily materialized, navigable views over configuration trees and
//! parameter namespaces. Nothing is fetched until a node is expanded, and
//! every node is fetched at most once.
//!
//! # Core Concepts
//!
//! - [`NavigableTree`]: Arena of nodes with parent/child links and a change channel
//! - [`TreeManager`]: Naming, leafness, materialization and root building per store
//! - [`InstrumentManager`], [`ComponentManager`], [`NamespaceManager`]: The three variants
//! - [`ManagerRegistry`]: One shared manager per credential and variant
//! - [`TreeEvent`]: Insertion notification for subscribers
//!
//! # Example
//!
//! ```rust
//! use otdb_browse::{ManagerKind, NavigableTree};
//! use otdb_node::Node;
//!
//! let mut tree = NavigableTree::new(ManagerKind::Namespace, Node::group("params"), 16);
//! let root = tree.root();
//! tree.merge_path(root, &["solver", "chi"]).unwrap();
//! tree.merge_path(root, &["solver", "rank"]).unwrap();
//!
//! let solver = tree.find_child(root, "solver").unwrap();
//! assert_eq!(tree.children(solver).len(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod component;
mod config;
mod error;
mod instrument;
mod manager;
mod namespace;
mod registry;
mod tree;

// Re-exports
pub use component::ComponentManager;
pub use config::BrowseConfig;
pub use error::{BrowseError, BrowseResult};
pub use instrument::InstrumentManager;
pub use manager::{expand, ManagerKind, RootArgs, TreeManager};
pub use namespace::NamespaceManager;
pub use registry::{Credential, ManagerRegistry, SessionConnector, SharedConnector};
pub use tree::{
    Materialization, NamespaceScope, NavNode, NavNodeId, NavigableTree, TreeEvent, Walk,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
