//! OTDB Service
//!
//! The boundary to the authoritative tree store, plus an in-process store
//! that implements it completely.
//!
//! # Core Concepts
//!
//! - [`RemoteTreeService`]: Tree CRUD, lifecycle and structural operations
//! - [`NamespaceService`]: Name listing over parameter stores
//! - [`ServiceError`]: Transport failure or rejection
//! - [`MemoryTreeService`]: In-memory store with a component catalog
//! - [`MemoryNamespaceService`]: Radix-trie backed name listing
//!
//! # Example
//!
//! ```rust
//! use otdb_lifecycle::{Classification, TreeKind};
//! use otdb_service::MemoryTreeService;
//!
//! let service = MemoryTreeService::default();
//! let tree = service.create_tree(TreeKind::Hardware, Classification::Operational);
//! assert!(!tree.is_catalog());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod memory;
mod namespace;
mod service;

// Re-exports
pub use error::{ServiceError, ServiceResult};
pub use memory::MemoryTreeService;
pub use namespace::MemoryNamespaceService;
pub use service::{NamespaceService, RemoteTreeService};

#[cfg(any(test, feature = "mock"))]
pub use service::{MockNamespaceService, MockRemoteTreeService};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
