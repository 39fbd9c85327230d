//! OTDB Lifecycle
//!
//! Rules for a tree's life from component definition through template,
//! instance, scheduling and execution, plus the structural algorithms that
//! derive new trees from existing ones.
//!
//! # Core Concepts
//!
//! - [`TreeInfo`]: Metadata record of one tree
//! - [`TreeState`]: Ordered lifecycle state
//! - [`validate_transition`]: Legal transitions per [`TreeKind`]
//! - [`check_constraints`]: Constraint set gating every transition
//! - [`NodeTable`]: In-memory nodes of one tree
//! - [`ComponentCatalog`]: Component definitions templates are built from
//!
//! # Example
//!
//! ```rust
//! use otdb_lifecycle::{validate_transition, TransitionKind, TreeKind, TreeState};
//!
//! let step = validate_transition(TreeKind::Instance, TreeState::Approved, TreeState::Scheduled);
//! assert_eq!(step, Ok(TransitionKind::Promotion));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod catalog;
mod constraints;
mod error;
mod table;
mod tree;

pub mod state_machine;
pub mod structure;

// Re-exports
pub use catalog::{ComponentCatalog, ComponentDef};
pub use constraints::{check_constraints, ensure_constraints};
pub use error::{ConstraintViolation, StateMachineError, StructureError};
pub use state_machine::{
    allowed_rollbacks, allowed_transitions, validate_transition, ConstraintPolicy,
    LifecycleConfig, TransitionKind,
};
pub use table::{NamePattern, NodeTable};
pub use tree::{initial_state, Classification, Schedule, TreeInfo, TreeKind, TreeState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
