//! Error types for lifecycle and structural operations

use crate::tree::{TreeKind, TreeState};
use otdb_node::NodeId;
use std::fmt;

/// State machine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Transition is neither a promotion nor an allowed rollback
    #[error("illegal transition for {kind} tree: {from} -> {to}")]
    IllegalTransition {
        kind: TreeKind,
        from: TreeState,
        to: TreeState,
    },

    /// Tree no longer accepts changes of this kind
    #[error("tree in state {0} is closed")]
    Closed(TreeState),

    /// Constraint check failed before commit
    #[error("constraint check failed: {}", join_violations(.0))]
    ConstraintsFailed(Vec<ConstraintViolation>),
}

/// Errors from structural tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// Node not present in tree
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// Component not present in catalog
    #[error("component {0} not found")]
    ComponentNotFound(String),

    /// Sibling with same name and index already exists
    #[error("sibling {slot} already exists under node {parent}")]
    DuplicateSlot { parent: NodeId, slot: String },

    /// Tree already has a root
    #[error("tree already has root node {0}")]
    SecondRoot(NodeId),

    /// Name pattern uses more than one wildcard
    #[error("invalid name pattern '{0}': at most one '*' is allowed")]
    InvalidPattern(String),

    /// Root node cannot be duplicated or removed
    #[error("operation not allowed on root node {0}")]
    RootNode(NodeId),

    /// Tree kind does not support operation
    #[error("{operation} is not allowed on {kind} trees")]
    WrongKind {
        operation: &'static str,
        kind: TreeKind,
    },

    /// Tree can no longer be changed structurally
    #[error("tree in state {0} is not editable")]
    NotEditable(TreeState),

    /// Component graph references itself
    #[error("component cycle through '{0}'")]
    ComponentCycle(String),

    /// Tree has no root
    #[error("tree is empty")]
    EmptyTree,
}

/// One failed constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Two siblings share name and index
    DuplicateSibling { parent: NodeId, slot: String },

    /// Parent link points at a missing node
    DanglingParent { node: NodeId, parent: NodeId },

    /// Instance tree still holds a replicable node
    UnexpandedInstances { node: NodeId, instances: u16 },

    /// State requires a valid schedule
    MissingSchedule(TreeState),

    /// Component reference does not resolve in the catalog
    UnresolvedComponent { node: NodeId, name: String },
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSibling { parent, slot } => {
                write!(f, "duplicate sibling {slot} under node {parent}")
            }
            Self::DanglingParent { node, parent } => {
                write!(f, "node {node} points at missing parent {parent}")
            }
            Self::UnexpandedInstances { node, instances } => {
                write!(f, "node {node} still declares {instances} instances")
            }
            Self::MissingSchedule(state) => {
                write!(f, "state {state} requires a schedule with start before stop")
            }
            Self::UnresolvedComponent { node, name } => {
                write!(f, "node {node} references unknown component '{name}'")
            }
        }
    }
}

fn join_violations(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
