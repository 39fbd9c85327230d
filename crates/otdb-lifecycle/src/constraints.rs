//! Tree constraint checking
//!
//! Every state or classification change is validated against the full
//! constraint set of the tree's kind before it commits.

use crate::catalog::ComponentCatalog;
use crate::error::{ConstraintViolation, StateMachineError};
use crate::table::NodeTable;
use crate::tree::{TreeInfo, TreeKind, TreeState};
use otdb_node::{NodeId, NodeKind};
use std::collections::HashSet;

/// Collect every violated constraint
///
/// With `top`, node-level checks are limited to that subtree; tree-level
/// checks (schedule) are always evaluated against `state`.
#[must_use]
pub fn check_constraints(
    info: &TreeInfo,
    state: TreeState,
    table: &NodeTable,
    top: Option<NodeId>,
    catalog: Option<&ComponentCatalog>,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();
    let scope = match top.or(table.root()) {
        Some(start) => table.subtree(start),
        None => Vec::new(),
    };

    for &id in &scope {
        let Some(node) = table.get(id) else { continue };

        if let Some(parent) = node.parent_id {
            if table.get(parent).is_none() {
                violations.push(ConstraintViolation::DanglingParent { node: id, parent });
            }
        }

        let mut seen = HashSet::new();
        for child in table.child_nodes(id) {
            if !seen.insert((child.name.as_str(), child.index)) {
                violations.push(ConstraintViolation::DuplicateSibling {
                    parent: id,
                    slot: child.display_name(),
                });
            }
        }

        if info.kind == TreeKind::Instance && node.instances > 1 {
            violations.push(ConstraintViolation::UnexpandedInstances {
                node: id,
                instances: node.instances,
            });
        }

        if info.kind.is_template() && node.kind == NodeKind::ComponentRef {
            let resolves = catalog.is_some_and(|c| c.by_name(&node.name).is_some());
            if !resolves {
                violations.push(ConstraintViolation::UnresolvedComponent {
                    node: id,
                    name: node.name.clone(),
                });
            }
        }
    }

    if info.kind == TreeKind::Instance
        && state.needs_schedule()
        && !info.schedule.is_some_and(|s| s.is_valid())
    {
        violations.push(ConstraintViolation::MissingSchedule(state));
    }

    violations
}

/// Fail with every violation if any constraint does not hold
///
/// # Errors
/// Returns `ConstraintsFailed` listing the violations
pub fn ensure_constraints(
    info: &TreeInfo,
    state: TreeState,
    table: &NodeTable,
    top: Option<NodeId>,
    catalog: Option<&ComponentCatalog>,
) -> Result<(), StateMachineError> {
    let violations = check_constraints(info, state, table, top, catalog);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(StateMachineError::ConstraintsFailed(violations))
    }
}
