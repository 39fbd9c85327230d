//! Structural tree transformations
//!
//! Operations that derive new structure from existing trees or from the
//! component catalog:
//! - [`duplicate_subtree`]: grow a replicated element inside one tree
//! - [`build_template`]: expand a component graph into a template
//! - [`instantiate`]: replicate every node by its instance count
//! - [`prune`]: drop parameters below an archival level
//! - [`copy_template`]: relabel a template for independent editing
//!
//! Every operation validates before it mutates, so a rejected call leaves
//! its input unchanged.

use crate::catalog::ComponentCatalog;
use crate::error::StructureError;
use crate::table::NodeTable;
use otdb_node::{Node, NodeId, NodeKind, TreeId};
use std::collections::BTreeSet;

/// Clone `source` with all descendants under the same parent at `new_index`
///
/// # Errors
/// - `NodeNotFound` if `source` is unknown
/// - `RootNode` if `source` is the root
/// - `DuplicateSlot` if a sibling already has the source's name at `new_index`
pub fn duplicate_subtree(
    table: &mut NodeTable,
    source: NodeId,
    new_index: u32,
) -> Result<NodeId, StructureError> {
    let original = table.require(source)?;
    let Some(parent) = original.parent_id else {
        return Err(StructureError::RootNode(source));
    };

    let mut head = original.clone().with_index(new_index);
    head.node_id = NodeId::UNSAVED;
    head.parent_id = Some(parent);
    let new_id = table.insert(head)?;

    // Snapshot before copying so the fresh nodes are not visited
    let snapshot = table.clone();
    for &child in snapshot.children(source) {
        copy_subtree(&snapshot, child, table, Some(new_id))?;
    }
    Ok(new_id)
}

/// Copy `src_id` and descendants from `src` into `dst` under `dst_parent`
fn copy_subtree(
    src: &NodeTable,
    src_id: NodeId,
    dst: &mut NodeTable,
    dst_parent: Option<NodeId>,
) -> Result<NodeId, StructureError> {
    let mut node = src.require(src_id)?.clone();
    node.node_id = NodeId::UNSAVED;
    node.parent_id = dst_parent;
    let new_id = dst.insert(node)?;
    for &child in src.children(src_id) {
        copy_subtree(src, child, dst, Some(new_id))?;
    }
    Ok(new_id)
}

/// Expand a component into a template tree
///
/// Component references become groups holding the referenced component's
/// parameters. Instance counts are carried but not replicated.
///
/// # Errors
/// - `ComponentNotFound` if `top` or any referenced component is unknown
/// - `ComponentCycle` if a component references itself, directly or not
pub fn build_template(
    catalog: &ComponentCatalog,
    top: NodeId,
    tree_id: TreeId,
) -> Result<NodeTable, StructureError> {
    let mut table = NodeTable::new(tree_id);
    let root_node = catalog.node(top)?;
    let mut path = vec![root_node.name.clone()];
    let root = table.insert(root_node)?;
    expand_component(catalog, top, &mut table, root, &mut path)?;
    Ok(table)
}

fn expand_component(
    catalog: &ComponentCatalog,
    component: NodeId,
    table: &mut NodeTable,
    parent: NodeId,
    path: &mut Vec<String>,
) -> Result<(), StructureError> {
    for param in catalog.params(component)? {
        if param.kind != NodeKind::ComponentRef {
            let mut node = param.clone();
            node.node_id = NodeId::UNSAVED;
            node.parent_id = Some(parent);
            table.insert(node)?;
            continue;
        }

        if path.contains(&param.name) {
            return Err(StructureError::ComponentCycle(param.name.clone()));
        }
        let def = catalog
            .by_name(&param.name)
            .ok_or_else(|| StructureError::ComponentNotFound(param.name.clone()))?;

        let mut group = Node::group(param.name.clone())
            .with_instances(param.instances)
            .with_parent(parent)
            .with_description(def.description.clone());
        group.index = param.index;
        let group_id = table.insert(group)?;

        path.push(param.name.clone());
        expand_component(catalog, def.component_id, table, group_id, path)?;
        path.pop();
    }
    Ok(())
}

/// Produce an instance tree from a template
///
/// Every array declaration becomes `k = instances` siblings indexed
/// `1..=k`, each with a full copy of the subtree. A declaration is a
/// non-root group without an explicit index (what component references
/// expand to), or any node with `instances > 1`. Other nodes are copied
/// once with their index unchanged. All copies carry `instances = 1`.
///
/// # Errors
/// - `EmptyTree` if the template has no root
/// - `DuplicateSlot` if replication collides with an explicitly indexed sibling
pub fn instantiate(template: &NodeTable, tree_id: TreeId) -> Result<NodeTable, StructureError> {
    let root = template.root().ok_or(StructureError::EmptyTree)?;
    let mut instance = NodeTable::new(tree_id);

    let mut root_node = template.require(root)?.clone();
    root_node.node_id = NodeId::UNSAVED;
    root_node.instances = 1;
    let new_root = instance.insert(root_node)?;
    replicate_children(template, root, &mut instance, new_root)?;
    Ok(instance)
}

fn replicate_children(
    template: &NodeTable,
    src_parent: NodeId,
    dst: &mut NodeTable,
    dst_parent: NodeId,
) -> Result<(), StructureError> {
    for child in template.child_nodes(src_parent) {
        for index in replica_indices(child) {
            let mut node = child.clone();
            node.node_id = NodeId::UNSAVED;
            node.parent_id = Some(dst_parent);
            node.index = index;
            node.instances = 1;
            let new_id = dst.insert(node)?;
            replicate_children(template, child.node_id, dst, new_id)?;
        }
    }
    Ok(())
}

fn replica_indices(node: &Node) -> Vec<Option<u32>> {
    let declared_array =
        node.instances > 1 || (node.kind == NodeKind::Group && node.index.is_none());
    if declared_array {
        (1..=u32::from(node.instances.max(1))).map(Some).collect()
    } else {
        vec![node.index]
    }
}

/// Remove leaf parameters whose pruning level is below `level`
///
/// Groups emptied by the removal are removed too, up to (not including)
/// the root. Returns the number of nodes removed.
///
/// # Errors
/// Returns `EmptyTree` if the table has no root
pub fn prune(table: &mut NodeTable, level: u16) -> Result<usize, StructureError> {
    let root = table.root().ok_or(StructureError::EmptyTree)?;

    let doomed: Vec<NodeId> = table
        .nodes()
        .filter(|n| n.kind == NodeKind::Leaf && n.pruning < level && n.node_id != root)
        .map(|n| n.node_id)
        .collect();

    let mut touched = BTreeSet::new();
    let mut removed = 0;
    for id in doomed {
        if let Some(parent) = table.get(id).and_then(|n| n.parent_id) {
            touched.insert(parent);
        }
        removed += table.remove_subtree(id)?.len();
    }

    // Walk emptied groups upwards; pop_last visits higher ids first, and
    // children are always inserted after their parents.
    while let Some(id) = touched.pop_last() {
        if id == root || !table.children(id).is_empty() {
            continue;
        }
        let Some(node) = table.get(id) else { continue };
        if let Some(parent) = node.parent_id {
            touched.insert(parent);
        }
        removed += table.remove_subtree(id)?.len();
    }
    Ok(removed)
}

/// Copy a tree's nodes into a new tree id, preserving structure and sibling order
///
/// # Errors
/// Returns `EmptyTree` if the source has no root
pub fn copy_template(source: &NodeTable, tree_id: TreeId) -> Result<NodeTable, StructureError> {
    let root = source.root().ok_or(StructureError::EmptyTree)?;
    let mut copy = NodeTable::new(tree_id);
    copy_subtree(source, root, &mut copy, None)?;
    Ok(copy)
}
