//! Service contracts
//!
//! [`RemoteTreeService`] is the boundary to the authoritative tree store;
//! [`NamespaceService`] is the boundary to delimited-name parameter stores.
//! Each call is one request and one reply; callers await every call before
//! issuing the next.

use crate::error::ServiceResult;
use async_trait::async_trait;
use otdb_lifecycle::{Classification, ComponentDef, Schedule, TreeInfo, TreeKind, TreeState};
use otdb_node::{Node, NodeId, TreeId};

/// Tree CRUD, lifecycle and structural operations of the tree store
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait RemoteTreeService: Send + Sync {
    /// Fetch one node
    async fn get_node(&self, tree: TreeId, node: NodeId) -> ServiceResult<Node>;

    /// Node and descendants up to `depth` levels; `depth = 0` is the node alone
    async fn get_item_list(&self, tree: TreeId, root: NodeId, depth: u32)
        -> ServiceResult<Vec<Node>>;

    /// Nodes whose name matches a pattern with at most one `*`
    async fn find_items(&self, tree: TreeId, pattern: &str) -> ServiceResult<Vec<Node>>;

    /// Insert or update one node, returning its id
    async fn save_node(&self, node: &Node) -> ServiceResult<NodeId>;

    /// Insert or update several nodes of one tree; all or nothing
    async fn save_node_list(&self, nodes: &[Node]) -> ServiceResult<Vec<NodeId>>;

    /// Delete a node with its subtree
    async fn delete_node(&self, node: &Node) -> ServiceResult<()>;

    /// Delete several nodes with their subtrees; all or nothing
    async fn delete_node_list(&self, nodes: &[Node]) -> ServiceResult<()>;

    /// Clone a subtree within its tree at a new array index
    async fn dup_node(&self, tree: TreeId, source: NodeId, new_index: u32)
        -> ServiceResult<NodeId>;

    /// Expand a component into a new template tree
    async fn build_template_tree(
        &self,
        top_component: NodeId,
        classification: Classification,
    ) -> ServiceResult<TreeId>;

    /// Produce a new instance tree from a template
    async fn instantiate_tree(&self, template: TreeId) -> ServiceResult<TreeId>;

    /// Drop parameters below `level` from an instance tree; returns removed count
    async fn prune_tree(&self, tree: TreeId, level: u16) -> ServiceResult<usize>;

    /// Deep-copy a template for independent editing
    async fn copy_template_tree(&self, tree: TreeId) -> ServiceResult<TreeId>;

    /// Delete a tree with all its nodes
    async fn delete_tree(&self, tree: TreeId) -> ServiceResult<()>;

    /// Change classification after constraint checking
    async fn set_classification(
        &self,
        tree: TreeId,
        classification: Classification,
    ) -> ServiceResult<()>;

    /// Change lifecycle state after transition and constraint checking
    async fn set_tree_state(
        &self,
        tree: TreeId,
        state: TreeState,
        allow_end_time_update: bool,
    ) -> ServiceResult<()>;

    /// Set the observation window
    async fn set_schedule(&self, tree: TreeId, schedule: Schedule) -> ServiceResult<()>;

    /// Set the free-form description
    async fn set_description(&self, tree: TreeId, description: &str) -> ServiceResult<()>;

    /// Link the tree to an external proposal
    async fn set_mom_info(&self, tree: TreeId, mom_id: u32, campaign: &str) -> ServiceResult<()>;

    /// Validate the constraint set, optionally below `top` only
    async fn check_tree_constraints(&self, tree: TreeId, top: Option<NodeId>)
        -> ServiceResult<()>;

    /// Fetch a tree's metadata record
    async fn get_tree_info(&self, tree: TreeId) -> ServiceResult<TreeInfo>;

    /// List trees, optionally filtered by kind and classification
    async fn get_tree_list(
        &self,
        kind: Option<TreeKind>,
        classification: Option<Classification>,
    ) -> ServiceResult<Vec<TreeInfo>>;

    /// Components whose name matches `pattern`
    async fn get_component_list(
        &self,
        pattern: &str,
        top_only: bool,
    ) -> ServiceResult<Vec<ComponentDef>>;

    /// A component as a group node
    async fn get_component_node(&self, component: NodeId) -> ServiceResult<Node>;

    /// Parameters of a component in declaration order
    async fn get_component_params(&self, component: NodeId) -> ServiceResult<Vec<Node>>;
}

/// Name listing over delimited-name parameter stores
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait NamespaceService: Send + Sync {
    /// Full names in `store` matching `pattern` (`prefix*` or an exact name)
    async fn list_names(&self, store: &str, pattern: &str) -> ServiceResult<Vec<String>>;
}
