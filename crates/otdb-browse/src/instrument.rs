//! Instrument catalog manager
//!
//! Browses hardware, template and instance trees one level at a time.
//! Component references met on the way expand through the component
//! catalog.

use crate::component::component_params_by_name;
use crate::config::BrowseConfig;
use crate::error::BrowseResult;
use crate::manager::{link_children, ManagerKind, RootArgs, TreeManager};
use crate::tree::{NavNodeId, NavigableTree};
use async_trait::async_trait;
use otdb_node::{Node, NodeId, NodeKind, TreeId};
use otdb_service::RemoteTreeService;
use std::sync::Arc;

/// Manager over instrument, template and instance trees
pub struct InstrumentManager {
    service: Arc<dyn RemoteTreeService>,
    config: BrowseConfig,
}

impl InstrumentManager {
    /// Create manager over a tree service session
    #[must_use]
    pub fn new(service: Arc<dyn RemoteTreeService>, config: BrowseConfig) -> Self {
        Self { service, config }
    }

    async fn fetch_children(&self, node: &Node) -> BrowseResult<Vec<Node>> {
        match node.kind {
            NodeKind::ComponentRef => component_params_by_name(&*self.service, &node.name).await,
            NodeKind::Group => {
                let items = self
                    .service
                    .get_item_list(node.tree_id, node.node_id, 1)
                    .await?;
                Ok(items
                    .into_iter()
                    .filter(|item| item.node_id != node.node_id)
                    .collect())
            }
            NodeKind::Leaf => Ok(Vec::new()),
        }
    }

    /// Top node of a tree, `None` if the tree has no nodes
    async fn top_node(&self, tree: TreeId) -> BrowseResult<Option<Node>> {
        // Validates the tree id before scanning
        self.service.get_tree_info(tree).await?;
        let nodes = self.service.find_items(tree, "*").await?;
        Ok(nodes.into_iter().find(Node::is_root))
    }

    fn parse_id(raw: &str) -> Option<u32> {
        raw.trim().parse().ok()
    }
}

impl std::fmt::Debug for InstrumentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TreeManager for InstrumentManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Instrument
    }

    fn config(&self) -> &BrowseConfig {
        &self.config
    }

    async fn materialize_children(&self, tree: &mut NavigableTree, id: NavNodeId) -> usize {
        if !tree.begin_materialization(id) {
            return 0;
        }
        let Some(node) = tree.get(id).map(|nav| nav.node().clone()) else {
            return 0;
        };

        let added = match self.fetch_children(&node).await {
            Ok(children) => link_children(tree, id, children),
            Err(e) => {
                tracing::warn!(
                    "Failed to materialize node {} of tree {}: {}",
                    node.display_name(),
                    node.tree_id,
                    e
                );
                0
            }
        };
        if tree.children(id).is_empty() {
            tree.set_leaf(id, true);
        }
        tree.finish_materialization(id);
        tracing::debug!("Materialized {} children of {}", added, node.display_name());
        added
    }

    /// `Id(tree)` opens a tree at its top node; a descriptor names the tree
    /// in `identifier` and optionally a start node id in `location`.
    async fn root_node(&self, args: &RootArgs) -> BrowseResult<NavigableTree> {
        if args.is_empty() {
            return Ok(self.placeholder());
        }
        let root = match args {
            RootArgs::Id(raw) => match u32::try_from(*raw) {
                Ok(tree) => self.top_node(TreeId(tree)).await?,
                Err(_) => None,
            },
            RootArgs::Descriptor {
                identifier,
                location,
                ..
            } => match (Self::parse_id(identifier), location.as_deref()) {
                (Some(tree), None) => self.top_node(TreeId(tree)).await?,
                (Some(tree), Some(raw)) => match Self::parse_id(raw) {
                    Some(node) => Some(self.service.get_node(TreeId(tree), NodeId(node)).await?),
                    None => None,
                },
                (None, _) => None,
            },
            RootArgs::None => None,
        };

        let Some(root) = root else {
            tracing::debug!("No usable root for {:?}, using placeholder", args);
            return Ok(self.placeholder());
        };
        Ok(NavigableTree::new(
            ManagerKind::Instrument,
            root,
            self.config.event_capacity,
        ))
    }
}
