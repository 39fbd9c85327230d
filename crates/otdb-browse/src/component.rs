//! Component catalog manager
//!
//! Browses component definitions. A component is shown as a group whose
//! children are its parameters; parameters that reference another
//! component (`#RCU`) expand into that component's parameters.

use crate::config::BrowseConfig;
use crate::error::{BrowseError, BrowseResult};
use crate::manager::{link_children, ManagerKind, RootArgs, TreeManager};
use crate::tree::{NavNodeId, NavigableTree};
use async_trait::async_trait;
use otdb_node::{Node, NodeId, NodeKind};
use otdb_service::RemoteTreeService;
use std::sync::Arc;

/// Parameters of the component named `name`
///
/// # Errors
/// `ComponentNotFound` if no component has exactly this name, or the
/// service error of a failed call
pub(crate) async fn component_params_by_name(
    service: &dyn RemoteTreeService,
    name: &str,
) -> BrowseResult<Vec<Node>> {
    let component = service
        .get_component_list(name, false)
        .await?
        .into_iter()
        .find(|def| def.name == name)
        .ok_or_else(|| BrowseError::ComponentNotFound(name.to_string()))?;
    Ok(service.get_component_params(component.component_id).await?)
}

/// Manager over the component catalog
pub struct ComponentManager {
    service: Arc<dyn RemoteTreeService>,
    config: BrowseConfig,
}

impl ComponentManager {
    /// Create manager over a tree service session
    #[must_use]
    pub fn new(service: Arc<dyn RemoteTreeService>, config: BrowseConfig) -> Self {
        Self { service, config }
    }

    async fn fetch_children(&self, node: &Node) -> BrowseResult<Vec<Node>> {
        match node.kind {
            NodeKind::ComponentRef => component_params_by_name(&*self.service, &node.name).await,
            NodeKind::Group if node.tree_id.is_catalog() && node.node_id.is_saved() => {
                Ok(self.service.get_component_params(node.node_id).await?)
            }
            NodeKind::Group | NodeKind::Leaf => Ok(Vec::new()),
        }
    }
}

impl std::fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TreeManager for ComponentManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Component
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
                    "Failed to materialize component node {}: {}",
                    node.display_name(),
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

    async fn root_node(&self, args: &RootArgs) -> BrowseResult<NavigableTree> {
        if args.is_empty() {
            return Ok(self.placeholder());
        }
        let component = match args {
            RootArgs::Id(raw) => match u32::try_from(*raw) {
                Ok(id) => NodeId(id),
                Err(_) => return Ok(self.placeholder()),
            },
            RootArgs::Descriptor {
                identifier,
                location,
                ..
            } => {
                let defs = self.service.get_component_list(identifier, false).await?;
                defs.into_iter()
                    .find(|def| {
                        def.name == *identifier
                            && location.as_ref().map_or(true, |v| def.version == *v)
                    })
                    .map(|def| def.component_id)
                    .ok_or_else(|| BrowseError::ComponentNotFound(identifier.clone()))?
            }
            RootArgs::None => return Ok(self.placeholder()),
        };

        let root = self.service.get_component_node(component).await?;
        tracing::debug!("Opened component {} as root", root.name);
        Ok(NavigableTree::new(
            ManagerKind::Component,
            root,
            self.config.event_capacity,
        ))
    }
}
