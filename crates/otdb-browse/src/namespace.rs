//! Parameter namespace manager
//!
//! Namespace stores have no parent/child ids, only full delimited names.
//! Expanding a node lists every name below the node's path and merges the
//! remaining segments into the tree, so overlapping names share their
//! common ancestors and the shape does not depend on listing order.

use crate::config::BrowseConfig;
use crate::error::BrowseResult;
use crate::manager::{ManagerKind, RootArgs, TreeManager};
use crate::tree::{NamespaceScope, NavNode, NavNodeId, NavigableTree};
use async_trait::async_trait;
use otdb_node::{Node, NodePath};
use otdb_service::{NamespaceService, ServiceResult};
use std::sync::Arc;

/// Manager over delimited-name parameter stores
pub struct NamespaceManager {
    service: Arc<dyn NamespaceService>,
    config: BrowseConfig,
}

impl NamespaceManager {
    /// Create manager over a namespace service session
    #[must_use]
    pub fn new(service: Arc<dyn NamespaceService>, config: BrowseConfig) -> Self {
        Self { service, config }
    }

    async fn list_below(&self, scope: &NamespaceScope, prefix: &NodePath) -> ServiceResult<Vec<String>> {
        let separator = self.config.namespace_separator;
        self.service
            .list_names(&scope.store, &prefix.descendant_pattern(separator))
            .await
    }

    fn merge_names(
        &self,
        tree: &mut NavigableTree,
        id: NavNodeId,
        prefix: &NodePath,
        names: &[String],
    ) -> usize {
        let separator = self.config.namespace_separator;
        let mut added = 0;
        for name in names {
            let path = match NodePath::parse(name, separator) {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!("Skipping malformed name: {}", e);
                    continue;
                }
            };
            let Some(rest) = path.strip_prefix(prefix) else {
                continue;
            };
            if let Ok(created) = tree.merge_path(id, rest) {
                added += created.len();
            }
        }
        added
    }
}

impl std::fmt::Debug for NamespaceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TreeManager for NamespaceManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Namespace
    }

    fn config(&self) -> &BrowseConfig {
        &self.config
    }

    /// Last path segment
    fn name_for_node(&self, node: &NavNode) -> String {
        node.node().name.clone()
    }

    /// Unknown leafness counts as expandable
    fn is_node_leaf(&self, node: &NavNode) -> bool {
        node.leaf() == Some(true)
    }

    async fn materialize_children(&self, tree: &mut NavigableTree, id: NavNodeId) -> usize {
        if !tree.begin_materialization(id) {
            return 0;
        }
        let Some(scope) = tree.scope().cloned() else {
            tree.finish_materialization(id);
            return 0;
        };
        let prefix = NodePath::new(
            scope
                .base
                .segments()
                .iter()
                .chain(tree.path_of(id).segments())
                .cloned()
                .collect(),
        );

        let added = match self.list_below(&scope, &prefix).await {
            Ok(names) => self.merge_names(tree, id, &prefix, &names),
            Err(e) => {
                tracing::warn!(
                    "Failed to list names below '{}' in {}: {}",
                    prefix.join(self.config.namespace_separator),
                    scope.store,
                    e
                );
                0
            }
        };

        let leaf = tree.children(id).is_empty();
        tree.set_leaf(id, leaf);
        tree.finish_materialization(id);
        tracing::debug!("Materialized {} nodes below '{}'", added, prefix);
        added
    }

    /// A descriptor names the store in `identifier` and optionally the
    /// path the root stands for in `location`.
    async fn root_node(&self, args: &RootArgs) -> BrowseResult<NavigableTree> {
        let RootArgs::Descriptor {
            display_name,
            identifier,
            location,
        } = args
        else {
            return Ok(self.placeholder());
        };
        if args.is_empty() {
            return Ok(self.placeholder());
        }

        let base = match NodePath::parse(
            location.as_deref().unwrap_or_default(),
            self.config.namespace_separator,
        ) {
            Ok(base) => base,
            Err(e) => {
                tracing::debug!("Unusable namespace location: {}", e);
                return Ok(self.placeholder());
            }
        };
        let name = if display_name.is_empty() {
            identifier
        } else {
            display_name
        };

        Ok(NavigableTree::new(
            ManagerKind::Namespace,
            Node::group(name.as_str()),
            self.config.event_capacity,
        )
        .with_scope(NamespaceScope {
            store: identifier.clone(),
            base,
        }))
    }
}
