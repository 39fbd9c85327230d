//! In-process tree store
//!
//! Provides [`MemoryTreeService`], a complete [`RemoteTreeService`] over
//! in-memory tables. Every call holds the store lock for its whole
//! duration, so each mutation either commits entirely or not at all.

use crate::error::{ServiceError, ServiceResult};
use crate::service::RemoteTreeService;
use async_trait::async_trait;
use chrono::Utc;
use otdb_lifecycle::structure;
use otdb_lifecycle::{
    ensure_constraints, validate_transition, Classification, ComponentCatalog, ComponentDef,
    LifecycleConfig, NodeTable, Schedule, StateMachineError, StructureError, TransitionKind,
    TreeInfo, TreeKind, TreeState,
};
use otdb_node::{Node, NodeId, TreeId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
struct StoredTree {
    info: TreeInfo,
    nodes: NodeTable,
}

#[derive(Debug)]
struct Store {
    catalog: ComponentCatalog,
    trees: BTreeMap<TreeId, StoredTree>,
    next_tree: u32,
}

impl Store {
    fn allocate_tree(&mut self) -> TreeId {
        let id = TreeId(self.next_tree);
        self.next_tree += 1;
        id
    }

    fn tree(&self, operation: &'static str, id: TreeId) -> ServiceResult<&StoredTree> {
        self.trees
            .get(&id)
            .ok_or_else(|| ServiceError::rejected(operation, format!("tree {id} not found")))
    }

    fn tree_mut(&mut self, operation: &'static str, id: TreeId) -> ServiceResult<&mut StoredTree> {
        self.trees
            .get_mut(&id)
            .ok_or_else(|| ServiceError::rejected(operation, format!("tree {id} not found")))
    }
}

fn ensure_editable(operation: &'static str, info: &TreeInfo) -> ServiceResult<()> {
    if info.state.is_editable() {
        Ok(())
    } else {
        Err(ServiceError::rejected(
            operation,
            StructureError::NotEditable(info.state),
        ))
    }
}

/// In-memory tree store with a component catalog
#[derive(Debug)]
pub struct MemoryTreeService {
    config: LifecycleConfig,
    store: RwLock<Store>,
    offline: AtomicBool,
}

impl Default for MemoryTreeService {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

impl MemoryTreeService {
    /// Create empty store
    #[must_use]
    pub fn new(config: LifecycleConfig) -> Self {
        Self::with_catalog(config, ComponentCatalog::new())
    }

    /// Create store over an existing component catalog
    #[must_use]
    pub fn with_catalog(config: LifecycleConfig, catalog: ComponentCatalog) -> Self {
        Self {
            config,
            store: RwLock::new(Store {
                catalog,
                trees: BTreeMap::new(),
                next_tree: 1,
            }),
            offline: AtomicBool::new(false),
        }
    }

    /// Lifecycle configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> LifecycleConfig {
        self.config
    }

    /// Simulate loss of the transport; calls fail with a remote error while set
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn connected(&self) -> ServiceResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ServiceError::remote("tree service unreachable"))
        } else {
            Ok(())
        }
    }

    /// Register a component definition
    pub fn add_component(
        &self,
        name: &str,
        version: &str,
        classification: Classification,
        description: &str,
        params: Vec<Node>,
    ) -> NodeId {
        self.store
            .write()
            .catalog
            .add_component(name, version, classification, description, params)
    }

    /// Create an empty tree of the given kind
    pub fn create_tree(&self, kind: TreeKind, classification: Classification) -> TreeId {
        let mut store = self.store.write();
        let id = store.allocate_tree();
        store.trees.insert(
            id,
            StoredTree {
                info: TreeInfo::new(id, kind, classification),
                nodes: NodeTable::new(id),
            },
        );
        tracing::debug!("Created empty {} tree {}", kind, id);
        id
    }

    fn insert_tree(store: &mut Store, info: TreeInfo, nodes: NodeTable) -> TreeId {
        let id = info.tree_id;
        store.trees.insert(id, StoredTree { info, nodes });
        id
    }
}

#[async_trait]
impl RemoteTreeService for MemoryTreeService {
    async fn get_node(&self, tree: TreeId, node: NodeId) -> ServiceResult<Node> {
        self.connected()?;
        let store = self.store.read();
        store
            .tree("get_node", tree)?
            .nodes
            .require(node)
            .cloned()
            .map_err(|e| ServiceError::rejected("get_node", e))
    }

    async fn get_item_list(
        &self,
        tree: TreeId,
        root: NodeId,
        depth: u32,
    ) -> ServiceResult<Vec<Node>> {
        self.connected()?;
        let store = self.store.read();
        store
            .tree("get_item_list", tree)?
            .nodes
            .item_list(root, depth)
            .map_err(|e| ServiceError::rejected("get_item_list", e))
    }

    async fn find_items(&self, tree: TreeId, pattern: &str) -> ServiceResult<Vec<Node>> {
        self.connected()?;
        let store = self.store.read();
        store
            .tree("find_items", tree)?
            .nodes
            .find(pattern)
            .map_err(|e| ServiceError::rejected("find_items", e))
    }

    async fn save_node(&self, node: &Node) -> ServiceResult<NodeId> {
        self.save_node_list(std::slice::from_ref(node))
            .await?
            .pop()
            .ok_or_else(|| ServiceError::rejected("save_node", "no node stored"))
    }

    async fn save_node_list(&self, nodes: &[Node]) -> ServiceResult<Vec<NodeId>> {
        self.connected()?;
        let Some(first) = nodes.first() else {
            return Ok(Vec::new());
        };
        let tree_id = first.tree_id;
        if nodes.iter().any(|n| n.tree_id != tree_id) {
            return Err(ServiceError::rejected(
                "save_node_list",
                "nodes belong to different trees",
            ));
        }

        let mut store = self.store.write();
        let tree = store.tree_mut("save_node_list", tree_id)?;
        ensure_editable("save_node_list", &tree.info)?;

        let mut staged = tree.nodes.clone();
        let ids = nodes
            .iter()
            .map(|n| staged.upsert(n.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::rejected("save_node_list", e))?;
        tree.nodes = staged;
        Ok(ids)
    }

    async fn delete_node(&self, node: &Node) -> ServiceResult<()> {
        self.delete_node_list(std::slice::from_ref(node)).await
    }

    async fn delete_node_list(&self, nodes: &[Node]) -> ServiceResult<()> {
        self.connected()?;
        let mut store = self.store.write();
        for node in nodes {
            let tree = store.tree("delete_node_list", node.tree_id)?;
            ensure_editable("delete_node_list", &tree.info)?;
            let stored = tree
                .nodes
                .require(node.node_id)
                .map_err(|e| ServiceError::rejected("delete_node_list", e))?;
            if stored.is_root() {
                return Err(ServiceError::rejected(
                    "delete_node_list",
                    StructureError::RootNode(node.node_id),
                ));
            }
        }
        // Validated up front; a node already gone with an ancestor is fine
        for node in nodes {
            let tree = store.tree_mut("delete_node_list", node.tree_id)?;
            if tree.nodes.get(node.node_id).is_some() {
                tree.nodes
                    .remove_subtree(node.node_id)
                    .map_err(|e| ServiceError::rejected("delete_node_list", e))?;
            }
        }
        Ok(())
    }

    async fn dup_node(&self, tree: TreeId, source: NodeId, new_index: u32) -> ServiceResult<NodeId> {
        self.connected()?;
        let mut store = self.store.write();
        let stored = store.tree_mut("dup_node", tree)?;
        ensure_editable("dup_node", &stored.info)?;
        let new_id = structure::duplicate_subtree(&mut stored.nodes, source, new_index)
            .map_err(|e| ServiceError::rejected("dup_node", e))?;
        tracing::info!(
            "Duplicated node {} in tree {} as {} (index {})",
            source,
            tree,
            new_id,
            new_index
        );
        Ok(new_id)
    }

    async fn build_template_tree(
        &self,
        top_component: NodeId,
        classification: Classification,
    ) -> ServiceResult<TreeId> {
        self.connected()?;
        let mut store = self.store.write();
        let tree_id = TreeId(store.next_tree);
        let nodes = structure::build_template(&store.catalog, top_component, tree_id)
            .map_err(|e| ServiceError::rejected("build_template_tree", e))?;
        let description = store
            .catalog
            .get(top_component)
            .map(|d| d.description.clone())
            .unwrap_or_default();

        store.allocate_tree();
        let mut info = TreeInfo::new(tree_id, TreeKind::Template, classification);
        info.description = description;
        Self::insert_tree(&mut store, info, nodes);
        tracing::info!(
            "Built template tree {} from component {}",
            tree_id,
            top_component
        );
        Ok(tree_id)
    }

    async fn instantiate_tree(&self, template: TreeId) -> ServiceResult<TreeId> {
        self.connected()?;
        let mut store = self.store.write();
        let source = store.tree("instantiate_tree", template)?;
        if !source.info.kind.is_template() {
            return Err(ServiceError::rejected(
                "instantiate_tree",
                StructureError::WrongKind {
                    operation: "instantiate",
                    kind: source.info.kind,
                },
            ));
        }
        if source.info.state.is_closed() {
            return Err(ServiceError::rejected(
                "instantiate_tree",
                StateMachineError::Closed(source.info.state),
            ));
        }

        let tree_id = TreeId(store.next_tree);
        let source = store.tree("instantiate_tree", template)?;
        let nodes = structure::instantiate(&source.nodes, tree_id)
            .map_err(|e| ServiceError::rejected("instantiate_tree", e))?;
        let mut info = TreeInfo::new(tree_id, TreeKind::Instance, source.info.classification);
        info.campaign = source.info.campaign.clone();
        info.description = source.info.description.clone();
        info.original_tree_id = Some(template);

        store.allocate_tree();
        Self::insert_tree(&mut store, info, nodes);
        tracing::info!("Instantiated template {} as tree {}", template, tree_id);
        Ok(tree_id)
    }

    async fn prune_tree(&self, tree: TreeId, level: u16) -> ServiceResult<usize> {
        self.connected()?;
        let mut store = self.store.write();
        let stored = store.tree_mut("prune_tree", tree)?;
        if stored.info.kind != TreeKind::Instance {
            return Err(ServiceError::rejected(
                "prune_tree",
                StructureError::WrongKind {
                    operation: "prune",
                    kind: stored.info.kind,
                },
            ));
        }
        if stored.info.state.is_running() {
            return Err(ServiceError::rejected(
                "prune_tree",
                StructureError::NotEditable(stored.info.state),
            ));
        }
        let removed = structure::prune(&mut stored.nodes, level)
            .map_err(|e| ServiceError::rejected("prune_tree", e))?;
        tracing::info!("Pruned {} nodes below level {} from tree {}", removed, level, tree);
        Ok(removed)
    }

    async fn copy_template_tree(&self, tree: TreeId) -> ServiceResult<TreeId> {
        self.connected()?;
        let mut store = self.store.write();
        let tree_id = TreeId(store.next_tree);
        let source = store.tree("copy_template_tree", tree)?;
        if !source.info.kind.is_template() {
            return Err(ServiceError::rejected(
                "copy_template_tree",
                StructureError::WrongKind {
                    operation: "copy",
                    kind: source.info.kind,
                },
            ));
        }
        let nodes = structure::copy_template(&source.nodes, tree_id)
            .map_err(|e| ServiceError::rejected("copy_template_tree", e))?;

        let mut info = source.info.clone();
        info.tree_id = tree_id;
        info.state = TreeState::Described;
        info.original_tree_id = Some(tree);
        info.mom_id = None;
        info.schedule = None;
        info.created_at = Utc::now();

        store.allocate_tree();
        Self::insert_tree(&mut store, info, nodes);
        tracing::info!("Copied template {} to tree {}", tree, tree_id);
        Ok(tree_id)
    }

    async fn delete_tree(&self, tree: TreeId) -> ServiceResult<()> {
        self.connected()?;
        let mut store = self.store.write();
        let stored = store.tree("delete_tree", tree)?;
        if stored.info.state.is_running() {
            return Err(ServiceError::rejected(
                "delete_tree",
                StructureError::NotEditable(stored.info.state),
            ));
        }
        store.trees.remove(&tree);
        tracing::info!("Deleted tree {}", tree);
        Ok(())
    }

    async fn set_classification(
        &self,
        tree: TreeId,
        classification: Classification,
    ) -> ServiceResult<()> {
        self.connected()?;
        let mut store = self.store.write();
        let Store { catalog, trees, .. } = &mut *store;
        let stored = trees
            .get_mut(&tree)
            .ok_or_else(|| ServiceError::rejected("set_classification", format!("tree {tree} not found")))?;

        if stored.info.state.is_closed() {
            return Err(ServiceError::rejected(
                "set_classification",
                StateMachineError::Closed(stored.info.state),
            ));
        }
        ensure_constraints(&stored.info, stored.info.state, &stored.nodes, None, Some(&*catalog))
            .map_err(|e| ServiceError::rejected("set_classification", e))?;

        stored.info.classification = classification;
        tracing::info!("Tree {} classified as {:?}", tree, classification);
        Ok(())
    }

    async fn set_tree_state(
        &self,
        tree: TreeId,
        state: TreeState,
        allow_end_time_update: bool,
    ) -> ServiceResult<()> {
        self.connected()?;
        let mut store = self.store.write();
        let Store { catalog, trees, .. } = &mut *store;
        let stored = trees
            .get_mut(&tree)
            .ok_or_else(|| ServiceError::rejected("set_tree_state", format!("tree {tree} not found")))?;

        let from = stored.info.state;
        let transition = validate_transition(stored.info.kind, from, state).map_err(|e| {
            tracing::warn!("Rejected state change of tree {}: {}", tree, e);
            ServiceError::rejected("set_tree_state", e)
        })?;
        if transition == TransitionKind::Unchanged {
            return Ok(());
        }
        if self.config.constraint_policy.requires_check(transition) {
            ensure_constraints(&stored.info, state, &stored.nodes, None, Some(&*catalog)).map_err(
                |e| {
                    tracing::warn!("Rejected state change of tree {}: {}", tree, e);
                    ServiceError::rejected("set_tree_state", e)
                },
            )?;
        }

        stored.info.state = state;
        if allow_end_time_update && state.is_terminal() {
            if let Some(schedule) = stored.info.schedule.as_mut() {
                schedule.stop = Utc::now().max(schedule.start);
            }
        }
        tracing::info!("Tree {} moved {} -> {} ({:?})", tree, from, state, transition);
        Ok(())
    }

    async fn set_schedule(&self, tree: TreeId, schedule: Schedule) -> ServiceResult<()> {
        self.connected()?;
        if !schedule.is_valid() {
            return Err(ServiceError::rejected(
                "set_schedule",
                "start must precede stop",
            ));
        }
        let mut store = self.store.write();
        let stored = store.tree_mut("set_schedule", tree)?;
        ensure_editable("set_schedule", &stored.info)?;
        stored.info.schedule = Some(schedule);
        Ok(())
    }

    async fn set_description(&self, tree: TreeId, description: &str) -> ServiceResult<()> {
        self.connected()?;
        let mut store = self.store.write();
        store.tree_mut("set_description", tree)?.info.description = description.to_string();
        Ok(())
    }

    async fn set_mom_info(&self, tree: TreeId, mom_id: u32, campaign: &str) -> ServiceResult<()> {
        self.connected()?;
        let mut store = self.store.write();
        let stored = store.tree_mut("set_mom_info", tree)?;
        stored.info.mom_id = Some(mom_id);
        stored.info.campaign = campaign.to_string();
        Ok(())
    }

    async fn check_tree_constraints(&self, tree: TreeId, top: Option<NodeId>) -> ServiceResult<()> {
        self.connected()?;
        let store = self.store.read();
        let stored = store.tree("check_tree_constraints", tree)?;
        if let Some(top) = top {
            stored
                .nodes
                .require(top)
                .map_err(|e| ServiceError::rejected("check_tree_constraints", e))?;
        }
        ensure_constraints(
            &stored.info,
            stored.info.state,
            &stored.nodes,
            top,
            Some(&store.catalog),
        )
        .map_err(|e| ServiceError::rejected("check_tree_constraints", e))
    }

    async fn get_tree_info(&self, tree: TreeId) -> ServiceResult<TreeInfo> {
        self.connected()?;
        let store = self.store.read();
        Ok(store.tree("get_tree_info", tree)?.info.clone())
    }

    async fn get_tree_list(
        &self,
        kind: Option<TreeKind>,
        classification: Option<Classification>,
    ) -> ServiceResult<Vec<TreeInfo>> {
        self.connected()?;
        let store = self.store.read();
        Ok(store
            .trees
            .values()
            .map(|t| &t.info)
            .filter(|i| kind.map_or(true, |k| i.kind == k))
            .filter(|i| classification.map_or(true, |c| i.classification == c))
            .cloned()
            .collect())
    }

    async fn get_component_list(
        &self,
        pattern: &str,
        top_only: bool,
    ) -> ServiceResult<Vec<ComponentDef>> {
        self.connected()?;
        self.store
            .read()
            .catalog
            .list(pattern, top_only)
            .map_err(|e| ServiceError::rejected("get_component_list", e))
    }

    async fn get_component_node(&self, component: NodeId) -> ServiceResult<Node> {
        self.connected()?;
        self.store
            .read()
            .catalog
            .node(component)
            .map_err(|e| ServiceError::rejected("get_component_node", e))
    }

    async fn get_component_params(&self, component: NodeId) -> ServiceResult<Vec<Node>> {
        self.connected()?;
        self.store
            .read()
            .catalog
            .params(component)
            .map(<[Node]>::to_vec)
            .map_err(|e| ServiceError::rejected("get_component_params", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use otdb_node::ParamType;

    fn service_with_station() -> (MemoryTreeService, NodeId) {
        let service = MemoryTreeService::default();
        service.add_component(
            "RCU",
            "1.0.0",
            Classification::Test,
            "receiver unit",
            vec![Node::leaf("mode", ParamType::Int).with_pruning(3)],
        );
        let station = service.add_component(
            "Station",
            "1.0.0",
            Classification::Test,
            "station",
            vec![
                Node::leaf("name", ParamType::Text).with_pruning(5),
                Node::component_ref("RCU").with_instances(4),
            ],
        );
        (service, station)
    }

    #[tokio::test]
    async fn offline_calls_fail_with_remote_error() {
        let (service, _) = service_with_station();
        service.set_offline(true);
        let err = service.get_tree_list(None, None).await.unwrap_err();
        assert!(err.is_retryable());

        service.set_offline(false);
        assert!(service.get_tree_list(None, None).await.is_ok());
    }

    #[tokio::test]
    async fn build_then_instantiate() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        let instance = service.instantiate_tree(template).await.unwrap();

        let info = service.get_tree_info(instance).await.unwrap();
        assert_eq!(info.kind, TreeKind::Instance);
        assert_eq!(info.original_tree_id, Some(template));

        let rcus = service.find_items(instance, "RCU").await.unwrap();
        assert_eq!(rcus.len(), 4);
    }

    #[tokio::test]
    async fn instantiate_requires_template() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        let instance = service.instantiate_tree(template).await.unwrap();
        let err = service.instantiate_tree(instance).await.unwrap_err();
        assert!(err.is_rejection());
        assert!(err.message().contains("not allowed on instance trees"));
    }

    #[tokio::test]
    async fn save_node_list_is_all_or_nothing() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        let root = service.get_item_list(template, NodeId(1), 0).await.unwrap()[0].clone();

        let fresh = Node::leaf("clock", ParamType::Unsigned)
            .with_id(template, NodeId::UNSAVED)
            .with_parent(root.node_id);
        let clash = Node::leaf("name", ParamType::Text)
            .with_id(template, NodeId::UNSAVED)
            .with_parent(root.node_id);

        let before = service.get_item_list(template, root.node_id, 10).await.unwrap().len();
        let err = service.save_node_list(&[fresh, clash]).await.unwrap_err();
        assert!(err.is_rejection());
        let after = service.get_item_list(template, root.node_id, 10).await.unwrap().len();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn delete_node_removes_subtree() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        let rcu = service.find_items(template, "RCU").await.unwrap().remove(0);
        service.delete_node(&rcu).await.unwrap();
        assert!(service.find_items(template, "mode").await.unwrap().is_empty());

        let root = service.get_node(template, NodeId(1)).await.unwrap();
        assert!(service.delete_node(&root).await.is_err());
    }

    #[tokio::test]
    async fn rejected_state_change_leaves_state() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        let instance = service.instantiate_tree(template).await.unwrap();
        for state in [TreeState::Prepared, TreeState::Approved] {
            service.set_tree_state(instance, state, false).await.unwrap();
        }

        // no schedule yet
        let err = service
            .set_tree_state(instance, TreeState::Scheduled, false)
            .await
            .unwrap_err();
        assert!(err.message().contains("requires a schedule"));
        assert_eq!(
            service.get_tree_info(instance).await.unwrap().state,
            TreeState::Approved
        );

        let now = Utc::now();
        service
            .set_schedule(instance, Schedule::new(now, now + Duration::hours(1)))
            .await
            .unwrap();
        service
            .set_tree_state(instance, TreeState::Scheduled, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn end_time_update_on_abort() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        let instance = service.instantiate_tree(template).await.unwrap();
        let start = Utc::now() - Duration::hours(1);
        let stop = Utc::now() + Duration::hours(5);
        service
            .set_schedule(instance, Schedule::new(start, stop))
            .await
            .unwrap();
        for state in [
            TreeState::Prepared,
            TreeState::Approved,
            TreeState::Scheduled,
            TreeState::Queued,
            TreeState::Active,
            TreeState::Aborted,
        ] {
            service.set_tree_state(instance, state, true).await.unwrap();
        }
        let schedule = service.get_tree_info(instance).await.unwrap().schedule.unwrap();
        assert!(schedule.stop < stop);
    }

    #[tokio::test]
    async fn prune_only_on_instances() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        assert!(service.prune_tree(template, 4).await.is_err());

        let instance = service.instantiate_tree(template).await.unwrap();
        // four `mode` leaves and the four RCU groups they leave empty
        assert_eq!(service.prune_tree(instance, 4).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn copy_template_resets_lineage() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        service.set_mom_info(template, 42, "LC0_001").await.unwrap();
        service
            .set_tree_state(template, TreeState::Prepared, false)
            .await
            .unwrap();

        let copy = service.copy_template_tree(template).await.unwrap();
        let info = service.get_tree_info(copy).await.unwrap();
        assert_eq!(info.state, TreeState::Described);
        assert_eq!(info.original_tree_id, Some(template));
        assert_eq!(info.mom_id, None);
        assert_eq!(info.campaign, "LC0_001");
    }

    #[tokio::test]
    async fn classification_closed_after_finish() {
        let (service, _) = service_with_station();
        let pic = service.create_tree(TreeKind::Hardware, Classification::Operational);
        service
            .save_node(&Node::group("LOFAR").with_id(pic, NodeId::UNSAVED))
            .await
            .unwrap();
        service.set_classification(pic, Classification::Test).await.unwrap();
        service.set_tree_state(pic, TreeState::Obsolete, false).await.unwrap();

        let err = service
            .set_classification(pic, Classification::Operational)
            .await
            .unwrap_err();
        assert!(err.is_rejection());
        let info = service.get_tree_info(pic).await.unwrap();
        assert_eq!(info.classification, Classification::Test);
    }

    #[tokio::test]
    async fn tree_list_filters() {
        let (service, station) = service_with_station();
        let template = service
            .build_template_tree(station, Classification::Test)
            .await
            .unwrap();
        service.instantiate_tree(template).await.unwrap();
        service.create_tree(TreeKind::Hardware, Classification::Operational);

        assert_eq!(service.get_tree_list(None, None).await.unwrap().len(), 3);
        assert_eq!(
            service
                .get_tree_list(Some(TreeKind::Instance), None)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            service
                .get_tree_list(None, Some(Classification::Operational))
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
