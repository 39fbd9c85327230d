use otdb_lifecycle::{Classification, Schedule, TreeKind, TreeState};
use otdb_node::{Node, NodeId, ParamType, TreeId};
use otdb_service::{MemoryTreeService, RemoteTreeService};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

async fn station_template(service: &MemoryTreeService, rcus: u16) -> TreeId {
    service.add_component(
        "RCU",
        "1.0.0",
        Classification::Operational,
        "receiver unit",
        vec![
            Node::leaf("mode", ParamType::Int).with_pruning(2),
            Node::leaf("attenuation", ParamType::Float).with_pruning(9),
        ],
    );
    let station = service.add_component(
        "Station",
        "1.0.0",
        Classification::Operational,
        "station",
        vec![
            Node::leaf("name", ParamType::Text).with_pruning(9),
            Node::component_ref("RCU").with_instances(rcus),
        ],
    );
    service
        .build_template_tree(station, Classification::Operational)
        .await
        .unwrap()
}

fn service() -> Arc<dyn RemoteTreeService> {
    Arc::new(MemoryTreeService::default())
}

#[tokio::test]
async fn test_instantiate_expands_every_replica() {
    let memory = MemoryTreeService::default();
    let template = station_template(&memory, 3).await;
    let instance = memory.instantiate_tree(template).await.unwrap();

    let mut indices: Vec<_> = memory
        .find_items(instance, "RCU")
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.index)
        .collect();
    indices.sort();
    assert_eq!(indices, vec![Some(1), Some(2), Some(3)]);
    assert!(memory
        .find_items(instance, "*")
        .await
        .unwrap()
        .iter()
        .all(|n| n.instances == 1));

    // the template keeps its single declaration
    let template_rcus = memory.find_items(template, "RCU").await.unwrap();
    assert_eq!(template_rcus.len(), 1);
    assert_eq!(template_rcus[0].instances, 3);
}

#[tokio::test]
async fn test_dup_node_keeps_slots_unique() {
    let memory = MemoryTreeService::default();
    let template = station_template(&memory, 2).await;
    let instance = memory.instantiate_tree(template).await.unwrap();
    let rcu = memory.find_items(instance, "RCU").await.unwrap().remove(0);

    let before = memory.find_items(instance, "*").await.unwrap().len();
    let err = memory.dup_node(instance, rcu.node_id, 2).await.unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(memory.find_items(instance, "*").await.unwrap().len(), before);

    let copy = memory.dup_node(instance, rcu.node_id, 3).await.unwrap();
    let children = memory.get_item_list(instance, copy, 1).await.unwrap();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].index, Some(3));
    assert_eq!(children[0].parent_id, rcu.parent_id);
}

#[tokio::test]
async fn test_full_instance_lifecycle() {
    let memory = MemoryTreeService::default();
    let template = station_template(&memory, 2).await;
    let instance = memory.instantiate_tree(template).await.unwrap();

    let start = chrono::Utc::now();
    memory
        .set_schedule(instance, Schedule::new(start, start + chrono::Duration::hours(2)))
        .await
        .unwrap();

    use TreeState::*;
    for state in [Prepared, Approved, Scheduled, Queued, Active, Finished] {
        memory.set_tree_state(instance, state, false).await.unwrap();
    }

    // structure is frozen once running has started
    let rcu = memory.find_items(instance, "RCU").await.unwrap().remove(0);
    assert!(memory.dup_node(instance, rcu.node_id, 9).await.is_err());

    // archival pruning after the run
    let removed = memory.prune_tree(instance, 5).await.unwrap();
    assert_eq!(removed, 2);
    assert!(memory.find_items(instance, "mode").await.unwrap().is_empty());
    assert_eq!(memory.find_items(instance, "attenuation").await.unwrap().len(), 2);

    memory.set_tree_state(instance, Obsolete, false).await.unwrap();
    assert!(memory.set_tree_state(instance, Active, false).await.is_err());
}

#[tokio::test]
async fn test_prune_refused_while_running() {
    let memory = MemoryTreeService::default();
    let template = station_template(&memory, 1).await;
    let instance = memory.instantiate_tree(template).await.unwrap();
    let start = chrono::Utc::now();
    memory
        .set_schedule(instance, Schedule::new(start, start + chrono::Duration::hours(1)))
        .await
        .unwrap();
    for state in [
        TreeState::Prepared,
        TreeState::Approved,
        TreeState::Scheduled,
        TreeState::Queued,
    ] {
        memory.set_tree_state(instance, state, false).await.unwrap();
    }
    assert!(memory.prune_tree(instance, 5).await.is_err());
    assert!(memory.delete_tree(instance).await.is_err());
}

#[tokio::test]
async fn test_trait_object_dispatch() {
    let service = service();
    assert!(service.get_tree_list(None, None).await.unwrap().is_empty());
    let err = service.get_tree_info(TreeId(4)).await.unwrap_err();
    assert!(err.is_rejection());
    assert!(err.message().contains("not found"));
}

#[tokio::test]
async fn test_component_catalog_queries() {
    let memory = MemoryTreeService::default();
    station_template(&memory, 1).await;

    let top = memory.get_component_list("*", true).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Station");

    let node = memory.get_component_node(top[0].component_id).await.unwrap();
    assert_eq!(node.name, "Station");
    let params = memory.get_component_params(top[0].component_id).await.unwrap();
    assert_eq!(params.len(), 2);
    assert!(memory.get_component_params(NodeId(500)).await.is_err());
}

#[tokio::test]
async fn test_check_constraints_scoped() {
    let memory = MemoryTreeService::default();
    let template = station_template(&memory, 1).await;
    memory.check_tree_constraints(template, None).await.unwrap();
    memory
        .check_tree_constraints(template, Some(NodeId(1)))
        .await
        .unwrap();
    assert!(memory
        .check_tree_constraints(template, Some(NodeId(900)))
        .await
        .is_err());

    let info = memory.get_tree_info(template).await.unwrap();
    assert_eq!(info.kind, TreeKind::Template);
    assert_eq!(info.description, "station");
}

proptest! {
    #[test]
    fn prop_instantiate_numbers_from_one(rcus in 1u16..12) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let indices = runtime.block_on(async {
            let memory = MemoryTreeService::default();
            let template = station_template(&memory, rcus).await;
            let instance = memory.instantiate_tree(template).await.unwrap();
            let mut indices: Vec<u32> = memory
                .find_items(instance, "RCU")
                .await
                .unwrap()
                .into_iter()
                .filter_map(|n| n.index)
                .collect();
            indices.sort_unstable();
            indices
        });
        prop_assert_eq!(indices, (1..=u32::from(rcus)).collect::<Vec<_>>());
    }
}
