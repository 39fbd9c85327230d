//! Functional tests for namespace materialization.
//!
//! Namespace stores only know full delimited names. These tests check that
//! expanding a node merges the listed names into one shared tree:
//! - common prefixes are created once, whatever order names arrive in;
//! - repeated passes over the same names create nothing new;
//! - leafness is explicit and discovered by expansion.

use otdb_browse::{
    expand, BrowseConfig, ManagerKind, NamespaceManager, NavNodeId, NavigableTree, RootArgs,
    TreeManager,
};
use otdb_node::Node;
use otdb_service::{MemoryNamespaceService, MockNamespaceService, ServiceError};
use otdb_test_utils::{sample_namespace, SAMPLE_STORE};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Every node as a dotted path below the root, with its leaf flag
fn shape(tree: &NavigableTree) -> BTreeSet<(String, Option<bool>)> {
    tree.walk()
        .filter(|&id| id != tree.root())
        .map(|id| (tree.path_of(id).to_string(), tree.get(id).unwrap().leaf()))
        .collect()
}

fn mock_listing(names: &'static [&'static str]) -> MockNamespaceService {
    let mut mock = MockNamespaceService::new();
    mock.expect_list_names()
        .returning(move |_, _| Ok(names.iter().map(|n| (*n).to_string()).collect()));
    mock
}

async fn open(manager: &NamespaceManager, store: &str, location: Option<&str>) -> NavigableTree {
    manager
        .root_node(&RootArgs::descriptor(store, store, location))
        .await
        .unwrap()
}

/// Tenet: colon-separated names form one group with two leaves.
#[tokio::test]
async fn colon_names_share_their_group() {
    let service = MemoryNamespaceService::new();
    service.insert_names("vic", ["x:y", "x:z"]);
    let manager = NamespaceManager::new(
        Arc::new(service),
        BrowseConfig::default().with_separator(':'),
    );

    let mut tree = open(&manager, "vic", None).await;
    let root = tree.root();
    assert!(!manager.is_node_leaf(tree.get(root).unwrap()));
    assert_eq!(expand(&manager, &mut tree, root).await.unwrap(), 3);

    assert_eq!(tree.children(root).len(), 1);
    let x = tree.find_child(root, "x").unwrap();
    assert!(!manager.is_node_leaf(tree.get(x).unwrap()));
    let leaves: Vec<String> = tree
        .children(x)
        .iter()
        .map(|&c| manager.name_for_node(tree.get(c).unwrap()))
        .collect();
    assert_eq!(leaves, vec!["y", "z"]);
    for &leaf in tree.children(x) {
        assert!(manager.is_node_leaf(tree.get(leaf).unwrap()));
    }

    // synthesized nodes need no further remote calls
    assert_eq!(expand(&manager, &mut tree, x).await.unwrap(), 0);
}

/// Tenet: the merged shape does not depend on the listing order.
#[tokio::test]
async fn listing_order_does_not_matter() {
    let forward = NamespaceManager::new(
        Arc::new(mock_listing(&["a.b.c", "a.b.d"])),
        BrowseConfig::default(),
    );
    let backward = NamespaceManager::new(
        Arc::new(mock_listing(&["a.b.d", "a.b.c"])),
        BrowseConfig::default(),
    );

    let mut one = open(&forward, "s", None).await;
    let mut two = open(&backward, "s", None).await;
    let (r1, r2) = (one.root(), two.root());
    expand(&forward, &mut one, r1).await.unwrap();
    expand(&backward, &mut two, r2).await.unwrap();

    let expected: BTreeSet<_> = [
        ("a".to_string(), Some(false)),
        ("a.b".to_string(), Some(false)),
        ("a.b.c".to_string(), Some(true)),
        ("a.b.d".to_string(), Some(true)),
    ]
    .into_iter()
    .collect();
    assert_eq!(shape(&one), expected);
    assert_eq!(shape(&two), expected);
}

/// Tenet: a location scopes the tree to the names below it.
#[tokio::test]
async fn location_scopes_listing() {
    let manager = NamespaceManager::new(Arc::new(sample_namespace()), BrowseConfig::default());
    let mut tree = open(&manager, SAMPLE_STORE, Some("LOFAR.ObsSW")).await;
    let root = tree.root();

    assert_eq!(expand(&manager, &mut tree, root).await.unwrap(), 5);
    let observation = tree.find_child(root, "Observation").unwrap();
    let beam = tree.find_child(observation, "Beam").unwrap();
    assert_eq!(tree.children(observation).len(), 2);
    assert_eq!(tree.children(beam).len(), 2);
    assert_eq!(tree.path_of(beam).to_string(), "Observation.Beam");
}

/// Tenet: a failed listing leaves an expandable-looking node as a leaf.
#[tokio::test]
async fn failed_listing_marks_leaf() {
    let mut mock = MockNamespaceService::new();
    mock.expect_list_names()
        .times(1)
        .returning(|_, _| Err(ServiceError::remote("broken pipe")));
    let manager = NamespaceManager::new(Arc::new(mock), BrowseConfig::default());

    let mut tree = open(&manager, "s", None).await;
    let root = tree.root();
    assert_eq!(expand(&manager, &mut tree, root).await.unwrap(), 0);
    assert!(manager.is_node_leaf(tree.get(root).unwrap()));
    assert_eq!(expand(&manager, &mut tree, root).await.unwrap(), 0);
}

/// Tenet: the listing pattern follows the node's full path.
#[tokio::test]
async fn listing_pattern_includes_base() {
    let mut mock = MockNamespaceService::new();
    mock.expect_list_names()
        .withf(|store, pattern| store == "s" && pattern == "LOFAR.PIC.*")
        .times(1)
        .returning(|_, _| Ok(vec!["LOFAR.PIC.Core.clock".to_string()]));
    let manager = NamespaceManager::new(Arc::new(mock), BrowseConfig::default());

    let mut tree = open(&manager, "s", Some("LOFAR.PIC")).await;
    let root = tree.root();
    assert_eq!(expand(&manager, &mut tree, root).await.unwrap(), 2);
}

/// Tenet: numeric or empty selections fall back to the placeholder.
#[tokio::test]
async fn namespace_placeholder() {
    let manager = NamespaceManager::new(Arc::new(sample_namespace()), BrowseConfig::default());
    for args in [RootArgs::Id(7), RootArgs::parse(&["Params", ""]), RootArgs::None] {
        let tree = manager.root_node(&args).await.unwrap();
        assert_eq!(tree.get(tree.root()).unwrap().node().name, "No selection");
        assert_eq!(tree.kind(), ManagerKind::Namespace);
    }
}

const NAMES: [&str; 6] = ["a.b.c", "a.b.d", "a.e", "f", "f.g.h", "solver.chi"];

fn merged(names: &[&str]) -> NavigableTree {
    let mut tree = NavigableTree::new(ManagerKind::Namespace, Node::group("root"), 64);
    let root: NavNodeId = tree.root();
    for name in names {
        let segments: Vec<&str> = name.split('.').collect();
        tree.merge_path(root, &segments).unwrap();
    }
    tree
}

proptest! {
    #[test]
    fn prop_merge_order_independent(order in Just(NAMES.to_vec()).prop_shuffle()) {
        let reference = merged(&NAMES);
        let shuffled = merged(&order);
        let paths = |t: &NavigableTree| -> BTreeSet<String> {
            shape(t).into_iter().map(|(p, _)| p).collect()
        };
        prop_assert_eq!(paths(&shuffled), paths(&reference));
        prop_assert_eq!(shuffled.len(), reference.len());
    }

    #[test]
    fn prop_merge_twice_adds_nothing(order in Just(NAMES.to_vec()).prop_shuffle()) {
        let mut tree = merged(&order);
        let before = tree.len();
        let root = tree.root();
        for name in &order {
            let segments: Vec<&str> = name.split('.').collect();
            prop_assert!(tree.merge_path(root, &segments).unwrap().is_empty());
        }
        prop_assert_eq!(tree.len(), before);
    }
}
