//! Testing utilities for the OTDB workspace
//!
//! Shared fixtures: a small component catalog, a populated namespace store
//! and tracing setup.

#![allow(missing_docs)]

use otdb_lifecycle::Classification;
use otdb_node::{Node, NodeId, NodeKind, ParamType};
use otdb_service::{MemoryNamespaceService, MemoryTreeService};
use std::sync::OnceLock;

/// Store name used by [`sample_namespace`]
pub const SAMPLE_STORE: &str = "params";

/// Names loaded by [`sample_namespace`]
pub const SAMPLE_NAMES: [&str; 5] = [
    "LOFAR.ObsSW.Observation.nrBeams",
    "LOFAR.ObsSW.Observation.Beam.angle1",
    "LOFAR.ObsSW.Observation.Beam.angle2",
    "LOFAR.PIC.Core.clock",
    "solver.chi",
];

/// Ids of the components registered by [`sample_tree_service`]
#[derive(Debug, Clone, Copy)]
pub struct SampleComponents {
    pub station: NodeId,
    pub rcu: NodeId,
}

/// Tree service with a `Station` component referencing `#RCU`
///
/// `Station` holds a `name` leaf and `rcus` instances of `RCU`; `RCU` holds
/// the leaves `mode` (pruning 2) and `attenuation` (pruning 9).
pub fn sample_tree_service(rcus: u16) -> (MemoryTreeService, SampleComponents) {
    let service = MemoryTreeService::default();
    let rcu = service.add_component(
        "RCU",
        "1.0.0",
        Classification::Operational,
        "receiver unit",
        vec![
            Node::leaf("mode", ParamType::Int).with_pruning(2),
            Node::leaf("attenuation", ParamType::Float)
                .with_pruning(9)
                .with_limits("0..31"),
        ],
    );
    let station = service.add_component(
        "Station",
        "1.0.0",
        Classification::Operational,
        "station",
        vec![
            Node::leaf("name", ParamType::Text).with_pruning(9),
            Node::from_raw_name("#RCU", NodeKind::Leaf).with_instances(rcus),
        ],
    );
    (service, SampleComponents { station, rcu })
}

/// Namespace service with [`SAMPLE_NAMES`] in [`SAMPLE_STORE`]
pub fn sample_namespace() -> MemoryNamespaceService {
    let service = MemoryNamespaceService::new();
    service.insert_names(SAMPLE_STORE, SAMPLE_NAMES);
    service
}

/// Install a test subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}
