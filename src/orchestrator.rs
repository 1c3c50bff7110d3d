//! High-level orchestration of topology discovery and path selection.
//!
//! The orchestrator owns the current topology snapshot. `build_topology`
//! replaces it wholesale; every query afterwards reads it without
//! mutation until the next rebuild.

use crate::config::Config;
use crate::fetch::JsonSource;
use crate::routing::{
    optimal_paths, shortest_paths, AdjacencyIndex, CostContext, OptimalPaths, PathError,
    TelemetryCollector,
};
use crate::topology::{BuildReport, NodeType, Path, TopologyBuilder, TopologyGraph};

pub struct Orchestrator<S: JsonSource> {
    config: Config,
    source: S,
    builder: TopologyBuilder,
    collector: TelemetryCollector,
    graph: TopologyGraph,
    adjacency: AdjacencyIndex,
}

impl<S: JsonSource> Orchestrator<S> {
    /// Create an orchestrator with an empty graph
    pub fn new(config: Config, source: S) -> Self {
        let builder = TopologyBuilder::new(
            config.controller.links_url(),
            config.controller.devices_url(),
            config.remap.clone(),
        );
        let collector = TelemetryCollector::new(
            config.controller.base_url.clone(),
            config.routing.max_telemetry_workers,
            config.routing.deadline,
        );

        Self {
            config,
            source,
            builder,
            collector,
            graph: TopologyGraph::new(),
            adjacency: AdjacencyIndex::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// Poll the controller and replace the current snapshot
    pub fn build_topology(&mut self) -> BuildReport {
        let (graph, report) = self.builder.build(&self.source);
        self.adjacency = AdjacencyIndex::build(&graph);
        self.graph = graph;
        report
    }

    /// Every minimum-hop path between two labels
    pub fn shortest_paths(&self, src: &str, dst: &str) -> Result<Vec<Path>, PathError> {
        shortest_paths(&self.graph, src, dst)
    }

    /// The tied shortest paths with the lowest bandwidth-asymmetry cost.
    ///
    /// Telemetry is fetched fresh on every call.
    pub fn optimal_path(&self, src: &str, dst: &str) -> Result<OptimalPaths, PathError> {
        let candidates = self.shortest_paths(src, dst)?;
        let ctx = CostContext {
            graph: &self.graph,
            adjacency: &self.adjacency,
            collector: &self.collector,
            source: &self.source,
            policy: self.config.routing.unmeasured_links,
            penalty: self.config.routing.unmeasured_penalty,
        };
        Ok(optimal_paths(&ctx, &candidates))
    }

    /// Labels of plain hosts, for collaborators that provision per-host resources
    pub fn host_labels(&self) -> Vec<String> {
        self.graph
            .nodes()
            .filter(|n| n.node_type == NodeType::Host)
            .map(|n| n.label.clone())
            .collect()
    }
}
