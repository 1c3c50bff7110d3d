//! Switch-only neighbor index used for telemetry lookups.
//!
//! Each switch-to-switch edge yields two directed entries, one per
//! endpoint, each carrying the port on *that* endpoint which terminates the
//! link.

use std::collections::HashMap;

use serde::Serialize;

use crate::topology::{NodeType, PortId, TopologyGraph};

/// A neighboring switch and the local port that reaches it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub label: String,
    pub port: Option<PortId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdjacencyIndex {
    entries: HashMap<String, Vec<Neighbor>>,
}

impl AdjacencyIndex {
    /// Index every edge whose endpoints are both currently typed `switch`
    pub fn build(graph: &TopologyGraph) -> Self {
        let mut entries: HashMap<String, Vec<Neighbor>> = HashMap::new();
        let is_switch = |label: &str| graph.node_type(label) == Some(NodeType::Switch);

        for edge in graph.edges() {
            let Some(link) = edge.switch_link() else {
                continue;
            };
            if !is_switch(&edge.src) || !is_switch(&edge.dst) {
                continue;
            }

            entries.entry(edge.src.clone()).or_default().push(Neighbor {
                label: edge.dst.clone(),
                port: link.src_port.clone(),
            });
            entries.entry(edge.dst.clone()).or_default().push(Neighbor {
                label: edge.src.clone(),
                port: link.dst_port.clone(),
            });
        }

        log::debug!("Adjacency index covers {} switches", entries.len());
        Self { entries }
    }

    pub fn neighbors(&self, switch: &str) -> &[Neighbor] {
        self.entries.get(switch).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The entry in `from`'s list that points at `to`
    pub fn lookup(&self, from: &str, to: &str) -> Option<&Neighbor> {
        self.neighbors(from).iter().find(|n| n.label == to)
    }

    pub fn switch_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
