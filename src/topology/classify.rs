//! Node subtype inference from label prefixes.
//!
//! Precedence, highest first: remap-table assignment (pinned), prefix
//! inference, structural default from ingestion, `unknown`.

use super::graph::TopologyGraph;
use super::types::NodeType;

/// Resolve the type a node should carry after classification.
///
/// * Pinned nodes keep whatever the remap table gave them.
/// * `ap` prefix makes any generic node an access point; a remapped switch
///   DPID is how access points show up in the link feed.
/// * `sta` and `d` prefixes only refine host-side nodes (`host`/`unknown`).
///   A switch label that happens to start with `d` stays a switch.
pub fn classify(label: &str, current: NodeType, already_pinned: bool) -> NodeType {
    if already_pinned || !current.is_generic() {
        return current;
    }

    if label.starts_with("ap") {
        return NodeType::Ap;
    }

    if current == NodeType::Switch {
        return current;
    }

    if label.starts_with("sta") {
        NodeType::Station
    } else if label.starts_with('d') {
        NodeType::DockerHost
    } else {
        current
    }
}

/// Run [`classify`] over every node. Returns how many nodes changed type.
pub fn classify_nodes(graph: &mut TopologyGraph) -> usize {
    let mut changed = 0;
    for node in graph.nodes_mut() {
        let inferred = classify(&node.label, node.node_type, node.pinned);
        if inferred != node.node_type {
            log::debug!("Classified {} as {} (was {})", node.label, inferred, node.node_type);
            node.node_type = inferred;
            changed += 1;
        }
    }
    changed
}
