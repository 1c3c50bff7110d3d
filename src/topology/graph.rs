//! In-memory undirected topology graph.
//!
//! Nodes are keyed by label and edges by the unordered label pair, so
//! re-ingesting the same feed never duplicates anything. Iteration follows
//! insertion order, which keeps path enumeration deterministic.

use std::collections::HashMap;

use super::types::{Edge, EdgeKind, Node, NodeType};

#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<(usize, usize), usize>,
    neighbors: Vec<Vec<usize>>,
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.node_index.contains_key(label)
    }

    pub fn node(&self, label: &str) -> Option<&Node> {
        self.node_index.get(label).map(|&i| &self.nodes[i])
    }

    pub fn node_type(&self, label: &str) -> Option<NodeType> {
        self.node(label).map(|n| n.node_type)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<&Edge> {
        let ia = *self.node_index.get(a)?;
        let ib = *self.node_index.get(b)?;
        self.edge_index.get(&pair_key(ia, ib)).map(|&e| &self.edges[e])
    }

    /// Labels adjacent to `label`, in the order the edges were first inserted
    pub fn neighbors<'a>(&'a self, label: &str) -> impl Iterator<Item = &'a str> + 'a {
        let adjacent = self
            .node_index
            .get(label)
            .map(|&i| self.neighbors[i].as_slice())
            .unwrap_or(&[]);
        adjacent.iter().map(move |&j| self.nodes[j].label.as_str())
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Insert `label` if absent, otherwise upgrade its type when `node_type`
    /// outranks the current one. Pinned nodes are left alone.
    pub fn ensure_node(&mut self, label: &str, node_type: NodeType) -> &mut Node {
        let idx = match self.node_index.get(label).copied() {
            Some(i) => {
                let node = &mut self.nodes[i];
                if !node.pinned && node_type.rank() > node.node_type.rank() {
                    log::debug!("Upgrading {} from {} to {}", label, node.node_type, node_type);
                    node.node_type = node_type;
                }
                i
            }
            None => self.push_node(Node::new(label, node_type)),
        };
        &mut self.nodes[idx]
    }

    /// Insert or overwrite `label` with a type that came from a remap table
    pub fn pin_node(&mut self, label: &str, node_type: NodeType) -> &mut Node {
        let idx = match self.node_index.get(label).copied() {
            Some(i) => i,
            None => self.push_node(Node::new(label, node_type)),
        };
        let node = &mut self.nodes[idx];
        node.node_type = node_type;
        node.pinned = true;
        node
    }

    /// Insert an edge between two existing nodes; a second insert for the
    /// same pair replaces sidedness and attributes.
    ///
    /// Returns false if either endpoint is missing.
    pub fn upsert_edge(&mut self, src: &str, dst: &str, kind: EdgeKind) -> bool {
        let (Some(&is), Some(&id)) = (self.node_index.get(src), self.node_index.get(dst)) else {
            log::warn!("Refusing edge {} -- {}: endpoint not in graph", src, dst);
            return false;
        };

        let edge = Edge {
            src: src.to_string(),
            dst: dst.to_string(),
            kind,
        };

        match self.edge_index.get(&pair_key(is, id)).copied() {
            Some(e) => self.edges[e] = edge,
            None => {
                self.edge_index.insert(pair_key(is, id), self.edges.len());
                self.edges.push(edge);
                self.neighbors[is].push(id);
                if is != id {
                    self.neighbors[id].push(is);
                }
            }
        }
        true
    }

    fn push_node(&mut self, node: Node) -> usize {
        let idx = self.nodes.len();
        self.node_index.insert(node.label.clone(), idx);
        self.nodes.push(node);
        self.neighbors.push(Vec::new());
        idx
    }
}
