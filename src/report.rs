//! Report generation for discovered topologies and path queries.
//!
//! Produces JSON snapshots, console summaries and GraphViz DOT output for
//! rendering tools.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path as FsPath;

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::routing::{OptimalPaths, PathCost, NO_OPTIMAL_PATH};
use crate::topology::{BuildReport, Edge, EdgeKind, FeedStatus, Node, NodeType, Path, TopologyGraph};

/// Serializable point-in-time view of the topology
#[derive(Debug, Clone, Serialize)]
pub struct TopologySnapshot {
    pub captured_at: String,
    pub controller: String,
    pub node_counts: BTreeMap<String, usize>,
    pub build: BuildReport,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl TopologySnapshot {
    pub fn capture(graph: &TopologyGraph, build: BuildReport, controller: &str) -> Self {
        Self {
            captured_at: chrono::Utc::now().to_rfc3339(),
            controller: controller.to_string(),
            node_counts: node_counts(graph),
            build,
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().cloned().collect(),
        }
    }
}

/// Number of nodes per type
pub fn node_counts(graph: &TopologyGraph) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for node in graph.nodes() {
        *counts.entry(node.node_type.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Write any serializable report as pretty JSON
pub fn write_json<T: Serialize>(report: &T, output_path: &FsPath) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Print a topology summary to stdout
pub fn print_topology_summary(snapshot: &TopologySnapshot) {
    println!("\n=== TOPOLOGY SNAPSHOT ===\n");
    println!("Controller: {}", snapshot.controller);
    println!("Captured:   {}", snapshot.captured_at);
    println!();
    println!("Nodes: {}", snapshot.nodes.len());
    for (node_type, count) in &snapshot.node_counts {
        println!("  {:<11} {}", node_type, count);
    }
    println!("Edges: {}", snapshot.edges.len());
    println!();
    println!("Link feed:   {}", describe_feed(&snapshot.build.links));
    println!("Device feed: {}", describe_feed(&snapshot.build.devices));
    println!();
}

fn describe_feed(status: &FeedStatus) -> String {
    match status {
        FeedStatus::Ingested { ingested, skipped } => {
            format!("{} records ingested, {} skipped", ingested, skipped)
        }
        FeedStatus::Unavailable { reason } => format!("unavailable ({})", reason),
        FeedStatus::UnexpectedSchema { reason } => format!("ignored ({})", reason),
    }
}

pub fn format_path(path: &Path) -> String {
    path.join(" -> ")
}

/// Print the result of an optimal-path query
pub fn print_optimal_summary(src: &str, dst: &str, outcome: &OptimalPaths) {
    println!("\n=== OPTIMAL PATH {} -> {} ===\n", src, dst);
    match outcome {
        OptimalPaths::NoCandidates => println!("{}", NO_OPTIMAL_PATH),
        OptimalPaths::Unmeasurable { evaluated } => {
            println!("{} (all {} candidates had unmeasured links)", NO_OPTIMAL_PATH, evaluated.len());
        }
        OptimalPaths::Selected { cost, paths, evaluated } => {
            println!("Candidates evaluated: {}", evaluated.len());
            for candidate in evaluated {
                println!("  {}", describe_candidate(candidate));
            }
            println!();
            println!("Optimal cost: {}", cost);
            for path in paths {
                println!("  {}", format_path(path));
            }
        }
    }
    println!();
}

fn describe_candidate(candidate: &PathCost) -> String {
    let cost = candidate
        .effective_cost
        .map_or_else(|| "disqualified".to_string(), |c| c.to_string());
    if candidate.is_fully_measured() {
        format!("{}  cost={}", format_path(&candidate.path), cost)
    } else {
        format!(
            "{}  cost={} ({} of {} links unmeasured)",
            format_path(&candidate.path),
            cost,
            candidate.unmeasured_links,
            candidate.measured_links + candidate.unmeasured_links
        )
    }
}

/// Quote a label as a DOT identifier
fn dot_id(label: &str) -> String {
    format!("\"{}\"", label.replace('\\', "\\\\").replace('"', "\\\""))
}

fn node_style(node_type: NodeType) -> (&'static str, &'static str) {
    match node_type {
        NodeType::Switch => ("box", "skyblue"),
        NodeType::Ap => ("pentagon", "orange"),
        NodeType::Station => ("diamond", "violet"),
        NodeType::DockerHost => ("invtriangle", "yellow"),
        NodeType::Host | NodeType::Unknown => ("ellipse", "lightgreen"),
    }
}

fn edge_color(edge: &Edge) -> &'static str {
    match &edge.kind {
        EdgeKind::SwitchLink(link) => match link.link_type.as_str() {
            "internal" => "blue",
            "external" => "red",
            _ => "gray",
        },
        EdgeKind::Attachment { .. } => "gray",
    }
}

/// Generate GraphViz DOT format for visualization
pub fn generate_dot(graph: &TopologyGraph) -> String {
    let mut dot = String::new();
    dot.push_str("graph Topology {\n");
    dot.push_str("    layout=neato;\n");
    dot.push_str("    overlap=false;\n");
    dot.push_str("    node [style=filled, fontsize=8];\n\n");

    for node in graph.nodes() {
        let (shape, color) = node_style(node.node_type);
        dot.push_str(&format!(
            "    {} [shape={}, fillcolor={}];\n",
            dot_id(&node.label),
            shape,
            color
        ));
    }

    dot.push('\n');

    for edge in graph.edges() {
        let label = match &edge.kind {
            EdgeKind::SwitchLink(link) => format!(
                "{}/{}",
                link.src_port.as_ref().map_or("?", |p| p.0.as_str()),
                link.dst_port.as_ref().map_or("?", |p| p.0.as_str())
            ),
            EdgeKind::Attachment { port } => port.to_string(),
        };
        dot.push_str(&format!(
            "    {} -- {} [color={}, label={}];\n",
            dot_id(&edge.src),
            dot_id(&edge.dst),
            edge_color(edge),
            dot_id(&label)
        ));
    }

    dot.push_str("}\n");
    dot
}

/// Write the DOT rendering of `graph` to a file
pub fn write_dot(graph: &TopologyGraph, output_path: &FsPath) -> Result<()> {
    fs::write(output_path, generate_dot(graph))
        .with_context(|| format!("Failed to write DOT file to {}", output_path.display()))?;
    log::info!("DOT topology written to {}", output_path.display());
    Ok(())
}
