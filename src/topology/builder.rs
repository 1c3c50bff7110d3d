//! Topology construction from the controller's link and device feeds.
//!
//! One builder, parametrized by the three remap tables, covers every
//! deployment: plain switches, access points behind remapped DPIDs, and
//! stations or docker hosts recognized by address.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fetch::{FetchError, JsonSource};

use super::classify::classify_nodes;
use super::devices::ingest_devices;
use super::graph::TopologyGraph;
use super::links::ingest_links;
use super::records::{IngestCounts, IngestError};

/// Operator-supplied identity overrides. Fixed for the builder's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemapTables {
    /// Switch DPID -> label
    pub dpids: HashMap<String, String>,
    /// IPv4 -> station label
    pub stations: HashMap<String, String>,
    /// IPv4 -> docker host label
    pub docker_hosts: HashMap<String, String>,
}

/// What happened to one feed during a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedStatus {
    Ingested { ingested: usize, skipped: usize },
    Unavailable { reason: String },
    UnexpectedSchema { reason: String },
}

impl FeedStatus {
    fn from_counts(counts: IngestCounts) -> Self {
        Self::Ingested {
            ingested: counts.ingested,
            skipped: counts.skipped,
        }
    }

    fn unavailable(err: &FetchError) -> Self {
        Self::Unavailable { reason: err.to_string() }
    }

    pub fn is_ingested(&self) -> bool {
        matches!(self, Self::Ingested { .. })
    }
}

/// Summary of a topology build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub links: FeedStatus,
    pub devices: FeedStatus,
    /// Nodes whose type changed during classification
    pub reclassified: usize,
}

/// Builds a fresh [`TopologyGraph`] on every call
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    links_url: String,
    devices_url: String,
    remap: RemapTables,
}

impl TopologyBuilder {
    pub fn new(links_url: impl Into<String>, devices_url: impl Into<String>, remap: RemapTables) -> Self {
        Self {
            links_url: links_url.into(),
            devices_url: devices_url.into(),
            remap,
        }
    }

    /// Fetch both feeds and build the graph: links, then devices, then
    /// classification. A missing feed leaves its part of the graph empty.
    pub fn build<S: JsonSource + ?Sized>(&self, source: &S) -> (TopologyGraph, BuildReport) {
        let mut graph = TopologyGraph::new();

        log::info!("Fetching switch links from {}", self.links_url);
        let links = match source.fetch_json(&self.links_url) {
            Ok(feed) => FeedStatus::from_counts(ingest_links(&mut graph, &self.remap, feed)),
            Err(e) => {
                log::error!("{}. No switch links added.", e);
                FeedStatus::unavailable(&e)
            }
        };

        log::info!("Fetching devices from {}", self.devices_url);
        let devices = match source.fetch_json(&self.devices_url) {
            Ok(feed) => match ingest_devices(&mut graph, &self.remap, feed) {
                Ok(counts) => FeedStatus::from_counts(counts),
                Err(IngestError::UnexpectedSchema(reason)) => {
                    log::warn!("Device feed had an unexpected JSON shape ({}). No hosts added.", reason);
                    FeedStatus::UnexpectedSchema { reason }
                }
                Err(e) => {
                    log::warn!("Device feed rejected: {}. No hosts added.", e);
                    FeedStatus::UnexpectedSchema { reason: e.to_string() }
                }
            },
            Err(e) => {
                log::error!("{}. No hosts added.", e);
                FeedStatus::unavailable(&e)
            }
        };

        let reclassified = classify_nodes(&mut graph);

        log::info!(
            "Topology built: {} nodes, {} edges ({} reclassified)",
            graph.node_count(),
            graph.edge_count(),
            reclassified
        );

        (
            graph,
            BuildReport {
                links,
                devices,
                reclassified,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::types::NodeType;
    use serde_json::{json, Value};

    struct Feeds {
        links: Result<Value, FetchError>,
        devices: Result<Value, FetchError>,
    }

    impl JsonSource for Feeds {
        fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
            if url.ends_with("links") {
                self.links.clone()
            } else {
                self.devices.clone()
            }
        }
    }

    fn builder(remap: RemapTables) -> TopologyBuilder {
        TopologyBuilder::new("http://c/links", "http://c/devices", remap)
    }

    #[test]
    fn test_build_classifies_after_ingestion() {
        let mut remap = RemapTables::default();
        remap.dpids.insert("A1".to_string(), "ap1".to_string());
        remap.stations.insert("10.0.0.2".to_string(), "sta2".to_string());

        let feeds = Feeds {
            links: Ok(json!([{"src-switch": "A1", "dst-switch": "1", "src-port": 1, "dst-port": 2}])),
            devices: Ok(json!([
                {"ipv4": ["10.0.0.2"], "attachmentPoint": [{"switch": "A1", "port": 5}]},
                {"ipv4": ["10.0.0.1"], "attachmentPoint": [{"switch": "1", "port": 1}]}
            ])),
        };

        let (graph, report) = builder(remap).build(&feeds);
        assert_eq!(graph.node_type("ap1"), Some(NodeType::Ap));
        assert_eq!(graph.node_type("sta2"), Some(NodeType::Station));
        assert_eq!(graph.node_type("h10.0.0.1"), Some(NodeType::Host));
        assert_eq!(graph.node_type("s1"), Some(NodeType::Switch));
        assert_eq!(report.reclassified, 1);
        assert!(report.links.is_ingested());
        assert!(report.devices.is_ingested());
    }

    #[test]
    fn test_unavailable_links_still_ingests_devices() {
        let feeds = Feeds {
            links: Err(FetchError::HttpStatus { url: "http://c/links".to_string(), status: 500 }),
            devices: Ok(json!([{"mac": "aa", "attachmentPoint": [{"switch": "1", "port": 1}]}])),
        };

        let (graph, report) = builder(RemapTables::default()).build(&feeds);
        assert!(matches!(report.links, FeedStatus::Unavailable { .. }));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_unexpected_device_envelope_keeps_switches() {
        let feeds = Feeds {
            links: Ok(json!([{"src-switch": "1", "dst-switch": "2", "src-port": 1, "dst-port": 1}])),
            devices: Ok(json!({"foo": []})),
        };

        let (graph, report) = builder(RemapTables::default()).build(&feeds);
        assert!(matches!(report.devices, FeedStatus::UnexpectedSchema { .. }));
        assert_eq!(graph.node_count(), 2);
        assert!(graph.nodes().all(|n| n.node_type == NodeType::Switch));
    }

    #[test]
    fn test_remap_tables_deserialize_partial() {
        let remap: RemapTables = serde_yaml::from_str("stations:\n  10.0.0.2: sta2\n").unwrap();
        assert_eq!(remap.stations.get("10.0.0.2").map(String::as_str), Some("sta2"));
        assert!(remap.dpids.is_empty());
    }
}
