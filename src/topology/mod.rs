//! Network topology module.
//!
//! Turns the controller's link list and device list into a single
//! undirected graph of switches, hosts, access points, stations and docker
//! hosts, then refines node types by label prefix.

pub mod types;
pub mod graph;
pub mod records;
pub mod links;
pub mod devices;
pub mod classify;
pub mod builder;

// Re-export key types and functions for easier access
pub use types::{Edge, EdgeKind, Node, NodeType, Path, PortId, SwitchLink};
pub use graph::TopologyGraph;
pub use records::{IngestCounts, IngestError};
pub use classify::{classify, classify_nodes};
pub use builder::{BuildReport, FeedStatus, RemapTables, TopologyBuilder};
