//! Topology type definitions.
//!
//! Nodes, edges and the port identifiers the controller reports for them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a node in the discovered network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Switch,
    Host,
    /// Wireless access point
    Ap,
    /// Wireless station
    Station,
    /// Containerized host
    DockerHost,
    #[default]
    Unknown,
}

impl NodeType {
    /// Position in the upgrade order: a node only ever moves to a higher rank.
    ///
    /// `unknown` < structural (`switch`, `host`) < specialized.
    pub fn rank(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Switch | Self::Host => 1,
            Self::Ap | Self::Station | Self::DockerHost => 2,
        }
    }

    /// True for the values the classifier is allowed to refine
    pub fn is_generic(self) -> bool {
        matches!(self, Self::Switch | Self::Host | Self::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Host => "host",
            Self::Ap => "ap",
            Self::Station => "station",
            Self::DockerHost => "dockerhost",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the topology graph. The label is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Set when a remap table assigned the type; pinned types are never re-inferred
    pub pinned: bool,
    /// Raw controller identifier for switches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpid: Option<String>,
}

impl Node {
    pub fn new(label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            label: label.into(),
            node_type,
            pinned: false,
            dpid: None,
        }
    }

    /// Identifier used in statistics URLs.
    ///
    /// Falls back to the label minus its one-character prefix when the raw
    /// DPID was never recorded.
    pub fn telemetry_id(&self) -> &str {
        match &self.dpid {
            Some(dpid) => dpid,
            None => {
                let mut chars = self.label.chars();
                chars.next();
                chars.as_str()
            }
        }
    }
}

/// A physical port number as reported by the controller.
///
/// Kept as text because the controller may send numbers or strings
/// (e.g. `"local"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(pub String);

impl PortId {
    pub fn new(port: impl Into<String>) -> Self {
        Self(port.into())
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u32> for PortId {
    fn from(port: u32) -> Self {
        Self(port.to_string())
    }
}

/// Attributes of a switch-to-switch link, copied verbatim from the link feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchLink {
    /// Port on the `src` endpoint
    pub src_port: Option<PortId>,
    /// Port on the `dst` endpoint
    pub dst_port: Option<PortId>,
    /// `internal`, `external` or empty
    pub link_type: String,
    pub direction: String,
}

/// Edge attributes, depending on what the edge connects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeKind {
    SwitchLink(SwitchLink),
    /// Host attached to a switch; `port` is the switch-side port
    Attachment { port: PortId },
}

/// An undirected edge. `src`/`dst` record the sidedness of the last write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub src: String,
    pub dst: String,
    #[serde(flatten)]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn switch_link(&self) -> Option<&SwitchLink> {
        match &self.kind {
            EdgeKind::SwitchLink(link) => Some(link),
            EdgeKind::Attachment { .. } => None,
        }
    }
}

/// An ordered sequence of node labels from source to destination
pub type Path = Vec<String>;
