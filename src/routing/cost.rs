//! Per-path bandwidth-asymmetry cost.
//!
//! Only the switch-to-switch hops between the two endpoints are priced. A
//! hop's cost is `|rx - tx|` on the egress port of the first switch.

use serde::{Deserialize, Serialize};

use crate::topology::{Path, TopologyGraph};

use super::adjacency::AdjacencyIndex;
use super::telemetry::{LinkRef, Measurements, UnmeasuredLink};

/// How a hop without a measurement affects its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmeasuredPolicy {
    /// Contributes nothing to the path cost
    #[default]
    Zero,
    /// Contributes a fixed penalty
    Penalize,
    /// Removes the path from selection
    Disqualify,
}

/// One interior hop of a candidate path, resolved against the adjacency index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Link(LinkRef),
    Unresolved(UnmeasuredLink),
}

/// Map each consecutive interior pair of `path` to the port that carries it
pub fn plan_segments(graph: &TopologyGraph, adjacency: &AdjacencyIndex, path: &Path) -> Vec<Segment> {
    if path.len() < 2 {
        return Vec::new();
    }
    let interior = &path[1..path.len() - 1];

    interior
        .windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            let Some(neighbor) = adjacency.lookup(from, to) else {
                log::warn!("Could not find port info for link {} -> {}", from, to);
                return Segment::Unresolved(UnmeasuredLink::NoAdjacency {
                    from: from.clone(),
                    to: to.clone(),
                });
            };
            let Some(port) = neighbor.port.clone() else {
                log::warn!("Link {} -> {} was reported without a port", from, to);
                return Segment::Unresolved(UnmeasuredLink::MissingPort {
                    from: from.clone(),
                    to: to.clone(),
                });
            };
            let switch_id = graph
                .node(from)
                .map(|n| n.telemetry_id().to_string())
                .unwrap_or_else(|| from.chars().skip(1).collect());
            Segment::Link(LinkRef {
                switch: from.clone(),
                switch_id,
                port,
            })
        })
        .collect()
}

/// Cost of one priced hop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCost {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// `|rx - tx|` when measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmeasured: Option<UnmeasuredLink>,
}

/// Evaluated cost of one candidate path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathCost {
    pub path: Path,
    /// Sum over measured hops only
    pub measured_cost: u64,
    pub measured_links: usize,
    pub unmeasured_links: usize,
    /// Cost used for selection, `None` if the policy disqualified the path
    pub effective_cost: Option<u64>,
    pub links: Vec<LinkCost>,
}

impl PathCost {
    pub fn is_fully_measured(&self) -> bool {
        self.unmeasured_links == 0
    }
}

/// Price `path` from its planned segments and a round of measurements
pub fn evaluate_path(
    path: &Path,
    segments: &[Segment],
    measurements: &Measurements,
    policy: UnmeasuredPolicy,
    penalty: u64,
) -> PathCost {
    let interior = if path.len() >= 2 { &path[1..path.len() - 1] } else { &[][..] };
    let mut links = Vec::with_capacity(segments.len());
    let mut measured_cost: u64 = 0;
    let mut measured_links = 0;
    let mut unmeasured_links = 0;

    for (hop, segment) in interior.windows(2).zip(segments) {
        let (from, to) = (hop[0].clone(), hop[1].clone());
        let (port, outcome) = match segment {
            Segment::Unresolved(reason) => (None, Err(reason.clone())),
            Segment::Link(link) => {
                let outcome = measurements
                    .get(link)
                    .cloned()
                    .unwrap_or(Err(UnmeasuredLink::DeadlineExceeded));
                (Some(link.port.to_string()), outcome.map(|s| s.asymmetry()))
            }
        };

        match outcome {
            Ok(cost) => {
                measured_cost = measured_cost.saturating_add(cost);
                measured_links += 1;
                links.push(LinkCost { from, to, port, cost: Some(cost), unmeasured: None });
            }
            Err(reason) => {
                unmeasured_links += 1;
                links.push(LinkCost { from, to, port, cost: None, unmeasured: Some(reason) });
            }
        }
    }

    let effective_cost = match policy {
        UnmeasuredPolicy::Zero => Some(measured_cost),
        UnmeasuredPolicy::Penalize => {
            Some(measured_cost.saturating_add(penalty.saturating_mul(unmeasured_links as u64)))
        }
        UnmeasuredPolicy::Disqualify if unmeasured_links > 0 => None,
        UnmeasuredPolicy::Disqualify => Some(measured_cost),
    };

    log::info!(
        "Cost for path {}: {} ({} measured, {} unmeasured)",
        path.join(" -> "),
        effective_cost.map_or_else(|| "disqualified".to_string(), |c| c.to_string()),
        measured_links,
        unmeasured_links
    );

    PathCost {
        path: path.clone(),
        measured_cost,
        measured_links,
        unmeasured_links,
        effective_cost,
        links,
    }
}
