//! Selection of the cheapest paths among the tied shortest ones.

use serde::Serialize;

use crate::fetch::JsonSource;
use crate::topology::{Path, TopologyGraph};

use super::adjacency::AdjacencyIndex;
use super::cost::{evaluate_path, plan_segments, PathCost, Segment, UnmeasuredPolicy};
use super::telemetry::{LinkRef, TelemetryCollector};

/// Marker returned when no candidate path exists
pub const NO_OPTIMAL_PATH: &str = "NO OPTIMAL PATH";

/// Outcome of an optimal-path query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OptimalPaths {
    /// The shortest-path search produced nothing to rank
    NoCandidates,
    /// Every candidate was disqualified for unmeasured links
    Unmeasurable { evaluated: Vec<PathCost> },
    /// All paths sharing the minimum cost, in candidate order
    Selected {
        cost: u64,
        paths: Vec<Path>,
        evaluated: Vec<PathCost>,
    },
}

impl OptimalPaths {
    pub fn paths(&self) -> &[Path] {
        match self {
            Self::Selected { paths, .. } => paths,
            _ => &[],
        }
    }

    pub fn cost(&self) -> Option<u64> {
        match self {
            Self::Selected { cost, .. } => Some(*cost),
            _ => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }
}

/// Keep the running minimum and every path that ties it.
///
/// Disqualified paths (no effective cost) are never selected.
pub fn select_cheapest(evaluated: Vec<PathCost>) -> OptimalPaths {
    if evaluated.is_empty() {
        return OptimalPaths::NoCandidates;
    }

    let mut best: Option<u64> = None;
    let mut paths: Vec<Path> = Vec::new();

    for candidate in &evaluated {
        let Some(cost) = candidate.effective_cost else {
            continue;
        };
        match best {
            Some(min) if cost > min => {}
            Some(min) if cost == min => paths.push(candidate.path.clone()),
            _ => {
                best = Some(cost);
                paths = vec![candidate.path.clone()];
            }
        }
    }

    match best {
        Some(cost) => OptimalPaths::Selected { cost, paths, evaluated },
        None => OptimalPaths::Unmeasurable { evaluated },
    }
}

/// Everything the selector needs besides the candidates themselves
pub struct CostContext<'a, S: JsonSource + ?Sized> {
    pub graph: &'a TopologyGraph,
    pub adjacency: &'a AdjacencyIndex,
    pub collector: &'a TelemetryCollector,
    pub source: &'a S,
    pub policy: UnmeasuredPolicy,
    pub penalty: u64,
}

/// Price every candidate with one shared round of telemetry and select the
/// cheapest. A link appearing in several candidates is measured once.
pub fn optimal_paths<S: JsonSource + ?Sized>(ctx: &CostContext<'_, S>, candidates: &[Path]) -> OptimalPaths {
    if candidates.is_empty() {
        log::warn!("No candidate paths to rank");
        return OptimalPaths::NoCandidates;
    }

    let plans: Vec<Vec<Segment>> = candidates
        .iter()
        .map(|path| plan_segments(ctx.graph, ctx.adjacency, path))
        .collect();

    let links: Vec<LinkRef> = plans
        .iter()
        .flatten()
        .filter_map(|segment| match segment {
            Segment::Link(link) => Some(link.clone()),
            Segment::Unresolved(_) => None,
        })
        .collect();

    let measurements = ctx.collector.collect(ctx.source, &links);

    let evaluated: Vec<PathCost> = candidates
        .iter()
        .zip(&plans)
        .map(|(path, segments)| evaluate_path(path, segments, &measurements, ctx.policy, ctx.penalty))
        .collect();

    let outcome = select_cheapest(evaluated);
    match &outcome {
        OptimalPaths::Selected { cost, paths, .. } => {
            log::info!("{} optimal path(s) at cost {}", paths.len(), cost)
        }
        OptimalPaths::Unmeasurable { .. } => log::warn!("Every candidate path was disqualified"),
        OptimalPaths::NoCandidates => {}
    }
    outcome
}
