//! Enumeration of every minimum-hop path between two nodes.

use std::collections::{HashMap, VecDeque};

use crate::topology::{Path, TopologyGraph};

/// Path query failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("node {0} not in graph")]
    UnknownNode(String),
}

/// Every path from `src` to `dst` with the fewest hops.
///
/// An unreachable destination is not an error: the result is empty and a
/// warning is logged. `src == dst` yields the single-node path.
pub fn shortest_paths(graph: &TopologyGraph, src: &str, dst: &str) -> Result<Vec<Path>, PathError> {
    for label in [src, dst] {
        if !graph.contains(label) {
            log::warn!("Node {} not in graph", label);
            return Err(PathError::UnknownNode(label.to_string()));
        }
    }

    if src == dst {
        return Ok(vec![vec![src.to_string()]]);
    }

    // BFS recording every predecessor that reaches a node at its minimum depth
    let mut depth: HashMap<&str, usize> = HashMap::new();
    let mut preds: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut queue = VecDeque::new();
    depth.insert(src, 0);
    queue.push_back(src);

    while let Some(current) = queue.pop_front() {
        let d = depth[current];
        if let Some(&target_depth) = depth.get(dst) {
            if d >= target_depth {
                break;
            }
        }
        for next in graph.neighbors(current) {
            match depth.get(next) {
                None => {
                    depth.insert(next, d + 1);
                    preds.entry(next).or_default().push(current);
                    queue.push_back(next);
                }
                Some(&nd) if nd == d + 1 => preds.entry(next).or_default().push(current),
                Some(_) => {}
            }
        }
    }

    if !depth.contains_key(dst) {
        log::warn!("No path between {} and {}", src, dst);
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let mut stack = vec![dst];
    collect_paths(&preds, src, &mut stack, &mut paths);
    log::debug!(
        "{} shortest path(s) of {} hops between {} and {}",
        paths.len(),
        depth[dst],
        src,
        dst
    );
    Ok(paths)
}

/// Walk predecessor lists back from the top of `stack` to `src`
fn collect_paths<'a>(
    preds: &HashMap<&'a str, Vec<&'a str>>,
    src: &str,
    stack: &mut Vec<&'a str>,
    paths: &mut Vec<Path>,
) {
    let Some(&current) = stack.last() else {
        return;
    };
    if current == src {
        paths.push(stack.iter().rev().map(|s| s.to_string()).collect());
        return;
    }
    if let Some(parents) = preds.get(current) {
        for &parent in parents {
            stack.push(parent);
            collect_paths(preds, src, stack, paths);
            stack.pop();
        }
    }
}
