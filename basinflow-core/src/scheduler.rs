//! Topological ordering over the strong-edge subgraph, and simple-cycle
//! enumeration for diagnostics when that subgraph isn't a DAG.
//!
//! Feedback edges (anything targeting a `LaggedValue` component) are
//! excluded from the graph this module orders: a lagged value is allowed to
//! depend on its own eventual consumer because it only ever emits what it
//! captured on a *previous* tick, never the current one.

use std::collections::{HashMap, HashSet};

use crate::error::{BasinflowError, Result};
use crate::graph::Connection;

/// Returns component names in an order where every strong-edge dependency
/// is stepped before its dependents. Errors with every simple cycle found
/// in the strong-edge subgraph if no such order exists.
pub fn topological_order(nodes: &[String], connections: &[Connection]) -> Result<Vec<String>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = nodes.iter().map(|n| (n.as_str(), Vec::new())).collect();
    let mut in_degree: HashMap<&str, usize> = nodes.iter().map(|n| (n.as_str(), 0)).collect();

    for edge in connections.iter().filter(|c| !c.is_feedback) {
        adjacency.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
        *in_degree.entry(edge.target.as_str()).or_default() += 1;
    }

    // Deterministic processing order: nodes are queued in their declared
    // order whenever multiple become ready at once.
    let mut ready: Vec<&str> = nodes
        .iter()
        .map(String::as_str)
        .filter(|n| in_degree[n] == 0)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    let mut cursor = 0;
    while cursor < ready.len() {
        let node = ready[cursor];
        cursor += 1;
        order.push(node.to_string());

        for &next in &adjacency[node] {
            let degree = in_degree.get_mut(next).expect("node exists");
            *degree -= 1;
            if *degree == 0 {
                ready.push(next);
            }
        }
    }

    if order.len() != nodes.len() {
        let cycles = find_simple_cycles(nodes, connections);
        return Err(BasinflowError::Cycle { cycles });
    }

    Ok(order)
}

fn find_simple_cycles(nodes: &[String], connections: &[Connection]) -> Vec<Vec<String>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in connections.iter().filter(|c| !c.is_feedback) {
        adjacency.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
    }

    let mut cycles = Vec::new();
    let mut seen_cycles: HashSet<Vec<&str>> = HashSet::new();

    for start in nodes {
        let mut path = Vec::new();
        dfs_cycles(start, start, &adjacency, &mut path, &mut cycles, &mut seen_cycles);
    }

    cycles
}

fn dfs_cycles<'a>(
    start: &'a str,
    current: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
    seen: &mut HashSet<Vec<&'a str>>,
) {
    path.push(current);

    if let Some(neighbours) = adjacency.get(current) {
        for &next in neighbours {
            if next == start {
                let mut normalized = path.clone();
                normalize_cycle(&mut normalized);
                if seen.insert(normalized.clone()) {
                    cycles.push(normalized.into_iter().map(str::to_string).collect());
                }
            } else if !path.contains(&next) {
                dfs_cycles(start, next, adjacency, path, cycles, seen);
            }
        }
    }

    path.pop();
}

/// Rotates a cycle's node list to start at its lexicographically smallest
/// element so the same cycle found from different starting nodes dedupes.
fn normalize_cycle<'a>(cycle: &mut Vec<&'a str>) {
    if cycle.is_empty() {
        return;
    }
    let min_idx = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, name)| **name)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    cycle.rotate_left(min_idx);
}
