//! Structural statistics over the edge table.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use super::data::EdgeRecord;

/// Every path from each edge source down to a node without outgoing edges.
///
/// Start nodes are taken in order of first appearance as a source. A path
/// never visits a node twice; branches that would are dropped.
pub fn all_paths(edges: &[EdgeRecord]) -> Vec<Vec<String>> {
    let mut order: Vec<&str> = Vec::new();
    let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        outgoing
            .entry(edge.source.as_str())
            .or_insert_with(|| {
                order.push(edge.source.as_str());
                Vec::new()
            })
            .push(edge.target.as_str());
    }

    let mut paths = Vec::new();
    let mut current = Vec::new();
    for &start in &order {
        walk(start, &outgoing, &mut current, &mut paths);
    }
    paths
}

fn walk<'a>(
    node: &'a str,
    outgoing: &HashMap<&'a str, Vec<&'a str>>,
    current: &mut Vec<&'a str>,
    paths: &mut Vec<Vec<String>>,
) {
    if current.contains(&node) {
        return;
    }
    current.push(node);
    match outgoing.get(node) {
        None => paths.push(current.iter().map(|s| s.to_string()).collect()),
        Some(next) => {
            for target in next {
                walk(target, outgoing, current, paths);
            }
        }
    }
    current.pop();
}

/// Numeric ids in numeric order, ahead of all other ids in string order
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Sources that never appear as a target, sorted by [`compare_ids`]
pub fn entry_points(edges: &[EdgeRecord]) -> Vec<String> {
    let targets: HashSet<&str> = edges.iter().map(|e| e.target.as_str()).collect();
    let sources: HashSet<&str> = edges.iter().map(|e| e.source.as_str()).collect();
    let mut entries: Vec<String> = sources
        .difference(&targets)
        .map(|s| s.to_string())
        .collect();
    entries.sort_by(|a, b| compare_ids(a, b));
    entries
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeDegree {
    /// Edges leaving the node
    pub source_count: usize,
    /// Edges entering the node
    pub target_count: usize,
}

impl NodeDegree {
    pub fn total(&self) -> usize {
        self.source_count + self.target_count
    }

    /// Exactly one edge in and one edge out
    pub fn is_relay(&self) -> bool {
        self.source_count == 1 && self.target_count == 1
    }

    pub fn is_hub(&self) -> bool {
        self.total() >= 3
    }
}

/// Degree of every node named in the edge table, sorted by [`compare_ids`]
pub fn degree_table(edges: &[EdgeRecord]) -> Vec<(String, NodeDegree)> {
    let mut table: HashMap<&str, NodeDegree> = HashMap::new();
    for edge in edges {
        table.entry(edge.source.as_str()).or_default().source_count += 1;
        table.entry(edge.target.as_str()).or_default().target_count += 1;
    }
    let mut rows: Vec<(String, NodeDegree)> = table
        .into_iter()
        .map(|(id, degree)| (id.to_string(), degree))
        .collect();
    rows.sort_by(|(a, _), (b, _)| compare_ids(a, b));
    rows
}

#[derive(Debug, Clone)]
pub struct GraphReport {
    pub paths: Vec<Vec<String>>,
    pub entry_points: Vec<String>,
    pub degrees: Vec<(String, NodeDegree)>,
}

impl GraphReport {
    pub fn from_edges(edges: &[EdgeRecord]) -> Self {
        Self {
            paths: all_paths(edges),
            entry_points: entry_points(edges),
            degrees: degree_table(edges),
        }
    }

    pub fn degree(&self, id: &str) -> Option<NodeDegree> {
        self.degrees
            .iter()
            .find(|(node, _)| node == id)
            .map(|(_, degree)| *degree)
    }

    pub fn relay_nodes(&self) -> impl Iterator<Item = (&String, &NodeDegree)> {
        self.degrees
            .iter()
            .filter(|(_, d)| d.is_relay())
            .map(|(id, d)| (id, d))
    }

    pub fn hub_nodes(&self) -> impl Iterator<Item = (&String, &NodeDegree)> {
        self.degrees
            .iter()
            .filter(|(_, d)| d.is_hub())
            .map(|(id, d)| (id, d))
    }

    /// Plain-text summary
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "All possible paths (avoiding cycles):");
        for (i, path) in self.paths.iter().enumerate() {
            let _ = writeln!(out, "Path {}: {}", i + 1, path.join(" -> "));
        }
        let _ = writeln!(out, "Total number of paths: {}\n", self.paths.len());

        let _ = writeln!(out, "Entry points (source only):");
        for id in &self.entry_points {
            let _ = writeln!(out, "  {id}");
        }
        let _ = writeln!(out, "Total count: {}\n", self.entry_points.len());

        let relays: Vec<_> = self.relay_nodes().collect();
        let _ = writeln!(out, "Relay nodes (one in, one out):");
        for (id, _) in &relays {
            let _ = writeln!(out, "  {id}");
        }
        let _ = writeln!(out, "Total count: {}\n", relays.len());

        let hubs: Vec<_> = self.hub_nodes().collect();
        let _ = writeln!(out, "Hub nodes (degree >= 3):");
        let _ = writeln!(out, "  {:<12} {:>6} {:>6} {:>6}", "id", "out", "in", "total");
        for (id, degree) in &hubs {
            let _ = writeln!(
                out,
                "  {:<12} {:>6} {:>6} {:>6}",
                id,
                degree.source_count,
                degree.target_count,
                degree.total()
            );
        }
        let _ = writeln!(out, "Total count: {}", hubs.len());

        out
    }
}
