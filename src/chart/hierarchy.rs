//! Event tree built from the event and edge tables.
//!
//! Edges form a directed graph over events. The tree is that graph expanded
//! from a single root: an event with several parents appears under each of
//! them, and an edge back into the current path is dropped.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::data::{EdgeRecord, EventRecord};
use crate::config::RootPolicy;
use crate::error::ChartError;

/// The edge a node was reached through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingEdge {
    pub edge_type: String,
    pub description: String,
}

impl IncomingEdge {
    pub fn is_dashed(&self) -> bool {
        self.edge_type == "dashed arrow"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    pub event: EventRecord,
    pub date: Option<NaiveDate>,
    /// None for the root
    pub incoming: Option<IncomingEdge>,
    pub children: Vec<EventNode>,
}

impl EventNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Longest distance to a leaf
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in this subtree
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(EventNode::len).sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(EventNode::leaf_count).sum()
        }
    }

    /// Pre-order walk: each node before its children, children in order
    pub fn descendants(&self) -> Vec<&EventNode> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// `"{date} - {description prefix}..."`
    pub fn label(&self, length: usize) -> String {
        let prefix: String = self.event.description.chars().take(length).collect();
        format!("{} - {}...", self.event.date, prefix)
    }

    pub fn tooltip(&self) -> String {
        let event = &self.event;
        let mut text = format!(
            "Date: {}\nWorld: {}\nDescription: {}\nCharacters: {}",
            event.date, event.world, event.description, event.characters
        );
        if let Some(edge) = &self.incoming {
            if !edge.edge_type.is_empty() {
                text.push_str(&format!("\nEdge Type: {}", edge.edge_type));
            }
            if !edge.description.is_empty() {
                text.push_str(&format!("\nEdge Description: {}", edge.description));
            }
        }
        text
    }
}

/// Events never named as an edge target, in table order
pub fn root_candidates<'a>(events: &'a [EventRecord], edges: &[EdgeRecord]) -> Vec<&'a EventRecord> {
    let targets: std::collections::HashSet<&str> = edges.iter().map(|e| e.target.as_str()).collect();
    events
        .iter()
        .filter(|event| !targets.contains(event.id.as_str()))
        .collect()
}

pub fn find_root<'a>(
    events: &'a [EventRecord],
    edges: &[EdgeRecord],
    policy: RootPolicy,
) -> Result<&'a EventRecord, ChartError> {
    if events.is_empty() {
        return Err(ChartError::EmptyEvents);
    }

    let candidates = root_candidates(events, edges);
    match (candidates.as_slice(), policy) {
        ([], _) => Err(ChartError::NoRoot),
        ([root], _) => Ok(*root),
        ([first, ..], RootPolicy::FirstInTableOrder) => {
            log::warn!(
                "{} events have no incoming edge, using the first one ({})",
                candidates.len(),
                first.id
            );
            Ok(*first)
        }
        (_, RootPolicy::Unique) => Err(ChartError::MultipleRoots(
            candidates.iter().map(|e| e.id.clone()).collect(),
        )),
    }
}

struct Graph<'a> {
    events: HashMap<&'a str, &'a EventRecord>,
    children: HashMap<&'a str, Vec<&'a EdgeRecord>>,
}

impl<'a> Graph<'a> {
    fn new(events: &'a [EventRecord], edges: &'a [EdgeRecord]) -> Self {
        let events: HashMap<&str, &EventRecord> = events.iter().map(|e| (e.id.as_str(), e)).collect();
        let mut children: HashMap<&str, Vec<&EdgeRecord>> = HashMap::new();

        for edge in edges {
            if events.contains_key(edge.source.as_str()) && events.contains_key(edge.target.as_str()) {
                children.entry(edge.source.as_str()).or_default().push(edge);
            } else {
                log::debug!("Skipping edge {} -> {}: unknown event", edge.source, edge.target);
            }
        }

        Self { events, children }
    }

    fn expand(&self, event: &'a EventRecord, incoming: Option<&EdgeRecord>, path: &mut Vec<&'a str>) -> EventNode {
        path.push(event.id.as_str());

        let mut children = Vec::new();
        for edge in self.children.get(event.id.as_str()).into_iter().flatten() {
            if path.contains(&edge.target.as_str()) {
                log::warn!(
                    "Cycle: edge {} -> {} leads back into its own path, skipping it",
                    edge.source,
                    edge.target
                );
                continue;
            }
            if let Some(target) = self.events.get(edge.target.as_str()) {
                children.push(self.expand(target, Some(edge), path));
            }
        }

        // Stable: events on the same date keep edge order, undated ones go last
        children.sort_by_key(|child: &EventNode| (child.date.is_none(), child.date));

        path.pop();

        EventNode {
            event: event.clone(),
            date: event.parsed_date(),
            incoming: incoming.map(|edge| IncomingEdge {
                edge_type: edge.edge_type.clone(),
                description: edge.description.clone(),
            }),
            children,
        }
    }
}

/// Build the event tree rooted at the event chosen by `policy`
pub fn build_hierarchy(
    events: &[EventRecord],
    edges: &[EdgeRecord],
    policy: RootPolicy,
) -> Result<EventNode, ChartError> {
    let root = find_root(events, edges, policy)?;
    let graph = Graph::new(events, edges);
    let tree = graph.expand(root, None, &mut Vec::new());
    log::info!(
        "Event tree rooted at {}: {} nodes, height {}",
        root.id,
        tree.len(),
        tree.height()
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, date: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            date: date.to_string(),
            world: "Adam".to_string(),
            description: format!("event {id}"),
            characters: String::new(),
            important_trigger: false,
            death: false,
        }
    }

    fn edge(source: &str, target: &str) -> EdgeRecord {
        EdgeRecord {
            source: source.to_string(),
            target: target.to_string(),
            edge_type: "arrow".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_unique_root() {
        let events = vec![event("B", ""), event("A", ""), event("C", "")];
        let edges = vec![edge("A", "B"), edge("A", "C")];
        let root = find_root(&events, &edges, RootPolicy::Unique).unwrap();
        assert_eq!(root.id, "A");
    }

    #[test]
    fn test_first_candidate_in_table_order() {
        let events = vec![event("X", ""), event("A", ""), event("B", "")];
        let edges = vec![edge("A", "B")];
        let root = find_root(&events, &edges, RootPolicy::FirstInTableOrder).unwrap();
        assert_eq!(root.id, "X");

        let err = find_root(&events, &edges, RootPolicy::Unique).unwrap_err();
        match err {
            ChartError::MultipleRoots(ids) => assert_eq!(ids, vec!["X", "A"]),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_no_root_when_everything_is_targeted() {
        let events = vec![event("A", ""), event("B", "")];
        let edges = vec![edge("A", "B"), edge("B", "A")];
        assert!(matches!(
            find_root(&events, &edges, RootPolicy::FirstInTableOrder),
            Err(ChartError::NoRoot)
        ));
        assert!(matches!(
            find_root(&[], &edges, RootPolicy::FirstInTableOrder),
            Err(ChartError::EmptyEvents)
        ));
    }

    #[test]
    fn test_children_sorted_by_date() {
        let events = vec![
            event("R", "01-01-2000"),
            event("late", "01-01-2020"),
            event("undated", "?"),
            event("early", "01-01-1990"),
        ];
        let edges = vec![edge("R", "late"), edge("R", "undated"), edge("R", "early")];
        let tree = build_hierarchy(&events, &edges, RootPolicy::Unique).unwrap();
        let ids: Vec<_> = tree.children.iter().map(|c| c.event.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "undated"]);
    }

    #[test]
    fn test_shared_child_is_duplicated() {
        let events = vec![event("R", ""), event("A", ""), event("B", ""), event("S", "")];
        let edges = vec![edge("R", "A"), edge("R", "B"), edge("A", "S"), edge("B", "S")];
        let tree = build_hierarchy(&events, &edges, RootPolicy::Unique).unwrap();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_cycle_is_cut() {
        let events = vec![event("R", ""), event("A", ""), event("B", "")];
        let edges = vec![edge("R", "A"), edge("A", "B"), edge("B", "A")];
        let tree = build_hierarchy(&events, &edges, RootPolicy::Unique).unwrap();
        assert_eq!(tree.len(), 3);
        assert!(tree.children[0].children[0].is_leaf());
    }

    #[test]
    fn test_unknown_events_in_edges_are_skipped() {
        let events = vec![event("R", ""), event("A", "")];
        let edges = vec![edge("R", "A"), edge("R", "ghost"), edge("ghost", "A")];
        let tree = build_hierarchy(&events, &edges, RootPolicy::Unique).unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_label_and_tooltip() {
        let mut node = EventNode {
            event: event("A", "05-11-1953"),
            date: None,
            incoming: Some(IncomingEdge {
                edge_type: "dashed arrow".to_string(),
                description: "travels".to_string(),
            }),
            children: Vec::new(),
        };
        node.event.description = "Helge is locked in the bunker by Noah".to_string();
        // 30 chars end on the space after "bunker"
        assert_eq!(node.label(30), "05-11-1953 - Helge is locked in the bunker ...");
        assert!(node.tooltip().contains("\nEdge Type: dashed arrow"));
        assert!(node.tooltip().contains("\nEdge Description: travels"));
        assert!(node.incoming.as_ref().unwrap().is_dashed());
    }

    #[test]
    fn test_descendants_are_preorder() {
        let events = vec![event("R", ""), event("A", ""), event("B", ""), event("C", "")];
        let edges = vec![edge("R", "A"), edge("A", "C"), edge("R", "B")];
        let tree = build_hierarchy(&events, &edges, RootPolicy::Unique).unwrap();
        let ids: Vec<_> = tree.descendants().iter().map(|n| n.event.id.as_str()).collect();
        assert_eq!(ids, vec!["R", "A", "C", "B"]);
    }
}
