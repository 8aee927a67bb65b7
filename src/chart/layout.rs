//! Cluster (dendrogram) layout with fixed node spacing.
//!
//! Leaves are spaced evenly left to right in tree order, one unit between
//! siblings and two between cousins; every parent sits at the mean position
//! of its children. Depth runs along `y` so that all leaves share the same
//! `y`. The root ends up at `x = 0`.

use super::hierarchy::EventNode;

#[derive(Debug, Clone, Copy)]
pub struct PositionedNode<'a> {
    pub node: &'a EventNode,
    /// Index of the parent in [`ClusterLayout::nodes`]
    pub parent: Option<usize>,
    /// Breadth position, in units of `dx`
    pub x: f64,
    /// Depth position, in units of `dy`
    pub y: f64,
    /// Longest distance to a leaf
    pub height: usize,
}

impl PositionedNode<'_> {
    pub fn has_children(&self) -> bool {
        !self.node.is_leaf()
    }
}

#[derive(Debug, Clone)]
pub struct ClusterLayout<'a> {
    /// Pre-order, root first
    pub nodes: Vec<PositionedNode<'a>>,
    /// Spacing between neighbouring leaves
    pub dx: f64,
    /// Spacing between levels
    pub dy: f64,
}

impl<'a> ClusterLayout<'a> {
    /// Lay out `root` with leaf spacing `dx` and level spacing
    /// `width / (height + 1)`
    pub fn new(root: &'a EventNode, dx: f64, width: f64) -> Self {
        let mut nodes = flatten(root);
        let root_height = nodes.first().map_or(0, |n| n.height);
        let dy = width / (root_height + 1) as f64;

        place_leaves(&mut nodes);
        center_parents(&mut nodes);

        let root_x = nodes.first().map_or(0.0, |n| n.x);
        for node in &mut nodes {
            node.x = (node.x - root_x) * dx;
            node.y = (root_height - node.height) as f64 * dy;
        }

        Self { nodes, dx, dy }
    }

    /// Smallest and largest `x`
    pub fn x_extent(&self) -> (f64, f64) {
        self.nodes
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| (lo.min(n.x), hi.max(n.x)))
    }

    /// (parent index, child index) for every node except the root
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.parent.map(|p| (p, i)))
    }

    pub fn root(&self) -> Option<&PositionedNode<'a>> {
        self.nodes.first()
    }
}

fn flatten(root: &EventNode) -> Vec<PositionedNode<'_>> {
    let mut nodes = Vec::with_capacity(root.len());
    let mut stack = vec![(root, None)];
    while let Some((node, parent)) = stack.pop() {
        let index = nodes.len();
        nodes.push(PositionedNode {
            node,
            parent,
            x: 0.0,
            y: 0.0,
            height: 0,
        });
        stack.extend(node.children.iter().rev().map(|child| (child, Some(index))));
    }

    // Children always follow their parent, so a reverse sweep sees every
    // child before its parent
    for i in (1..nodes.len()).rev() {
        if let Some(p) = nodes[i].parent {
            nodes[p].height = nodes[p].height.max(nodes[i].height + 1);
        }
    }
    nodes
}

fn place_leaves(nodes: &mut [PositionedNode<'_>]) {
    let mut previous: Option<usize> = None;
    let mut x = 0.0;
    for i in 0..nodes.len() {
        if nodes[i].has_children() {
            continue;
        }
        if let Some(prev) = previous {
            x += if nodes[prev].parent == nodes[i].parent { 1.0 } else { 2.0 };
        }
        nodes[i].x = x;
        previous = Some(i);
    }
}

fn center_parents(nodes: &mut [PositionedNode<'_>]) {
    let mut sums = vec![(0.0, 0usize); nodes.len()];
    for i in (0..nodes.len()).rev() {
        if nodes[i].has_children() {
            let (sum, count) = sums[i];
            nodes[i].x = sum / count.max(1) as f64;
        }
        if let Some(p) = nodes[i].parent {
            sums[p].0 += nodes[i].x;
            sums[p].1 += 1;
        }
    }
}
