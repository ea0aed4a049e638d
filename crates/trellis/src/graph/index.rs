//! Structured storage over the visible graph
//!
//! Precomputes the relations the force and constraint models query every
//! iteration: hierarchy lookups, edge existence, all-pairs hop distances,
//! least common ancestors, and inherited per-node flow/alignment settings.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::core::{ChildAlignment, LayoutConfig, Side};

use super::model::GraphSpec;
use super::visibility::{ResolvedEdge, VisibleGraph};

/// Query index for one layout pass
#[derive(Debug)]
pub struct GraphIndex {
    roots: Vec<usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    directed: HashSet<(usize, usize)>,
    neighbors: Vec<Vec<usize>>,
    /// All-pairs hop counts over the undirected edge graph; `None` means
    /// the pair is disconnected
    dist: Vec<Vec<Option<u32>>>,
    flow: Vec<Side>,
    child_align: Vec<Option<ChildAlignment>>,
    default_flow: Side,
}

impl GraphIndex {
    /// Build the index for a resolved visible graph
    pub fn build(spec: &GraphSpec, vis: &VisibleGraph, config: &LayoutConfig) -> Self {
        let n = vis.nodes.len();

        let parent: Vec<Option<usize>> = vis.nodes.iter().map(|node| node.parent).collect();
        let children: Vec<Vec<usize>> = vis.nodes.iter().map(|node| node.children.clone()).collect();
        let roots: Vec<usize> = vis.roots().collect();

        let mut directed = HashSet::with_capacity(vis.edges.len());
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in &vis.edges {
            directed.insert((edge.source, edge.target));
            neighbors[edge.source].push(edge.target);
            neighbors[edge.target].push(edge.source);
        }

        // All-pairs hop distances, one BFS per node. The visible graphs
        // this engine targets are small enough that O(n * (n + m)) is fine.
        let mut dist = vec![vec![None; n]; n];
        for (start, row) in dist.iter_mut().enumerate() {
            row[start] = Some(0);
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                let du = row[u].unwrap_or(0);
                for &v in &neighbors[u] {
                    if row[v].is_none() {
                        row[v] = Some(du + 1);
                        queue.push_back(v);
                    }
                }
            }
        }

        // Inherited settings resolve in one forward pass: the visibility
        // walk is preorder, so a parent's index is always smaller.
        let mut flow = vec![config.default_flow; n];
        let mut child_align = vec![config.default_child_alignment; n];
        for i in 0..n {
            let node = &spec.nodes[vis.nodes[i].spec_index];
            let inherited_flow = parent[i].map(|p| flow[p]).unwrap_or(config.default_flow);
            flow[i] = node.flow_direction.unwrap_or(inherited_flow);
            let inherited_align = parent[i]
                .map(|p| child_align[p])
                .unwrap_or(config.default_child_alignment);
            child_align[i] = node.align_children.or(inherited_align);
        }

        debug!(nodes = n, edges = vis.edges.len(), roots = roots.len(), "built graph index");

        Self {
            roots,
            parent,
            children,
            directed,
            neighbors,
            dist,
            flow,
            child_align,
            default_flow: config.default_flow,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Visible roots in traversal order
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        self.parent[node]
    }

    pub fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    /// Nodes sharing `node`'s parent, excluding `node` itself
    ///
    /// Roots count as siblings of other roots so that top-level components
    /// still separate from each other.
    pub fn siblings(&self, node: usize) -> Vec<usize> {
        let group: &[usize] = match self.parent[node] {
            Some(p) => &self.children[p],
            None => &self.roots,
        };
        group.iter().copied().filter(|&s| s != node).collect()
    }

    /// All sibling groups: the roots plus each compound's children
    pub fn sibling_groups(&self) -> Vec<&[usize]> {
        let mut groups: Vec<&[usize]> = vec![&self.roots];
        for children in &self.children {
            if children.len() > 1 {
                groups.push(children);
            }
        }
        groups
    }

    /// True if `ancestor` is a proper ancestor of `node`
    pub fn has_ancestor(&self, node: usize, ancestor: usize) -> bool {
        let mut current = self.parent[node];
        while let Some(up) = current {
            if up == ancestor {
                return true;
            }
            current = self.parent[up];
        }
        false
    }

    /// True if either node is an ancestor of the other
    pub fn hierarchy_related(&self, a: usize, b: usize) -> bool {
        self.has_ancestor(a, b) || self.has_ancestor(b, a)
    }

    /// True if an edge connects `a` to `b`
    pub fn exists_edge(&self, a: usize, b: usize, undirected: bool) -> bool {
        self.directed.contains(&(a, b)) || (undirected && self.directed.contains(&(b, a)))
    }

    /// Hop count between two nodes, `None` when disconnected
    pub fn hop_distance(&self, a: usize, b: usize) -> Option<u32> {
        self.dist[a][b]
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }

    /// Nearest common ancestor, where a node counts as its own ancestor
    ///
    /// Returns `None` when the nodes live in different trees.
    pub fn least_common_ancestor(&self, a: usize, b: usize) -> Option<usize> {
        let mut chain = HashSet::new();
        let mut current = Some(a);
        while let Some(u) = current {
            chain.insert(u);
            current = self.parent[u];
        }
        let mut current = Some(b);
        while let Some(u) = current {
            if chain.contains(&u) {
                return Some(u);
            }
            current = self.parent[u];
        }
        None
    }

    /// Effective flow direction of a node (own setting, else inherited,
    /// else the configured default)
    pub fn node_flow(&self, node: usize) -> Side {
        self.flow[node]
    }

    /// Effective flow direction of an edge: taken from the endpoints'
    /// least common ancestor, else the configured default
    pub fn edge_flow(&self, edge: &ResolvedEdge) -> Side {
        match self.least_common_ancestor(edge.source, edge.target) {
            Some(lca) => self.flow[lca],
            None => self.default_flow,
        }
    }

    /// Effective child alignment of a compound, if any
    pub fn child_alignment(&self, node: usize) -> Option<ChildAlignment> {
        self.child_align[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{EdgeSpec, NodeSpec};
    use std::collections::HashMap;

    fn build(spec: &GraphSpec) -> (VisibleGraph, GraphIndex) {
        let vis = VisibleGraph::resolve(spec, &HashMap::new());
        let index = GraphIndex::build(spec, &vis, &LayoutConfig::default());
        (vis, index)
    }

    #[test]
    fn test_hop_distances() {
        let spec = GraphSpec::new(
            vec![
                NodeSpec::new("a"),
                NodeSpec::new("b"),
                NodeSpec::new("c"),
                NodeSpec::new("lone"),
            ],
            vec![EdgeSpec::new("e1", "a", "b"), EdgeSpec::new("e2", "b", "c")],
        );
        let (vis, index) = build(&spec);
        let a = vis.index_of["a"];
        let b = vis.index_of["b"];
        let c = vis.index_of["c"];
        let lone = vis.index_of["lone"];
        assert_eq!(index.hop_distance(a, b), Some(1));
        assert_eq!(index.hop_distance(a, c), Some(2));
        assert_eq!(index.hop_distance(a, a), Some(0));
        assert_eq!(index.hop_distance(a, lone), None);
    }

    #[test]
    fn test_exists_edge_direction() {
        let spec = GraphSpec::new(
            vec![NodeSpec::new("a"), NodeSpec::new("b")],
            vec![EdgeSpec::new("e1", "a", "b")],
        );
        let (vis, index) = build(&spec);
        let a = vis.index_of["a"];
        let b = vis.index_of["b"];
        assert!(index.exists_edge(a, b, false));
        assert!(!index.exists_edge(b, a, false));
        assert!(index.exists_edge(b, a, true));
    }

    #[test]
    fn test_siblings_and_roots() {
        let spec = GraphSpec::new(
            vec![
                NodeSpec::new("p").with_children(["c1", "c2"]),
                NodeSpec::new("c1"),
                NodeSpec::new("c2"),
                NodeSpec::new("q"),
            ],
            vec![],
        );
        let (vis, index) = build(&spec);
        let p = vis.index_of["p"];
        let q = vis.index_of["q"];
        let c1 = vis.index_of["c1"];
        let c2 = vis.index_of["c2"];
        assert_eq!(index.siblings(c1), vec![c2]);
        assert_eq!(index.siblings(p), vec![q]);
        assert!(index.has_ancestor(c1, p));
        assert!(!index.has_ancestor(p, c1));
        assert!(index.hierarchy_related(c2, p));
        assert!(!index.hierarchy_related(c1, q));
    }

    #[test]
    fn test_inherited_flow() {
        use crate::core::Side;
        let spec = GraphSpec::new(
            vec![
                NodeSpec::new("p").with_children(["c", "d"]).with_flow(Side::East),
                NodeSpec::new("c"),
                NodeSpec::new("d").with_flow(Side::North),
                NodeSpec::new("r"),
            ],
            vec![],
        );
        let (vis, index) = build(&spec);
        assert_eq!(index.node_flow(vis.index_of["c"]), Side::East);
        assert_eq!(index.node_flow(vis.index_of["d"]), Side::North);
        // Root without a declared flow gets the configured default
        assert_eq!(index.node_flow(vis.index_of["r"]), Side::South);
    }

    #[test]
    fn test_edge_flow_from_lca() {
        use crate::core::Side;
        let spec = GraphSpec::new(
            vec![
                NodeSpec::new("p").with_children(["c1", "c2"]).with_flow(Side::East),
                NodeSpec::new("c1"),
                NodeSpec::new("c2"),
                NodeSpec::new("other"),
            ],
            vec![
                EdgeSpec::new("in", "c1", "c2"),
                EdgeSpec::new("out", "c1", "other"),
            ],
        );
        let (vis, index) = build(&spec);
        // Sibling edge inherits from the parent compound
        assert_eq!(index.edge_flow(&vis.edges[0]), Side::East);
        // Edge across trees falls back to the default
        assert_eq!(index.edge_flow(&vis.edges[1]), Side::South);
    }
}
