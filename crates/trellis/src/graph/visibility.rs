//! Expand/collapse resolution
//!
//! Filters the full graph description down to the nodes and edges that are
//! currently visible, assigns the z-ordering seed, and reroutes edges whose
//! endpoints were hidden by a collapsed ancestor.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::model::GraphSpec;

/// A visible node, with hierarchy links rewritten to visible indices
#[derive(Debug, Clone)]
pub struct VisNode {
    /// Index into `GraphSpec::nodes`
    pub spec_index: usize,
    pub id: String,
    /// Visible parent, if any
    pub parent: Option<usize>,
    /// Visible children; empty for leaves and collapsed compounds
    pub children: Vec<usize>,
    /// Render order; ancestors always precede descendants
    pub z: u32,
}

/// A visible edge with endpoints resolved to visible nodes
///
/// An endpoint hidden by a collapse resolves to its nearest visible
/// ancestor; a rerouted endpoint loses its port (the port belongs to the
/// hidden node's boundary, not the ancestor's).
#[derive(Debug, Clone)]
pub struct ResolvedEdge {
    /// Index into `GraphSpec::edges`
    pub spec_index: usize,
    pub id: String,
    pub source: usize,
    pub source_port: Option<String>,
    pub target: usize,
    pub target_port: Option<String>,
    pub label: Option<String>,
    pub z: u32,
}

/// The visible subset of a graph for one layout pass
#[derive(Debug, Clone, Default)]
pub struct VisibleGraph {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<ResolvedEdge>,
    /// Node id to index in `nodes`
    pub index_of: HashMap<String, usize>,
}

impl VisibleGraph {
    /// Resolve visibility for a validated spec
    ///
    /// `expansion` overrides the per-node `is_expanded` flags; ids absent
    /// from the map keep their declared state. Traversal is depth-first
    /// from each root in input order, which fixes the z-ordering: parents
    /// get smaller z than their children, edges follow all nodes.
    pub fn resolve(spec: &GraphSpec, expansion: &HashMap<String, bool>) -> Self {
        let spec_index: HashMap<&str, usize> = spec
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut parent_of: HashMap<usize, usize> = HashMap::new();
        for (i, node) in spec.nodes.iter().enumerate() {
            for child in &node.children {
                if let Some(&c) = spec_index.get(child.as_str()) {
                    parent_of.insert(c, i);
                }
            }
        }

        let mut vis = VisibleGraph::default();
        let mut z: u32 = 0;

        // Depth-first walk from each root in input order
        for i in 0..spec.nodes.len() {
            if parent_of.contains_key(&i) {
                continue;
            }
            let mut stack: Vec<(usize, Option<usize>)> = vec![(i, None)];
            while let Some((s, parent_vis)) = stack.pop() {
                let node = &spec.nodes[s];
                let vis_index = vis.nodes.len();
                vis.nodes.push(VisNode {
                    spec_index: s,
                    id: node.id.clone(),
                    parent: parent_vis,
                    children: Vec::new(),
                    z,
                });
                z += 1;
                vis.index_of.insert(node.id.clone(), vis_index);
                if let Some(p) = parent_vis {
                    vis.nodes[p].children.push(vis_index);
                }

                let expanded = expansion
                    .get(node.id.as_str())
                    .copied()
                    .unwrap_or(node.is_expanded);
                if node.is_compound() && expanded {
                    for child in node.children.iter().rev() {
                        if let Some(&c) = spec_index.get(child.as_str()) {
                            stack.push((c, Some(vis_index)));
                        }
                    }
                }
            }
        }

        // Resolve edges to visible endpoints; drop self-loops and edges
        // whose endpoints end up in the same ancestor chain
        for (i, edge) in spec.edges.iter().enumerate() {
            let source = resolve_endpoint(&vis, &spec_index, &parent_of, spec, &edge.source.node);
            let target = resolve_endpoint(&vis, &spec_index, &parent_of, spec, &edge.target.node);
            let (Some(source), Some(target)) = (source, target) else {
                trace!(edge = %edge.id, "edge endpoint has no visible ancestor, dropping");
                continue;
            };
            if source == target {
                trace!(edge = %edge.id, "edge collapsed into a self-loop, dropping");
                continue;
            }
            if vis.is_ancestor(source, target) || vis.is_ancestor(target, source) {
                trace!(edge = %edge.id, "edge connects a node to its own ancestor, dropping");
                continue;
            }
            let source_rerouted = vis.nodes[source].id != edge.source.node;
            let target_rerouted = vis.nodes[target].id != edge.target.node;
            vis.edges.push(ResolvedEdge {
                spec_index: i,
                id: edge.id.clone(),
                source,
                source_port: if source_rerouted {
                    None
                } else {
                    edge.source.port.clone()
                },
                target,
                target_port: if target_rerouted {
                    None
                } else {
                    edge.target.port.clone()
                },
                label: edge.label.clone(),
                z,
            });
            z += 1;
        }

        debug!(
            visible_nodes = vis.nodes.len(),
            visible_edges = vis.edges.len(),
            total_nodes = spec.nodes.len(),
            total_edges = spec.edges.len(),
            "resolved visibility"
        );
        vis
    }

    /// True if `ancestor` is a proper ancestor of `node`
    fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = self.nodes[node].parent;
        while let Some(up) = current {
            if up == ancestor {
                return true;
            }
            current = self.nodes[up].parent;
        }
        false
    }

    /// Visible roots in traversal order
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
    }
}

/// Walk up from a spec node to the nearest visible ancestor (or itself)
fn resolve_endpoint(
    vis: &VisibleGraph,
    spec_index: &HashMap<&str, usize>,
    parent_of: &HashMap<usize, usize>,
    spec: &GraphSpec,
    node_id: &str,
) -> Option<usize> {
    let mut current = *spec_index.get(node_id)?;
    loop {
        if let Some(&v) = vis.index_of.get(spec.nodes[current].id.as_str()) {
            return Some(v);
        }
        current = *parent_of.get(&current)?;
    }
}
