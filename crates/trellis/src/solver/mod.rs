//! Iterative layout solver
//!
//! Runs a fixed-budget loop: one force pass, then a handful of constraint
//! projection passes, repeated `step_budget` times. The budget is a step
//! count rather than a convergence test, so identical inputs always do
//! identical work and produce identical output.

mod constraints;
mod forces;
mod routing;

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, span, Level};

use crate::core::{LayoutConfig, Point, Rect};
use crate::graph::{GraphIndex, GraphSpec, VisibleGraph};

/// Mutable per-node state during the iteration
#[derive(Debug, Clone)]
pub(crate) struct NodeState {
    pub rect: Rect,
    pub fixed: bool,
}

/// Final geometry for one visible node, top-left anchored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeLayout {
    /// The node box as a center-anchored rect
    pub fn rect(&self) -> Rect {
        Rect::from_bounds(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Final polyline for one visible edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLayout {
    pub id: String,
    pub points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One entry in the back-to-front render order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Node { id: String },
    Edge { id: String },
}

/// A complete layout: geometry plus render order, translated so the
/// drawing's top-left corner is the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    /// Back-to-front: every ancestor before its descendants, all nodes
    /// before any edge
    pub ordering: Vec<Element>,
}

impl LayoutResult {
    fn empty() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            nodes: Vec::new(),
            edges: Vec::new(),
            ordering: Vec::new(),
        }
    }

    /// Look up a node's geometry by id
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up an edge's polyline by id
    pub fn edge(&self, id: &str) -> Option<&EdgeLayout> {
        self.edges.iter().find(|e| e.id == id)
    }
}

/// The layout engine
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: LayoutConfig,
}

impl Solver {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a graph with every compound in its declared expansion state
    pub fn solve(&self, spec: &GraphSpec) -> Result<LayoutResult> {
        self.solve_with_expansion(spec, &HashMap::new())
    }

    /// Lay out a graph, overriding expansion states per node id
    pub fn solve_with_expansion(
        &self,
        spec: &GraphSpec,
        expansion: &HashMap<String, bool>,
    ) -> Result<LayoutResult> {
        let span = span!(Level::INFO, "solve", nodes = spec.nodes.len(), edges = spec.edges.len());
        let _enter = span.enter();

        spec.validate()?;
        let vis = VisibleGraph::resolve(spec, expansion);
        if vis.nodes.is_empty() {
            return Ok(LayoutResult::empty());
        }
        let index = GraphIndex::build(spec, &vis, &self.config);
        let mut states = self.initial_states(spec, &vis, &index);
        let groups = constraints::resolve_alignment_groups(spec, &vis, &index);

        {
            let span = span!(Level::DEBUG, "iterate", steps = self.config.step_budget);
            let _enter = span.enter();
            for step in 0..self.config.step_budget {
                forces::apply(&index, &mut states, &self.config);
                for _ in 0..self.config.projection_passes {
                    constraints::project(step, &vis, &index, &mut states, &self.config, &groups);
                }
            }
        }

        let edges = routing::route_edges(spec, &vis, &index, &states, &self.config);
        let result = self.assemble(&vis, states, edges);
        debug!(width = result.width, height = result.height, "layout complete");
        Ok(result)
    }

    /// Seed positions on a deterministic spiral and sizes from measurements
    ///
    /// Compounds with visible children start at placeholder size; the first
    /// containment pass replaces it. Collapsed compounds and unmeasured
    /// leaves keep the placeholder.
    fn initial_states(&self, spec: &GraphSpec, vis: &VisibleGraph, index: &GraphIndex) -> Vec<NodeState> {
        let spacing = self.config.ideal_edge_length * 2.0;
        let mut angle = 0.0f64;
        let mut radius = 0.0f64;
        vis.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let node_spec = &spec.nodes[node.spec_index];
                let (width, height) = if index.children(i).is_empty() {
                    (
                        node_spec.width.unwrap_or(self.config.placeholder_width),
                        node_spec.height.unwrap_or(self.config.placeholder_height),
                    )
                } else {
                    (self.config.placeholder_width, self.config.placeholder_height)
                };
                let center = Point::new(radius * angle.cos(), radius * angle.sin());
                angle += std::f64::consts::FRAC_PI_3;
                radius += spacing / 6.0;
                NodeState {
                    rect: Rect::new(center, width, height),
                    fixed: node_spec.fixed,
                }
            })
            .collect()
    }

    /// Translate everything to the origin and stitch the result together
    fn assemble(&self, vis: &VisibleGraph, states: Vec<NodeState>, mut edges: Vec<EdgeLayout>) -> LayoutResult {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for state in &states {
            min_x = min_x.min(state.rect.left());
            min_y = min_y.min(state.rect.top());
            max_x = max_x.max(state.rect.right());
            max_y = max_y.max(state.rect.bottom());
        }
        for edge in &edges {
            for p in &edge.points {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
        }

        let nodes: Vec<NodeLayout> = vis
            .nodes
            .iter()
            .zip(&states)
            .map(|(node, state)| NodeLayout {
                id: node.id.clone(),
                x: state.rect.left() - min_x,
                y: state.rect.top() - min_y,
                width: state.rect.width,
                height: state.rect.height,
            })
            .collect();
        for edge in &mut edges {
            for p in &mut edge.points {
                p.x -= min_x;
                p.y -= min_y;
            }
        }

        // Visibility resolution already assigned z in emission order, so
        // the ordering is nodes in traversal order followed by edges
        let mut ordering: Vec<(u32, Element)> = vis
            .nodes
            .iter()
            .map(|n| (n.z, Element::Node { id: n.id.clone() }))
            .chain(vis.edges.iter().map(|e| (e.z, Element::Edge { id: e.id.clone() })))
            .collect();
        ordering.sort_by_key(|(z, _)| *z);

        LayoutResult {
            width: max_x - min_x,
            height: max_y - min_y,
            nodes,
            edges,
            ordering: ordering.into_iter().map(|(_, e)| e).collect(),
        }
    }
}
