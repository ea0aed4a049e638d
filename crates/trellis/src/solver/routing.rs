//! Edge routing over the final node positions
//!
//! Runs once after the iteration budget is spent. Each edge becomes a
//! polyline: a straight segment when its anchors already line up across the
//! edge's flow axis, otherwise a three-segment orthogonal elbow.

use crate::core::{LayoutConfig, Point, Rect, Side};
use crate::graph::{GraphIndex, GraphSpec, ResolvedEdge, VisibleGraph};

use super::{EdgeLayout, NodeState};

pub(crate) fn route_edges(
    spec: &GraphSpec,
    vis: &VisibleGraph,
    index: &GraphIndex,
    states: &[NodeState],
    config: &LayoutConfig,
) -> Vec<EdgeLayout> {
    vis.edges
        .iter()
        .map(|edge| route_edge(spec, vis, index, states, config, edge))
        .collect()
}

fn route_edge(
    spec: &GraphSpec,
    vis: &VisibleGraph,
    index: &GraphIndex,
    states: &[NodeState],
    config: &LayoutConfig,
    edge: &ResolvedEdge,
) -> EdgeLayout {
    let source_rect = &states[edge.source].rect;
    let target_rect = &states[edge.target].rect;

    let start = anchor(spec, vis, states, edge.source, edge.source_port.as_deref(), target_rect.center);
    let end = anchor(spec, vis, states, edge.target, edge.target_port.as_deref(), source_rect.center);

    let flow = index.edge_flow(edge);
    let points = if flow.is_vertical() {
        if (start.x - end.x).abs() <= config.straight_tolerance {
            vec![start, end]
        } else {
            let mid = (start.y + end.y) / 2.0;
            vec![
                start,
                Point::new(start.x, mid),
                Point::new(end.x, mid),
                end,
            ]
        }
    } else if (start.y - end.y).abs() <= config.straight_tolerance {
        vec![start, end]
    } else {
        let mid = (start.x + end.x) / 2.0;
        vec![
            start,
            Point::new(mid, start.y),
            Point::new(mid, end.y),
            end,
        ]
    };

    EdgeLayout {
        id: edge.id.clone(),
        points,
        label: edge.label.clone(),
    }
}

/// Attachment point on a node's boundary
///
/// A port pins the anchor to its declared slot on the declared side;
/// portless endpoints attach where the center line toward the other
/// endpoint leaves the box.
fn anchor(
    spec: &GraphSpec,
    vis: &VisibleGraph,
    states: &[NodeState],
    node: usize,
    port: Option<&str>,
    toward: Point,
) -> Point {
    let rect = &states[node].rect;
    let Some(port) = port else {
        return rect.boundary_point_toward(toward);
    };
    let ports = &spec.nodes[vis.nodes[node].spec_index].ports;
    // Validation guarantees the port exists; fall back to the center line
    // rather than panic if it somehow does not
    let Some(this) = ports.iter().find(|p| p.name == port) else {
        return rect.boundary_point_toward(toward);
    };
    // Slot among same-side ports, ordered by declared order then input
    // position
    let mut same_side: Vec<(&u32, usize)> = ports
        .iter()
        .enumerate()
        .filter(|(_, p)| p.side == this.side)
        .map(|(i, p)| (&p.order, i))
        .collect();
    same_side.sort();
    let slot = same_side
        .iter()
        .position(|&(_, i)| ports[i].name == port)
        .unwrap_or(0);
    port_anchor(rect, this.side, slot, same_side.len())
}

/// Evenly spaced slot position along one side of a box
pub(crate) fn port_anchor(rect: &Rect, side: Side, slot: usize, count: usize) -> Point {
    let fraction = (slot + 1) as f64 / (count + 1) as f64;
    match side {
        Side::North => Point::new(rect.left() + fraction * rect.width, rect.top()),
        Side::South => Point::new(rect.left() + fraction * rect.width, rect.bottom()),
        Side::East => Point::new(rect.right(), rect.top() + fraction * rect.height),
        Side::West => Point::new(rect.left(), rect.top() + fraction * rect.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeSpec, Endpoint, GraphIndex, NodeSpec};
    use std::collections::HashMap;

    fn state(x: f64, y: f64, w: f64, h: f64) -> NodeState {
        NodeState {
            rect: Rect::new(Point::new(x, y), w, h),
            fixed: false,
        }
    }

    #[test]
    fn test_port_anchor_slots() {
        let rect = Rect::new(Point::new(0.0, 0.0), 100.0, 40.0);
        // Single slot sits at the side's midpoint
        assert_eq!(port_anchor(&rect, Side::South, 0, 1), Point::new(0.0, 20.0));
        // Two slots split the side into thirds
        let first = port_anchor(&rect, Side::East, 0, 2);
        let second = port_anchor(&rect, Side::East, 1, 2);
        assert_eq!(first.x, 50.0);
        assert_eq!(second.x, 50.0);
        assert!((first.y - (-20.0 + 40.0 / 3.0)).abs() < 1e-9);
        assert!((second.y - (-20.0 + 80.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_aligned_anchors_route_straight() {
        let spec = GraphSpec::new(
            vec![NodeSpec::new("a"), NodeSpec::new("b")],
            vec![EdgeSpec::new("e", "a", "b")],
        );
        let vis = VisibleGraph::resolve(&spec, &HashMap::new());
        let config = LayoutConfig::default();
        let index = GraphIndex::build(&spec, &vis, &config);
        let states = vec![state(0.0, 0.0, 20.0, 20.0), state(0.0, 100.0, 20.0, 20.0)];
        let routed = route_edges(&spec, &vis, &index, &states, &config);
        assert_eq!(routed[0].points, vec![Point::new(0.0, 10.0), Point::new(0.0, 90.0)]);
    }

    #[test]
    fn test_offset_anchors_route_as_elbow() {
        let spec = GraphSpec::new(
            vec![NodeSpec::new("a"), NodeSpec::new("b")],
            vec![EdgeSpec::new("e", "a", "b")],
        );
        let vis = VisibleGraph::resolve(&spec, &HashMap::new());
        let config = LayoutConfig::default();
        let index = GraphIndex::build(&spec, &vis, &config);
        let states = vec![state(0.0, 0.0, 20.0, 20.0), state(60.0, 100.0, 20.0, 20.0)];
        let routed = route_edges(&spec, &vis, &index, &states, &config);
        let points = &routed[0].points;
        assert_eq!(points.len(), 4);
        // Interior segments stay axis-aligned
        assert_eq!(points[0].x, points[1].x);
        assert_eq!(points[1].y, points[2].y);
        assert_eq!(points[2].x, points[3].x);
    }

    #[test]
    fn test_port_endpoint_uses_declared_side() {
        let spec = GraphSpec::new(
            vec![
                NodeSpec::new("a").with_port("out", Side::East, 0),
                NodeSpec::new("b"),
            ],
            vec![EdgeSpec::with_endpoints(
                "e",
                Endpoint::port("a", "out"),
                Endpoint::node("b"),
            )],
        );
        let vis = VisibleGraph::resolve(&spec, &HashMap::new());
        let config = LayoutConfig::default();
        let index = GraphIndex::build(&spec, &vis, &config);
        // b sits below a, but the port still pins the start to a's east side
        let states = vec![state(0.0, 0.0, 20.0, 20.0), state(0.0, 100.0, 20.0, 20.0)];
        let routed = route_edges(&spec, &vis, &index, &states, &config);
        assert_eq!(routed[0].points[0], Point::new(10.0, 0.0));
    }

    #[test]
    fn test_edge_label_carries_through() {
        let spec = GraphSpec::new(
            vec![NodeSpec::new("a"), NodeSpec::new("b")],
            vec![EdgeSpec::new("e", "a", "b").with_label("yes")],
        );
        let vis = VisibleGraph::resolve(&spec, &HashMap::new());
        let config = LayoutConfig::default();
        let index = GraphIndex::build(&spec, &vis, &config);
        let states = vec![state(0.0, 0.0, 20.0, 20.0), state(0.0, 100.0, 20.0, 20.0)];
        let routed = route_edges(&spec, &vis, &index, &states, &config);
        assert_eq!(routed[0].label.as_deref(), Some("yes"));
    }
}
