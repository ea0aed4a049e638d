//! End-to-end expand/collapse behavior through the public solve API

use std::collections::HashMap;

use trellis::core::LayoutConfig;
use trellis::graph::{EdgeSpec, GraphSpec, NodeSpec};
use trellis::solver::Solver;

fn spec() -> GraphSpec {
    GraphSpec::new(
        vec![
            NodeSpec::new("group").with_children(["left", "right"]),
            NodeSpec::new("left").with_size(60.0, 30.0),
            NodeSpec::new("right").with_size(60.0, 30.0),
            NodeSpec::new("outside").with_size(60.0, 30.0),
        ],
        vec![
            EdgeSpec::new("internal", "left", "right"),
            EdgeSpec::new("inbound", "outside", "right"),
        ],
    )
}

fn fast_config() -> LayoutConfig {
    LayoutConfig {
        step_budget: 80,
        overlap_warmup: 30,
        flow_warmup: 5,
        align_warmup: 5,
        ..LayoutConfig::default()
    }
}

#[test]
fn collapsed_compound_hides_children_and_reroutes() {
    let solver = Solver::new(fast_config());
    let expansion = HashMap::from([("group".to_string(), false)]);
    let result = solver.solve_with_expansion(&spec(), &expansion).unwrap();

    assert!(result.node("group").is_some());
    assert!(result.node("left").is_none());
    assert!(result.node("right").is_none());

    // The internal edge became a self-loop on the collapsed group and was
    // dropped; the inbound edge survives, lifted to the group
    assert!(result.edge("internal").is_none());
    let inbound = result.edge("inbound").unwrap();
    assert!(inbound.points.len() >= 2);

    // A collapsed compound renders at placeholder size, not child extent
    let group = result.node("group").unwrap();
    assert_eq!(group.width, fast_config().placeholder_width);
    assert_eq!(group.height, fast_config().placeholder_height);
}

#[test]
fn rerouted_edge_ends_on_the_collapsed_boundary() {
    let solver = Solver::new(fast_config());
    let expansion = HashMap::from([("group".to_string(), false)]);
    let result = solver.solve_with_expansion(&spec(), &expansion).unwrap();

    let group = result.node("group").unwrap().rect();
    let inbound = result.edge("inbound").unwrap();
    let end = *inbound.points.last().unwrap();
    let on_boundary = (end.x - group.left()).abs() < 1e-6
        || (end.x - group.right()).abs() < 1e-6
        || (end.y - group.top()).abs() < 1e-6
        || (end.y - group.bottom()).abs() < 1e-6;
    assert!(on_boundary, "edge should terminate on the group's boundary");
}

#[test]
fn expanded_compound_wraps_children() {
    let solver = Solver::new(fast_config());
    let result = solver.solve(&spec()).unwrap();

    let group = result.node("group").unwrap().rect();
    let left = result.node("left").unwrap().rect();
    let right = result.node("right").unwrap().rect();
    let padding = fast_config().padding;
    assert!(group.contains_rect(&left, padding - 1e-6));
    assert!(group.contains_rect(&right, padding - 1e-6));
}

#[test]
fn expansion_override_beats_declared_state() {
    let mut base = spec();
    // Declared collapsed, overridden open
    base.nodes[0] = NodeSpec::new("group").with_children(["left", "right"]).collapsed();
    let solver = Solver::new(fast_config());

    let declared = solver.solve(&base).unwrap();
    assert!(declared.node("left").is_none());

    let expansion = HashMap::from([("group".to_string(), true)]);
    let overridden = solver.solve_with_expansion(&base, &expansion).unwrap();
    assert!(overridden.node("left").is_some());
}
