//! Constraint projection
//!
//! After each force pass the solver runs several projection passes, each of
//! which walks the active constraints and snaps positions toward feasibility.
//! Containment runs last within a pass so that compound bounds reflect every
//! other adjustment made to their children.

use crate::core::{Justify, LayoutConfig, Rect};
use crate::graph::{GraphIndex, GraphSpec, VisibleGraph};

use super::NodeState;

/// Separated pairs end with this gap rather than exactly touching, so
/// the sweep terminates once residual displacements fall below it
const SEPARATION_SLACK: f64 = 0.5;

/// An alignment group resolved to visible node indices
#[derive(Debug, Clone)]
pub(crate) struct AlignGroup {
    pub axis: crate::core::Axis,
    pub justify: Justify,
    pub members: Vec<usize>,
}

/// Collect explicit alignment groups plus the implicit groups induced by
/// compounds that align their children
pub(crate) fn resolve_alignment_groups(
    spec: &GraphSpec,
    vis: &VisibleGraph,
    index: &GraphIndex,
) -> Vec<AlignGroup> {
    let mut groups = Vec::new();
    for align in &spec.alignments {
        let members: Vec<usize> = align
            .nodes
            .iter()
            .filter_map(|id| vis.index_of.get(id.as_str()).copied())
            .collect();
        // A group shrunk below two visible members aligns nothing
        if members.len() >= 2 {
            groups.push(AlignGroup {
                axis: align.axis,
                justify: align.justify,
                members,
            });
        }
    }
    for i in 0..index.len() {
        if index.children(i).len() < 2 {
            continue;
        }
        if let Some(alignment) = index.child_alignment(i) {
            groups.push(AlignGroup {
                axis: alignment.axis,
                justify: alignment.justify,
                members: index.children(i).to_vec(),
            });
        }
    }
    groups
}

/// Run one projection pass over all constraints
///
/// `step` gates the warm-up constraints: flow offsets and overlap removal
/// stay dormant during the early steps so the force model can settle a
/// rough shape first.
pub(crate) fn project(
    step: usize,
    vis: &VisibleGraph,
    index: &GraphIndex,
    states: &mut [NodeState],
    config: &LayoutConfig,
    groups: &[AlignGroup],
) {
    if step >= config.flow_warmup {
        enforce_flow_offsets(vis, index, states, config);
    }
    if step >= config.overlap_warmup {
        separate_siblings(index, states, config);
    }
    if step >= config.align_warmup {
        apply_alignment(states, groups);
    }
    contain_children(index, states, config);
}

/// Move a node together with its visible descendants
///
/// Constraint displacements applied to a compound must carry its subtree,
/// otherwise the containment pass recenters the compound on its unmoved
/// children and the displacement is lost. Fixed descendants stay put and
/// keep their own subtrees anchored.
fn translate_subtree(index: &GraphIndex, states: &mut [NodeState], node: usize, dx: f64, dy: f64) {
    let mut stack = vec![node];
    while let Some(u) = stack.pop() {
        if u != node && states[u].fixed {
            continue;
        }
        states[u].rect.center.x += dx;
        states[u].rect.center.y += dy;
        stack.extend_from_slice(index.children(u));
    }
}

/// Push each edge's endpoints apart along the edge's flow direction until
/// their centers are at least `flow_gap` apart along that axis
fn enforce_flow_offsets(
    vis: &VisibleGraph,
    index: &GraphIndex,
    states: &mut [NodeState],
    config: &LayoutConfig,
) {
    for edge in &vis.edges {
        let (s, t) = (edge.source, edge.target);
        if states[s].fixed && states[t].fixed {
            continue;
        }
        let (ux, uy) = index.edge_flow(edge).unit();
        let offset = (states[t].rect.center.x - states[s].rect.center.x) * ux
            + (states[t].rect.center.y - states[s].rect.center.y) * uy;
        let deficit = config.flow_gap - offset;
        if deficit <= 0.0 {
            continue;
        }
        let ws = if states[s].fixed { 0.0 } else { 1.0 };
        let wt = if states[t].fixed { 0.0 } else { 1.0 };
        let total = ws + wt;
        translate_subtree(index, states, s, -ux * deficit * ws / total, -uy * deficit * ws / total);
        translate_subtree(index, states, t, ux * deficit * wt / total, uy * deficit * wt / total);
    }
}

/// Remove overlaps within every sibling group
///
/// Sweeps each group repeatedly, resolving each overlapping pair along the
/// axis that needs the least displacement, until a sweep finds no overlap
/// or the round bound is hit. Each resolution leaves the pair a small gap
/// apart, so reintroduced overlaps shrink every round and the sweep
/// settles well inside the bound.
fn separate_siblings(index: &GraphIndex, states: &mut [NodeState], config: &LayoutConfig) {
    for group in index.sibling_groups() {
        for _ in 0..config.separation_rounds {
            let mut moved = false;
            for (gi, &a) in group.iter().enumerate() {
                for &b in &group[gi + 1..] {
                    if states[a].fixed && states[b].fixed {
                        continue;
                    }
                    if resolve_overlap(index, a, b, states) {
                        moved = true;
                    }
                }
            }
            if !moved {
                break;
            }
        }
    }
}

/// Separate one overlapping pair; returns true if anything moved
///
/// Compounds carry their subtrees, so a sibling separation survives the
/// containment pass at the end of the projection round.
fn resolve_overlap(index: &GraphIndex, a: usize, b: usize, states: &mut [NodeState]) -> bool {
    let (ra, rb) = (states[a].rect, states[b].rect);
    if !ra.overlaps(&rb) {
        return false;
    }
    let overlap_x = ra.right().min(rb.right()) - ra.left().max(rb.left());
    let overlap_y = ra.bottom().min(rb.bottom()) - ra.top().max(rb.top());

    // Move along the axis of least penetration; equal centers break toward
    // +x for the later index so repeated runs agree
    let (dx, dy) = if overlap_x <= overlap_y {
        let sign = match rb.center.x.partial_cmp(&ra.center.x) {
            Some(std::cmp::Ordering::Less) => -1.0,
            _ => 1.0,
        };
        (sign * (overlap_x + SEPARATION_SLACK), 0.0)
    } else {
        let sign = match rb.center.y.partial_cmp(&ra.center.y) {
            Some(std::cmp::Ordering::Less) => -1.0,
            _ => 1.0,
        };
        (0.0, sign * (overlap_y + SEPARATION_SLACK))
    };

    match (states[a].fixed, states[b].fixed) {
        (false, false) => {
            translate_subtree(index, states, a, -dx / 2.0, -dy / 2.0);
            translate_subtree(index, states, b, dx / 2.0, dy / 2.0);
        }
        (true, false) => {
            translate_subtree(index, states, b, dx, dy);
        }
        (false, true) => {
            translate_subtree(index, states, a, -dx, -dy);
        }
        (true, true) => return false,
    }
    true
}

/// Snap every alignment group's movable members onto the group's shared
/// coordinate
fn apply_alignment(states: &mut [NodeState], groups: &[AlignGroup]) {
    for group in groups {
        let coord = |i: usize| match group.axis {
            crate::core::Axis::X => states[i].rect.center.x,
            crate::core::Axis::Y => states[i].rect.center.y,
        };
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &m in &group.members {
            min = min.min(coord(m));
            max = max.max(coord(m));
        }
        let target = match group.justify {
            Justify::Start => min,
            Justify::End => max,
            Justify::Center => (min + max) / 2.0,
        };
        for &m in &group.members {
            if states[m].fixed {
                continue;
            }
            match group.axis {
                crate::core::Axis::X => states[m].rect.center.x = target,
                crate::core::Axis::Y => states[m].rect.center.y = target,
            }
        }
    }
}

/// Resize every expanded compound to enclose its children plus padding
///
/// Walks the visible nodes in reverse preorder so each compound sees its
/// children's final rects for this pass. A fixed compound keeps its center
/// and grows symmetrically instead of re-centering on its children.
fn contain_children(index: &GraphIndex, states: &mut [NodeState], config: &LayoutConfig) {
    for i in (0..states.len()).rev() {
        let children = index.children(i);
        if children.is_empty() {
            continue;
        }
        let mut union = states[children[0]].rect;
        for &c in &children[1..] {
            union = union.union(&states[c].rect);
        }
        let padded = Rect::from_bounds(
            union.left() - config.padding,
            union.top() - config.padding,
            union.right() + config.padding,
            union.bottom() + config.padding,
        );
        if states[i].fixed {
            let center = states[i].rect.center;
            let half_w = (center.x - padded.left()).max(padded.right() - center.x);
            let half_h = (center.y - padded.top()).max(padded.bottom() - center.y);
            states[i].rect = Rect::new(center, half_w * 2.0, half_h * 2.0);
        } else {
            states[i].rect = padded;
        }
    }
}
