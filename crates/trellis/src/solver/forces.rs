//! Force model: a spring embedder gated on graph distance
//!
//! Every unordered pair of visible nodes exchanges at most one nudge per
//! step. Pairs with no path between them exchange nothing, which is what
//! keeps disconnected components from being pulled together: attraction
//! and repulsion both require a finite hop distance.

use crate::core::LayoutConfig;
use crate::graph::GraphIndex;

use super::NodeState;

/// Apply one force pass, mutating node centers in place
pub(crate) fn apply(index: &GraphIndex, states: &mut [NodeState], config: &LayoutConfig) {
    let n = states.len();
    let mut nudges = vec![(0.0f64, 0.0f64); n];

    for u in 0..n {
        for v in (u + 1)..n {
            if states[u].fixed && states[v].fixed {
                continue;
            }
            let Some(hop) = index.hop_distance(u, v) else {
                continue;
            };
            if hop == 0 {
                continue;
            }

            let (ux, uy) = direction(&states[u], &states[v]);
            let actual = states[u].rect.boundary_gap(&states[v].rect);
            let ideal = hop as f64 * config.ideal_edge_length;

            let wu = if states[u].fixed { 0.0 } else { 1.0 };
            let wv = if states[v].fixed { 0.0 } else { 1.0 };
            let total = wu + wv;

            if index.exists_edge(u, v, true) && actual > ideal {
                // Directly connected and too far apart: pull together,
                // split by movability
                let pull = (actual - ideal) * config.attraction_gain;
                nudges[u].0 += ux * pull * wu / total;
                nudges[u].1 += uy * pull * wu / total;
                nudges[v].0 -= ux * pull * wv / total;
                nudges[v].1 -= uy * pull * wv / total;
            } else if !index.hierarchy_related(u, v) && actual < ideal {
                // Too close for their graph distance: push apart, decayed
                // by hop count so remote pairs repel weakly
                let push = (ideal - actual) * config.repulsion_gain / (hop * hop) as f64;
                nudges[u].0 -= ux * push * wu / total;
                nudges[u].1 -= uy * push * wu / total;
                nudges[v].0 += ux * push * wv / total;
                nudges[v].1 += uy * push * wv / total;
            }
        }
    }

    // Compactness term: pull each compound toward its children's centers
    if config.compactness > 0.0 {
        for p in 0..n {
            if states[p].fixed {
                continue;
            }
            for &c in index.children(p) {
                nudges[p].0 += (states[c].rect.center.x - states[p].rect.center.x) * config.compactness;
                nudges[p].1 += (states[c].rect.center.y - states[p].rect.center.y) * config.compactness;
            }
        }
    }

    // Cap per-step movement so early chaotic phases cannot explode
    let cap = config.ideal_edge_length;
    for (state, (dx, dy)) in states.iter_mut().zip(nudges) {
        if state.fixed {
            continue;
        }
        let magnitude = (dx * dx + dy * dy).sqrt();
        let scale = if magnitude > cap { cap / magnitude } else { 1.0 };
        state.rect.center.x += dx * scale;
        state.rect.center.y += dy * scale;
    }
}

/// Unit vector from `u`'s center toward `v`'s center
///
/// Coincident centers separate along +x so runs stay deterministic.
fn direction(u: &NodeState, v: &NodeState) -> (f64, f64) {
    let dx = v.rect.center.x - u.rect.center.x;
    let dy = v.rect.center.y - u.rect.center.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist == 0.0 {
        (1.0, 0.0)
    } else {
        (dx / dist, dy / dist)
    }
}
