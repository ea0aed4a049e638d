//! Solver configuration
//!
//! All tunables live in one struct passed to the solver constructor.
//! The warm-up thresholds are heuristics, not algorithmic requirements:
//! small graphs settle fine with much lower values, and the property
//! tests shrink them to keep runs fast.

use serde::{Deserialize, Serialize};

use super::geometry::{ChildAlignment, Side};

/// Tuning parameters for a layout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Target boundary gap per hop of graph distance
    pub ideal_edge_length: f64,
    /// Margin kept between a compound's boundary and its children
    pub padding: f64,
    /// Width assumed for leaves the host has not measured yet
    pub placeholder_width: f64,
    /// Height assumed for leaves the host has not measured yet
    pub placeholder_height: f64,
    /// Fraction of the distance excess corrected per attraction step
    pub attraction_gain: f64,
    /// Fraction of the distance deficit corrected per repulsion step
    pub repulsion_gain: f64,
    /// Total force/projection steps per run; the solver always runs the
    /// full budget rather than testing for convergence
    pub step_budget: usize,
    /// Constraint projection rounds after each force pass
    pub projection_passes: usize,
    /// Bound on sweep rounds when untangling one sibling group
    pub separation_rounds: usize,
    /// Step at which sibling non-overlap starts being enforced
    pub overlap_warmup: usize,
    /// Step at which flow-direction offsets start being enforced
    pub flow_warmup: usize,
    /// Step at which alignment groups start being enforced
    pub align_warmup: usize,
    /// Minimum center separation between edge endpoints, projected onto
    /// the edge's flow direction
    pub flow_gap: f64,
    /// Weight of the pull of a compound toward its children's centers;
    /// zero disables the term
    pub compactness: f64,
    /// Edge anchors within this distance of each other across the flow
    /// axis route as a straight segment
    pub straight_tolerance: f64,
    /// Flow direction for edges whose ancestry declares none
    pub default_flow: Side,
    /// Child alignment for compounds that declare none; off by default
    pub default_child_alignment: Option<ChildAlignment>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ideal_edge_length: 20.0,
            padding: 10.0,
            placeholder_width: 120.0,
            placeholder_height: 40.0,
            attraction_gain: 0.3,
            repulsion_gain: 0.3,
            step_budget: 500,
            projection_passes: 5,
            separation_rounds: 32,
            overlap_warmup: 300, // let forces settle global shape first
            flow_warmup: 10,
            align_warmup: 10,
            flow_gap: 30.0,
            compactness: 0.0,
            straight_tolerance: 0.5,
            default_flow: Side::South,
            default_child_alignment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.ideal_edge_length, 20.0);
        assert_eq!(config.padding, 10.0);
        assert_eq!(config.attraction_gain, 0.3);
        assert_eq!(config.repulsion_gain, 0.3);
        assert_eq!(config.step_budget, 500);
        assert_eq!(config.projection_passes, 5);
        assert_eq!(config.separation_rounds, 32);
        assert_eq!(config.straight_tolerance, 0.5);
        assert_eq!(config.overlap_warmup, 300);
        assert_eq!(config.flow_warmup, 10);
        assert_eq!(config.flow_gap, 30.0);
        assert_eq!(config.compactness, 0.0);
        assert_eq!(config.default_flow, Side::South);
        assert!(config.default_child_alignment.is_none());
    }
}
