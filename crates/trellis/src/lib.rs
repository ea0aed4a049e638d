//! Force-directed layout for compound directed graphs.
//!
//! Trellis positions nested, collapsible node hierarchies: leaves carry
//! host-measured sizes, compounds wrap their visible children, and edges
//! route between whatever is currently visible, lifting to the nearest
//! visible ancestor when a collapse hides an endpoint.
//!
//! The engine is deliberately deterministic. It runs a fixed number of
//! solver steps rather than testing for convergence, iterates nodes in a
//! stable order, and breaks geometric ties the same way every run, so the
//! same graph and configuration always produce the same drawing.
//!
//! ```
//! use trellis::graph::{EdgeSpec, GraphSpec, NodeSpec};
//!
//! # fn main() -> anyhow::Result<()> {
//! let spec = GraphSpec::new(
//!     vec![
//!         NodeSpec::new("pipeline").with_children(["fetch", "parse"]),
//!         NodeSpec::new("fetch").with_size(120.0, 40.0),
//!         NodeSpec::new("parse").with_size(120.0, 40.0),
//!     ],
//!     vec![EdgeSpec::new("e1", "fetch", "parse")],
//! );
//! let result = trellis::layout(&spec)?;
//! assert!(result.node("pipeline").is_some());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod graph;
pub mod solver;
pub mod worker;

pub use crate::core::{LayoutConfig, LayoutError};
pub use crate::graph::GraphSpec;
pub use crate::solver::{EdgeLayout, Element, LayoutResult, NodeLayout, Solver};
pub use crate::worker::LayoutWorker;

/// Everything a typical host needs in one import
pub mod prelude {
    pub use crate::core::{
        Axis, ChildAlignment, Justify, LayoutConfig, LayoutError, Point, Rect, Side,
    };
    pub use crate::graph::{AlignSpec, EdgeSpec, Endpoint, GraphSpec, NodeSpec, PortSpec};
    pub use crate::solver::{EdgeLayout, Element, LayoutResult, NodeLayout, Solver};
    pub use crate::worker::{LayoutRequest, LayoutResponse, LayoutWorker};
    pub use crate::{layout, layout_with_config};
}

use anyhow::Result;

/// Lay out a graph with the default configuration
pub fn layout(spec: &GraphSpec) -> Result<LayoutResult> {
    Solver::default().solve(spec)
}

/// Lay out a graph with an explicit configuration
pub fn layout_with_config(spec: &GraphSpec, config: LayoutConfig) -> Result<LayoutResult> {
    Solver::new(config).solve(spec)
}
