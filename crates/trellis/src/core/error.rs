//! Structural error types for graph layout
//!
//! Malformed topology is a caller error and fails fast before the solver
//! runs; every variant names the offending identifier.

use thiserror::Error;

/// Errors raised while validating a graph description
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("duplicate node id `{id}`")]
    DuplicateNode { id: String },

    #[error("edge `{edge}` references unknown node `{node}`")]
    UnknownNode { edge: String, node: String },

    #[error("edge `{edge}` references undeclared port `{port}` on node `{node}`")]
    UnknownPort {
        edge: String,
        node: String,
        port: String,
    },

    #[error("children list of `{parent}` references unknown node `{child}`")]
    UnknownChild { parent: String, child: String },

    #[error("node `{child}` is listed as a child of more than one parent")]
    MultipleParents { child: String },

    #[error("node `{id}` appears in its own ancestor chain")]
    CyclicHierarchy { id: String },

    #[error("alignment group references unknown node `{node}`")]
    UnknownAlignNode { node: String },
}

impl LayoutError {
    /// Create an unknown-node error for an edge endpoint
    pub fn unknown_node(edge: impl Into<String>, node: impl Into<String>) -> Self {
        Self::UnknownNode {
            edge: edge.into(),
            node: node.into(),
        }
    }

    /// Create an unknown-port error for an edge endpoint
    pub fn unknown_port(
        edge: impl Into<String>,
        node: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self::UnknownPort {
            edge: edge.into(),
            node: node.into(),
            port: port.into(),
        }
    }
}
