//! Graph descriptors: the typed input contract of the layout engine
//!
//! A host hands the engine plain descriptor lists extracted from its own
//! view model: nodes (possibly nested via `children`), edges (optionally
//! attached through named ports), and alignment groups. `GraphSpec::validate`
//! rejects malformed topology up front so the solver never has to guess.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::{Axis, ChildAlignment, Justify, LayoutError, Side};

/// A named anchor point on a node's boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    pub name: String,
    /// Which boundary the port sits on
    pub side: Side,
    /// Tie-break index among ports on the same side; declaration order
    /// breaks remaining ties
    pub order: u32,
}

impl PortSpec {
    pub fn new(name: impl Into<String>, side: Side, order: u32) -> Self {
        Self {
            name: name.into(),
            side,
            order,
        }
    }
}

/// One graph vertex: a leaf content node or a compound grouping node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique identifier, stable across layout runs
    pub id: String,
    /// Ordered child node ids; empty for leaves
    pub children: Vec<String>,
    /// Declared boundary ports
    pub ports: Vec<PortSpec>,
    /// Measured width; `None` until the host has measured the content
    pub width: Option<f64>,
    /// Measured height; `None` until the host has measured the content
    pub height: Option<f64>,
    /// A fixed node never moves under force but still constrains others
    pub fixed: bool,
    /// Whether a compound currently shows its children; ignored for leaves
    pub is_expanded: bool,
    /// Flow direction inherited by descendants unless overridden
    pub flow_direction: Option<Side>,
    /// Implicit alignment of direct children, inherited like flow direction
    pub align_children: Option<ChildAlignment>,
}

impl NodeSpec {
    /// Create a leaf node with no declared size
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            ports: Vec::new(),
            width: None,
            height: None,
            fixed: false,
            is_expanded: true,
            flow_direction: None,
            align_children: None,
        }
    }

    /// Set the ordered child ids, making this a compound node
    pub fn with_children(mut self, children: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Declare a boundary port
    pub fn with_port(mut self, name: impl Into<String>, side: Side, order: u32) -> Self {
        self.ports.push(PortSpec::new(name, side, order));
        self
    }

    /// Set the measured size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Pin the node in place
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Start the compound collapsed
    pub fn collapsed(mut self) -> Self {
        self.is_expanded = false;
        self
    }

    /// Override the flow direction for this subtree
    pub fn with_flow(mut self, flow: Side) -> Self {
        self.flow_direction = Some(flow);
        self
    }

    /// Align direct children along an axis
    pub fn with_child_alignment(mut self, axis: Axis, justify: Justify) -> Self {
        self.align_children = Some(ChildAlignment { axis, justify });
        self
    }

    /// True for compound nodes (declared children, collapsed or not)
    pub fn is_compound(&self) -> bool {
        !self.children.is_empty()
    }
}

/// One end of an edge: a node and an optional port on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: String,
    pub port: Option<String>,
}

impl Endpoint {
    pub fn node(id: impl Into<String>) -> Self {
        Self {
            node: id.into(),
            port: None,
        }
    }

    pub fn port(id: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: id.into(),
            port: Some(port.into()),
        }
    }
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub id: String,
    pub source: Endpoint,
    pub target: Endpoint,
    pub label: Option<String>,
}

impl EdgeSpec {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: Endpoint::node(source),
            target: Endpoint::node(target),
            label: None,
        }
    }

    pub fn with_endpoints(id: impl Into<String>, source: Endpoint, target: Endpoint) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A declared set of nodes sharing a coordinate along one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignSpec {
    pub axis: Axis,
    pub nodes: Vec<String>,
    pub justify: Justify,
}

impl AlignSpec {
    pub fn new(axis: Axis, nodes: impl IntoIterator<Item = impl Into<String>>, justify: Justify) -> Self {
        Self {
            axis,
            nodes: nodes.into_iter().map(Into::into).collect(),
            justify,
        }
    }
}

/// The full graph description consumed by one layout run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSpec {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
    pub alignments: Vec<AlignSpec>,
}

impl GraphSpec {
    pub fn new(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> Self {
        Self {
            nodes,
            edges,
            alignments: Vec::new(),
        }
    }

    pub fn with_alignments(mut self, alignments: Vec<AlignSpec>) -> Self {
        self.alignments = alignments;
        self
    }

    /// Record a measured node size from the host's size feed
    ///
    /// Returns false if the node is unknown.
    pub fn apply_measurement(&mut self, id: &str, width: f64, height: f64) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.width = Some(width);
                node.height = Some(height);
                true
            }
            None => false,
        }
    }

    /// True while any leaf still lacks a measured size
    ///
    /// Hosts typically run a first layout with placeholder sizes and a
    /// final one once this turns false.
    pub fn has_unmeasured_leaves(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| !n.is_compound() && (n.width.is_none() || n.height.is_none()))
    }

    /// Check the description for structural errors
    ///
    /// Verifies id uniqueness, that `children` form a forest (each child
    /// has one parent, no ancestor cycles), and that every edge endpoint
    /// names a known node and a declared port. Cycle detection walks the
    /// parent chain with an explicit visited set.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), i).is_some() {
                return Err(LayoutError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        let mut parent: HashMap<&str, &str> = HashMap::new();
        for node in &self.nodes {
            for child in &node.children {
                if !index.contains_key(child.as_str()) {
                    return Err(LayoutError::UnknownChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
                if parent.insert(child.as_str(), node.id.as_str()).is_some() {
                    return Err(LayoutError::MultipleParents {
                        child: child.clone(),
                    });
                }
            }
        }

        for node in &self.nodes {
            let mut visited: HashSet<&str> = HashSet::new();
            visited.insert(node.id.as_str());
            let mut current = node.id.as_str();
            while let Some(&up) = parent.get(current) {
                if !visited.insert(up) {
                    return Err(LayoutError::CyclicHierarchy { id: up.to_string() });
                }
                current = up;
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                let Some(&node_index) = index.get(endpoint.node.as_str()) else {
                    return Err(LayoutError::unknown_node(&edge.id, &endpoint.node));
                };
                if let Some(port) = &endpoint.port {
                    let declared = self.nodes[node_index]
                        .ports
                        .iter()
                        .any(|p| &p.name == port);
                    if !declared {
                        return Err(LayoutError::unknown_port(&edge.id, &endpoint.node, port));
                    }
                }
            }
        }

        for group in &self.alignments {
            for id in &group.nodes {
                if !index.contains_key(id.as_str()) {
                    return Err(LayoutError::UnknownAlignNode { node: id.clone() });
                }
            }
        }

        Ok(())
    }
}
