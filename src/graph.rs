//! The graph-store contract and an in-memory implementation.
//!
//! The rendering side owns the real graph; the mapping engine only needs node
//! and edge existence checks, node creation, attribute mutation and undirected
//! edge creation. `MemoryGraph` backs the bundled binary and the tests, and
//! serialises into the shape the force-graph front end consumes.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::frame::Mac;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Broadcast,
    Physical,
    Logical,
}

/// Device node state. Multi-valued observations are sets from creation
/// onward, so repeated frames merge instead of coercing scalars into lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    pub label: String,
    pub vendor: String,
    /// Monotonic: once a device has acted as an access point it stays one.
    #[serde(rename = "isAP")]
    pub is_ap: bool,
    /// SSIDs this device has broadcast as an AP.
    pub ssid: BTreeSet<String>,
    /// SSIDs this device has probed for as a client.
    pub looking_for: BTreeSet<String>,
    pub channels: BTreeSet<i32>,
    pub last_seen: DateTime<Utc>,
    /// Initial layout coordinate, assigned once at creation.
    pub position: (f64, f64),
}

/// Edge weight (`size`) is a rendering hint only, fixed per link type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeAttributes {
    pub size: u32,
    pub linktype: LinkType,
}

/// What the mapping engine requires of the graph it mutates. Edges are
/// undirected: `(a, b)` and `(b, a)` name the same edge, and self-loops are
/// legal.
pub trait GraphStore {
    fn has_node(&self, mac: &Mac) -> bool;
    fn add_node(&mut self, mac: Mac, attributes: NodeAttributes);
    fn node_mut(&mut self, mac: &Mac) -> Option<&mut NodeAttributes>;
    fn has_edge(&self, a: &Mac, b: &Mac) -> bool;
    fn add_undirected_edge(&mut self, a: Mac, b: Mac, attributes: EdgeAttributes);
}

#[derive(Debug, Default)]
pub struct MemoryGraph {
    nodes: BTreeMap<Mac, NodeAttributes>,
    edges: BTreeMap<(Mac, Mac), EdgeAttributes>,
}

fn edge_key(a: Mac, b: Mac) -> (Mac, Mac) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, mac: &Mac) -> Option<&NodeAttributes> {
        self.nodes.get(mac)
    }

    pub fn edge(&self, a: &Mac, b: &Mac) -> Option<&EdgeAttributes> {
        self.edges.get(&edge_key(*a, *b))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn export(&self) -> GraphExport {
        GraphExport {
            nodes: self
                .nodes
                .iter()
                .map(|(mac, attributes)| NodeExport {
                    mac: *mac,
                    attributes: attributes.clone(),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|(&(source, target), attributes)| EdgeExport {
                    source,
                    target,
                    size: attributes.size,
                    linktype: attributes.linktype,
                })
                .collect(),
        }
    }
}

impl GraphStore for MemoryGraph {
    fn has_node(&self, mac: &Mac) -> bool {
        self.nodes.contains_key(mac)
    }

    fn add_node(&mut self, mac: Mac, attributes: NodeAttributes) {
        self.nodes.entry(mac).or_insert(attributes);
    }

    fn node_mut(&mut self, mac: &Mac) -> Option<&mut NodeAttributes> {
        self.nodes.get_mut(mac)
    }

    fn has_edge(&self, a: &Mac, b: &Mac) -> bool {
        self.edges.contains_key(&edge_key(*a, *b))
    }

    fn add_undirected_edge(&mut self, a: Mac, b: Mac, attributes: EdgeAttributes) {
        // First classification wins; re-observation never rewrites an edge.
        self.edges.entry(edge_key(a, b)).or_insert(attributes);
    }
}

/// Serialisable graph snapshot, camelCased for the front end.
#[derive(Debug, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
}

#[derive(Debug, Serialize)]
pub struct NodeExport {
    pub mac: Mac,
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

#[derive(Debug, Serialize)]
pub struct EdgeExport {
    pub source: Mac,
    pub target: Mac,
    pub size: u32,
    pub linktype: LinkType,
}
