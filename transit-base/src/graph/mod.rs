//! Directed weighted graph with a shortest-path solver.
//!
//! This module is deliberately transit-agnostic: it stores labelled edges
//! between integer vertices and answers shortest-path queries, nothing
//! more. The router builds the transit encoding on top and treats
//! [`shortest_path`] as a black box.
//!
//! Edges live in one flat arena with dense ids; each vertex keeps the list
//! of its outgoing edge ids. Both arrays serialize as-is, which is what
//! lets a snapshot restore the graph without rebuilding it.

mod dijkstra;

pub use dijkstra::{Path, shortest_path};

use serde::{Deserialize, Serialize};

pub type VertexId = usize;
pub type EdgeId = usize;

/// One directed weighted edge.
///
/// `label` and `span` are opaque payload carried for the caller; the
/// solver reads only `from`, `to` and `weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub label: String,
    pub span: usize,
    pub from: VertexId,
    pub to: VertexId,
    pub weight: f64,
}

/// An immutable-after-build directed weighted graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectedWeightedGraph {
    edges: Vec<Edge>,
    incidence: Vec<Vec<EdgeId>>,
}

impl DirectedWeightedGraph {
    /// Create a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            incidence: vec![Vec::new(); vertex_count],
        }
    }

    /// Reassemble a graph from its flat parts (snapshot reload).
    pub fn from_parts(edges: Vec<Edge>, incidence: Vec<Vec<EdgeId>>) -> Self {
        Self { edges, incidence }
    }

    /// Append an edge and return its id. Ids are dense and assigned in
    /// insertion order.
    pub fn add_edge(&mut self, edge: Edge) -> EdgeId {
        let id = self.edges.len();
        self.incidence[edge.from].push(id);
        self.edges.push(edge);
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edge ids of a vertex.
    pub fn incident_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.incidence[vertex]
    }
}
