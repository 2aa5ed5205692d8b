//! Transit graph builder and route query façade.
//!
//! Every stop owns two vertices: a *board* vertex (arrived, waiting) and a
//! *depart* vertex (on a bus, riding), joined by a wait edge of fixed
//! weight. Each bus then contributes one edge per ordered pair of its
//! stops, so that riding through several stops without transferring is a
//! single edge and only an actual transfer pays the wait penalty again.
//!
//! The builder is one-way: a router is either constructed from a catalogue
//! or reassembled from snapshot parts, and is immutable afterwards.

mod config;

pub use config::RoutingConfig;

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::catalogue::Catalogue;
use crate::domain::Bus;
use crate::graph::{self, DirectedWeightedGraph, Edge, VertexId};

/// One leg of an answered route query.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteLeg {
    /// Waiting at `stop` for `time` minutes.
    Wait { stop: String, time: f64 },

    /// Riding `bus` past `span` stops for `time` minutes.
    Ride { bus: String, span: usize, time: f64 },
}

/// A found route: ordered legs and their summed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub total_time: f64,
    pub legs: Vec<RouteLeg>,
}

/// The built transit graph plus the stop-name → board-vertex mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitRouter {
    config: RoutingConfig,
    graph: DirectedWeightedGraph,
    stop_vertices: BTreeMap<String, VertexId>,
}

impl TransitRouter {
    /// Build the transit graph from a catalogue.
    ///
    /// Vertices are numbered in stop-name order (board `2k`, depart
    /// `2k + 1`) and buses are visited name-ordered, so building twice
    /// from the same catalogue produces identical graphs.
    pub fn build(catalogue: &Catalogue, config: RoutingConfig) -> Self {
        let mut graph = DirectedWeightedGraph::new(catalogue.stop_count() * 2);
        let mut stop_vertices = BTreeMap::new();

        let mut vertex = 0;
        for (_, stop) in catalogue.stops() {
            stop_vertices.insert(stop.name.clone(), vertex);
            graph.add_edge(Edge {
                label: stop.name.clone(),
                span: 0,
                from: vertex,
                to: vertex + 1,
                weight: config.wait_minutes(),
            });
            vertex += 2;
        }

        for (_, bus) in catalogue.buses() {
            add_bus_edges(&mut graph, &stop_vertices, catalogue, bus, &config);
        }

        debug!(
            stops = catalogue.stop_count(),
            buses = catalogue.bus_count(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built transit graph"
        );

        Self {
            config,
            graph,
            stop_vertices,
        }
    }

    /// Reassemble a router from snapshot parts. No graph construction
    /// happens here; the parts are trusted as previously built.
    pub fn from_parts(
        config: RoutingConfig,
        graph: DirectedWeightedGraph,
        stop_vertices: BTreeMap<String, VertexId>,
    ) -> Self {
        Self {
            config,
            graph,
            stop_vertices,
        }
    }

    /// Fastest route between two stops under the wait+travel model.
    ///
    /// Returns `None` when either name is unknown or no route exists.
    pub fn find_route(&self, from: &str, to: &str) -> Option<Route> {
        let &from_vertex = self.stop_vertices.get(from)?;
        let &to_vertex = self.stop_vertices.get(to)?;

        let path = graph::shortest_path(&self.graph, from_vertex, to_vertex)?;
        trace!(from, to, total = path.total_weight, "route found");

        let legs = path
            .edges
            .iter()
            .map(|&edge_id| {
                let edge = self.graph.edge(edge_id);
                if edge.span == 0 {
                    RouteLeg::Wait {
                        stop: edge.label.clone(),
                        time: edge.weight,
                    }
                } else {
                    RouteLeg::Ride {
                        bus: edge.label.clone(),
                        span: edge.span,
                        time: edge.weight,
                    }
                }
            })
            .collect();

        Some(Route {
            total_time: path.total_weight,
            legs,
        })
    }

    pub fn config(&self) -> RoutingConfig {
        self.config
    }

    pub fn graph(&self) -> &DirectedWeightedGraph {
        &self.graph
    }

    /// The published stop-name → board-vertex mapping.
    pub fn stop_vertices(&self) -> &BTreeMap<String, VertexId> {
        &self.stop_vertices
    }
}

/// Emit the all-ordered-pairs edges for one bus.
///
/// Distances accumulate directed along the stored sequence; a round-trip
/// bus also gets the mirrored edge with the reverse accumulation, so
/// asymmetric road legs keep their direction.
fn add_bus_edges(
    graph: &mut DirectedWeightedGraph,
    stop_vertices: &BTreeMap<String, VertexId>,
    catalogue: &Catalogue,
    bus: &Bus,
    config: &RoutingConfig,
) {
    let stops = &bus.stops;
    for i in 0..stops.len() {
        let mut forward = 0u64;
        let mut backward = 0u64;
        for j in (i + 1)..stops.len() {
            forward += u64::from(catalogue.distance(stops[j - 1], stops[j]));
            backward += u64::from(catalogue.distance(stops[j], stops[j - 1]));

            let from = &catalogue.stop(stops[i]).name;
            let to = &catalogue.stop(stops[j]).name;
            graph.add_edge(Edge {
                label: bus.name.clone(),
                span: j - i,
                from: stop_vertices[from] + 1,
                to: stop_vertices[to],
                weight: forward as f64 / config.metres_per_minute(),
            });
            if !bus.is_loop {
                graph.add_edge(Edge {
                    label: bus.name.clone(),
                    span: j - i,
                    from: stop_vertices[to] + 1,
                    to: stop_vertices[from],
                    weight: backward as f64 / config.metres_per_minute(),
                });
            }
        }
    }
}
