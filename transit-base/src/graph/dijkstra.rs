//! Binary-heap Dijkstra over a [`DirectedWeightedGraph`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use super::{DirectedWeightedGraph, EdgeId, VertexId};

/// A shortest path: the ordered edge ids and their summed weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub edges: Vec<EdgeId>,
    pub total_weight: f64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct State {
    cost: OrderedFloat<f64>,
    vertex: VertexId,
}

// Flip the ordering on cost so the std max-heap behaves as a min-heap;
// tie-break on vertex to keep `Ord` consistent with `PartialEq`.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path from `from` to `to`, or `None` when `to` is unreachable
/// (or either vertex is out of range).
///
/// Weights must be non-negative. `from == to` yields an empty path of
/// weight zero.
pub fn shortest_path(
    graph: &DirectedWeightedGraph,
    from: VertexId,
    to: VertexId,
) -> Option<Path> {
    let vertex_count = graph.vertex_count();
    if from >= vertex_count || to >= vertex_count {
        return None;
    }

    let mut dist = vec![f64::INFINITY; vertex_count];
    let mut prev: Vec<Option<EdgeId>> = vec![None; vertex_count];
    let mut heap = BinaryHeap::new();

    dist[from] = 0.0;
    heap.push(State {
        cost: OrderedFloat(0.0),
        vertex: from,
    });

    while let Some(State { cost, vertex }) = heap.pop() {
        if vertex == to {
            break;
        }
        // A stale entry: a shorter path to this vertex was already settled.
        if cost.0 > dist[vertex] {
            continue;
        }
        for &edge_id in graph.incident_edges(vertex) {
            let edge = graph.edge(edge_id);
            let candidate = cost.0 + edge.weight;
            if candidate < dist[edge.to] {
                dist[edge.to] = candidate;
                prev[edge.to] = Some(edge_id);
                heap.push(State {
                    cost: OrderedFloat(candidate),
                    vertex: edge.to,
                });
            }
        }
    }

    if dist[to].is_infinite() {
        return None;
    }

    let mut edges = Vec::new();
    let mut vertex = to;
    while vertex != from {
        let edge_id = prev[vertex]?;
        edges.push(edge_id);
        vertex = graph.edge(edge_id).from;
    }
    edges.reverse();

    Some(Path {
        edges,
        total_weight: dist[to],
    })
}


#[cfg(test)]
mod proptests {
    use super::super::Edge;
    use super::*;
    use proptest::prelude::*;

    fn arbitrary_graph() -> impl Strategy<Value = DirectedWeightedGraph> {
        (2usize..12).prop_flat_map(|n| {
            let edges = proptest::collection::vec(
                (0..n, 0..n, 0.1f64..100.0).prop_map(|(from, to, weight)| Edge {
                    label: String::new(),
                    span: 0,
                    from,
                    to,
                    weight,
                }),
                0..40,
            );
            edges.prop_map(move |edges| {
                let mut graph = DirectedWeightedGraph::new(n);
                for edge in edges {
                    graph.add_edge(edge);
                }
                graph
            })
        })
    }

    proptest! {
        /// Any returned path is a connected from→to chain whose weights sum
        /// to the reported total.
        #[test]
        fn paths_are_consistent(graph in arbitrary_graph(), from_seed: usize, to_seed: usize) {
            let n = graph.vertex_count();
            let from = from_seed % n;
            let to = to_seed % n;

            if let Some(path) = shortest_path(&graph, from, to) {
                let mut at = from;
                let mut sum = 0.0;
                for &edge_id in &path.edges {
                    let edge = graph.edge(edge_id);
                    prop_assert_eq!(edge.from, at);
                    at = edge.to;
                    sum += edge.weight;
                }
                prop_assert_eq!(at, to);
                prop_assert!((sum - path.total_weight).abs() < 1e-9);
            }
        }

        /// The solver never returns a path worse than any single direct edge.
        #[test]
        fn no_worse_than_direct_edge(graph in arbitrary_graph(), pick: usize) {
            if graph.edge_count() == 0 {
                return Ok(());
            }
            let edge = graph.edge(pick % graph.edge_count()).clone();
            let path = shortest_path(&graph, edge.from, edge.to);
            let path = path.expect("direct edge exists, so a path must");
            prop_assert!(path.total_weight <= edge.weight + 1e-9);
        }
    }
}
