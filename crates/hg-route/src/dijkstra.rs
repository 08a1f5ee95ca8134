//! Single-source shortest paths over the scenario graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hg_core::{EdgeId, NodeId, Real};
use hg_graph::ScenarioGraph;

use crate::error::RouteError;

/// Heap entry for the Dijkstra frontier.
///
/// Ordered as a min-heap on (distance, node id): closer nodes pop first,
/// and equal distances pop the lower node ID, which keeps relaxation order
/// reproducible across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    dist: Real,
    node: NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for BinaryHeap's max-heap semantics.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Global distance / predecessor arrays from one Dijkstra pass.
#[derive(Debug, Clone)]
pub struct RouteTable {
    source: NodeId,
    dist: Vec<Real>,
    prev: Vec<Option<(NodeId, EdgeId)>>,
}

impl RouteTable {
    /// The plant node this table was computed from.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Shortest-path distance to `node`, or None if unreachable.
    pub fn distance(&self, node: NodeId) -> Option<Real> {
        let d = *self.dist.get(node.index() as usize)?;
        d.is_finite().then_some(d)
    }

    /// Ordered edge list of the shortest path source -> `node`.
    ///
    /// Iterative predecessor backtracking (no recursion). Returns None for
    /// unreachable nodes; the source itself yields an empty path.
    pub fn path_to(&self, node: NodeId) -> Option<Vec<EdgeId>> {
        self.distance(node)?;
        let mut edges = Vec::new();
        let mut current = node;
        while current != self.source {
            let (parent, edge) = self.prev[current.index() as usize]?;
            edges.push(edge);
            current = parent;
        }
        edges.reverse();
        Some(edges)
    }
}

/// One Dijkstra pass from the plant over the post-snap graph.
///
/// All weights are non-negative (Euclidean lengths), so a single pass
/// yields every building's path at once: O((V+E) log V) total, not per
/// building.
pub struct ShortestPathRouter;

impl ShortestPathRouter {
    pub fn route(graph: &ScenarioGraph, source: NodeId) -> Result<RouteTable, RouteError> {
        if graph.node(source).is_none() {
            return Err(RouteError::SourceMissing { node: source });
        }

        let n = graph.node_count();
        let mut dist = vec![Real::INFINITY; n];
        let mut prev: Vec<Option<(NodeId, EdgeId)>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        dist[source.index() as usize] = 0.0;
        heap.push(Frontier {
            dist: 0.0,
            node: source,
        });

        while let Some(Frontier { dist: d, node: u }) = heap.pop() {
            let ui = u.index() as usize;
            if settled[ui] {
                continue;
            }
            settled[ui] = true;

            // Incident edges are stored ascending, so relaxation order is
            // deterministic and strict improvement keeps the first (lowest
            // edge id) predecessor among equal-length alternatives.
            for &edge_id in graph.node_edges(u) {
                let Some(edge) = graph.edge(edge_id) else {
                    continue;
                };
                let Some(v) = edge.other(u) else {
                    continue;
                };
                let vi = v.index() as usize;
                let candidate = d + edge.length;
                if candidate < dist[vi] {
                    dist[vi] = candidate;
                    prev[vi] = Some((u, edge_id));
                    heap.push(Frontier {
                        dist: candidate,
                        node: v,
                    });
                }
            }
        }

        Ok(RouteTable { source, dist, prev })
    }
}
