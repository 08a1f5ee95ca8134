//! Shared-edge topology derived from per-building shortest paths.

use std::collections::{HashMap, HashSet, VecDeque};

use hg_core::{EdgeId, NodeId, Real};
use hg_graph::ScenarioGraph;

use crate::error::RouteError;

/// One street edge used by at least one building route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedEdge {
    pub edge: EdgeId,
    /// Number of building paths traversing this edge. Not consumed here;
    /// downstream pipe sizing reads it off the synthesized network.
    pub branch_count: u32,
}

/// The union of all building routes: the minimal shared trunk network.
#[derive(Debug, Clone, Default)]
pub struct SharedTopology {
    edges: Vec<SharedEdge>,
}

impl SharedTopology {
    /// Shared edges, ascending by edge ID.
    pub fn edges(&self) -> &[SharedEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Branch count for an edge, if it is part of the shared topology.
    pub fn branch_count(&self, edge: EdgeId) -> Option<u32> {
        self.edges
            .iter()
            .find(|e| e.edge == edge)
            .map(|e| e.branch_count)
    }

    /// Sum of shared edge lengths (one circuit's worth of pipe).
    pub fn total_length(&self, graph: &ScenarioGraph) -> Real {
        self.edges
            .iter()
            .filter_map(|e| graph.edge(e.edge))
            .map(|e| e.length)
            .sum()
    }
}

/// Derives the shared topology from per-building path edge lists.
///
/// All paths come from one shortest-path tree rooted at the plant, so their
/// union is guaranteed to be a tree; `derive` re-checks that as a defensive
/// invariant and reports a violation as an internal error.
pub struct PathSharingOptimizer;

impl PathSharingOptimizer {
    pub fn derive(
        graph: &ScenarioGraph,
        plant: NodeId,
        paths: &[Vec<EdgeId>],
    ) -> Result<SharedTopology, RouteError> {
        let mut counts: HashMap<EdgeId, u32> = HashMap::new();
        for path in paths {
            for &edge in path {
                *counts.entry(edge).or_insert(0) += 1;
            }
        }

        let mut edges: Vec<SharedEdge> = counts
            .into_iter()
            .map(|(edge, branch_count)| SharedEdge { edge, branch_count })
            .collect();
        edges.sort_by_key(|e| e.edge);

        let topology = SharedTopology { edges };
        Self::check_is_tree(graph, plant, &topology)?;
        Ok(topology)
    }

    /// Defensive check: the union must be one tree hanging off the plant.
    fn check_is_tree(
        graph: &ScenarioGraph,
        plant: NodeId,
        topology: &SharedTopology,
    ) -> Result<(), RouteError> {
        if topology.is_empty() {
            return Ok(());
        }

        let mut adjacency: HashMap<NodeId, Vec<(NodeId, EdgeId)>> = HashMap::new();
        let mut touched: HashSet<NodeId> = HashSet::new();
        touched.insert(plant);
        for shared in topology.edges() {
            let edge = graph
                .edge(shared.edge)
                .ok_or_else(|| RouteError::UnionNotTree {
                    what: format!("edge {} is retired", shared.edge),
                })?;
            touched.insert(edge.a);
            touched.insert(edge.b);
            adjacency.entry(edge.a).or_default().push((edge.b, edge.id));
            adjacency.entry(edge.b).or_default().push((edge.a, edge.id));
        }

        // A connected graph with |edges| == |nodes| - 1 is a tree.
        if topology.len() != touched.len() - 1 {
            return Err(RouteError::UnionNotTree {
                what: format!(
                    "{} edges over {} nodes (a tree needs {})",
                    topology.len(),
                    touched.len(),
                    touched.len() - 1
                ),
            });
        }

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(plant);
        queue.push_back(plant);
        while let Some(u) = queue.pop_front() {
            if let Some(neighbors) = adjacency.get(&u) {
                for &(v, _) in neighbors {
                    if seen.insert(v) {
                        queue.push_back(v);
                    }
                }
            }
        }
        if seen.len() != touched.len() {
            return Err(RouteError::UnionNotTree {
                what: format!(
                    "{} of {} route nodes reachable from the plant",
                    seen.len(),
                    touched.len()
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::ShortestPathRouter;
    use hg_core::Point;
    use hg_graph::StreetGraphBuilder;

    /// One straight trunk 0 --- 1 --- 2 --- 3 with unit spans of 10.
    fn trunk() -> ScenarioGraph {
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 0.0),
        ]);
        builder.build().unwrap().to_scenario()
    }

    fn paths_to(graph: &ScenarioGraph, plant: NodeId, targets: &[u32]) -> Vec<Vec<EdgeId>> {
        let table = ShortestPathRouter::route(graph, plant).unwrap();
        targets
            .iter()
            .map(|&t| table.path_to(NodeId::from_index(t)).unwrap())
            .collect()
    }

    #[test]
    fn branch_counts_decrease_along_the_trunk() {
        let graph = trunk();
        let plant = NodeId::from_index(0);
        let paths = paths_to(&graph, plant, &[1, 2, 3]);

        let shared = PathSharingOptimizer::derive(&graph, plant, &paths).unwrap();

        assert_eq!(shared.len(), 3);
        assert_eq!(shared.branch_count(EdgeId::from_index(0)), Some(3));
        assert_eq!(shared.branch_count(EdgeId::from_index(1)), Some(2));
        assert_eq!(shared.branch_count(EdgeId::from_index(2)), Some(1));
        assert_eq!(shared.total_length(&graph), 30.0);
    }

    #[test]
    fn union_equals_the_path_edge_set_exactly() {
        let graph = trunk();
        let plant = NodeId::from_index(0);
        let paths = paths_to(&graph, plant, &[2, 3]);

        let shared = PathSharingOptimizer::derive(&graph, plant, &paths).unwrap();

        let mut union: Vec<EdgeId> = paths.iter().flatten().copied().collect();
        union.sort();
        union.dedup();
        let shared_ids: Vec<EdgeId> = shared.edges().iter().map(|e| e.edge).collect();
        assert_eq!(shared_ids, union);
    }

    #[test]
    fn empty_paths_make_an_empty_topology() {
        let graph = trunk();
        let plant = NodeId::from_index(0);
        let shared = PathSharingOptimizer::derive(&graph, plant, &[]).unwrap();
        assert!(shared.is_empty());
    }

    #[test]
    fn a_cycle_in_the_union_is_an_internal_error() {
        // Square street loop; hand-built "paths" covering all four edges
        // cannot come from one predecessor tree.
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ]);
        let graph = builder.build().unwrap().to_scenario();
        let plant = NodeId::from_index(0);

        let bogus = vec![
            vec![EdgeId::from_index(0), EdgeId::from_index(1)],
            vec![EdgeId::from_index(3), EdgeId::from_index(2)],
        ];
        let err = PathSharingOptimizer::derive(&graph, plant, &bogus).unwrap_err();
        assert!(matches!(err, RouteError::UnionNotTree { .. }));
    }

    #[test]
    fn a_detached_path_is_an_internal_error() {
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        builder.add_segment(&[Point::new(50.0, 0.0), Point::new(60.0, 0.0)]);
        let graph = builder.build().unwrap().to_scenario();
        let plant = NodeId::from_index(0);

        // An edge nowhere near the plant cannot be part of its route tree.
        let bogus = vec![vec![EdgeId::from_index(1)]];
        let err = PathSharingOptimizer::derive(&graph, plant, &bogus).unwrap_err();
        assert!(matches!(err, RouteError::UnionNotTree { .. }));
    }
}
