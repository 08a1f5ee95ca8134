//! Street graph construction from raw polylines.

use std::collections::HashMap;

use hg_core::{EdgeId, NodeId, Point, Real, SegmentId};

use crate::error::GraphError;
use crate::graph::{GraphEdge, GraphNode, NodeKind, StreetGraph, StreetSegment};

/// Builder converting street polylines into a weighted undirected graph.
///
/// Each polyline is decomposed into consecutive sub-edges; coordinates
/// within `merge_epsilon` of an existing node merge into that node, so two
/// segments sharing an endpoint become one intersection node. Call `build()`
/// to freeze the result into an immutable `StreetGraph`.
#[derive(Debug)]
pub struct StreetGraphBuilder {
    merge_epsilon: Real,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    segments: Vec<StreetSegment>,
    /// Spatial hash over node coordinates; cell size is `merge_epsilon`,
    /// so a 3x3 cell neighborhood covers every merge candidate.
    grid: HashMap<(i64, i64), Vec<NodeId>>,
}

impl StreetGraphBuilder {
    /// Create a builder with the given node-merge tolerance.
    pub fn new(merge_epsilon: Real) -> Self {
        Self {
            merge_epsilon: merge_epsilon.max(Real::EPSILON),
            nodes: Vec::new(),
            edges: Vec::new(),
            segments: Vec::new(),
            grid: HashMap::new(),
        }
    }

    /// Add one street polyline, decomposing it into sub-edges.
    ///
    /// Consecutive duplicate points produce zero-length sub-edges, which are
    /// dropped. Returns the segment ID recorded on every produced edge.
    pub fn add_segment(&mut self, points: &[Point]) -> SegmentId {
        let segment_id = SegmentId::from_index(self.segments.len() as u32);
        self.segments.push(StreetSegment {
            id: segment_id,
            points: points.to_vec(),
        });

        for window in points.windows(2) {
            let a = self.node_for(window[0]);
            let b = self.node_for(window[1]);
            if a == b {
                continue;
            }
            let length = self.nodes[a.index() as usize]
                .point
                .distance(self.nodes[b.index() as usize].point);
            if length <= 0.0 {
                continue;
            }
            let id = EdgeId::from_index(self.edges.len() as u32);
            self.edges.push(GraphEdge {
                id,
                a,
                b,
                length,
                segment: segment_id,
            });
        }

        segment_id
    }

    /// Freeze the builder into an immutable `StreetGraph`.
    ///
    /// Assigns node kinds from final degrees and builds compact adjacency.
    /// Fails with `EmptyNetwork` when no street geometry was supplied.
    pub fn build(mut self) -> Result<StreetGraph, GraphError> {
        if self.edges.is_empty() {
            return Err(GraphError::EmptyNetwork);
        }

        // Node kind follows the final degree: a node used by one sub-edge is
        // a polyline terminus, anything more is an intersection.
        let mut degree = vec![0_usize; self.nodes.len()];
        for edge in &self.edges {
            degree[edge.a.index() as usize] += 1;
            degree[edge.b.index() as usize] += 1;
        }
        for (node, &d) in self.nodes.iter_mut().zip(degree.iter()) {
            node.kind = if d == 1 {
                NodeKind::Endpoint
            } else {
                NodeKind::Intersection
            };
        }

        let (node_edge_offsets, node_edges) = Self::build_adjacency(&self.nodes, &self.edges);

        Ok(StreetGraph {
            nodes: self.nodes,
            edges: self.edges,
            segments: self.segments,
            node_edge_offsets,
            node_edges,
        })
    }

    /// Find or create the node for a coordinate.
    ///
    /// Searches the 3x3 grid neighborhood for nodes within `merge_epsilon`;
    /// the closest wins, ties broken by the lowest node ID.
    fn node_for(&mut self, p: Point) -> NodeId {
        let (cx, cy) = self.cell(p);
        let mut best: Option<(Real, NodeId)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(candidates) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &id in candidates {
                    let d = self.nodes[id.index() as usize].point.distance(p);
                    if d <= self.merge_epsilon
                        && best.is_none_or(|(bd, bid)| d < bd || (d == bd && id < bid))
                    {
                        best = Some((d, id));
                    }
                }
            }
        }
        if let Some((_, id)) = best {
            return id;
        }

        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            id,
            point: p,
            kind: NodeKind::Endpoint,
        });
        self.grid.entry((cx, cy)).or_default().push(id);
        id
    }

    fn cell(&self, p: Point) -> (i64, i64) {
        (
            (p.x / self.merge_epsilon).floor() as i64,
            (p.y / self.merge_epsilon).floor() as i64,
        )
    }

    /// Build compact adjacency lists: for each node, its incident edges.
    fn build_adjacency(nodes: &[GraphNode], edges: &[GraphEdge]) -> (Vec<usize>, Vec<EdgeId>) {
        let mut node_to_edges: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
        for edge in edges {
            node_to_edges.entry(edge.a).or_default().push(edge.id);
            node_to_edges.entry(edge.b).or_default().push(edge.id);
        }

        // Sort each node's edge list for determinism
        for list in node_to_edges.values_mut() {
            list.sort_by_key(|e| e.index());
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);
        for node in nodes {
            if let Some(list) = node_to_edges.get(&node.id) {
                flat.extend_from_slice(list);
            }
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hg_core::{Tolerances, nearly_equal, polyline_length};

    #[test]
    fn empty_input_is_an_error() {
        let builder = StreetGraphBuilder::new(0.01);
        assert_eq!(builder.build().unwrap_err(), GraphError::EmptyNetwork);
    }

    #[test]
    fn degenerate_segments_still_count_as_empty() {
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[Point::new(1.0, 1.0), Point::new(1.0, 1.0)]);
        assert_eq!(builder.build().unwrap_err(), GraphError::EmptyNetwork);
    }

    #[test]
    fn shared_endpoint_merges_into_one_intersection() {
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        builder.add_segment(&[Point::new(10.0, 0.0), Point::new(10.0, 10.0)]);
        let graph = builder.build().unwrap();

        assert_eq!(graph.nodes().len(), 3);
        assert_eq!(graph.edges().len(), 2);

        let shared = graph
            .nodes()
            .iter()
            .find(|n| n.point == Point::new(10.0, 0.0))
            .unwrap();
        assert_eq!(shared.kind, NodeKind::Intersection);
        assert_eq!(graph.node_edges(shared.id).len(), 2);
    }

    #[test]
    fn near_coincident_endpoints_merge_within_epsilon() {
        let mut builder = StreetGraphBuilder::new(0.5);
        builder.add_segment(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        builder.add_segment(&[Point::new(10.2, 0.1), Point::new(20.0, 0.0)]);
        let graph = builder.build().unwrap();

        // The second polyline's start coordinate merged into the first's end.
        assert_eq!(graph.nodes().len(), 3);
    }

    #[test]
    fn interior_vertices_become_intersections() {
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
        ]);
        let graph = builder.build().unwrap();

        let kinds: Vec<NodeKind> = graph.nodes().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Endpoint,
                NodeKind::Intersection,
                NodeKind::Endpoint
            ]
        );
    }

    #[test]
    fn construction_is_lossless() {
        let mut builder = StreetGraphBuilder::new(0.01);
        let polylines: [&[Point]; 2] = [
            &[
                Point::new(0.0, 0.0),
                Point::new(30.0, 40.0),
                Point::new(60.0, 0.0),
            ],
            &[Point::new(60.0, 0.0), Point::new(60.0, 25.0)],
        ];
        let mut input_length = 0.0;
        for points in polylines {
            builder.add_segment(points);
            input_length += polyline_length(points);
        }
        let graph = builder.build().unwrap();

        assert!(nearly_equal(
            graph.total_length(),
            input_length,
            Tolerances::default()
        ));
        assert_eq!(graph.segments().len(), 2);
    }

    #[test]
    fn edges_record_their_source_segment() {
        let mut builder = StreetGraphBuilder::new(0.01);
        let s1 = builder.add_segment(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        let s2 = builder.add_segment(&[Point::new(10.0, 0.0), Point::new(10.0, 10.0)]);
        let graph = builder.build().unwrap();

        assert_eq!(graph.edges()[0].segment, s1);
        assert_eq!(graph.edges()[1].segment, s2);
        assert_eq!(graph.segment(s2).unwrap().points.len(), 2);
    }
}
