//! Street graph data structures.

use hg_core::{EdgeId, NodeId, Point, Real, SegmentId, polyline_length};

use crate::error::GraphError;

/// An input street polyline with its derived length.
#[derive(Debug, Clone)]
pub struct StreetSegment {
    pub id: SegmentId,
    pub points: Vec<Point>,
}

impl StreetSegment {
    /// Total polyline length.
    pub fn length(&self) -> Real {
        polyline_length(&self.points)
    }
}

/// How a graph node came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Shared by two or more street sub-edges.
    Intersection,
    /// Terminus of a polyline, used by exactly one sub-edge.
    Endpoint,
    /// Inserted by snapping an entity onto an edge.
    Virtual,
}

/// A node in the street graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub point: Point,
    pub kind: NodeKind,
}

/// An undirected, weighted sub-edge of a street segment.
///
/// The weight is the Euclidean length between the two endpoint nodes;
/// `segment` records which input polyline the edge came from.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
    pub length: Real,
    pub segment: SegmentId,
}

impl GraphEdge {
    /// The endpoint opposite to `node`, or None if `node` is not an endpoint.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.a {
            Some(self.b)
        } else if node == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// The frozen street skeleton: a validated, immutable graph.
///
/// Built once per street dataset and shareable read-only across scenarios.
/// Stores compact adjacency: node i's incident edges are in
/// `node_edges[node_edge_offsets[i]..node_edge_offsets[i+1]]`.
#[derive(Debug, Clone)]
pub struct StreetGraph {
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) edges: Vec<GraphEdge>,
    pub(crate) segments: Vec<StreetSegment>,
    pub(crate) node_edge_offsets: Vec<usize>,
    pub(crate) node_edges: Vec<EdgeId>,
}

impl StreetGraph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Return all edges.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index() as usize)
    }

    /// Get an edge by ID (returns None if ID out of bounds).
    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id.index() as usize)
    }

    /// Return all source street segments.
    pub fn segments(&self) -> &[StreetSegment] {
        &self.segments
    }

    /// Get the source segment recorded on an edge.
    pub fn segment(&self, id: SegmentId) -> Option<&StreetSegment> {
        self.segments.get(id.index() as usize)
    }

    /// Edge IDs incident to a node, ascending.
    pub fn node_edges(&self, node_id: NodeId) -> &[EdgeId] {
        let idx = node_id.index() as usize;
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_edge_offsets[idx];
        let end = self.node_edge_offsets[idx + 1];
        &self.node_edges[start..end]
    }

    /// Sum of all edge weights.
    pub fn total_length(&self) -> Real {
        self.edges.iter().map(|e| e.length).sum()
    }

    /// Clone the skeleton into a mutable per-scenario graph.
    ///
    /// Snapping inserts virtual nodes and splits edges; that mutation must
    /// never touch the shared skeleton, so every scenario starts here.
    pub fn to_scenario(&self) -> ScenarioGraph {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for (idx, list) in adjacency.iter_mut().enumerate() {
            list.extend_from_slice(self.node_edges(NodeId::from_index(idx as u32)));
        }
        ScenarioGraph {
            nodes: self.nodes.clone(),
            edges: self.edges.iter().cloned().map(Some).collect(),
            adjacency,
            live_edges: self.edges.len(),
        }
    }
}

/// A scenario-private mutable view of the street graph.
///
/// Supports virtual-node insertion and edge splitting. Retired edges keep
/// their slot (as `None`) so edge IDs stay stable for downstream stages.
#[derive(Debug, Clone)]
pub struct ScenarioGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<Option<GraphEdge>>,
    /// Per-node incident live edge IDs, kept in ascending order.
    adjacency: Vec<Vec<EdgeId>>,
    live_edges: usize,
}

impl ScenarioGraph {
    /// Return all nodes (including virtual ones inserted so far).
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live (non-retired) edges.
    pub fn live_edge_count(&self) -> usize {
        self.live_edges
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index() as usize)
    }

    /// Coordinate of a node, if it exists.
    pub fn node_point(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|n| n.point)
    }

    /// Coordinates of an edge's two endpoints.
    pub fn endpoints(&self, edge: &GraphEdge) -> (Point, Point) {
        (
            self.nodes[edge.a.index() as usize].point,
            self.nodes[edge.b.index() as usize].point,
        )
    }

    /// Get a live edge by ID (None if out of bounds or retired).
    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id.index() as usize)?.as_ref()
    }

    /// Iterate over live edges in ascending ID order.
    pub fn live_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter_map(|e| e.as_ref())
    }

    /// Live edge IDs incident to a node, ascending.
    pub fn node_edges(&self, node_id: NodeId) -> &[EdgeId] {
        self.adjacency
            .get(node_id.index() as usize)
            .map_or(&[], |v| v.as_slice())
    }

    /// Sum of live edge weights.
    pub fn total_length(&self) -> Real {
        self.live_edges().map(|e| e.length).sum()
    }

    /// Find the closest existing node within `eps` of `p`.
    ///
    /// Deterministic: on distance ties the lowest node ID wins.
    pub fn nearest_node_within(&self, p: Point, eps: Real) -> Option<NodeId> {
        let mut best: Option<(Real, NodeId)> = None;
        for node in &self.nodes {
            let d = node.point.distance(p);
            if d <= eps && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, node.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Insert a virtual node (no incident edges yet) and return its ID.
    pub fn insert_virtual(&mut self, p: Point) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            id,
            point: p,
            kind: NodeKind::Virtual,
        });
        self.adjacency.push(Vec::new());
        id
    }

    /// Split a live edge at `at`: retire it, insert a virtual node, and add
    /// two replacement edges with recomputed lengths.
    ///
    /// Returns the new node. The replacement edges inherit the source
    /// segment of the split edge.
    pub fn split_edge(&mut self, edge_id: EdgeId, at: Point) -> Result<NodeId, GraphError> {
        let edge = self
            .edge(edge_id)
            .cloned()
            .ok_or(GraphError::EdgeRetired { edge: edge_id })?;

        let node = self.insert_virtual(at);
        let node_point = at;

        // Retire the original edge.
        self.edges[edge_id.index() as usize] = None;
        self.live_edges -= 1;
        for endpoint in [edge.a, edge.b] {
            self.adjacency[endpoint.index() as usize].retain(|&e| e != edge_id);
        }

        let a_point = self.nodes[edge.a.index() as usize].point;
        let b_point = self.nodes[edge.b.index() as usize].point;
        self.push_edge(edge.a, node, a_point.distance(node_point), edge.segment);
        self.push_edge(node, edge.b, node_point.distance(b_point), edge.segment);

        Ok(node)
    }

    fn push_edge(&mut self, a: NodeId, b: NodeId, length: Real, segment: SegmentId) {
        let id = EdgeId::from_index(self.edges.len() as u32);
        self.edges.push(Some(GraphEdge {
            id,
            a,
            b,
            length,
            segment,
        }));
        self.live_edges += 1;
        // New IDs are always the largest so far, so pushing keeps the
        // adjacency lists in ascending order.
        self.adjacency[a.index() as usize].push(id);
        self.adjacency[b.index() as usize].push(id);
    }
}
