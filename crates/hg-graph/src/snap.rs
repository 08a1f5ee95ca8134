//! Entity snapping: projecting plants and buildings onto street edges.

use hg_core::{NodeId, Point, Power, Real, SegmentId, project_onto_segment};

use crate::error::GraphError;
use crate::graph::ScenarioGraph;

/// A real-world entity to be connected to the street network.
#[derive(Debug, Clone)]
pub enum Entity {
    Plant { id: String, point: Point },
    Building { id: String, point: Point, demand: Power },
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Plant { id, .. } | Entity::Building { id, .. } => id,
        }
    }

    pub fn point(&self) -> Point {
        match self {
            Entity::Plant { point, .. } | Entity::Building { point, .. } => *point,
        }
    }
}

/// What to do with an entity whose nearest street edge is too far away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapPolicy {
    /// Record the entity in diagnostics and keep going (default).
    #[default]
    ExcludeAndWarn,
    /// Abort construction on the first over-limit entity.
    FailFast,
}

/// A successful street connection for one entity.
#[derive(Debug, Clone)]
pub struct SnapResult {
    pub entity: String,
    /// The graph node the entity connects at (virtual, unless an existing
    /// node was close enough to reuse).
    pub node: NodeId,
    /// The connection point on the street.
    pub point: Point,
    /// Perpendicular entity-to-street distance; this is also the length of
    /// the straight service connection.
    pub distance: Real,
    /// The street segment the connection lands on.
    pub segment: SegmentId,
}

/// An entity left unconnected under the exclude-and-warn policy.
#[derive(Debug, Clone)]
pub struct SnapRejection {
    pub entity: String,
    pub distance: Real,
    pub limit: Real,
}

/// Outcome of snapping a batch of entities.
#[derive(Debug, Default)]
pub struct SnapOutcome {
    pub snapped: Vec<SnapResult>,
    pub rejected: Vec<SnapRejection>,
}

/// Projects entities onto their globally nearest street edge, splitting
/// edges at the projection point.
///
/// Snapping always runs against the current (possibly already-split) graph,
/// so two entities landing on the same original street segment each split
/// the live sub-edge they actually hit. Re-snapping a coordinate is
/// idempotent: a node already sitting at the projection (within the merge
/// tolerance) is reused instead of splitting again.
#[derive(Debug, Clone)]
pub struct EntitySnapper {
    max_snap_distance: Real,
    merge_epsilon: Real,
    policy: SnapPolicy,
}

impl EntitySnapper {
    pub fn new(max_snap_distance: Real, merge_epsilon: Real, policy: SnapPolicy) -> Self {
        Self {
            max_snap_distance,
            merge_epsilon,
            policy,
        }
    }

    /// Snap one entity onto the graph.
    ///
    /// `Ok(Ok(result))` on success, `Ok(Err(rejection))` when the entity is
    /// beyond the snap limit under exclude-and-warn, `Err` under fail-fast.
    pub fn snap(
        &self,
        graph: &mut ScenarioGraph,
        entity: &Entity,
    ) -> Result<Result<SnapResult, SnapRejection>, GraphError> {
        let point = entity.point();

        // Globally nearest projection over all live edges; distance ties
        // keep the lower edge ID because iteration is ascending and only a
        // strict improvement replaces the best candidate.
        let mut best: Option<(Real, Point, hg_core::EdgeId, SegmentId)> = None;
        for edge in graph.live_edges() {
            let (a, b) = graph.endpoints(edge);
            let proj = project_onto_segment(point, a, b);
            if best.is_none_or(|(d, ..)| proj.distance < d) {
                best = Some((proj.distance, proj.point, edge.id, edge.segment));
            }
        }
        let (distance, foot, edge_id, segment) = best.ok_or(GraphError::EmptyNetwork)?;

        if distance > self.max_snap_distance {
            return match self.policy {
                SnapPolicy::ExcludeAndWarn => Ok(Err(SnapRejection {
                    entity: entity.id().to_string(),
                    distance,
                    limit: self.max_snap_distance,
                })),
                SnapPolicy::FailFast => Err(GraphError::SnapDistanceExceeded {
                    entity: entity.id().to_string(),
                    distance,
                    limit: self.max_snap_distance,
                }),
            };
        }

        // Idempotence: reuse a node already at the projection point rather
        // than splitting a second time.
        let node = match graph.nearest_node_within(foot, self.merge_epsilon) {
            Some(existing) => existing,
            None => graph.split_edge(edge_id, foot)?,
        };
        let point_on_street = graph.node_point(node).unwrap_or(foot);

        Ok(Ok(SnapResult {
            entity: entity.id().to_string(),
            node,
            point: point_on_street,
            distance,
            segment,
        }))
    }

    /// Snap a batch of entities in order, accumulating rejections.
    pub fn snap_all(
        &self,
        graph: &mut ScenarioGraph,
        entities: &[Entity],
    ) -> Result<SnapOutcome, GraphError> {
        let mut outcome = SnapOutcome::default();
        for entity in entities {
            match self.snap(graph, entity)? {
                Ok(result) => outcome.snapped.push(result),
                Err(rejection) => outcome.rejected.push(rejection),
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StreetGraphBuilder;
    use hg_core::kw;

    fn one_street() -> ScenarioGraph {
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        builder.build().unwrap().to_scenario()
    }

    fn snapper() -> EntitySnapper {
        EntitySnapper::new(50.0, 0.01, SnapPolicy::ExcludeAndWarn)
    }

    fn building(id: &str, x: f64, y: f64) -> Entity {
        Entity::Building {
            id: id.into(),
            point: Point::new(x, y),
            demand: kw(10.0),
        }
    }

    #[test]
    fn snap_splits_the_edge_at_the_projection() {
        let mut graph = one_street();
        let result = snapper()
            .snap(&mut graph, &building("b1", 30.0, 4.0))
            .unwrap()
            .unwrap();

        assert_eq!(result.point, Point::new(30.0, 0.0));
        assert_eq!(result.distance, 4.0);
        assert_eq!(graph.live_edge_count(), 2);
        assert_eq!(graph.node_edges(result.node).len(), 2);
    }

    #[test]
    fn second_entity_snaps_against_the_split_graph() {
        let mut graph = one_street();
        let s = snapper();
        s.snap(&mut graph, &building("b1", 30.0, 4.0))
            .unwrap()
            .unwrap();
        let second = s
            .snap(&mut graph, &building("b2", 70.0, -2.0))
            .unwrap()
            .unwrap();

        assert_eq!(second.point, Point::new(70.0, 0.0));
        // 3 live edges: 0-30, 30-70, 70-100. Total length is preserved.
        assert_eq!(graph.live_edge_count(), 3);
        assert_eq!(graph.total_length(), 100.0);
    }

    #[test]
    fn snapping_the_same_coordinate_twice_is_idempotent() {
        let mut graph = one_street();
        let s = snapper();
        let first = s
            .snap(&mut graph, &building("b1", 42.0, 3.0))
            .unwrap()
            .unwrap();
        let second = s
            .snap(&mut graph, &building("b1-again", 42.0, 3.0))
            .unwrap()
            .unwrap();

        assert_eq!(first.node, second.node);
        assert_eq!(graph.live_edge_count(), 2);
    }

    #[test]
    fn entity_on_a_street_vertex_reuses_the_node() {
        let mut graph = one_street();
        let node_count = graph.node_count();
        let result = snapper()
            .snap(&mut graph, &building("b1", 0.0, 0.0))
            .unwrap()
            .unwrap();

        assert_eq!(result.distance, 0.0);
        assert_eq!(result.node, NodeId::from_index(0));
        assert_eq!(graph.node_count(), node_count);
        assert_eq!(graph.live_edge_count(), 1);
    }

    #[test]
    fn over_limit_entity_is_rejected_under_exclude_policy() {
        let mut graph = one_street();
        let rejection = snapper()
            .snap(&mut graph, &building("far", 50.0, 80.0))
            .unwrap()
            .unwrap_err();

        assert_eq!(rejection.entity, "far");
        assert_eq!(rejection.distance, 80.0);
        assert_eq!(graph.live_edge_count(), 1);
    }

    #[test]
    fn over_limit_entity_aborts_under_fail_fast() {
        let mut graph = one_street();
        let strict = EntitySnapper::new(50.0, 0.01, SnapPolicy::FailFast);
        let err = strict
            .snap(&mut graph, &building("far", 50.0, 80.0))
            .unwrap_err();

        assert!(matches!(err, GraphError::SnapDistanceExceeded { .. }));
    }

    #[test]
    fn plant_and_building_snap_like_any_entity() {
        let mut graph = one_street();
        let s = snapper();
        let plant = Entity::Plant {
            id: "plant".into(),
            point: Point::new(10.0, 1.0),
        };
        let outcome = s
            .snap_all(&mut graph, &[plant, building("b1", 60.0, 2.0)])
            .unwrap();

        assert_eq!(outcome.snapped.len(), 2);
        assert!(outcome.rejected.is_empty());
        assert_eq!(graph.live_edge_count(), 3);
    }
}
