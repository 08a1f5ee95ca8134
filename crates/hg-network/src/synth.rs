//! Mirroring the shared topology into supply and return circuits.

use std::collections::HashMap;

use hg_core::{EdgeId, NodeId, Power};
use hg_graph::ScenarioGraph;
use hg_route::SharedTopology;

use crate::error::NetworkError;
use crate::network::{ConsumerLink, PipeEdge, PipeNetwork, PipeNode, PipeNodeKind, Role};

/// A connected building: its street node and demand.
#[derive(Debug, Clone)]
pub struct BuildingTap {
    pub entity: String,
    pub node: NodeId,
    pub demand: Power,
}

/// Synthesizes the dual-pipe network from the shared topology.
///
/// Every street node referenced by a route is mirrored into a supply twin
/// and a return twin; every shared edge becomes one supply pipe and one
/// return pipe over the same coordinates. Each building gets exactly one
/// zero-length consumer link joining its two twins.
pub struct DualCircuitSynthesizer;

impl DualCircuitSynthesizer {
    pub fn synthesize(
        graph: &ScenarioGraph,
        shared: &SharedTopology,
        plant: NodeId,
        buildings: &[BuildingTap],
    ) -> Result<PipeNetwork, NetworkError> {
        let mut builder = TwinBuilder::new(graph, buildings, plant);

        // Plant twins first, so the plant junctions exist even for an
        // empty shared topology (every building excluded or co-located).
        let (plant_supply, plant_return) = builder.twins(plant);

        let mut pipes = Vec::with_capacity(shared.len() * 2);
        for shared_edge in shared.edges() {
            let edge = graph
                .edge(shared_edge.edge)
                .ok_or(NetworkError::DanglingEdge {
                    edge: shared_edge.edge,
                })?;
            let (a_supply, a_return) = builder.twins(edge.a);
            let (b_supply, b_return) = builder.twins(edge.b);

            // Supply runs plant -> building, return runs building -> plant;
            // the endpoint order on the return edge reflects that.
            pipes.push(PipeEdge {
                id: EdgeId::from_index(pipes.len() as u32),
                a: a_supply,
                b: b_supply,
                length: edge.length,
                role: Role::Supply,
                branch_count: shared_edge.branch_count,
                street_edge: edge.id,
            });
            pipes.push(PipeEdge {
                id: EdgeId::from_index(pipes.len() as u32),
                a: b_return,
                b: a_return,
                length: edge.length,
                role: Role::Return,
                branch_count: shared_edge.branch_count,
                street_edge: edge.id,
            });
        }

        let links = buildings
            .iter()
            .map(|tap| {
                let (supply_node, return_node) = builder.twins(tap.node);
                ConsumerLink {
                    building: tap.entity.clone(),
                    supply_node,
                    return_node,
                    demand: tap.demand,
                }
            })
            .collect();

        Ok(PipeNetwork {
            nodes: builder.nodes,
            pipes,
            links,
            plant_supply,
            plant_return,
        })
    }
}

/// Lazily mints supply/return twin nodes for street nodes, in first-use
/// order, so node IDs are deterministic.
struct TwinBuilder<'a> {
    graph: &'a ScenarioGraph,
    kinds: HashMap<NodeId, PipeNodeKind>,
    twin_map: HashMap<NodeId, (NodeId, NodeId)>,
    nodes: Vec<PipeNode>,
}

impl<'a> TwinBuilder<'a> {
    fn new(graph: &'a ScenarioGraph, buildings: &[BuildingTap], plant: NodeId) -> Self {
        let mut kinds = HashMap::new();
        for tap in buildings {
            kinds
                .entry(tap.node)
                .or_insert_with(|| PipeNodeKind::Building {
                    entity: tap.entity.clone(),
                });
        }
        // The plant label wins if it shares a node with a building.
        kinds.insert(plant, PipeNodeKind::Plant);
        Self {
            graph,
            kinds,
            twin_map: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    fn twins(&mut self, street_node: NodeId) -> (NodeId, NodeId) {
        if let Some(&pair) = self.twin_map.get(&street_node) {
            return pair;
        }
        let point = self.graph.node_point(street_node).unwrap_or_default();
        let kind = self
            .kinds
            .get(&street_node)
            .cloned()
            .unwrap_or(PipeNodeKind::Junction);

        let supply = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(PipeNode {
            id: supply,
            point,
            role: Role::Supply,
            kind: kind.clone(),
        });
        let ret = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(PipeNode {
            id: ret,
            point,
            role: Role::Return,
            kind,
        });

        self.twin_map.insert(street_node, (supply, ret));
        (supply, ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hg_core::{Point, kw};
    use hg_graph::StreetGraphBuilder;
    use hg_route::{PathSharingOptimizer, ShortestPathRouter};

    fn synthesize_trunk() -> (ScenarioGraph, PipeNetwork) {
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ]);
        let graph = builder.build().unwrap().to_scenario();
        let plant = NodeId::from_index(0);

        let table = ShortestPathRouter::route(&graph, plant).unwrap();
        let buildings = vec![
            BuildingTap {
                entity: "b1".into(),
                node: NodeId::from_index(1),
                demand: kw(10.0),
            },
            BuildingTap {
                entity: "b2".into(),
                node: NodeId::from_index(2),
                demand: kw(20.0),
            },
        ];
        let paths: Vec<_> = buildings
            .iter()
            .map(|b| table.path_to(b.node).unwrap())
            .collect();
        let shared = PathSharingOptimizer::derive(&graph, plant, &paths).unwrap();
        let net = DualCircuitSynthesizer::synthesize(&graph, &shared, plant, &buildings).unwrap();
        (graph, net)
    }

    #[test]
    fn every_shared_edge_is_mirrored() {
        let (_, net) = synthesize_trunk();
        let supply: Vec<_> = net.pipes().iter().filter(|p| p.role == Role::Supply).collect();
        let ret: Vec<_> = net.pipes().iter().filter(|p| p.role == Role::Return).collect();

        assert_eq!(supply.len(), 2);
        assert_eq!(ret.len(), 2);
        // Mirrored pairs follow the same street edge with the same length.
        for s in &supply {
            assert!(
                ret.iter()
                    .any(|r| r.street_edge == s.street_edge && r.length == s.length)
            );
        }
    }

    #[test]
    fn edge_count_matches_the_invariant() {
        let (_, net) = synthesize_trunk();
        // 2 shared edges x 2 circuits + 2 consumer links.
        assert_eq!(net.edge_count(), 6);
        assert_eq!(net.consumer_links().len(), 2);
    }

    #[test]
    fn building_twins_share_a_coordinate() {
        let (_, net) = synthesize_trunk();
        for link in net.consumer_links() {
            let supply = &net.nodes()[link.supply_node.index() as usize];
            let ret = &net.nodes()[link.return_node.index() as usize];
            assert_eq!(supply.point, ret.point);
            assert_eq!(supply.role, Role::Supply);
            assert_eq!(ret.role, Role::Return);
        }
    }

    #[test]
    fn plant_junctions_exist_even_without_shared_edges() {
        let mut builder = StreetGraphBuilder::new(0.01);
        builder.add_segment(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        let graph = builder.build().unwrap().to_scenario();
        let plant = NodeId::from_index(0);

        let net =
            DualCircuitSynthesizer::synthesize(&graph, &SharedTopology::default(), plant, &[])
                .unwrap();

        assert_eq!(net.nodes().len(), 2);
        assert_eq!(net.pipes().len(), 0);
        assert_eq!(
            net.nodes()[net.plant_supply().index() as usize].kind,
            PipeNodeKind::Plant
        );
    }
}
