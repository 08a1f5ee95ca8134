//! Pre-handoff topological invariant checks.

use std::collections::{HashMap, HashSet, VecDeque};

use hg_core::{EdgeId, NodeId};
use thiserror::Error;

use crate::error::NetworkError;
use crate::network::{PipeNetwork, Role};

/// One failed invariant. The validator reports every failure it finds and
/// never attempts repair.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("{role:?} circuit is not a single tree: {nodes} nodes, {edges} edges")]
    CircuitNotTree {
        role: Role,
        nodes: usize,
        edges: usize,
    },

    #[error("{role:?} circuit has {unreached} junctions unreachable from the plant")]
    CircuitDisconnected { role: Role, unreached: usize },

    #[error("building {building} has {count} consumer links (expected exactly 1)")]
    ConsumerLinkCount { building: String, count: usize },

    #[error("pipe edge {edge} has zero length outside a consumer link")]
    ZeroLengthPipe { edge: EdgeId },

    #[error("edge count {actual} != 2 x {shared} shared edges + {buildings} buildings")]
    EdgeCountMismatch {
        actual: usize,
        shared: usize,
        buildings: usize,
    },
}

/// Validates a synthesized network against the handoff invariants:
/// (a) each circuit is one connected tree rooted at the plant,
/// (b) every connected building has exactly one consumer link,
/// (c) no zero-length pipe edges outside consumer links,
/// (d) edge count == 2 x |shared| + |connected buildings|.
pub struct RouteValidator;

impl RouteValidator {
    pub fn validate(
        network: &PipeNetwork,
        shared_edges: usize,
        connected_buildings: &[String],
    ) -> Result<(), NetworkError> {
        let mut failures = Vec::new();

        Self::check_circuit(network, Role::Supply, network.plant_supply(), &mut failures);
        Self::check_circuit(network, Role::Return, network.plant_return(), &mut failures);
        Self::check_consumer_links(network, connected_buildings, &mut failures);

        for pipe in network.pipes() {
            if pipe.length <= 0.0 {
                failures.push(InvariantViolation::ZeroLengthPipe { edge: pipe.id });
            }
        }

        let expected = 2 * shared_edges + connected_buildings.len();
        if network.edge_count() != expected {
            failures.push(InvariantViolation::EdgeCountMismatch {
                actual: network.edge_count(),
                shared: shared_edges,
                buildings: connected_buildings.len(),
            });
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NetworkError::TopologyValidation(failures))
        }
    }

    /// One circuit must be a single connected tree rooted at the plant twin.
    fn check_circuit(
        network: &PipeNetwork,
        role: Role,
        root: NodeId,
        failures: &mut Vec<InvariantViolation>,
    ) {
        let nodes: Vec<NodeId> = network
            .nodes()
            .iter()
            .filter(|n| n.role == role)
            .map(|n| n.id)
            .collect();
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut edges = 0_usize;
        for pipe in network.pipes().iter().filter(|p| p.role == role) {
            adjacency.entry(pipe.a).or_default().push(pipe.b);
            adjacency.entry(pipe.b).or_default().push(pipe.a);
            edges += 1;
        }

        if edges != nodes.len().saturating_sub(1) {
            failures.push(InvariantViolation::CircuitNotTree {
                role,
                nodes: nodes.len(),
                edges,
            });
        }

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(root);
        queue.push_back(root);
        while let Some(u) = queue.pop_front() {
            if let Some(neighbors) = adjacency.get(&u) {
                for &v in neighbors {
                    if seen.insert(v) {
                        queue.push_back(v);
                    }
                }
            }
        }
        let unreached = nodes.iter().filter(|n| !seen.contains(n)).count();
        if unreached > 0 {
            failures.push(InvariantViolation::CircuitDisconnected { role, unreached });
        }
    }

    /// Exactly one consumer link per connected building.
    fn check_consumer_links(
        network: &PipeNetwork,
        connected_buildings: &[String],
        failures: &mut Vec<InvariantViolation>,
    ) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for link in network.consumer_links() {
            *counts.entry(link.building.as_str()).or_insert(0) += 1;
        }
        for building in connected_buildings {
            let count = counts.get(building.as_str()).copied().unwrap_or(0);
            if count != 1 {
                failures.push(InvariantViolation::ConsumerLinkCount {
                    building: building.clone(),
                    count,
                });
            }
        }
    }
}
