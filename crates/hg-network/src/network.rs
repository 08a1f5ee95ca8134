//! The synthesized dual-pipe network model.

use hg_core::{EdgeId, NodeId, Point, Power, Real, as_kw};
use serde::{Deserialize, Serialize};

/// Which circuit a pipe node or pipe edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Supply,
    Return,
}

/// What a pipe node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeNodeKind {
    /// Plant junction: supply-out on the supply circuit, return-in on the
    /// return circuit.
    Plant,
    /// Ordinary street junction mirrored into a circuit.
    Junction,
    /// A building's street connection junction.
    Building { entity: String },
}

/// A node of the synthesized network.
#[derive(Debug, Clone)]
pub struct PipeNode {
    pub id: NodeId,
    pub point: Point,
    pub role: Role,
    pub kind: PipeNodeKind,
}

/// A physical pipe run in one circuit.
///
/// Mirrored pairs share geometry: the supply and return edge for the same
/// street edge reference the same coordinates. Visual offsetting is a
/// rendering concern.
#[derive(Debug, Clone)]
pub struct PipeEdge {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
    pub length: Real,
    pub role: Role,
    /// Number of building routes sharing this run, for downstream sizing.
    pub branch_count: u32,
    /// The street edge this pipe follows.
    pub street_edge: EdgeId,
}

/// The zero-length logical connector joining a building's supply-in and
/// return-out junctions. The external physics solver applies the building's
/// heat extraction here.
#[derive(Debug, Clone)]
pub struct ConsumerLink {
    pub building: String,
    pub supply_node: NodeId,
    pub return_node: NodeId,
    pub demand: Power,
}

/// The complete synthesized network, ready for handoff.
#[derive(Debug, Clone)]
pub struct PipeNetwork {
    pub(crate) nodes: Vec<PipeNode>,
    pub(crate) pipes: Vec<PipeEdge>,
    pub(crate) links: Vec<ConsumerLink>,
    pub(crate) plant_supply: NodeId,
    pub(crate) plant_return: NodeId,
}

impl PipeNetwork {
    pub fn nodes(&self) -> &[PipeNode] {
        &self.nodes
    }

    pub fn pipes(&self) -> &[PipeEdge] {
        &self.pipes
    }

    pub fn consumer_links(&self) -> &[ConsumerLink] {
        &self.links
    }

    /// The plant's supply-out junction.
    pub fn plant_supply(&self) -> NodeId {
        self.plant_supply
    }

    /// The plant's return-in junction.
    pub fn plant_return(&self) -> NodeId {
        self.plant_return
    }

    /// Total edge count: pipe runs plus consumer links.
    pub fn edge_count(&self) -> usize {
        self.pipes.len() + self.links.len()
    }

    /// Total pipe length of one circuit.
    pub fn circuit_length(&self, role: Role) -> Real {
        self.pipes
            .iter()
            .filter(|p| p.role == role)
            .map(|p| p.length)
            .sum()
    }

    /// Serialize into the flat artifact consumed by the external solver,
    /// the visualization layer, and the cache.
    pub fn to_artifact(&self) -> NetworkArtifact {
        NetworkArtifact {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeRecord {
                    id: n.id.index(),
                    x: n.point.x,
                    y: n.point.y,
                    role: n.role,
                    kind: match &n.kind {
                        PipeNodeKind::Plant => "plant".to_string(),
                        PipeNodeKind::Junction => "junction".to_string(),
                        PipeNodeKind::Building { .. } => "building".to_string(),
                    },
                    entity: match &n.kind {
                        PipeNodeKind::Building { entity } => Some(entity.clone()),
                        _ => None,
                    },
                })
                .collect(),
            pipes: self
                .pipes
                .iter()
                .map(|p| PipeRecord {
                    a: p.a.index(),
                    b: p.b.index(),
                    length_m: p.length,
                    role: p.role,
                    branch_count: p.branch_count,
                })
                .collect(),
            consumer_links: self
                .links
                .iter()
                .map(|l| ConsumerLinkRecord {
                    building: l.building.clone(),
                    supply_node: l.supply_node.index(),
                    return_node: l.return_node.index(),
                    demand_kw: as_kw(l.demand),
                })
                .collect(),
        }
    }
}

/// Flat, serializable view of a `PipeNetwork`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkArtifact {
    pub nodes: Vec<NodeRecord>,
    pub pipes: Vec<PipeRecord>,
    pub consumer_links: Vec<ConsumerLinkRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub role: Role,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeRecord {
    pub a: u32,
    pub b: u32,
    pub length_m: f64,
    pub role: Role,
    pub branch_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerLinkRecord {
    pub building: String,
    pub supply_node: u32,
    pub return_node: u32,
    pub demand_kw: f64,
}
