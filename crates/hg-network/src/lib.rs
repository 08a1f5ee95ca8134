//! hg-network: dual-circuit synthesis layer for heatgrid.
//!
//! Provides:
//! - PipeNetwork: the final supply/return node and edge collection, plus
//!   one zero-length consumer link per connected building
//! - DualCircuitSynthesizer: mirrors the shared topology into the two
//!   circuits and wires up plant and building junctions
//! - RouteValidator: topological invariant checks before handoff
//! - DiagnosticsReport: excluded/unreachable buildings + validation outcome
//!
//! The network produced here is handed off opaquely to the external
//! hydraulic/thermal solver and to visualization; this crate never sizes
//! pipes or simulates flow.

pub mod diagnostics;
pub mod error;
pub mod network;
pub mod synth;
pub mod validate;

// Re-exports for ergonomics
pub use diagnostics::{DiagnosticsReport, ExcludedBuilding, ValidationOutcome};
pub use error::NetworkError;
pub use network::{
    ConsumerLink, NetworkArtifact, PipeEdge, PipeNetwork, PipeNode, PipeNodeKind, Role,
};
pub use synth::{BuildingTap, DualCircuitSynthesizer};
pub use validate::{InvariantViolation, RouteValidator};
