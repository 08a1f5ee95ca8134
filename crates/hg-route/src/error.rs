//! Routing error types.

use hg_core::{HgError, NodeId};
use thiserror::Error;

/// Errors from shortest-path routing and path sharing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// The source node does not exist in the scenario graph.
    #[error("route source node {node} does not exist")]
    SourceMissing { node: NodeId },

    /// A building node has no path from the plant (disconnected component).
    /// Recorded per entity; never aborts the other buildings.
    #[error("building {entity} is unreachable from the plant")]
    UnreachableBuilding { entity: String },

    /// The union of shortest paths was not a tree. Paths from one
    /// predecessor tree cannot diverge and reconverge, so this always
    /// indicates an upstream bug rather than bad input.
    #[error("shared path union is not a tree: {what}")]
    UnionNotTree { what: String },
}

impl From<RouteError> for HgError {
    fn from(err: RouteError) -> Self {
        HgError::Invariant {
            what: err.to_string(),
        }
    }
}
