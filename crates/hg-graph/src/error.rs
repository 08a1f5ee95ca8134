//! Graph-layer error types.

use hg_core::{EdgeId, HgError};
use thiserror::Error;

/// Street graph construction and snapping errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// No street geometry supplied (or all of it degenerate).
    #[error("empty street network: no usable street geometry supplied")]
    EmptyNetwork,

    /// An entity's nearest street edge lies beyond the configured limit.
    /// Raised only under the fail-fast snap policy; otherwise the entity
    /// is reported in diagnostics instead.
    #[error("entity {entity}: nearest street edge is {distance:.3} away (limit {limit:.3})")]
    SnapDistanceExceeded {
        entity: String,
        distance: f64,
        limit: f64,
    },

    /// An edge ID refers to a retired or never-existing edge.
    #[error("edge {edge} does not exist or has been retired by a split")]
    EdgeRetired { edge: EdgeId },
}

impl From<GraphError> for HgError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::EmptyNetwork => HgError::InvalidArg {
                what: "empty street network",
            },
            other => HgError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_entity() {
        let err = GraphError::SnapDistanceExceeded {
            entity: "b7".into(),
            distance: 120.0,
            limit: 50.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("b7"));
        assert!(msg.contains("120.000"));
    }

    #[test]
    fn empty_network_maps_to_invalid_arg() {
        let err: HgError = GraphError::EmptyNetwork.into();
        assert!(matches!(err, HgError::InvalidArg { .. }));
    }
}
