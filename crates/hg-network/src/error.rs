//! Network-layer error types.

use hg_core::{EdgeId, HgError};
use thiserror::Error;

use crate::validate::InvariantViolation;

fn join_violations(failures: &[InvariantViolation]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from dual-circuit synthesis and validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Synthesis was handed a shared edge that no longer exists in the
    /// scenario graph.
    #[error("synthesis references retired street edge {edge}")]
    DanglingEdge { edge: EdgeId },

    /// One or more topological invariants failed before handoff. Fatal:
    /// indicates an implementation bug upstream, never repaired here.
    #[error("topology validation failed: {}", join_violations(.0))]
    TopologyValidation(Vec<InvariantViolation>),
}

impl From<NetworkError> for HgError {
    fn from(err: NetworkError) -> Self {
        HgError::Invariant {
            what: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Role;

    #[test]
    fn validation_error_lists_every_failure() {
        let err = NetworkError::TopologyValidation(vec![
            InvariantViolation::ZeroLengthPipe {
                edge: EdgeId::from_index(4),
            },
            InvariantViolation::CircuitDisconnected {
                role: Role::Supply,
                unreached: 2,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("zero length"));
        assert!(msg.contains("unreachable"));
    }
}
