//! Diagnostics accumulated across the planning pipeline.

use hg_core::Real;

use crate::validate::InvariantViolation;

/// A building left unconnected because its snap distance exceeded the limit.
#[derive(Debug, Clone)]
pub struct ExcludedBuilding {
    pub entity: String,
    pub distance: Real,
    pub limit: Real,
}

/// Result of the pre-handoff invariant checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ValidationOutcome {
    #[default]
    Passed,
    Failed(Vec<InvariantViolation>),
}

/// Everything the orchestration layer needs to judge a partial result:
/// which buildings were dropped and why, and whether the surviving network
/// passed validation.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsReport {
    /// Buildings beyond `max_snap_distance` (exclude-and-warn policy).
    pub excluded: Vec<ExcludedBuilding>,
    /// Buildings snapped but unreachable from the plant.
    pub unreachable: Vec<String>,
    pub validation: ValidationOutcome,
}

impl DiagnosticsReport {
    /// True when every building made it into the network and validation
    /// passed.
    pub fn is_clean(&self) -> bool {
        self.excluded.is_empty()
            && self.unreachable.is_empty()
            && self.validation == ValidationOutcome::Passed
    }
}
