//! Shared application service layer for heatgrid.
//!
//! This crate provides a unified interface for frontends, centralizing
//! scenario loading, pipeline orchestration (build, snap, route, share,
//! synthesize, validate), diagnostics accumulation, and plan-id hashing
//! for the external cache layer.

pub mod error;
pub mod hash;
pub mod plan_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use hash::{PlanManifest, compute_plan_id, manifest_for};
pub use plan_service::{PlanOptions, PlanResponse, PlanTiming, plan_scenario, plan_scenarios};
