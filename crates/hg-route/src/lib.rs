//! hg-route: routing layer for heatgrid.
//!
//! Provides:
//! - ShortestPathRouter: one Dijkstra pass from the plant node, with
//!   deterministic tie-breaking and iterative path backtracking
//! - PathSharingOptimizer: shared-edge topology with per-edge branch counts
//!   and a defensive is-a-tree consistency check

pub mod dijkstra;
pub mod error;
pub mod sharing;

// Re-exports for ergonomics
pub use dijkstra::{RouteTable, ShortestPathRouter};
pub use error::RouteError;
pub use sharing::{PathSharingOptimizer, SharedEdge, SharedTopology};
