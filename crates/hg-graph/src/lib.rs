//! hg-graph: street graph layer for heatgrid.
//!
//! Provides:
//! - Street graph data structures (GraphNode, GraphEdge, StreetGraph)
//! - StreetGraphBuilder: polylines -> merged, weighted, undirected graph
//! - ScenarioGraph: per-scenario mutable clone supporting edge splits
//! - EntitySnapper: projects plants/buildings onto the nearest street edge
//!
//! The frozen `StreetGraph` skeleton is immutable and may be shared
//! read-only across scenarios; snapping always happens on a private
//! `ScenarioGraph` clone.
//!
//! # Example
//!
//! ```
//! use hg_core::Point;
//! use hg_graph::StreetGraphBuilder;
//!
//! let mut builder = StreetGraphBuilder::new(0.01);
//! builder.add_segment(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.edges().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod snap;

// Re-exports for ergonomics
pub use builder::StreetGraphBuilder;
pub use error::GraphError;
pub use graph::{GraphEdge, GraphNode, NodeKind, ScenarioGraph, StreetGraph, StreetSegment};
pub use snap::{Entity, EntitySnapper, SnapOutcome, SnapPolicy, SnapRejection, SnapResult};
