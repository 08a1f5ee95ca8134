//! hg-core: stable foundation for heatgrid.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - geometry (planar points, segment projection, polyline length)
//! - ids (stable compact IDs for graph/network objects)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HgError, HgResult};
pub use geometry::*;
pub use ids::*;
pub use numeric::*;
pub use units::*;
