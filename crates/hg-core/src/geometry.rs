//! Planar geometry primitives.
//!
//! All coordinates live in a projected (planar) coordinate system supplied by
//! the caller; every distance here is Euclidean. Geographic lat/lon must be
//! reprojected before it reaches this crate.

use crate::numeric::Real;

/// A point in the planar coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> Real {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Result of projecting a point onto a line segment.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Normalized position of the foot point along the segment, clamped to [0, 1].
    pub t: Real,
    /// The foot point itself.
    pub point: Point,
    /// Perpendicular distance from the query point to the foot point.
    pub distance: Real,
}

/// Project `p` onto the segment `a`-`b`, clamping to the segment ends.
///
/// Degenerate segments (`a == b`) project everything onto `a`.
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> Projection {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };

    let foot = Point::new(a.x + t * dx, a.y + t * dy);
    Projection {
        t,
        point: foot,
        distance: p.distance(foot),
    }
}

/// Total length of a polyline (sum of consecutive point distances).
pub fn polyline_length(points: &[Point]) -> Real {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
