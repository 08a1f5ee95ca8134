//! Scenario schema definitions.
//!
//! Coordinates are planar (projected); callers reproject geographic
//! lat/lon before writing a scenario file.

use hg_core::{Point, Power, kw};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub streets: Vec<StreetDef>,
    pub plant: PlantDef,
    #[serde(default)]
    pub buildings: Vec<BuildingDef>,
    #[serde(default)]
    pub config: PlanConfigDef,
}

/// One street polyline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreetDef {
    pub id: String,
    /// Ordered [x, y] coordinate pairs; at least two.
    pub points: Vec<[f64; 2]>,
}

impl StreetDef {
    /// Points as engine geometry.
    pub fn to_points(&self) -> Vec<Point> {
        self.points.iter().map(|&[x, y]| Point::new(x, y)).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantDef {
    pub id: String,
    pub point: [f64; 2],
}

impl PlantDef {
    pub fn to_point(&self) -> Point {
        Point::new(self.point[0], self.point[1])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingDef {
    pub id: String,
    pub point: [f64; 2],
    /// Heat demand, strictly positive.
    pub demand_kw: f64,
}

impl BuildingDef {
    pub fn to_point(&self) -> Point {
        Point::new(self.point[0], self.point[1])
    }

    pub fn demand(&self) -> Power {
        kw(self.demand_kw)
    }
}

/// Pass-through engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanConfigDef {
    /// Entities farther than this from any street are unconnectable.
    /// Same length unit as the coordinate system.
    #[serde(default = "default_max_snap_distance")]
    pub max_snap_distance: f64,
    #[serde(default)]
    pub snap_policy: SnapPolicyDef,
    /// Node-merge tolerance for street graph construction.
    #[serde(default = "default_merge_epsilon")]
    pub merge_epsilon: f64,
}

fn default_max_snap_distance() -> f64 {
    100.0
}

fn default_merge_epsilon() -> f64 {
    0.01
}

impl Default for PlanConfigDef {
    fn default() -> Self {
        Self {
            max_snap_distance: default_max_snap_distance(),
            snap_policy: SnapPolicyDef::default(),
            merge_epsilon: default_merge_epsilon(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SnapPolicyDef {
    /// Report unconnectable buildings and plan the rest (default).
    #[default]
    ExcludeAndWarn,
    /// Abort on the first unconnectable entity.
    FailFast,
}
