//! Content-based hashing for plan IDs.
//!
//! The engine does not cache results itself; the surrounding orchestration
//! decides whether to re-plan, invoke the physics solver, or serve a cached
//! artifact. The plan ID gives it a stable key over (building id set,
//! plant, config).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use hg_project::{PlanConfigDef, Scenario};

pub fn compute_plan_id(scenario: &Scenario, engine_version: &str) -> String {
    #[derive(Serialize)]
    struct PlanKey<'a> {
        buildings: Vec<&'a str>,
        plant: &'a str,
        config: &'a PlanConfigDef,
    }

    let mut buildings: Vec<&str> = scenario.buildings.iter().map(|b| b.id.as_str()).collect();
    buildings.sort_unstable();
    let key = PlanKey {
        buildings,
        plant: &scenario.plant.id,
        config: &scenario.config,
    };

    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_string(&key).unwrap_or_default().as_bytes());
    hasher.update(engine_version.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Handoff metadata for the cache/orchestration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanManifest {
    pub plan_id: String,
    pub scenario: String,
    pub timestamp: String,
    pub engine_version: String,
}

pub fn manifest_for(scenario: &Scenario, engine_version: &str) -> PlanManifest {
    PlanManifest {
        plan_id: compute_plan_id(scenario, engine_version),
        scenario: scenario.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        engine_version: engine_version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hg_project::{BuildingDef, PlantDef, StreetDef};

    fn scenario(name: &str, building_ids: &[&str]) -> Scenario {
        Scenario {
            version: 1,
            name: name.into(),
            streets: vec![StreetDef {
                id: "s1".into(),
                points: vec![[0.0, 0.0], [10.0, 0.0]],
            }],
            plant: PlantDef {
                id: "plant".into(),
                point: [0.0, 0.0],
            },
            buildings: building_ids
                .iter()
                .map(|id| BuildingDef {
                    id: (*id).into(),
                    point: [5.0, 1.0],
                    demand_kw: 10.0,
                })
                .collect(),
            config: PlanConfigDef::default(),
        }
    }

    #[test]
    fn hash_stability() {
        let s = scenario("a", &["b1", "b2"]);
        assert_eq!(compute_plan_id(&s, "v1"), compute_plan_id(&s, "v1"));
    }

    #[test]
    fn hash_ignores_building_order() {
        let forward = scenario("a", &["b1", "b2"]);
        let reversed = scenario("a", &["b2", "b1"]);
        assert_eq!(
            compute_plan_id(&forward, "v1"),
            compute_plan_id(&reversed, "v1")
        );
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let base = scenario("a", &["b1"]);
        let more = scenario("a", &["b1", "b2"]);
        assert_ne!(compute_plan_id(&base, "v1"), compute_plan_id(&more, "v1"));
        assert_ne!(compute_plan_id(&base, "v1"), compute_plan_id(&base, "v2"));

        let mut strict = scenario("a", &["b1"]);
        strict.config.snap_policy = hg_project::SnapPolicyDef::FailFast;
        assert_ne!(compute_plan_id(&base, "v1"), compute_plan_id(&strict, "v1"));
    }
}
