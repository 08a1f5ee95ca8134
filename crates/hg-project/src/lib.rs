//! hg-project: canonical scenario file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

/// Only one schema version exists so far.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_yaml(path: &std::path::Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_json(path: &std::path::Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_scenario() -> Scenario {
        Scenario {
            version: 1,
            name: "demo".into(),
            streets: vec![StreetDef {
                id: "s1".into(),
                points: vec![[0.0, 0.0], [40.0, 0.0]],
            }],
            plant: PlantDef {
                id: "plant".into(),
                point: [0.0, 0.0],
            },
            buildings: vec![BuildingDef {
                id: "b1".into(),
                point: [10.0, 2.0],
                demand_kw: 12.0,
            }],
            config: PlanConfigDef::default(),
        }
    }

    #[test]
    fn yaml_round_trip() {
        let scenario = demo_scenario();
        let yaml = serde_yaml::to_string(&scenario).unwrap();
        let back: Scenario = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(scenario, back);
    }

    #[test]
    fn config_defaults_apply_when_omitted() {
        let yaml = r#"
version: 1
name: minimal
streets:
  - id: s1
    points: [[0.0, 0.0], [40.0, 0.0]]
plant:
  id: plant
  point: [0.0, 0.0]
buildings:
  - id: b1
    point: [10.0, 2.0]
    demand_kw: 12.0
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.config, PlanConfigDef::default());
        assert_eq!(scenario.config.snap_policy, SnapPolicyDef::ExcludeAndWarn);
        validate_scenario(&scenario).unwrap();
    }
}
