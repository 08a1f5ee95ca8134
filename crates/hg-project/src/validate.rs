//! Scenario validation logic.

use std::collections::HashSet;

use crate::schema::Scenario;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let mut street_ids = HashSet::new();
    for street in &scenario.streets {
        if !street_ids.insert(&street.id) {
            return Err(ValidationError::DuplicateId {
                id: street.id.clone(),
                context: "streets".to_string(),
            });
        }
        if street.points.len() < 2 {
            return Err(ValidationError::InvalidValue {
                field: format!("streets[{}].points", street.id),
                value: format!("{} points", street.points.len()),
                reason: "a polyline needs at least two points".to_string(),
            });
        }
        for point in &street.points {
            ensure_finite_point(&street.id, point)?;
        }
    }

    let mut building_ids = HashSet::new();
    for building in &scenario.buildings {
        if !building_ids.insert(&building.id) {
            return Err(ValidationError::DuplicateId {
                id: building.id.clone(),
                context: "buildings".to_string(),
            });
        }
        if building.id == scenario.plant.id {
            return Err(ValidationError::DuplicateId {
                id: building.id.clone(),
                context: "buildings vs plant".to_string(),
            });
        }
        if !(building.demand_kw.is_finite() && building.demand_kw > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("buildings[{}].demand_kw", building.id),
                value: building.demand_kw.to_string(),
                reason: "demand must be finite and positive".to_string(),
            });
        }
    }

    for (field, value) in [
        ("config.max_snap_distance", scenario.config.max_snap_distance),
        ("config.merge_epsilon", scenario.config.merge_epsilon),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: "must be finite and positive".to_string(),
            });
        }
    }

    Ok(())
}

fn ensure_finite_point(street_id: &str, point: &[f64; 2]) -> Result<(), ValidationError> {
    if point.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: format!("streets[{street_id}].points"),
            value: format!("[{}, {}]", point[0], point[1]),
            reason: "coordinates must be finite".to_string(),
        })
    }
}
