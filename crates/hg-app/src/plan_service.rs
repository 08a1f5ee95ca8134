//! Pipeline orchestration: scenario in, validated pipe network out.

use std::collections::HashMap;
use std::time::Instant;

use hg_core::Power;
use hg_graph::{Entity, EntitySnapper, SnapPolicy, StreetGraphBuilder};
use hg_network::{
    BuildingTap, DiagnosticsReport, DualCircuitSynthesizer, ExcludedBuilding, PipeNetwork, Role,
    RouteValidator, ValidationOutcome,
};
use hg_project::{Scenario, SnapPolicyDef, validate_scenario};
use hg_route::{PathSharingOptimizer, ShortestPathRouter};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::hash::{PlanManifest, manifest_for};

/// Options for a planning run.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub engine_version: String,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Wall-clock breakdown of one planning run.
#[derive(Debug, Clone, Default)]
pub struct PlanTiming {
    pub build_s: f64,
    pub snap_s: f64,
    pub route_s: f64,
    pub synth_s: f64,
    pub total_s: f64,
}

/// Response from a planning run: the network plus everything the
/// orchestration layer needs to judge it.
#[derive(Debug)]
pub struct PlanResponse {
    pub network: PipeNetwork,
    pub diagnostics: DiagnosticsReport,
    pub manifest: PlanManifest,
    pub timing: PlanTiming,
}

/// Run the full pipeline for one scenario.
///
/// Per-entity failures (snap distance, unreachability) accumulate into the
/// diagnostics and the network covers the remaining buildings; only an
/// empty street network, an unconnectable plant, a fail-fast snap
/// rejection, or a validation failure abort the run.
pub fn plan_scenario(scenario: &Scenario, options: &PlanOptions) -> AppResult<PlanResponse> {
    let started = Instant::now();
    validate_scenario(scenario)?;
    let config = &scenario.config;

    // Stage 1: street skeleton.
    let stage = Instant::now();
    let mut builder = StreetGraphBuilder::new(config.merge_epsilon);
    for street in &scenario.streets {
        builder.add_segment(&street.to_points());
    }
    let skeleton = builder.build()?;
    let build_s = stage.elapsed().as_secs_f64();
    info!(
        nodes = skeleton.nodes().len(),
        edges = skeleton.edges().len(),
        "street graph built"
    );

    // Stage 2: snapping, on a scenario-private clone of the skeleton.
    let stage = Instant::now();
    let mut graph = skeleton.to_scenario();
    let policy = match config.snap_policy {
        SnapPolicyDef::ExcludeAndWarn => SnapPolicy::ExcludeAndWarn,
        SnapPolicyDef::FailFast => SnapPolicy::FailFast,
    };
    let snapper = EntitySnapper::new(config.max_snap_distance, config.merge_epsilon, policy);

    // A plan without its plant is meaningless: plant snap failure is fatal
    // regardless of the configured policy.
    let plant_entity = Entity::Plant {
        id: scenario.plant.id.clone(),
        point: scenario.plant.to_point(),
    };
    let plant_snap = match snapper.snap(&mut graph, &plant_entity)? {
        Ok(snap) => snap,
        Err(rejection) => {
            return Err(AppError::PlantUnconnectable {
                distance: rejection.distance,
                limit: rejection.limit,
            });
        }
    };

    let entities: Vec<Entity> = scenario
        .buildings
        .iter()
        .map(|b| Entity::Building {
            id: b.id.clone(),
            point: b.to_point(),
            demand: b.demand(),
        })
        .collect();
    let outcome = snapper.snap_all(&mut graph, &entities)?;
    let snap_s = stage.elapsed().as_secs_f64();
    for rejection in &outcome.rejected {
        warn!(
            entity = %rejection.entity,
            distance = rejection.distance,
            limit = rejection.limit,
            "building excluded: snap distance exceeded"
        );
    }

    // Stage 3: one shortest-path pass, then per-building backtracking.
    let stage = Instant::now();
    let table = ShortestPathRouter::route(&graph, plant_snap.node)?;
    let demands: HashMap<&str, Power> = scenario
        .buildings
        .iter()
        .map(|b| (b.id.as_str(), b.demand()))
        .collect();

    let mut taps = Vec::new();
    let mut paths = Vec::new();
    let mut unreachable = Vec::new();
    for snap in &outcome.snapped {
        let Some(&demand) = demands.get(snap.entity.as_str()) else {
            continue;
        };
        match table.path_to(snap.node) {
            Some(path) => {
                taps.push(BuildingTap {
                    entity: snap.entity.clone(),
                    node: snap.node,
                    demand,
                });
                paths.push(path);
            }
            None => {
                warn!(entity = %snap.entity, "building unreachable from the plant");
                unreachable.push(snap.entity.clone());
            }
        }
    }
    let shared = PathSharingOptimizer::derive(&graph, plant_snap.node, &paths)?;
    let route_s = stage.elapsed().as_secs_f64();

    // Stage 4: mirror into the two circuits and validate before handoff.
    let stage = Instant::now();
    let network = DualCircuitSynthesizer::synthesize(&graph, &shared, plant_snap.node, &taps)?;
    let connected: Vec<String> = taps.iter().map(|t| t.entity.clone()).collect();
    RouteValidator::validate(&network, shared.len(), &connected)?;
    let synth_s = stage.elapsed().as_secs_f64();

    let diagnostics = DiagnosticsReport {
        excluded: outcome
            .rejected
            .iter()
            .map(|r| ExcludedBuilding {
                entity: r.entity.clone(),
                distance: r.distance,
                limit: r.limit,
            })
            .collect(),
        unreachable,
        validation: ValidationOutcome::Passed,
    };

    let timing = PlanTiming {
        build_s,
        snap_s,
        route_s,
        synth_s,
        total_s: started.elapsed().as_secs_f64(),
    };
    info!(
        buildings = connected.len(),
        excluded = diagnostics.excluded.len(),
        unreachable = diagnostics.unreachable.len(),
        supply_length = network.circuit_length(Role::Supply),
        total_s = timing.total_s,
        "plan complete"
    );

    Ok(PlanResponse {
        network,
        diagnostics,
        manifest: manifest_for(scenario, &options.engine_version),
        timing,
    })
}

/// Plan independent scenarios in parallel.
///
/// Safe because each run builds (or clones) its own graph and shares no
/// mutable state with the others.
pub fn plan_scenarios(scenarios: &[Scenario], options: &PlanOptions) -> Vec<AppResult<PlanResponse>> {
    scenarios
        .par_iter()
        .map(|scenario| plan_scenario(scenario, options))
        .collect()
}
