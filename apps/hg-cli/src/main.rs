use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use hg_app::{AppResult, PlanOptions, compute_plan_id, plan_scenario};
use hg_network::{Role, ValidationOutcome};

#[derive(Parser)]
#[command(name = "hg-cli")]
#[command(about = "Heatgrid CLI - street-constrained district-heating network planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Plan the dual-pipe network for a scenario
    Plan {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Write the resulting network as JSON (for the solver/visualization)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Suppress the per-building diagnostics listing
        #[arg(long)]
        no_diagnostics: bool,
    },
    /// Print the cache key for a scenario
    PlanId {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Plan {
            scenario_path,
            output,
            no_diagnostics,
        } => cmd_plan(&scenario_path, output.as_deref(), no_diagnostics),
        Commands::PlanId { scenario_path } => cmd_plan_id(&scenario_path),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = hg_project::load_yaml(scenario_path)?;
    println!(
        "✓ Scenario is valid ({} streets, {} buildings)",
        scenario.streets.len(),
        scenario.buildings.len()
    );
    Ok(())
}

fn cmd_plan(scenario_path: &Path, output: Option<&Path>, no_diagnostics: bool) -> AppResult<()> {
    let scenario = hg_project::load_yaml(scenario_path)?;
    println!("Planning scenario: {}", scenario.name);

    let response = plan_scenario(&scenario, &PlanOptions::default())?;
    let net = &response.network;

    println!("✓ Plan {} complete", response.manifest.plan_id);
    println!(
        "  {} nodes, {} pipe runs, {} consumer links",
        net.nodes().len(),
        net.pipes().len(),
        net.consumer_links().len()
    );
    println!(
        "  supply circuit length: {:.1}, planned in {:.3}s",
        net.circuit_length(Role::Supply),
        response.timing.total_s
    );

    if !no_diagnostics {
        for excluded in &response.diagnostics.excluded {
            println!(
                "  ! excluded {}: {:.1} from nearest street (limit {:.1})",
                excluded.entity, excluded.distance, excluded.limit
            );
        }
        for entity in &response.diagnostics.unreachable {
            println!("  ! unreachable from plant: {entity}");
        }
        match &response.diagnostics.validation {
            ValidationOutcome::Passed => println!("  validation: passed"),
            ValidationOutcome::Failed(failures) => {
                for failure in failures {
                    println!("  ! invariant failed: {failure}");
                }
            }
        }
    }

    if let Some(path) = output {
        let artifact = net.to_artifact();
        let json = serde_json::to_string_pretty(&artifact)
            .map_err(|e| hg_app::AppError::Validation(e.to_string()))?;
        std::fs::write(path, json)?;
        println!("✓ Network written to {}", path.display());
    }

    Ok(())
}

fn cmd_plan_id(scenario_path: &Path) -> AppResult<()> {
    let scenario = hg_project::load_yaml(scenario_path)?;
    let options = PlanOptions::default();
    println!("{}", compute_plan_id(&scenario, &options.engine_version));
    Ok(())
}
