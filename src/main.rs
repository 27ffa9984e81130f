mod cli;
mod error;
mod logic;
mod models;
mod scenarios;

use clap::Parser;
use cli::{Cli, Commands};
use error::{FarmOpsError, Result};
use logic::{Localizer, Registry};
use models::RawInputs;
use scenarios::ScenarioStore;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let registry = Registry::with_builtin_models()?;

    match cli.command {
        Commands::FarmTypes => {
            let localizer = Localizer::new();
            let listing = serde_json::json!({
                "farm_types": registry.farm_types(),
                "languages": localizer.languages(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Commands::Scenarios {
            farm_type,
            scenarios_dir,
        } => {
            // Reject unknown farm types before touching the filesystem
            registry.get(&farm_type)?;
            let store = ScenarioStore::open(scenarios_dir);
            let listing = serde_json::json!({
                "farm_type": farm_type,
                "scenarios": store.list(&farm_type)?,
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Commands::Recommend {
            farm_type,
            scenario,
            input,
            language,
            scenarios_dir,
        } => {
            let model = registry.get(&farm_type)?;
            let raw = match (scenario, input) {
                (Some(id), None) => ScenarioStore::open(scenarios_dir).load(&farm_type, id)?,
                (None, Some(path)) => read_inputs_file(&path)?,
                // clap enforces exactly one of the two
                _ => {
                    return Err(FarmOpsError::InvalidInput(
                        "provide either --scenario or --input".into(),
                    ))
                }
            };

            let output = model.run(&raw)?;
            let localizer = Localizer::new();
            let rendered = localizer.render_output(&output, &farm_type, &language);
            let report = serde_json::json!({
                "farm_type": farm_type,
                "language": language,
                "derived": rendered.derived,
                "recommendations": rendered.recommendations,
                "not_recommended": rendered.not_recommended,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Read decision inputs from a JSON file. Accepts either a bare inputs
/// object or a full scenario document with a `decision_inputs` block.
fn read_inputs_file(path: &Path) -> Result<RawInputs> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    if value.get("decision_inputs").is_some() {
        RawInputs::from_scenario(&value)
    } else {
        Ok(RawInputs::new(value))
    }
}
