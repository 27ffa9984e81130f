//! File-backed scenario store.
//!
//! Scenarios are JSON documents laid out as
//! `<root>/<farm_type>/scenario_<id>.json`, each holding a `scenario_id`,
//! a human-readable `summary` and the `decision_inputs` block fed to the
//! matching model.

use crate::error::{FarmOpsError, Result};
use crate::models::RawInputs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Listing entry for one stored scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: u32,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
struct ScenarioDoc {
    scenario_id: u32,
    #[serde(default)]
    summary: String,
    decision_inputs: serde_json::Value,
}

pub struct ScenarioStore {
    root: PathBuf,
}

impl ScenarioStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn farm_dir(&self, farm_type: &str) -> PathBuf {
        self.root.join(farm_type)
    }

    fn scenario_path(&self, farm_type: &str, id: u32) -> PathBuf {
        self.farm_dir(farm_type).join(format!("scenario_{id}.json"))
    }

    /// All scenarios stored for a farm type, sorted by id. A farm type
    /// with no scenario directory yields an empty list.
    pub fn list(&self, farm_type: &str) -> Result<Vec<ScenarioSummary>> {
        let dir = self.farm_dir(farm_type);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut scenarios = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let Some(id) = scenario_id_from_path(&path) else {
                continue;
            };
            let doc = read_scenario(&path)?;
            if doc.scenario_id != id {
                tracing::warn!(
                    path = %path.display(),
                    file_id = id,
                    document_id = doc.scenario_id,
                    "scenario id mismatch between filename and document"
                );
            }
            scenarios.push(ScenarioSummary {
                id,
                summary: doc.summary,
            });
        }
        scenarios.sort_by_key(|s| s.id);
        Ok(scenarios)
    }

    /// Load one scenario's decision inputs.
    pub fn load(&self, farm_type: &str, id: u32) -> Result<RawInputs> {
        let path = self.scenario_path(farm_type, id);
        if !path.is_file() {
            return Err(FarmOpsError::NotFound(format!(
                "scenario {id} for farm type '{farm_type}'"
            )));
        }
        let doc = read_scenario(&path)?;
        Ok(RawInputs::new(doc.decision_inputs))
    }
}

fn read_scenario(path: &Path) -> Result<ScenarioDoc> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn scenario_id_from_path(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    let id = name.strip_prefix("scenario_")?.strip_suffix(".json")?;
    id.parse().ok()
}
