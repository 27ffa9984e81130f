use super::engine::DynFarmModel;
use super::farms::{
    GreenhouseModel, LivestockModel, MixedModel, OrchardModel, WheatModel,
};
use crate::error::{FarmOpsError, Result};
use std::collections::BTreeMap;

/// Lookup table from farm-type identifier to its model.
///
/// Populated once at startup through explicit registration calls, then
/// treated as read-only for the process lifetime. Duplicate registration
/// is a startup-time conflict, never a silent overwrite.
#[derive(Default)]
pub struct Registry {
    models: BTreeMap<&'static str, Box<dyn DynFarmModel>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the five built-in farm models registered.
    pub fn with_builtin_models() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(WheatModel))?;
        registry.register(Box::new(LivestockModel))?;
        registry.register(Box::new(OrchardModel))?;
        registry.register(Box::new(GreenhouseModel))?;
        registry.register(Box::new(MixedModel))?;
        Ok(registry)
    }

    pub fn register(&mut self, model: Box<dyn DynFarmModel>) -> Result<()> {
        let farm_type = model.farm_type();
        if self.models.contains_key(farm_type) {
            return Err(FarmOpsError::RegistryConflict(format!(
                "farm type '{farm_type}' is already registered"
            )));
        }
        tracing::debug!(farm_type, "registered farm model");
        self.models.insert(farm_type, model);
        Ok(())
    }

    pub fn get(&self, farm_type: &str) -> Result<&dyn DynFarmModel> {
        self.models
            .get(farm_type)
            .map(AsRef::as_ref)
            .ok_or_else(|| FarmOpsError::UnknownFarmType(farm_type.to_string()))
    }

    /// Registered farm-type identifiers, sorted.
    pub fn farm_types(&self) -> Vec<&'static str> {
        self.models.keys().copied().collect()
    }
}
