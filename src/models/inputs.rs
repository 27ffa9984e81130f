use crate::error::{FarmOpsError, Result};
use serde_json::Value;

/// Raw sensor and observation readings for a single decision request.
///
/// Readings arrive as a nested JSON mapping grouped by category
/// (`weather`, `soil`, `livestock`, ...). The accessors below are the only
/// way models read from it: required fields fail loudly when missing,
/// mistyped, or outside physically valid bounds; optional categorical and
/// boolean fields carry documented defaults.
#[derive(Debug, Clone)]
pub struct RawInputs {
    inputs: Value,
}

impl RawInputs {
    pub fn new(inputs: Value) -> Self {
        Self { inputs }
    }

    /// Extract the `decision_inputs` section from a scenario document.
    pub fn from_scenario(scenario: &Value) -> Result<Self> {
        let inputs = scenario
            .get("decision_inputs")
            .cloned()
            .ok_or_else(|| FarmOpsError::InvalidInput("missing 'decision_inputs'".into()))?;
        Ok(Self::new(inputs))
    }

    fn field(&self, category: &str, field: &str) -> Option<&Value> {
        self.inputs.get(category)?.get(field)
    }

    /// Required finite numeric field.
    pub fn number(&self, category: &str, field: &str) -> Result<f64> {
        let value = self.field(category, field).ok_or_else(|| {
            FarmOpsError::InvalidInput(format!("missing required field '{category}.{field}'"))
        })?;
        let n = value.as_f64().ok_or_else(|| {
            FarmOpsError::InvalidInput(format!("field '{category}.{field}' must be a number"))
        })?;
        if !n.is_finite() {
            return Err(FarmOpsError::InvalidInput(format!(
                "field '{category}.{field}' is not a finite number"
            )));
        }
        Ok(n)
    }

    /// Required percentage field, bounds-checked to 0..=100.
    pub fn percent(&self, category: &str, field: &str) -> Result<f64> {
        let n = self.number(category, field)?;
        if !(0.0..=100.0).contains(&n) {
            return Err(FarmOpsError::InvalidInput(format!(
                "field '{category}.{field}' out of range: {n} (expected 0..=100)"
            )));
        }
        Ok(n)
    }

    /// Required numeric field that cannot be negative (amounts, rainfall).
    pub fn non_negative(&self, category: &str, field: &str) -> Result<f64> {
        let n = self.number(category, field)?;
        if n < 0.0 {
            return Err(FarmOpsError::InvalidInput(format!(
                "field '{category}.{field}' cannot be negative: {n}"
            )));
        }
        Ok(n)
    }

    /// Required non-negative integer field (animal counts, sick counts).
    pub fn count(&self, category: &str, field: &str) -> Result<u32> {
        let value = self.field(category, field).ok_or_else(|| {
            FarmOpsError::InvalidInput(format!("missing required field '{category}.{field}'"))
        })?;
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                FarmOpsError::InvalidInput(format!(
                    "field '{category}.{field}' must be a non-negative integer"
                ))
            })
    }

    /// Optional numeric field with a default. Used for forecast-style
    /// readings that may legitimately be absent (no forecast available).
    pub fn number_or(&self, category: &str, field: &str, default: f64) -> Result<f64> {
        match self.field(category, field) {
            None | Some(Value::Null) => Ok(default),
            Some(_) => self.number(category, field),
        }
    }

    /// Optional categorical field with a default.
    pub fn text_or(&self, category: &str, field: &str, default: &str) -> String {
        self.field(category, field)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Optional boolean field with a default.
    pub fn flag_or(&self, category: &str, field: &str, default: bool) -> bool {
        self.field(category, field)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> RawInputs {
        RawInputs::new(json!({
            "weather": { "t_max_c": 35.0, "humidity_pct": 25, "rain_mm_24h": 0 },
            "soil": { "soil_moisture_pct": 16 },
            "crop": { "stage_code": "tillering" },
            "constraints": { "water_available": false }
        }))
    }

    #[test]
    fn required_number_present() {
        let raw = sample();
        assert_eq!(raw.number("weather", "t_max_c").unwrap(), 35.0);
        // Integers in the JSON are still numbers
        assert_eq!(raw.percent("soil", "soil_moisture_pct").unwrap(), 16.0);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let raw = sample();
        let err = raw.number("weather", "wind_mps").unwrap_err();
        assert!(matches!(err, FarmOpsError::InvalidInput(_)));
        assert!(err.to_string().contains("weather.wind_mps"));
    }

    #[test]
    fn mistyped_field_is_an_error() {
        let raw = RawInputs::new(json!({ "soil": { "soil_moisture_pct": "wet" } }));
        assert!(matches!(
            raw.percent("soil", "soil_moisture_pct"),
            Err(FarmOpsError::InvalidInput(_))
        ));
    }

    #[test]
    fn out_of_range_percent_is_an_error() {
        let raw = RawInputs::new(json!({ "weather": { "humidity_pct": -5 } }));
        assert!(matches!(
            raw.percent("weather", "humidity_pct"),
            Err(FarmOpsError::InvalidInput(_))
        ));

        let raw = RawInputs::new(json!({ "weather": { "humidity_pct": 130 } }));
        assert!(raw.percent("weather", "humidity_pct").is_err());
    }

    #[test]
    fn negative_amount_is_an_error() {
        let raw = RawInputs::new(json!({ "resources": { "feed_kg": -10.0 } }));
        assert!(raw.non_negative("resources", "feed_kg").is_err());
    }

    #[test]
    fn optional_fields_use_defaults() {
        let raw = sample();
        assert_eq!(raw.number_or("weather", "forecast_rain_mm_48h", 0.0).unwrap(), 0.0);
        assert_eq!(raw.text_or("crop", "stage_code", "unknown"), "tillering");
        assert_eq!(raw.text_or("trees", "fruit_load", "normal"), "normal");
        assert!(!raw.flag_or("constraints", "water_available", true));
        assert!(raw.flag_or("constraints", "irrigation_possible_today", true));
    }

    #[test]
    fn scenario_wrapper_requires_decision_inputs() {
        let ok = RawInputs::from_scenario(&json!({
            "scenario_id": 1,
            "decision_inputs": { "weather": { "t_max_c": 20 } }
        }));
        assert!(ok.is_ok());

        let missing = RawInputs::from_scenario(&json!({ "scenario_id": 1 }));
        assert!(matches!(missing, Err(FarmOpsError::InvalidInput(_))));
    }
}
