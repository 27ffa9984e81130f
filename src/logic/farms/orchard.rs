//! Orchard model: irrigation, frost protection, pest and disease
//! treatment, fruit thinning, fertilization, harvest timing and storm
//! preparation for fruit trees.

use super::SoilMoisture;
use crate::error::Result;
use crate::logic::engine::{FarmModel, RuleOutcome};
use crate::models::{DerivedBuckets, Priority, RawInputs, Reason};

const HEAT_STRESS_C: f64 = 32.0;
const COLD_STRESS_C: f64 = 5.0;
const HIGH_WIND_KPH: f64 = 40.0;

/// Stages where water deficit directly costs yield.
fn is_critical_stage(stage: &str) -> bool {
    matches!(stage, "flowering" | "fruit_development")
}

/// Stages vulnerable to frost damage.
fn is_frost_sensitive(stage: &str) -> bool {
    matches!(stage, "flowering" | "early_growth")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TempStress {
    Heat,
    Cold,
    Normal,
}

impl TempStress {
    fn from_temperature(temp: f64) -> Self {
        if temp >= HEAT_STRESS_C {
            Self::Heat
        } else if temp <= COLD_STRESS_C {
            Self::Cold
        } else {
            Self::Normal
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Heat => "heat",
            Self::Cold => "cold",
            Self::Normal => "normal",
        }
    }
}

pub struct OrchardContext {
    temperature: f64,
    humidity: f64,
    wind: f64,
    rain24: f64,
    frost_forecast: bool,
    soil_moisture: f64,
    stage: String,
    fruit_load: String,
    codling_moth: bool,
    aphids: bool,
    mites: bool,
    fire_blight: bool,
    scab: bool,
    mildew: bool,
    water_available: bool,
    labor_available: bool,
    moisture: SoilMoisture,
    wet_conditions: bool,
    high_wind: bool,
}

pub struct OrchardModel;

impl OrchardModel {
    fn rule_irrigation(&self, ctx: &OrchardContext, out: &mut RuleOutcome) {
        if !ctx.water_available {
            out.forbid("IRRIGATE_ORCHARD", vec![Reason::new("no_water_available")]);
            return;
        }

        if ctx.moisture == SoilMoisture::Low && is_critical_stage(&ctx.stage) {
            out.recommend(
                "IRRIGATE_ORCHARD",
                vec![
                    Reason::new("soil_moisture_critical").with_pct("sm", ctx.soil_moisture),
                    Reason::new("critical_growth_stage").with("stage", ctx.stage.as_str()),
                ],
            );
        } else if ctx.moisture == SoilMoisture::Low {
            out.recommend(
                "IRRIGATE_ORCHARD",
                vec![Reason::new("soil_moisture_low").with_pct("sm", ctx.soil_moisture)],
            );
        } else if ctx.wet_conditions || ctx.moisture == SoilMoisture::High {
            out.forbid(
                "IRRIGATE_ORCHARD",
                vec![Reason::new("soil_too_wet")
                    .with_pct("sm", ctx.soil_moisture)
                    .with("rain24", ctx.rain24.trunc() as i64)],
            );
        }
    }

    fn rule_frost_protection(&self, ctx: &OrchardContext, out: &mut RuleOutcome) {
        if ctx.frost_forecast && is_frost_sensitive(&ctx.stage) {
            out.recommend(
                "ACTIVATE_FROST_PROTECTION",
                vec![
                    Reason::new("frost_warning").with("temp", ctx.temperature),
                    Reason::new("frost_sensitive_stage").with("stage", ctx.stage.as_str()),
                    Reason::new("frost_protection_methods"),
                ],
            );
        }
    }

    fn rule_pests(&self, ctx: &OrchardContext, out: &mut RuleOutcome) {
        if ctx.codling_moth {
            out.recommend(
                "TREAT_CODLING_MOTH",
                vec![
                    Reason::new("codling_moth_detected"),
                    Reason::new("fruit_damage_risk"),
                ],
            );
        }
        if ctx.aphids {
            out.recommend("MONITOR_APHIDS", vec![Reason::new("aphids_present")]);
        }
        if ctx.mites {
            out.recommend("TREAT_MITES", vec![Reason::new("mites_detected")]);
        }
    }

    fn rule_diseases(&self, ctx: &OrchardContext, out: &mut RuleOutcome) {
        if ctx.fire_blight {
            out.recommend(
                "TREAT_FIRE_BLIGHT",
                vec![
                    Reason::new("fire_blight_detected"),
                    Reason::new("prune_infected_branches"),
                ],
            );
        }
        if ctx.scab {
            out.recommend(
                "APPLY_FUNGICIDE_SCAB",
                vec![Reason::new("scab_signs_present")],
            );
        }
        if ctx.mildew {
            out.recommend("TREAT_MILDEW", vec![Reason::new("mildew_detected")]);
        }

        // No active infection but conditions favour one
        if ctx.wet_conditions && !(ctx.fire_blight || ctx.scab || ctx.mildew) {
            out.recommend(
                "MONITOR_DISEASE",
                vec![Reason::new("wet_conditions_disease_risk")
                    .with_pct("humidity", ctx.humidity)
                    .with("rain24", ctx.rain24.trunc() as i64)],
            );
        }
    }

    fn rule_fruit_thinning(&self, ctx: &OrchardContext, out: &mut RuleOutcome) {
        if ctx.fruit_load == "heavy" && ctx.stage == "fruit_development" {
            out.recommend(
                "THIN_FRUIT",
                vec![
                    Reason::new("heavy_fruit_load"),
                    Reason::new("improve_fruit_quality"),
                ],
            );
        }
    }

    fn rule_fertilization(&self, ctx: &OrchardContext, out: &mut RuleOutcome) {
        if ctx.stage == "early_growth" && ctx.moisture == SoilMoisture::Adequate {
            out.recommend(
                "FERTILIZE_ORCHARD",
                vec![
                    Reason::new("spring_growth_stage"),
                    Reason::new("soil_moisture_adequate").with_pct("sm", ctx.soil_moisture),
                ],
            );
        } else if ctx.wet_conditions {
            out.forbid(
                "FERTILIZE_ORCHARD",
                vec![Reason::new("too_wet_for_fertilizer")],
            );
        }
    }

    fn rule_harvest(&self, ctx: &OrchardContext, out: &mut RuleOutcome) {
        if ctx.stage == "harvest_ready" {
            if ctx.labor_available {
                out.recommend("BEGIN_HARVEST", vec![Reason::new("fruit_ready_harvest")]);
            } else {
                out.recommend(
                    "ARRANGE_HARVEST_LABOR",
                    vec![Reason::new("harvest_ready_no_labor")],
                );
            }
        }
    }

    fn rule_storm_preparation(&self, ctx: &OrchardContext, out: &mut RuleOutcome) {
        if ctx.high_wind {
            out.recommend(
                "SECURE_ORCHARD",
                vec![
                    Reason::new("high_wind_warning").with("wind", ctx.wind),
                    Reason::new("protect_trees_fruit"),
                ],
            );
            out.forbid(
                "SPRAY_PESTICIDES",
                vec![Reason::new("high_wind_no_spray").with("wind", ctx.wind)],
            );
        }
    }
}

impl FarmModel for OrchardModel {
    type Context = OrchardContext;

    fn farm_type(&self) -> &'static str {
        "orchard"
    }

    fn derive(&self, raw: &RawInputs) -> Result<DerivedBuckets> {
        let soil_moisture = raw.percent("soil", "moisture_pct")?;
        let temperature = raw.number("weather", "temperature_c")?;
        let rain24 = raw.non_negative("weather", "rain_mm_24h")?;
        let humidity = raw.percent("weather", "humidity_pct")?;
        let wind = raw.number_or("weather", "wind_kph", 0.0)?;

        Ok(DerivedBuckets::new()
            .set_label(
                "moisture_bucket",
                SoilMoisture::from_pct(soil_moisture).as_str(),
            )
            .set_label(
                "temp_stress",
                TempStress::from_temperature(temperature).as_str(),
            )
            .set_flag("wet_conditions", rain24 >= 10.0 || humidity >= 80.0)
            .set_flag("high_wind", wind >= HIGH_WIND_KPH))
    }

    fn build_context(&self, raw: &RawInputs, derived: &DerivedBuckets) -> Result<OrchardContext> {
        Ok(OrchardContext {
            temperature: raw.number("weather", "temperature_c")?,
            humidity: raw.percent("weather", "humidity_pct")?,
            wind: raw.number_or("weather", "wind_kph", 0.0)?,
            rain24: raw.non_negative("weather", "rain_mm_24h")?,
            frost_forecast: raw.flag_or("weather", "forecast_frost", false),
            soil_moisture: raw.percent("soil", "moisture_pct")?,
            stage: raw.text_or("trees", "stage", "unknown"),
            fruit_load: raw.text_or("trees", "fruit_load", "normal"),
            codling_moth: raw.flag_or("pests", "codling_moth_detected", false),
            aphids: raw.flag_or("pests", "aphids_detected", false),
            mites: raw.flag_or("pests", "mites_detected", false),
            fire_blight: raw.flag_or("diseases", "fire_blight_signs", false),
            scab: raw.flag_or("diseases", "scab_signs", false),
            mildew: raw.flag_or("diseases", "mildew_signs", false),
            water_available: raw.flag_or("resources", "water_available", true),
            labor_available: raw.flag_or("resources", "labor_available", true),
            moisture: SoilMoisture::parse(derived.label("moisture_bucket")?)?,
            wet_conditions: derived.flag("wet_conditions")?,
            high_wind: derived.flag("high_wind")?,
        })
    }

    fn apply_rules(&self, ctx: &OrchardContext) -> RuleOutcome {
        let mut out = RuleOutcome::new();
        self.rule_irrigation(ctx, &mut out);
        self.rule_frost_protection(ctx, &mut out);
        self.rule_pests(ctx, &mut out);
        self.rule_diseases(ctx, &mut out);
        self.rule_fruit_thinning(ctx, &mut out);
        self.rule_fertilization(ctx, &mut out);
        self.rule_harvest(ctx, &mut out);
        self.rule_storm_preparation(ctx, &mut out);
        out
    }

    fn rank(&self, ctx: &OrchardContext, code: &str) -> Priority {
        match code {
            "IRRIGATE_ORCHARD" => {
                if is_critical_stage(&ctx.stage) {
                    Priority::High
                } else {
                    Priority::Medium
                }
            }
            "ACTIVATE_FROST_PROTECTION" | "TREAT_CODLING_MOTH" | "TREAT_FIRE_BLIGHT"
            | "APPLY_FUNGICIDE_SCAB" | "ARRANGE_HARVEST_LABOR" | "BEGIN_HARVEST"
            | "SECURE_ORCHARD" => Priority::High,
            "MONITOR_DISEASE" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::engine::run_model;
    use serde_json::json;

    fn orchard(overrides: serde_json::Value) -> RawInputs {
        let mut base = json!({
            "weather": {
                "temperature_c": 20.0, "humidity_pct": 55,
                "wind_kph": 10.0, "rain_mm_24h": 0
            },
            "soil": { "moisture_pct": 26 },
            "trees": { "stage": "fruit_development", "fruit_load": "normal" },
            "pests": {},
            "diseases": {},
            "resources": { "water_available": true, "labor_available": true }
        });
        for (category, fields) in overrides.as_object().unwrap() {
            for (field, value) in fields.as_object().unwrap() {
                base[category][field] = value.clone();
            }
        }
        RawInputs::new(base)
    }

    #[test]
    fn dry_soil_in_critical_stage_is_urgent() {
        let output = run_model(
            &OrchardModel,
            &orchard(json!({ "soil": { "moisture_pct": 15 } })),
        )
        .unwrap();

        let (action, priority) = &output.recommendations[0];
        assert_eq!(action.code, "IRRIGATE_ORCHARD");
        assert_eq!(*priority, Priority::High);
        assert_eq!(action.reasons[0].key, "soil_moisture_critical");
        assert_eq!(action.reasons[1].key, "critical_growth_stage");
    }

    #[test]
    fn dry_soil_in_dormant_stage_is_routine() {
        let output = run_model(
            &OrchardModel,
            &orchard(json!({
                "soil": { "moisture_pct": 15 },
                "trees": { "stage": "dormant" }
            })),
        )
        .unwrap();

        let rec = output
            .recommendations
            .iter()
            .find(|(a, _)| a.code == "IRRIGATE_ORCHARD")
            .unwrap();
        assert_eq!(rec.1, Priority::Medium);
        assert_eq!(rec.0.reasons[0].key, "soil_moisture_low");
    }

    #[test]
    fn frost_forecast_in_flowering_protects() {
        let output = run_model(
            &OrchardModel,
            &orchard(json!({
                "weather": { "temperature_c": 1.0, "forecast_frost": true },
                "trees": { "stage": "flowering" }
            })),
        )
        .unwrap();

        assert_eq!(output.derived.label("temp_stress").unwrap(), "cold");
        let rec = output
            .recommendations
            .iter()
            .find(|(a, _)| a.code == "ACTIVATE_FROST_PROTECTION")
            .unwrap();
        assert_eq!(rec.1, Priority::High);
        assert_eq!(rec.0.reasons.len(), 3);
    }

    #[test]
    fn frost_forecast_in_tolerant_stage_is_ignored() {
        let output = run_model(
            &OrchardModel,
            &orchard(json!({
                "weather": { "forecast_frost": true },
                "trees": { "stage": "harvest_ready" }
            })),
        )
        .unwrap();
        assert!(output
            .recommendations
            .iter()
            .all(|(a, _)| a.code != "ACTIVATE_FROST_PROTECTION"));
    }

    #[test]
    fn wet_weather_without_infection_monitors_disease() {
        let output = run_model(
            &OrchardModel,
            &orchard(json!({
                "weather": { "humidity_pct": 85, "rain_mm_24h": 12 }
            })),
        )
        .unwrap();

        let rec = output
            .recommendations
            .iter()
            .find(|(a, _)| a.code == "MONITOR_DISEASE")
            .unwrap();
        assert_eq!(rec.1, Priority::Low);

        // Wet conditions also block irrigation and fertilizer
        let blocked: Vec<&str> = output
            .not_recommended
            .iter()
            .map(|a| a.code.as_str())
            .collect();
        assert!(blocked.contains(&"IRRIGATE_ORCHARD"));
        assert!(blocked.contains(&"FERTILIZE_ORCHARD"));
    }

    #[test]
    fn active_infections_suppress_the_monitoring_advisory() {
        let output = run_model(
            &OrchardModel,
            &orchard(json!({
                "weather": { "humidity_pct": 85, "rain_mm_24h": 12 },
                "diseases": { "fire_blight_signs": true, "scab_signs": true }
            })),
        )
        .unwrap();

        let codes: Vec<&str> = output
            .recommendations
            .iter()
            .map(|(a, _)| a.code.as_str())
            .collect();
        assert!(codes.contains(&"TREAT_FIRE_BLIGHT"));
        assert!(codes.contains(&"APPLY_FUNGICIDE_SCAB"));
        assert!(!codes.contains(&"MONITOR_DISEASE"));
    }

    #[test]
    fn high_wind_secures_and_blocks_spraying() {
        let output = run_model(
            &OrchardModel,
            &orchard(json!({
                "weather": { "wind_kph": 45.0 },
                "pests": { "codling_moth_detected": true }
            })),
        )
        .unwrap();

        assert!(output.derived.flag("high_wind").unwrap());
        let codes: Vec<&str> = output
            .recommendations
            .iter()
            .map(|(a, _)| a.code.as_str())
            .collect();
        assert!(codes.contains(&"SECURE_ORCHARD"));
        assert!(codes.contains(&"TREAT_CODLING_MOTH"));
        assert_eq!(output.not_recommended[0].code, "SPRAY_PESTICIDES");
    }

    #[test]
    fn harvest_depends_on_labor() {
        let ready = run_model(
            &OrchardModel,
            &orchard(json!({ "trees": { "stage": "harvest_ready" } })),
        )
        .unwrap();
        assert_eq!(ready.recommendations[0].0.code, "BEGIN_HARVEST");

        let no_labor = run_model(
            &OrchardModel,
            &orchard(json!({
                "trees": { "stage": "harvest_ready" },
                "resources": { "labor_available": false }
            })),
        )
        .unwrap();
        assert_eq!(no_labor.recommendations[0].0.code, "ARRANGE_HARVEST_LABOR");
    }

    #[test]
    fn heavy_fruit_load_thins_during_fruit_development() {
        let output = run_model(
            &OrchardModel,
            &orchard(json!({ "trees": { "fruit_load": "heavy" } })),
        )
        .unwrap();
        assert!(output
            .recommendations
            .iter()
            .any(|(a, _)| a.code == "THIN_FRUIT"));
    }
}
