//! Mixed farm model: a small crop field plus a small herd competing for
//! the same water, labor and budget. Herd welfare is checked before crop
//! work so scarce resources go to the animals first.

use crate::error::Result;
use crate::logic::engine::{FarmModel, RuleOutcome};
use crate::models::{round1, DerivedBuckets, Priority, RawInputs, Reason};

const CROP_DRY_PCT: f64 = 20.0;
const CROP_CRITICAL_PCT: f64 = 18.0;
const FEED_CRITICAL_KG: f64 = 3.0;
const FEED_LOW_KG: f64 = 5.0;
const WATER_CRITICAL_L: f64 = 8.0;
const LABOR_LIMITED_H: f64 = 6.0;

fn is_critical_stage(stage: &str) -> bool {
    matches!(stage, "flowering" | "fruit_development")
}

fn per_animal(total: f64, animal_count: u32) -> f64 {
    if animal_count == 0 {
        0.0
    } else {
        total / f64::from(animal_count)
    }
}

pub struct MixedContext {
    soil_moisture: f64,
    crop_stage: String,
    pest_pressure: String,
    animal_count: u32,
    sick_count: u32,
    labor_hours: f64,
    water_available: bool,
    budget_available: bool,
    rain24: f64,
    rain48_forecast: f64,
    crop_needs_water: bool,
    crop_critical: bool,
    feed_per_animal: f64,
    feed_critical: bool,
    water_per_animal: f64,
    water_critical: bool,
    labor_limited: bool,
    multiple_needs: bool,
}

pub struct MixedModel;

impl MixedModel {
    fn rule_health(&self, ctx: &MixedContext, out: &mut RuleOutcome) {
        if ctx.sick_count > 0 {
            out.recommend(
                "CHECK_SICK_ANIMALS",
                vec![
                    Reason::new("sick_animals_mixed").with("count", ctx.sick_count),
                    Reason::new("isolate_if_needed"),
                ],
            );
        }
    }

    fn rule_watering(&self, ctx: &MixedContext, out: &mut RuleOutcome) {
        if ctx.water_critical {
            out.recommend(
                "WATER_ANIMALS_URGENT",
                vec![
                    Reason::new("water_critical_animals").with("per_animal", ctx.water_per_animal),
                    Reason::new("dehydration_risk"),
                ],
            );
        }
    }

    fn rule_feeding(&self, ctx: &MixedContext, out: &mut RuleOutcome) {
        if ctx.feed_critical {
            out.recommend(
                "FEED_ANIMALS_URGENT",
                vec![
                    Reason::new("feed_critical_mixed").with("per_animal", ctx.feed_per_animal),
                    Reason::new("animal_welfare_risk").with("count", ctx.animal_count),
                ],
            );
        } else if ctx.feed_per_animal < FEED_LOW_KG {
            out.recommend(
                "ORDER_FEED_MIXED",
                vec![Reason::new("feed_low_mixed").with("per_animal", ctx.feed_per_animal)],
            );
        }
    }

    fn rule_crop_irrigation(&self, ctx: &MixedContext, out: &mut RuleOutcome) {
        if !ctx.water_available {
            out.forbid("IRRIGATE_CROPS", vec![Reason::new("no_water_mixed")]);
            return;
        }

        if ctx.crop_critical {
            out.recommend(
                "IRRIGATE_CROPS_URGENT",
                vec![
                    Reason::new("crop_critical_stage").with("stage", ctx.crop_stage.as_str()),
                    Reason::new("soil_moisture_low").with_pct("sm", ctx.soil_moisture),
                ],
            );
        } else if ctx.crop_needs_water && !ctx.water_critical {
            // When the herd is short of water the crops wait.
            out.recommend(
                "IRRIGATE_CROPS",
                vec![Reason::new("crop_needs_irrigation").with_pct("sm", ctx.soil_moisture)],
            );
        }
    }

    fn rule_pests(&self, ctx: &MixedContext, out: &mut RuleOutcome) {
        match ctx.pest_pressure.as_str() {
            "high" => out.recommend("TREAT_CROP_PESTS", vec![Reason::new("high_pest_pressure")]),
            "medium" => out.recommend(
                "MONITOR_PEST_LEVELS",
                vec![Reason::new("moderate_pest_pressure")],
            ),
            _ => {}
        }
    }

    fn rule_harvest(&self, ctx: &MixedContext, out: &mut RuleOutcome) {
        if ctx.crop_stage == "harvest_ready" {
            out.recommend(
                "HARVEST_CROPS",
                vec![
                    Reason::new("crops_ready_harvest"),
                    Reason::new("timely_harvest_quality"),
                ],
            );
        }
    }

    fn rule_resources(&self, ctx: &MixedContext, out: &mut RuleOutcome) {
        if ctx.labor_limited && ctx.multiple_needs {
            out.recommend(
                "PRIORITIZE_TASKS",
                vec![
                    Reason::new("limited_labor").with("hours", ctx.labor_hours),
                    Reason::new("multiple_operations_needed"),
                    Reason::new("prioritize_animals_first"),
                ],
            );
        }

        if !ctx.budget_available && (ctx.feed_critical || ctx.crop_critical) {
            out.recommend(
                "SECURE_EMERGENCY_FUNDS",
                vec![Reason::new("budget_constraint_critical")],
            );
        }
    }

    fn rule_weather(&self, ctx: &MixedContext, out: &mut RuleOutcome) {
        if ctx.rain48_forecast >= 10.0 && ctx.crop_needs_water {
            out.recommend(
                "DELAY_IRRIGATION_RAIN",
                vec![
                    Reason::new("rain_forecast_mixed")
                        .with("rain", ctx.rain48_forecast.trunc() as i64),
                    Reason::new("save_water_resources"),
                ],
            );
        }

        if ctx.rain24 >= 15.0 {
            out.forbid(
                "APPLY_FERTILIZER",
                vec![Reason::new("heavy_rain_runoff").with("rain", ctx.rain24.trunc() as i64)],
            );
        }
    }
}

impl FarmModel for MixedModel {
    type Context = MixedContext;

    fn farm_type(&self) -> &'static str {
        "mixed"
    }

    fn derive(&self, raw: &RawInputs) -> Result<DerivedBuckets> {
        let soil_moisture = raw.percent("crops", "soil_moisture_pct")?;
        let crop_stage = raw.text_or("crops", "stage", "unknown");
        let animal_count = raw.count("livestock", "animal_count")?;
        let feed_kg = raw.non_negative("livestock", "feed_kg")?;
        let water_liters = raw.non_negative("livestock", "water_liters")?;
        let sick_count = raw.count("livestock", "sick_count")?;
        let labor_hours = raw.non_negative("resources", "labor_hours")?;

        let crop_needs_water = soil_moisture < CROP_DRY_PCT;
        let feed_per_animal = round1(per_animal(feed_kg, animal_count));
        let feed_critical = feed_per_animal < FEED_CRITICAL_KG;
        let water_per_animal = round1(per_animal(water_liters, animal_count));
        let water_critical = water_per_animal < WATER_CRITICAL_L;

        let needs = [
            crop_needs_water,
            feed_critical,
            water_critical,
            sick_count > 0,
        ];

        Ok(DerivedBuckets::new()
            .set_flag("crop_needs_water", crop_needs_water)
            .set_flag(
                "crop_critical",
                is_critical_stage(&crop_stage) && soil_moisture < CROP_CRITICAL_PCT,
            )
            .set_value("feed_per_animal", feed_per_animal)
            .set_flag("feed_critical", feed_critical)
            .set_value("water_per_animal", water_per_animal)
            .set_flag("water_critical", water_critical)
            .set_flag("labor_limited", labor_hours < LABOR_LIMITED_H)
            .set_flag(
                "multiple_needs",
                needs.iter().filter(|&&n| n).count() >= 2,
            ))
    }

    fn build_context(&self, raw: &RawInputs, derived: &DerivedBuckets) -> Result<MixedContext> {
        Ok(MixedContext {
            soil_moisture: raw.percent("crops", "soil_moisture_pct")?,
            crop_stage: raw.text_or("crops", "stage", "unknown"),
            pest_pressure: raw.text_or("crops", "pest_pressure", "low"),
            animal_count: raw.count("livestock", "animal_count")?,
            sick_count: raw.count("livestock", "sick_count")?,
            labor_hours: raw.non_negative("resources", "labor_hours")?,
            water_available: raw.flag_or("resources", "water_available", true),
            budget_available: raw.flag_or("resources", "budget_available", true),
            rain24: raw.non_negative("weather", "rain_mm_24h")?,
            rain48_forecast: raw.number_or("weather", "forecast_rain_48h", 0.0)?,
            crop_needs_water: derived.flag("crop_needs_water")?,
            crop_critical: derived.flag("crop_critical")?,
            feed_per_animal: derived.value("feed_per_animal")?,
            feed_critical: derived.flag("feed_critical")?,
            water_per_animal: derived.value("water_per_animal")?,
            water_critical: derived.flag("water_critical")?,
            labor_limited: derived.flag("labor_limited")?,
            multiple_needs: derived.flag("multiple_needs")?,
        })
    }

    fn apply_rules(&self, ctx: &MixedContext) -> RuleOutcome {
        let mut out = RuleOutcome::new();
        self.rule_health(ctx, &mut out);
        self.rule_watering(ctx, &mut out);
        self.rule_feeding(ctx, &mut out);
        self.rule_crop_irrigation(ctx, &mut out);
        self.rule_pests(ctx, &mut out);
        self.rule_harvest(ctx, &mut out);
        self.rule_resources(ctx, &mut out);
        self.rule_weather(ctx, &mut out);
        out
    }

    fn rank(&self, ctx: &MixedContext, code: &str) -> Priority {
        match code {
            "WATER_ANIMALS_URGENT" | "FEED_ANIMALS_URGENT" | "IRRIGATE_CROPS_URGENT"
            | "HARVEST_CROPS" | "PRIORITIZE_TASKS" | "SECURE_EMERGENCY_FUNDS" => Priority::High,
            "CHECK_SICK_ANIMALS" => {
                if ctx.sick_count >= 3 {
                    Priority::High
                } else {
                    Priority::Medium
                }
            }
            "MONITOR_PEST_LEVELS" | "DELAY_IRRIGATION_RAIN" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::engine::run_model;
    use serde_json::json;

    fn farm(overrides: serde_json::Value) -> RawInputs {
        let mut base = json!({
            "crops": { "soil_moisture_pct": 28, "stage": "vegetative", "pest_pressure": "low" },
            "livestock": {
                "animal_count": 12, "feed_kg": 90.0,
                "water_liters": 150.0, "sick_count": 0
            },
            "resources": { "labor_hours": 10.0, "water_available": true, "budget_available": true },
            "weather": { "rain_mm_24h": 0, "forecast_rain_48h": 0 }
        });
        for (category, fields) in overrides.as_object().unwrap() {
            for (field, value) in fields.as_object().unwrap() {
                base[category][field] = value.clone();
            }
        }
        RawInputs::new(base)
    }

    #[test]
    fn stable_farm_needs_nothing() {
        let output = run_model(&MixedModel, &farm(json!({}))).unwrap();
        assert!(output.recommendations.is_empty());
        assert!(output.not_recommended.is_empty());
        assert!(!output.derived.flag("multiple_needs").unwrap());
    }

    #[test]
    fn crop_in_critical_stage_gets_urgent_irrigation() {
        let output = run_model(
            &MixedModel,
            &farm(json!({
                "crops": { "soil_moisture_pct": 15, "stage": "flowering" }
            })),
        )
        .unwrap();

        assert!(output.derived.flag("crop_critical").unwrap());
        let (action, priority) = &output.recommendations[0];
        assert_eq!(action.code, "IRRIGATE_CROPS_URGENT");
        assert_eq!(*priority, Priority::High);
    }

    #[test]
    fn herd_water_shortage_defers_crop_irrigation() {
        let output = run_model(
            &MixedModel,
            &farm(json!({
                "crops": { "soil_moisture_pct": 15 },
                "livestock": { "water_liters": 60.0 }
            })),
        )
        .unwrap();

        // 60 L for 12 animals is 5 L per head, below the 8 L floor.
        assert!(output.derived.flag("water_critical").unwrap());
        let codes: Vec<&str> = output
            .recommendations
            .iter()
            .map(|(a, _)| a.code.as_str())
            .collect();
        assert!(codes.contains(&"WATER_ANIMALS_URGENT"));
        assert!(!codes.contains(&"IRRIGATE_CROPS"));
    }

    #[test]
    fn sick_count_changes_check_priority() {
        let mild = run_model(
            &MixedModel,
            &farm(json!({ "livestock": { "sick_count": 1 } })),
        )
        .unwrap();
        let check = mild
            .recommendations
            .iter()
            .find(|(a, _)| a.code == "CHECK_SICK_ANIMALS")
            .unwrap();
        assert_eq!(check.1, Priority::Medium);

        let severe = run_model(
            &MixedModel,
            &farm(json!({ "livestock": { "sick_count": 4 } })),
        )
        .unwrap();
        let check = severe
            .recommendations
            .iter()
            .find(|(a, _)| a.code == "CHECK_SICK_ANIMALS")
            .unwrap();
        assert_eq!(check.1, Priority::High);
    }

    #[test]
    fn scarce_labor_with_competing_needs_prioritizes() {
        let output = run_model(
            &MixedModel,
            &farm(json!({
                "crops": { "soil_moisture_pct": 15 },
                "livestock": { "feed_kg": 20.0 },
                "resources": { "labor_hours": 4.0 }
            })),
        )
        .unwrap();

        assert!(output.derived.flag("multiple_needs").unwrap());
        let codes: Vec<&str> = output
            .recommendations
            .iter()
            .map(|(a, _)| a.code.as_str())
            .collect();
        assert!(codes.contains(&"PRIORITIZE_TASKS"));
        assert!(codes.contains(&"FEED_ANIMALS_URGENT"));
    }

    #[test]
    fn empty_budget_escalates_only_under_critical_need() {
        let calm = run_model(
            &MixedModel,
            &farm(json!({ "resources": { "budget_available": false } })),
        )
        .unwrap();
        assert!(calm
            .recommendations
            .iter()
            .all(|(a, _)| a.code != "SECURE_EMERGENCY_FUNDS"));

        let broke = run_model(
            &MixedModel,
            &farm(json!({
                "livestock": { "feed_kg": 20.0 },
                "resources": { "budget_available": false }
            })),
        )
        .unwrap();
        assert!(broke
            .recommendations
            .iter()
            .any(|(a, _)| a.code == "SECURE_EMERGENCY_FUNDS"));
    }

    #[test]
    fn forecast_rain_delays_irrigation() {
        let output = run_model(
            &MixedModel,
            &farm(json!({
                "crops": { "soil_moisture_pct": 19 },
                "weather": { "forecast_rain_48h": 12 }
            })),
        )
        .unwrap();

        let delay = output
            .recommendations
            .iter()
            .find(|(a, _)| a.code == "DELAY_IRRIGATION_RAIN")
            .unwrap();
        assert_eq!(delay.1, Priority::Low);
        // The regular irrigation suggestion still fires; the advisory only
        // argues for postponing it.
        assert!(output
            .recommendations
            .iter()
            .any(|(a, _)| a.code == "IRRIGATE_CROPS"));
    }

    #[test]
    fn heavy_rain_blocks_fertilizer() {
        let output = run_model(
            &MixedModel,
            &farm(json!({ "weather": { "rain_mm_24h": 20 } })),
        )
        .unwrap();
        assert_eq!(output.not_recommended[0].code, "APPLY_FERTILIZER");
        assert_eq!(output.not_recommended[0].reasons[0].key, "heavy_rain_runoff");
    }

    #[test]
    fn harvest_ready_crops_are_harvested() {
        let output = run_model(
            &MixedModel,
            &farm(json!({ "crops": { "stage": "harvest_ready" } })),
        )
        .unwrap();
        let (action, priority) = &output.recommendations[0];
        assert_eq!(action.code, "HARVEST_CROPS");
        assert_eq!(*priority, Priority::High);
    }
}
