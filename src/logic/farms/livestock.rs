//! Dairy livestock model: feed planning, herd health, heat stress,
//! milking hygiene and water supply.

use crate::error::{FarmOpsError, Result};
use crate::logic::engine::{FarmModel, RuleOutcome};
use crate::models::{round1, DerivedBuckets, Priority, RawInputs, Reason};

// Dairy herd planning constants: kg of feed and litres of water per head
// per day, and the expected daily milk yield per cow.
const FEED_CRITICAL_KG: f64 = 15.0;
const FEED_LOW_KG: f64 = 25.0;
const WATER_REQUIRED_L: f64 = 80.0;
const EXPECTED_MILK_L: f64 = 20.0;
const HEAT_STRESS_C: f64 = 28.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedStatus {
    Critical,
    Low,
    Adequate,
}

impl FeedStatus {
    fn from_per_animal(kg: f64) -> Self {
        if kg < FEED_CRITICAL_KG {
            Self::Critical
        } else if kg < FEED_LOW_KG {
            Self::Low
        } else {
            Self::Adequate
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Low => "low",
            Self::Adequate => "adequate",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "critical" => Ok(Self::Critical),
            "low" => Ok(Self::Low),
            "adequate" => Ok(Self::Adequate),
            other => Err(FarmOpsError::InvalidInput(format!(
                "unknown feed status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HealthBucket {
    Critical,
    Warning,
    Good,
}

impl HealthBucket {
    fn from_sick_count(sick: u32) -> Self {
        if sick > 3 {
            Self::Critical
        } else if sick > 0 {
            Self::Warning
        } else {
            Self::Good
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Good => "good",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "critical" => Ok(Self::Critical),
            "warning" => Ok(Self::Warning),
            "good" => Ok(Self::Good),
            other => Err(FarmOpsError::InvalidInput(format!(
                "unknown health bucket '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MilkBucket {
    Low,
    Adequate,
    Good,
}

impl MilkBucket {
    fn from_yield(milk_liters: f64, animal_count: u32) -> Self {
        let expected = f64::from(animal_count) * EXPECTED_MILK_L;
        if milk_liters < expected * 0.7 {
            Self::Low
        } else if milk_liters < expected * 0.9 {
            Self::Adequate
        } else {
            Self::Good
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Adequate => "adequate",
            Self::Good => "good",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Self::Low),
            "adequate" => Ok(Self::Adequate),
            "good" => Ok(Self::Good),
            other => Err(FarmOpsError::InvalidInput(format!(
                "unknown milk bucket '{other}'"
            ))),
        }
    }
}

fn per_animal(total: f64, animal_count: u32) -> f64 {
    if animal_count == 0 {
        0.0
    } else {
        total / f64::from(animal_count)
    }
}

pub struct LivestockContext {
    temperature: f64,
    water_liters: f64,
    milk_yield: f64,
    animal_count: u32,
    sick_count: u32,
    disease_detected: bool,
    stress_signs: bool,
    vet_available: bool,
    feed_delivery_today: bool,
    feed_status: FeedStatus,
    health: HealthBucket,
    temp_stress: bool,
    milk: MilkBucket,
    feed_per_animal: f64,
}

pub struct LivestockModel;

impl LivestockModel {
    fn rule_feeding(&self, ctx: &LivestockContext, out: &mut RuleOutcome) {
        match ctx.feed_status {
            FeedStatus::Critical => out.recommend(
                "ORDER_FEED_URGENT",
                vec![
                    Reason::new("feed_critical").with("per_animal", ctx.feed_per_animal),
                    Reason::new("feed_shortage_impact").with("count", ctx.animal_count),
                ],
            ),
            FeedStatus::Low if !ctx.feed_delivery_today => out.recommend(
                "ORDER_FEED_TODAY",
                vec![
                    Reason::new("feed_low").with("per_animal", ctx.feed_per_animal),
                    Reason::new("plan_feed_delivery"),
                ],
            ),
            FeedStatus::Adequate if ctx.feed_delivery_today => out.forbid(
                "ORDER_FEED_TODAY",
                vec![Reason::new("feed_adequate_delivery_expected")],
            ),
            _ => {}
        }
    }

    fn rule_health_monitoring(&self, ctx: &LivestockContext, out: &mut RuleOutcome) {
        let emergency = ctx.disease_detected || ctx.health == HealthBucket::Critical;

        if emergency {
            let lead = if ctx.disease_detected {
                Reason::new("disease_detected")
            } else {
                Reason::new("multiple_sick_animals").with("count", ctx.sick_count)
            };
            out.recommend(
                "VET_CHECK_URGENT",
                vec![
                    lead,
                    Reason::new("isolate_sick_animals").with("count", ctx.sick_count),
                ],
            );
        } else if ctx.health == HealthBucket::Warning {
            out.recommend(
                "MONITOR_HEALTH",
                vec![
                    Reason::new("sick_animals_present").with("count", ctx.sick_count),
                    Reason::new("daily_health_check"),
                ],
            );
        }

        if emergency && !ctx.vet_available {
            out.recommend(
                "CONTACT_EMERGENCY_VET",
                vec![Reason::new("vet_unavailable_emergency")],
            );
        }
    }

    fn rule_heat_stress(&self, ctx: &LivestockContext, out: &mut RuleOutcome) {
        if ctx.temp_stress || ctx.stress_signs {
            out.recommend(
                "ACTIVATE_COOLING",
                vec![
                    Reason::new("heat_stress_risk").with("temp", ctx.temperature),
                    Reason::new("increase_water_access"),
                    Reason::new("provide_shade"),
                ],
            );
            out.forbid(
                "MOVE_ANIMALS",
                vec![Reason::new("heat_stress_avoid_movement").with("temp", ctx.temperature)],
            );
        }
    }

    fn rule_milking(&self, ctx: &LivestockContext, out: &mut RuleOutcome) {
        if ctx.milk == MilkBucket::Low {
            out.recommend(
                "CHECK_NUTRITION",
                vec![
                    Reason::new("milk_yield_low").with("yield_val", ctx.milk_yield),
                    Reason::new("review_feed_quality"),
                ],
            );
        }

        if ctx.health != HealthBucket::Good {
            out.recommend(
                "SANITIZE_MILKING_EQUIPMENT",
                vec![Reason::new("prevent_disease_spread")],
            );
        }
    }

    fn rule_water(&self, ctx: &LivestockContext, out: &mut RuleOutcome) {
        let required = f64::from(ctx.animal_count) * WATER_REQUIRED_L;
        let per_head = round1(per_animal(ctx.water_liters, ctx.animal_count));

        if ctx.water_liters < required * 0.5 {
            out.recommend(
                "REFILL_WATER_URGENT",
                vec![
                    Reason::new("water_critical").with("per_animal", per_head),
                    Reason::new("dehydration_risk"),
                ],
            );
        } else if ctx.water_liters < required {
            out.recommend(
                "REFILL_WATER_TODAY",
                vec![Reason::new("water_low").with("per_animal", per_head)],
            );
        }
    }
}

impl FarmModel for LivestockModel {
    type Context = LivestockContext;

    fn farm_type(&self) -> &'static str {
        "livestock"
    }

    fn derive(&self, raw: &RawInputs) -> Result<DerivedBuckets> {
        let animal_count = raw.count("livestock", "animal_count")?;
        let feed_kg = raw.non_negative("resources", "feed_kg")?;
        let milk_liters = raw.non_negative("production", "milk_liters")?;
        let sick_count = raw.count("health", "sick_count")?;
        let temperature = raw.number("environment", "temperature_c")?;

        let feed_per_animal = round1(per_animal(feed_kg, animal_count));

        Ok(DerivedBuckets::new()
            .set_label(
                "feed_status",
                FeedStatus::from_per_animal(feed_per_animal).as_str(),
            )
            .set_label(
                "health_bucket",
                HealthBucket::from_sick_count(sick_count).as_str(),
            )
            .set_flag("temp_stress", temperature >= HEAT_STRESS_C)
            .set_label(
                "milk_bucket",
                MilkBucket::from_yield(milk_liters, animal_count).as_str(),
            )
            .set_value("feed_per_animal", feed_per_animal))
    }

    fn build_context(
        &self,
        raw: &RawInputs,
        derived: &DerivedBuckets,
    ) -> Result<LivestockContext> {
        Ok(LivestockContext {
            temperature: raw.number("environment", "temperature_c")?,
            water_liters: raw.non_negative("resources", "water_liters")?,
            milk_yield: raw.non_negative("production", "milk_liters")?,
            animal_count: raw.count("livestock", "animal_count")?,
            sick_count: raw.count("health", "sick_count")?,
            disease_detected: raw.flag_or("health", "disease_detected", false),
            stress_signs: raw.flag_or("health", "stress_signs", false),
            vet_available: raw.flag_or("constraints", "vet_available", true),
            feed_delivery_today: raw.flag_or("constraints", "feed_delivery_expected", false),
            feed_status: FeedStatus::parse(derived.label("feed_status")?)?,
            health: HealthBucket::parse(derived.label("health_bucket")?)?,
            temp_stress: derived.flag("temp_stress")?,
            milk: MilkBucket::parse(derived.label("milk_bucket")?)?,
            feed_per_animal: derived.value("feed_per_animal")?,
        })
    }

    fn apply_rules(&self, ctx: &LivestockContext) -> RuleOutcome {
        let mut out = RuleOutcome::new();
        self.rule_feeding(ctx, &mut out);
        self.rule_health_monitoring(ctx, &mut out);
        self.rule_heat_stress(ctx, &mut out);
        self.rule_milking(ctx, &mut out);
        self.rule_water(ctx, &mut out);
        out
    }

    fn rank(&self, _ctx: &LivestockContext, code: &str) -> Priority {
        match code {
            "ORDER_FEED_URGENT"
            | "VET_CHECK_URGENT"
            | "CONTACT_EMERGENCY_VET"
            | "ACTIVATE_COOLING"
            | "SANITIZE_MILKING_EQUIPMENT"
            | "REFILL_WATER_URGENT" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::engine::run_model;
    use serde_json::json;

    fn herd(overrides: serde_json::Value) -> RawInputs {
        let mut base = json!({
            "environment": { "temperature_c": 18.0, "humidity_pct": 60 },
            "resources": { "feed_kg": 1200.0, "water_liters": 4000.0 },
            "production": { "milk_liters": 800.0 },
            "livestock": { "animal_count": 40 },
            "health": { "sick_count": 0 },
            "constraints": { "vet_available": true }
        });
        for (category, fields) in overrides.as_object().unwrap() {
            for (field, value) in fields.as_object().unwrap() {
                base[category][field] = value.clone();
            }
        }
        RawInputs::new(base)
    }

    #[test]
    fn healthy_well_stocked_herd_needs_nothing() {
        let output = run_model(&LivestockModel, &herd(json!({}))).unwrap();
        assert_eq!(output.derived.label("feed_status").unwrap(), "adequate");
        assert_eq!(output.derived.label("health_bucket").unwrap(), "good");
        assert!(output.recommendations.is_empty());
        assert!(output.not_recommended.is_empty());
    }

    #[test]
    fn critical_feed_shortage_orders_urgently() {
        let output = run_model(
            &LivestockModel,
            &herd(json!({ "resources": { "feed_kg": 500.0 } })),
        )
        .unwrap();

        assert_eq!(output.derived.label("feed_status").unwrap(), "critical");
        assert_eq!(output.derived.value("feed_per_animal").unwrap(), 12.5);

        let (action, priority) = &output.recommendations[0];
        assert_eq!(action.code, "ORDER_FEED_URGENT");
        assert_eq!(*priority, Priority::High);
        assert_eq!(
            action.reasons[0].params["per_animal"],
            crate::models::ParamValue::Float(12.5)
        );
    }

    #[test]
    fn expected_delivery_blocks_redundant_order() {
        let output = run_model(
            &LivestockModel,
            &herd(json!({ "constraints": { "feed_delivery_expected": true } })),
        )
        .unwrap();

        assert_eq!(output.not_recommended[0].code, "ORDER_FEED_TODAY");
        assert_eq!(
            output.not_recommended[0].reasons[0].key,
            "feed_adequate_delivery_expected"
        );
    }

    #[test]
    fn disease_outbreak_without_vet_escalates() {
        let output = run_model(
            &LivestockModel,
            &herd(json!({
                "health": { "sick_count": 5, "disease_detected": true },
                "constraints": { "vet_available": false }
            })),
        )
        .unwrap();

        let codes: Vec<&str> = output
            .recommendations
            .iter()
            .map(|(a, _)| a.code.as_str())
            .collect();
        assert_eq!(
            codes,
            [
                "VET_CHECK_URGENT",
                "CONTACT_EMERGENCY_VET",
                "SANITIZE_MILKING_EQUIPMENT"
            ]
        );
        assert!(output
            .recommendations
            .iter()
            .all(|(_, p)| *p == Priority::High));
        assert_eq!(
            output.recommendations[0].0.reasons[0].key,
            "disease_detected"
        );
    }

    #[test]
    fn few_sick_animals_only_monitored() {
        let output = run_model(
            &LivestockModel,
            &herd(json!({ "health": { "sick_count": 2 } })),
        )
        .unwrap();

        let monitor = output
            .recommendations
            .iter()
            .find(|(a, _)| a.code == "MONITOR_HEALTH")
            .unwrap();
        assert_eq!(monitor.1, Priority::Medium);
        assert!(output
            .recommendations
            .iter()
            .any(|(a, _)| a.code == "SANITIZE_MILKING_EQUIPMENT"));
        assert!(output
            .recommendations
            .iter()
            .all(|(a, _)| a.code != "VET_CHECK_URGENT"));
    }

    #[test]
    fn heat_forbids_moving_animals() {
        let output = run_model(
            &LivestockModel,
            &herd(json!({ "environment": { "temperature_c": 31.0 } })),
        )
        .unwrap();

        assert!(output.derived.flag("temp_stress").unwrap());
        assert_eq!(output.recommendations[0].0.code, "ACTIVATE_COOLING");
        assert_eq!(output.not_recommended[0].code, "MOVE_ANIMALS");
    }

    #[test]
    fn water_thresholds_scale_with_herd_size() {
        // 40 animals need 3200 L; below half of that is urgent.
        let urgent = run_model(
            &LivestockModel,
            &herd(json!({ "resources": { "water_liters": 1000.0 } })),
        )
        .unwrap();
        assert!(urgent
            .recommendations
            .iter()
            .any(|(a, _)| a.code == "REFILL_WATER_URGENT"));

        let low = run_model(
            &LivestockModel,
            &herd(json!({ "resources": { "water_liters": 2500.0 } })),
        )
        .unwrap();
        assert!(low
            .recommendations
            .iter()
            .any(|(a, _)| a.code == "REFILL_WATER_TODAY"));
    }

    #[test]
    fn low_milk_yield_triggers_nutrition_check() {
        // 40 cows, expected 800 L; 500 L is below the 70% floor.
        let output = run_model(
            &LivestockModel,
            &herd(json!({ "production": { "milk_liters": 500.0 } })),
        )
        .unwrap();

        assert_eq!(output.derived.label("milk_bucket").unwrap(), "low");
        assert!(output
            .recommendations
            .iter()
            .any(|(a, _)| a.code == "CHECK_NUTRITION"));
    }

    #[test]
    fn empty_herd_does_not_divide_by_zero() {
        let output = run_model(
            &LivestockModel,
            &herd(json!({ "livestock": { "animal_count": 0 } })),
        )
        .unwrap();
        assert_eq!(output.derived.value("feed_per_animal").unwrap(), 0.0);
    }
}
