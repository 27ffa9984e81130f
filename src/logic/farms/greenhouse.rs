//! Greenhouse model: climate control (temperature, humidity, CO2),
//! irrigation, pest and disease response, and crop management for a
//! controlled environment.

use crate::error::{FarmOpsError, Result};
use crate::logic::engine::{FarmModel, RuleOutcome};
use crate::models::{DerivedBuckets, Priority, RawInputs, Reason};

const TEMP_HIGH_C: f64 = 32.0;
const TEMP_LOW_C: f64 = 15.0;
const HUMIDITY_HIGH_PCT: f64 = 85.0;
const HUMIDITY_LOW_PCT: f64 = 45.0;
const CO2_HIGH_PPM: f64 = 1000.0;
const CO2_LOW_PPM: f64 = 350.0;
const SOIL_DRY_PCT: f64 = 22.0;
const WATERING_INTERVAL_H: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeStatus {
    TooHigh,
    TooLow,
    Optimal,
}

impl RangeStatus {
    fn from_bounds(value: f64, low: f64, high: f64) -> Self {
        if value >= high {
            Self::TooHigh
        } else if value <= low {
            Self::TooLow
        } else {
            Self::Optimal
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::TooHigh => "too_high",
            Self::TooLow => "too_low",
            Self::Optimal => "optimal",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "too_high" => Ok(Self::TooHigh),
            "too_low" => Ok(Self::TooLow),
            "optimal" => Ok(Self::Optimal),
            other => Err(FarmOpsError::InvalidInput(format!(
                "unknown range status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Co2Status {
    High,
    Low,
    Optimal,
}

impl Co2Status {
    fn from_ppm(ppm: f64) -> Self {
        if ppm >= CO2_HIGH_PPM {
            Self::High
        } else if ppm <= CO2_LOW_PPM {
            Self::Low
        } else {
            Self::Optimal
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
            Self::Optimal => "optimal",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "optimal" => Ok(Self::Optimal),
            other => Err(FarmOpsError::InvalidInput(format!(
                "unknown co2 status '{other}'"
            ))),
        }
    }
}

pub struct GreenhouseContext {
    temperature: f64,
    humidity: f64,
    co2_ppm: f64,
    water_available: bool,
    soil_moisture: f64,
    last_watered_hours: f64,
    stage: String,
    health: String,
    whiteflies: bool,
    thrips: bool,
    aphids: bool,
    fungal_signs: bool,
    bacterial_signs: bool,
    virus_signs: bool,
    temp_status: RangeStatus,
    humidity_status: RangeStatus,
    co2_status: Co2Status,
    needs_water: bool,
}

pub struct GreenhouseModel;

impl GreenhouseModel {
    fn rule_temperature(&self, ctx: &GreenhouseContext, out: &mut RuleOutcome) {
        match ctx.temp_status {
            RangeStatus::TooHigh => out.recommend(
                "ACTIVATE_COOLING",
                vec![
                    Reason::new("temperature_too_high").with("temp", ctx.temperature),
                    Reason::new("increase_ventilation"),
                ],
            ),
            RangeStatus::TooLow => out.recommend(
                "ACTIVATE_HEATING",
                vec![
                    Reason::new("temperature_too_low").with("temp", ctx.temperature),
                    Reason::new("close_vents"),
                ],
            ),
            RangeStatus::Optimal => {}
        }
    }

    fn rule_humidity(&self, ctx: &GreenhouseContext, out: &mut RuleOutcome) {
        match ctx.humidity_status {
            RangeStatus::TooHigh => out.recommend(
                "INCREASE_VENTILATION",
                vec![
                    Reason::new("humidity_too_high").with_pct("humidity", ctx.humidity),
                    Reason::new("disease_risk_high_humidity"),
                ],
            ),
            RangeStatus::TooLow => out.recommend(
                "INCREASE_HUMIDITY",
                vec![Reason::new("humidity_too_low").with_pct("humidity", ctx.humidity)],
            ),
            RangeStatus::Optimal => {}
        }
    }

    fn rule_air_quality(&self, ctx: &GreenhouseContext, out: &mut RuleOutcome) {
        if ctx.co2_status == Co2Status::High {
            out.recommend(
                "IMPROVE_VENTILATION",
                vec![
                    Reason::new("co2_too_high").with("co2", ctx.co2_ppm.trunc() as i64),
                    Reason::new("air_quality_poor"),
                ],
            );
        }
    }

    fn rule_irrigation(&self, ctx: &GreenhouseContext, out: &mut RuleOutcome) {
        if !ctx.water_available {
            out.forbid("WATER_CROPS", vec![Reason::new("no_water_available")]);
            return;
        }

        if ctx.needs_water {
            out.recommend(
                "WATER_CROPS",
                vec![
                    Reason::new("soil_moisture_low").with_pct("sm", ctx.soil_moisture),
                    Reason::new("last_watered")
                        .with("hours", ctx.last_watered_hours.trunc() as i64),
                ],
            );
        }
    }

    fn rule_pests(&self, ctx: &GreenhouseContext, out: &mut RuleOutcome) {
        if ctx.whiteflies {
            out.recommend("TREAT_WHITEFLIES", vec![Reason::new("whiteflies_detected")]);
        }
        if ctx.thrips {
            out.recommend("TREAT_THRIPS", vec![Reason::new("thrips_detected")]);
        }
        if ctx.aphids {
            out.recommend("TREAT_APHIDS", vec![Reason::new("aphids_detected")]);
        }
    }

    fn rule_diseases(&self, ctx: &GreenhouseContext, out: &mut RuleOutcome) {
        if ctx.fungal_signs {
            out.recommend(
                "APPLY_FUNGICIDE",
                vec![
                    Reason::new("fungal_infection_detected"),
                    Reason::new("reduce_humidity_disease"),
                ],
            );
        }
        if ctx.bacterial_signs {
            out.recommend(
                "TREAT_BACTERIAL_DISEASE",
                vec![Reason::new("bacterial_infection_detected")],
            );
        }
        if ctx.virus_signs {
            out.recommend(
                "REMOVE_INFECTED_PLANTS",
                vec![Reason::new("virus_detected_remove")],
            );
        }
    }

    fn rule_crop_management(&self, ctx: &GreenhouseContext, out: &mut RuleOutcome) {
        if ctx.stage == "transplant_ready" {
            out.recommend("TRANSPLANT_SEEDLINGS", vec![Reason::new("seedlings_ready")]);
        }
        if ctx.health == "poor" {
            out.recommend(
                "CHECK_NUTRIENT_LEVELS",
                vec![Reason::new("crop_health_poor")],
            );
        }
    }
}

impl FarmModel for GreenhouseModel {
    type Context = GreenhouseContext;

    fn farm_type(&self) -> &'static str {
        "greenhouse"
    }

    fn derive(&self, raw: &RawInputs) -> Result<DerivedBuckets> {
        let temperature = raw.number("environment", "temperature_c")?;
        let humidity = raw.percent("environment", "humidity_pct")?;
        let co2_ppm = raw.non_negative("environment", "co2_ppm")?;
        let soil_moisture = raw.percent("irrigation", "soil_moisture_pct")?;
        let last_watered = raw.non_negative("irrigation", "last_watered_hours")?;

        Ok(DerivedBuckets::new()
            .set_label(
                "temp_status",
                RangeStatus::from_bounds(temperature, TEMP_LOW_C, TEMP_HIGH_C).as_str(),
            )
            .set_label(
                "humidity_status",
                RangeStatus::from_bounds(humidity, HUMIDITY_LOW_PCT, HUMIDITY_HIGH_PCT).as_str(),
            )
            .set_label("co2_status", Co2Status::from_ppm(co2_ppm).as_str())
            .set_flag(
                "needs_water",
                soil_moisture < SOIL_DRY_PCT || last_watered >= WATERING_INTERVAL_H,
            ))
    }

    fn build_context(
        &self,
        raw: &RawInputs,
        derived: &DerivedBuckets,
    ) -> Result<GreenhouseContext> {
        Ok(GreenhouseContext {
            temperature: raw.number("environment", "temperature_c")?,
            humidity: raw.percent("environment", "humidity_pct")?,
            co2_ppm: raw.non_negative("environment", "co2_ppm")?,
            water_available: raw.flag_or("irrigation", "water_available", true),
            soil_moisture: raw.percent("irrigation", "soil_moisture_pct")?,
            last_watered_hours: raw.non_negative("irrigation", "last_watered_hours")?,
            stage: raw.text_or("crops", "stage", "unknown"),
            health: raw.text_or("crops", "health", "good"),
            whiteflies: raw.flag_or("pests", "whiteflies", false),
            thrips: raw.flag_or("pests", "thrips", false),
            aphids: raw.flag_or("pests", "aphids", false),
            fungal_signs: raw.flag_or("diseases", "fungal_signs", false),
            bacterial_signs: raw.flag_or("diseases", "bacterial_signs", false),
            virus_signs: raw.flag_or("diseases", "virus_signs", false),
            temp_status: RangeStatus::parse(derived.label("temp_status")?)?,
            humidity_status: RangeStatus::parse(derived.label("humidity_status")?)?,
            co2_status: Co2Status::parse(derived.label("co2_status")?)?,
            needs_water: derived.flag("needs_water")?,
        })
    }

    fn apply_rules(&self, ctx: &GreenhouseContext) -> RuleOutcome {
        let mut out = RuleOutcome::new();
        self.rule_temperature(ctx, &mut out);
        self.rule_humidity(ctx, &mut out);
        self.rule_air_quality(ctx, &mut out);
        self.rule_irrigation(ctx, &mut out);
        self.rule_pests(ctx, &mut out);
        self.rule_diseases(ctx, &mut out);
        self.rule_crop_management(ctx, &mut out);
        out
    }

    fn rank(&self, _ctx: &GreenhouseContext, code: &str) -> Priority {
        match code {
            "ACTIVATE_COOLING" | "ACTIVATE_HEATING" | "INCREASE_VENTILATION" | "WATER_CROPS"
            | "TREAT_WHITEFLIES" | "TREAT_THRIPS" | "APPLY_FUNGICIDE"
            | "TREAT_BACTERIAL_DISEASE" | "REMOVE_INFECTED_PLANTS" => Priority::High,
            _ => Priority::Medium,
        }
    }
}
