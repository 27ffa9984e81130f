//! Wheat field model: irrigation, fertilization timing, pest and disease
//! alerts, and spray safety for an open wheat field.

use super::SoilMoisture;
use crate::error::Result;
use crate::logic::engine::{FarmModel, RuleOutcome};
use crate::models::{DerivedBuckets, Priority, RawInputs, Reason};

/// Daytime heat bucket from the maximum forecast temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeatherBucket {
    Hot,
    Warm,
    Mild,
}

impl WeatherBucket {
    fn from_tmax(tmax: f64) -> Self {
        if tmax >= 35.0 {
            Self::Hot
        } else if tmax >= 28.0 {
            Self::Warm
        } else {
            Self::Mild
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Mild => "mild",
        }
    }
}

/// Immutable snapshot consumed by the wheat rules.
pub struct WheatContext {
    tmax: f64,
    rain24: f64,
    rain48: f64,
    wind: f64,
    humidity: f64,
    sm: f64,
    stage: String,
    water_available: bool,
    irrigation_possible: bool,
    aphids: bool,
    rust: bool,
    moisture: SoilMoisture,
    wet: bool,
    rain_coming: bool,
}

pub struct WheatModel;

impl WheatModel {
    fn rule_irrigation(&self, ctx: &WheatContext, out: &mut RuleOutcome) {
        if !(ctx.irrigation_possible && ctx.water_available) {
            out.forbid(
                "IRRIGATE_TODAY",
                vec![Reason::new("irrigation_not_possible")
                    .with("irrigation_possible", ctx.irrigation_possible)
                    .with("water_available", ctx.water_available)],
            );
            return;
        }

        if ctx.moisture == SoilMoisture::Low && !ctx.rain_coming && ctx.rain24 == 0.0 && !ctx.wet {
            out.recommend(
                "IRRIGATE_TODAY",
                vec![
                    Reason::new("soil_moisture_low").with_pct("sm", ctx.sm),
                    Reason::new("dry_conditions")
                        .with("rain24", ctx.rain24.trunc() as i64)
                        .with_pct("humidity", ctx.humidity),
                    Reason::new("no_rain_expected_48h"),
                ],
            );
        } else if ctx.moisture == SoilMoisture::Low && ctx.rain_coming {
            out.recommend(
                "IRRIGATE_REDUCED_OR_DELAY",
                vec![
                    Reason::new("soil_moisture_low_rain_expected")
                        .with_pct("sm", ctx.sm)
                        .with("rain48", ctx.rain48.trunc() as i64),
                    Reason::new("delay_or_reduce_irrigation"),
                ],
            );
        } else if ctx.wet || ctx.moisture == SoilMoisture::High {
            out.forbid(
                "IRRIGATE_TODAY",
                vec![
                    Reason::new("wet_conditions")
                        .with_pct("humidity", ctx.humidity)
                        .with("rain24", ctx.rain24.trunc() as i64),
                    Reason::new("soil_moisture_level")
                        .with_pct("sm", ctx.sm)
                        .with("moisture_bucket", ctx.moisture.as_str()),
                ],
            );
        }
    }

    fn rule_fertilize(&self, ctx: &WheatContext, out: &mut RuleOutcome) {
        if ctx.stage == "tillering"
            && ctx.moisture == SoilMoisture::Adequate
            && ctx.tmax <= 30.0
            && !ctx.wet
        {
            out.recommend(
                "FERTILIZE_TODAY",
                vec![
                    Reason::new("stage_is").with("stage", ctx.stage.as_str()),
                    Reason::new("soil_moisture_adequate").with_pct("sm", ctx.sm),
                    Reason::new("weather_suitable")
                        .with("tmax", ctx.tmax)
                        .with_pct("humidity", ctx.humidity),
                ],
            );
        } else if ctx.wet || ctx.rain24 >= 10.0 {
            out.forbid(
                "FERTILIZE_TODAY",
                vec![
                    Reason::new("high_rain_humidity_runoff"),
                    Reason::new("rain_humidity_values")
                        .with("rain24", ctx.rain24.trunc() as i64)
                        .with_pct("humidity", ctx.humidity),
                ],
            );
        } else if ctx.moisture == SoilMoisture::Low {
            // Nutrients cannot move into dry soil; irrigation comes first.
            out.forbid(
                "FERTILIZE_TODAY",
                vec![Reason::new("fertilize_dry_soil").with_pct("sm", ctx.sm)],
            );
        }
    }

    fn rule_pest_disease(&self, ctx: &WheatContext, out: &mut RuleOutcome) {
        if ctx.aphids {
            out.recommend("SCOUT_APHIDS", vec![Reason::new("aphids_observed")]);
        }

        if ctx.rust || (ctx.humidity >= 90.0 && ctx.rain24 >= 2.0) {
            let lead = if ctx.rust {
                Reason::new("rust_signs_observed")
            } else {
                Reason::new("rust_risk_weather")
            };
            out.recommend(
                "RUST_RISK_ALERT",
                vec![
                    lead,
                    Reason::new("humidity_rain_values")
                        .with_pct("humidity", ctx.humidity)
                        .with("rain24", ctx.rain24.trunc() as i64),
                ],
            );
        }
    }

    fn rule_spray_safety(&self, ctx: &WheatContext, out: &mut RuleOutcome) {
        if ctx.wind >= 6.0 || ctx.tmax >= 35.0 {
            out.recommend(
                "AVOID_SPRAY_MIDDAY",
                vec![
                    Reason::new("wind_heat_reduce_spray")
                        .with("wind", ctx.wind)
                        .with("tmax", ctx.tmax),
                    Reason::new("prefer_morning_evening"),
                ],
            );
        }
    }
}

impl FarmModel for WheatModel {
    type Context = WheatContext;

    fn farm_type(&self) -> &'static str {
        "wheat"
    }

    fn derive(&self, raw: &RawInputs) -> Result<DerivedBuckets> {
        let sm = raw.percent("soil", "soil_moisture_pct")?;
        let tmax = raw.number("weather", "t_max_c")?;
        let rain24 = raw.non_negative("weather", "rain_mm_24h")?;
        let rain48 = raw.number_or("weather", "forecast_rain_mm_48h", 0.0)?;
        let humidity = raw.percent("weather", "humidity_pct")?;

        Ok(DerivedBuckets::new()
            .set_label("moisture_bucket", SoilMoisture::from_pct(sm).as_str())
            .set_label("weather_bucket", WeatherBucket::from_tmax(tmax).as_str())
            .set_flag("wet_bucket", rain24 >= 5.0 || humidity >= 85.0)
            .set_flag("rain_coming_48h", rain48 >= 6.0))
    }

    fn build_context(&self, raw: &RawInputs, derived: &DerivedBuckets) -> Result<WheatContext> {
        Ok(WheatContext {
            tmax: raw.number("weather", "t_max_c")?,
            rain24: raw.non_negative("weather", "rain_mm_24h")?,
            rain48: raw.number_or("weather", "forecast_rain_mm_48h", 0.0)?,
            wind: raw.number_or("weather", "wind_mps", 0.0)?,
            humidity: raw.percent("weather", "humidity_pct")?,
            sm: raw.percent("soil", "soil_moisture_pct")?,
            stage: raw.text_or("crop", "stage_code", "unknown"),
            water_available: raw.flag_or("constraints", "water_available", true),
            irrigation_possible: raw.flag_or("constraints", "irrigation_possible_today", true),
            aphids: raw.flag_or("observations", "pest_aphids_seen", false),
            rust: raw.flag_or("observations", "disease_rust_seen", false),
            moisture: SoilMoisture::parse(derived.label("moisture_bucket")?)?,
            wet: derived.flag("wet_bucket")?,
            rain_coming: derived.flag("rain_coming_48h")?,
        })
    }

    fn apply_rules(&self, ctx: &WheatContext) -> RuleOutcome {
        let mut out = RuleOutcome::new();
        self.rule_irrigation(ctx, &mut out);
        self.rule_fertilize(ctx, &mut out);
        self.rule_pest_disease(ctx, &mut out);
        self.rule_spray_safety(ctx, &mut out);
        out
    }

    fn rank(&self, ctx: &WheatContext, code: &str) -> Priority {
        match code {
            "IRRIGATE_TODAY" => Priority::High,
            "RUST_RISK_ALERT" => {
                if ctx.rust {
                    Priority::High
                } else {
                    Priority::Medium
                }
            }
            "AVOID_SPRAY_MIDDAY" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}
