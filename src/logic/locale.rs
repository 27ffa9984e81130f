//! Localization of structured reasons and action codes.
//!
//! Template tables are static data compiled into the binary, loaded once
//! into a [`Localizer`] at startup and injected where rendering happens.
//! Azerbaijani (`az`) is the reference language and is complete for every
//! farm type; missing language/key combinations fall back to `az` and then
//! to a deterministic raw rendering — a gap is logged, never a failure.
//!
//! Numeric rendering conventions, fixed per unit:
//! - percentages, millimetres, ppm, counts and whole hours are carried as
//!   `ParamValue::Int` and render as whole numbers;
//! - temperatures, wind speeds, litres, kilograms per head and labor hours
//!   are carried as `ParamValue::Float` and render with one decimal.

use crate::models::{Action, ModelOutput, ParamValue, Priority, Reason};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

type Table = &'static [(&'static str, &'static str)];

const WHEAT_AZ: Table = &[
    // Irrigation
    (
        "irrigation_not_possible",
        "Bu gün suvarma mümkün deyil (mümkün={irrigation_possible}, su mövcudluğu={water_available}).",
    ),
    ("soil_moisture_low", "Torpaq rütubəti aşağıdır ({sm}%)."),
    (
        "dry_conditions",
        "Quru şərait var (son 24 saat yağış={rain24} mm, rütubət={humidity}%).",
    ),
    (
        "no_rain_expected_48h",
        "Növbəti 48 saatda əhəmiyyətli yağış gözlənilmir.",
    ),
    (
        "soil_moisture_low_rain_expected",
        "Torpaq rütubəti aşağıdır ({sm}%), amma 48 saatda yağış gözlənilir ({rain48} mm).",
    ),
    (
        "delay_or_reduce_irrigation",
        "Suva qənaət üçün suvarmanı gecikdirin və ya azaldın.",
    ),
    (
        "wet_conditions",
        "Şərait rütubətlidir (rütubət={humidity}%, son 24 saat yağış={rain24} mm).",
    ),
    (
        "soil_moisture_level",
        "Torpaq rütubəti {moisture_bucket} səviyyədədir ({sm}%).",
    ),
    // Fertilization
    ("stage_is", "Mərhələ: {stage}."),
    (
        "soil_moisture_adequate",
        "Torpaq rütubəti kafi səviyyədədir ({sm}%).",
    ),
    (
        "weather_suitable",
        "Hava şəraiti uyğundur (maks. temp={tmax} C, rütubət={humidity}%).",
    ),
    (
        "high_rain_humidity_runoff",
        "Yüksək yağış və rütubət gübrənin axıb getmə riskini artırır.",
    ),
    (
        "rain_humidity_values",
        "Son 24 saat yağış={rain24} mm, rütubət={humidity}%.",
    ),
    (
        "fertilize_dry_soil",
        "Torpaq quru olduğu üçün gübrələmə effektiv deyil (torpaq rütubəti={sm}%).",
    ),
    // Pest and disease
    (
        "aphids_observed",
        "Yarpaq biti müşahidə olunub: müşahidə edin və həddə görə tədbir görün.",
    ),
    (
        "rust_signs_observed",
        "Pas xəstəliyinin əlamətləri müşahidə olunub.",
    ),
    (
        "rust_risk_weather",
        "Yüksək rütubət və yağış pas riskini artırır.",
    ),
    (
        "humidity_rain_values",
        "Rütubət={humidity}%, son 24 saat yağış={rain24} mm.",
    ),
    // Spray safety
    (
        "wind_heat_reduce_spray",
        "Külək/isti hava səpinin keyfiyyətini azalda bilər (külək={wind} m/s, maks. temp={tmax} C).",
    ),
    (
        "prefer_morning_evening",
        "Əgər səpin lazımdırsa, səhər erkən və ya axşam edin.",
    ),
];

const WHEAT_EN: Table = &[
    (
        "irrigation_not_possible",
        "Irrigation is not possible today (possible={irrigation_possible}, water available={water_available}).",
    ),
    ("soil_moisture_low", "Soil moisture is low ({sm}%)."),
    (
        "dry_conditions",
        "Conditions are dry (rain last 24h={rain24} mm, humidity={humidity}%).",
    ),
    (
        "no_rain_expected_48h",
        "No significant rain expected in the next 48 hours.",
    ),
    (
        "soil_moisture_low_rain_expected",
        "Soil moisture is low ({sm}%), but rain is expected within 48 hours ({rain48} mm).",
    ),
    (
        "delay_or_reduce_irrigation",
        "Delay or reduce irrigation to save water.",
    ),
    (
        "wet_conditions",
        "Conditions are wet (humidity={humidity}%, rain last 24h={rain24} mm).",
    ),
    (
        "soil_moisture_level",
        "Soil moisture is {moisture_bucket} ({sm}%).",
    ),
    ("stage_is", "Growth stage: {stage}."),
    ("soil_moisture_adequate", "Soil moisture is adequate ({sm}%)."),
    (
        "weather_suitable",
        "Weather conditions are suitable (max temp={tmax} C, humidity={humidity}%).",
    ),
    (
        "high_rain_humidity_runoff",
        "High rain and humidity increase fertilizer runoff risk.",
    ),
    (
        "rain_humidity_values",
        "Rain last 24h={rain24} mm, humidity={humidity}%.",
    ),
    (
        "fertilize_dry_soil",
        "Fertilizing dry soil is ineffective (soil moisture={sm}%).",
    ),
    (
        "aphids_observed",
        "Aphids observed: monitor and treat if thresholds are exceeded.",
    ),
    ("rust_signs_observed", "Signs of rust disease observed."),
    (
        "rust_risk_weather",
        "High humidity and rain increase rust risk.",
    ),
    (
        "humidity_rain_values",
        "Humidity={humidity}%, rain last 24h={rain24} mm.",
    ),
    (
        "wind_heat_reduce_spray",
        "Wind or heat can reduce spray quality (wind={wind} m/s, max temp={tmax} C).",
    ),
    (
        "prefer_morning_evening",
        "If spraying is needed, do it early in the morning or in the evening.",
    ),
];

const LIVESTOCK_AZ: Table = &[
    // Feeding
    (
        "feed_critical",
        "Yem kritik səviyyədədir (heyvan başına {per_animal} kq).",
    ),
    (
        "feed_shortage_impact",
        "Yem çatışmazlığı {count} heyvan üçün təhlükəlidir.",
    ),
    ("feed_low", "Yem az səviyyədədir (heyvan başına {per_animal} kq)."),
    ("plan_feed_delivery", "Yem çatdırılmasını planlaşdırın."),
    (
        "feed_adequate_delivery_expected",
        "Yem kafi səviyyədədir və çatdırılma gözlənilir.",
    ),
    // Health
    (
        "disease_detected",
        "Xəstəlik aşkar edilib - təcili veterinar müdaxiləsi.",
    ),
    (
        "multiple_sick_animals",
        "{count} heyvan xəstədir - təcili yoxlama.",
    ),
    (
        "isolate_sick_animals",
        "Xəstə heyvanları ({count} ədəd) təcrid edin.",
    ),
    ("sick_animals_present", "{count} xəstə heyvan var."),
    ("daily_health_check", "Gündəlik sağlamlıq yoxlaması aparın."),
    (
        "vet_unavailable_emergency",
        "Veterinar əlçatmazdır - təcili əlaqə saxlayın.",
    ),
    ("prevent_disease_spread", "Xəstəliyin yayılmasının qarşısını alın."),
    // Heat stress
    ("heat_stress_risk", "İsti stress riski (temp={temp}°C)."),
    ("increase_water_access", "Su çıxışını artırın."),
    ("provide_shade", "Kölgə təmin edin."),
    (
        "heat_stress_avoid_movement",
        "İsti vaxtı heyvanları hərəkət etdirməyin (temp={temp}°C).",
    ),
    // Milking
    ("milk_yield_low", "Süd məhsuldarlığı aşağıdır ({yield_val} litr)."),
    ("review_feed_quality", "Yem keyfiyyətini yoxlayın."),
    // Water
    (
        "water_critical",
        "Su kritik səviyyədədir (heyvan başına {per_animal} litr).",
    ),
    ("dehydration_risk", "Susuzlaşma riski var."),
    ("water_low", "Su az səviyyədədir (heyvan başına {per_animal} litr)."),
];

const ORCHARD_AZ: Table = &[
    // Irrigation
    ("no_water_available", "Su mövcud deyil."),
    (
        "soil_moisture_critical",
        "Torpaq rütubəti kritik səviyyədədir ({sm}%).",
    ),
    ("critical_growth_stage", "Kritik böyümə mərhələsi: {stage}."),
    ("soil_moisture_low", "Torpaq rütubəti aşağıdır ({sm}%)."),
    (
        "soil_too_wet",
        "Torpaq çox rütubətlidir (rütubət={sm}%, yağış={rain24}mm).",
    ),
    // Frost protection
    ("frost_warning", "Şaxta xəbərdarlığı (temp={temp}°C)."),
    ("frost_sensitive_stage", "Şaxtaya həssas mərhələ: {stage}."),
    (
        "frost_protection_methods",
        "Şaxta qoruma tədbirləri tətbiq edin (su səpin, qızdırıcılar).",
    ),
    // Pests
    ("codling_moth_detected", "Alma güvəsi aşkar edilib."),
    ("fruit_damage_risk", "Meyvə zərər riski yüksəkdir."),
    ("aphids_present", "Yarpaq bitləri mövcuddur - izləyin."),
    ("mites_detected", "Gənələr aşkar edilib."),
    // Diseases
    ("fire_blight_detected", "Yanğın yanığı aşkar edilib!"),
    (
        "prune_infected_branches",
        "Yoluxmuş budaqları kəsin və məhv edin.",
    ),
    ("scab_signs_present", "Qabıq xəstəliyi əlamətləri var."),
    ("mildew_detected", "Küf aşkar edilib."),
    (
        "wet_conditions_disease_risk",
        "Rütubətli şərait xəstəlik riskini artırır (rütubət={humidity}%, yağış={rain24}mm).",
    ),
    // Fruit management
    ("heavy_fruit_load", "Ağır meyvə yükü - seyrəltmə lazımdır."),
    (
        "improve_fruit_quality",
        "Meyvə keyfiyyətini artırmaq üçün seyrəldin.",
    ),
    // Fertilization
    (
        "spring_growth_stage",
        "Bahar böyüməsi mərhələsi - gübrələmə vaxtıdır.",
    ),
    (
        "soil_moisture_adequate",
        "Torpaq rütubəti kafi səviyyədədir ({sm}%).",
    ),
    ("too_wet_for_fertilizer", "Gübrə üçün torpaq çox rütubətlidir."),
    // Harvest
    (
        "harvest_ready_no_labor",
        "Yığım hazırdır, lakin işçi qüvvəsi yoxdur.",
    ),
    ("fruit_ready_harvest", "Meyvələr yığıma hazırdır."),
    // Storm preparation
    ("high_wind_warning", "Güclü külək xəbərdarlığı ({wind} km/saat)."),
    ("protect_trees_fruit", "Ağacları və meyvələri qoruyun."),
    (
        "high_wind_no_spray",
        "Güclü küləkdə ({wind} km/saat) səpin etməyin.",
    ),
];

const GREENHOUSE_AZ: Table = &[
    // Temperature
    ("temperature_too_high", "Temperatur çox yüksəkdir ({temp}°C)."),
    ("increase_ventilation", "Ventilyasiyanı artırın və kölgələyin."),
    ("temperature_too_low", "Temperatur çox aşağıdır ({temp}°C)."),
    ("close_vents", "Havalandırmaları bağlayın və istiliyi artırın."),
    // Humidity
    ("humidity_too_high", "Rütubət çox yüksəkdir ({humidity}%)."),
    (
        "disease_risk_high_humidity",
        "Yüksək rütubət xəstəlik riskini artırır.",
    ),
    ("humidity_too_low", "Rütubət çox aşağıdır ({humidity}%)."),
    // Ventilation and CO2
    ("co2_too_high", "CO2 səviyyəsi çox yüksəkdir ({co2} ppm)."),
    (
        "air_quality_poor",
        "Hava keyfiyyəti pisdir - ventilyasiyanı yaxşılaşdırın.",
    ),
    // Irrigation
    ("no_water_available", "Su mövcud deyil."),
    ("soil_moisture_low", "Torpaq rütubəti aşağıdır ({sm}%)."),
    ("last_watered", "Son suvarma: {hours} saat əvvəl."),
    // Pests
    ("whiteflies_detected", "Ağ milçəklər aşkar edilib."),
    ("thrips_detected", "Trips aşkar edilib."),
    ("aphids_detected", "Yarpaq bitləri aşkar edilib."),
    // Diseases
    ("fungal_infection_detected", "Göbələk infeksiyası aşkar edilib!"),
    (
        "reduce_humidity_disease",
        "Rütubəti azaldın və havalandırmanı artırın.",
    ),
    ("bacterial_infection_detected", "Bakterial infeksiya aşkar edilib!"),
    (
        "virus_detected_remove",
        "Virus aşkar edilib - yoluxmuş bitkiləri çıxarın.",
    ),
    // Crop management
    ("seedlings_ready", "Şitillər köçürmə üçün hazırdır."),
    (
        "crop_health_poor",
        "Bitki sağlamlığı pis - qida maddələrini yoxlayın.",
    ),
];

const MIXED_AZ: Table = &[
    // Crops
    ("no_water_mixed", "Su mövcud deyil - bitkiləri suvarma mümkün deyil."),
    (
        "crop_critical_stage",
        "Kritik mərhələ: {stage} - təcili suvarma lazım.",
    ),
    (
        "crop_needs_irrigation",
        "Bitkilər suvarma tələb edir (torpaq rütubəti={sm}%).",
    ),
    // Livestock feeding
    (
        "feed_critical_mixed",
        "Yem kritik səviyyədədir (heyvan başına {per_animal} kq).",
    ),
    (
        "animal_welfare_risk",
        "{count} heyvan üçün yem çatışmazlığı riski.",
    ),
    (
        "feed_low_mixed",
        "Yem az səviyyədədir (heyvan başına {per_animal} kq).",
    ),
    // Livestock watering
    (
        "water_critical_animals",
        "Heyvanlar üçün su kritik səviyyədədir (başına {per_animal} litr).",
    ),
    ("dehydration_risk", "Susuzlaşma riski."),
    // Health
    ("sick_animals_mixed", "{count} xəstə heyvan var."),
    ("isolate_if_needed", "Lazım gələrsə təcrid edin."),
    // Pests
    (
        "high_pest_pressure",
        "Yüksək zərərverici təzyiqi - müdaxilə lazımdır.",
    ),
    ("moderate_pest_pressure", "Orta zərərverici təzyiqi - izləyin."),
    // Harvest
    ("crops_ready_harvest", "Məhsul yığıma hazırdır."),
    ("timely_harvest_quality", "Vaxtında yığım keyfiyyəti təmin edir."),
    // Resource allocation
    ("limited_labor", "Məhdud işçi qüvvəsi ({hours} saat)."),
    ("multiple_operations_needed", "Çoxlu əməliyyat tələb olunur."),
    (
        "prioritize_animals_first",
        "Əvvəlcə heyvanların ehtiyaclarına prioritet verin.",
    ),
    (
        "budget_constraint_critical",
        "Büdcə məhdudiyyəti kritik vəziyyətdə - təcili maliyyə lazımdır.",
    ),
    // Weather planning
    ("rain_forecast_mixed", "48 saata yağış gözlənilir ({rain} mm)."),
    ("save_water_resources", "Su resurslarını qənaət edin."),
    (
        "heavy_rain_runoff",
        "Güclü yağış ({rain} mm) - gübrə axıb gedə bilər.",
    ),
];

const TEMPLATES: &[(&str, &str, Table)] = &[
    ("wheat", "az", WHEAT_AZ),
    ("wheat", "en", WHEAT_EN),
    ("livestock", "az", LIVESTOCK_AZ),
    ("orchard", "az", ORCHARD_AZ),
    ("greenhouse", "az", GREENHOUSE_AZ),
    ("mixed", "az", MIXED_AZ),
];

const WHEAT_LABELS_AZ: Table = &[
    ("IRRIGATE_TODAY", "Bu gün suvarın"),
    ("IRRIGATE_REDUCED_OR_DELAY", "Suvarmanı azaldın və ya gecikdirin"),
    ("FERTILIZE_TODAY", "Bu gün gübrələyin"),
    ("SCOUT_APHIDS", "Yarpaq bitlərini müşahidə edin"),
    ("RUST_RISK_ALERT", "Pas xəstəliyi riski"),
    ("AVOID_SPRAY_MIDDAY", "Günorta səpindən çəkinin"),
];

const WHEAT_LABELS_EN: Table = &[
    ("IRRIGATE_TODAY", "Irrigate today"),
    ("IRRIGATE_REDUCED_OR_DELAY", "Reduce or delay irrigation"),
    ("FERTILIZE_TODAY", "Fertilize today"),
    ("SCOUT_APHIDS", "Scout for aphids"),
    ("RUST_RISK_ALERT", "Rust disease risk"),
    ("AVOID_SPRAY_MIDDAY", "Avoid midday spraying"),
];

const LIVESTOCK_LABELS_AZ: Table = &[
    ("ORDER_FEED_URGENT", "Təcili yem sifariş edin"),
    ("ORDER_FEED_TODAY", "Bu gün yem sifariş edin"),
    ("VET_CHECK_URGENT", "Təcili veterinar yoxlaması"),
    ("MONITOR_HEALTH", "Sağlamlığı izləyin"),
    ("CONTACT_EMERGENCY_VET", "Təcili veterinarla əlaqə saxlayın"),
    ("ACTIVATE_COOLING", "Soyutmanı işə salın"),
    ("MOVE_ANIMALS", "Heyvanları hərəkət etdirin"),
    ("CHECK_NUTRITION", "Qidalanmanı yoxlayın"),
    ("SANITIZE_MILKING_EQUIPMENT", "Sağım avadanlığını dezinfeksiya edin"),
    ("REFILL_WATER_URGENT", "Təcili su doldurun"),
    ("REFILL_WATER_TODAY", "Bu gün su doldurun"),
];

const ORCHARD_LABELS_AZ: Table = &[
    ("IRRIGATE_ORCHARD", "Bağı suvarın"),
    ("ACTIVATE_FROST_PROTECTION", "Şaxta qorumasını işə salın"),
    ("TREAT_CODLING_MOTH", "Alma güvəsinə qarşı dərmanlayın"),
    ("MONITOR_APHIDS", "Yarpaq bitlərini izləyin"),
    ("TREAT_MITES", "Gənələrə qarşı dərmanlayın"),
    ("TREAT_FIRE_BLIGHT", "Yanğın yanığını müalicə edin"),
    ("APPLY_FUNGICIDE_SCAB", "Qabıq xəstəliyinə qarşı funqisid tətbiq edin"),
    ("TREAT_MILDEW", "Küfə qarşı dərmanlayın"),
    ("MONITOR_DISEASE", "Xəstəlikləri izləyin"),
    ("THIN_FRUIT", "Meyvələri seyrəldin"),
    ("FERTILIZE_ORCHARD", "Bağı gübrələyin"),
    ("ARRANGE_HARVEST_LABOR", "Yığım üçün işçi qüvvəsi təşkil edin"),
    ("BEGIN_HARVEST", "Yığıma başlayın"),
    ("SECURE_ORCHARD", "Bağı qoruyun"),
    ("SPRAY_PESTICIDES", "Pestisid səpin"),
];

const GREENHOUSE_LABELS_AZ: Table = &[
    ("ACTIVATE_COOLING", "Soyutmanı işə salın"),
    ("ACTIVATE_HEATING", "İstiliyi işə salın"),
    ("INCREASE_VENTILATION", "Ventilyasiyanı artırın"),
    ("INCREASE_HUMIDITY", "Rütubəti artırın"),
    ("IMPROVE_VENTILATION", "Ventilyasiyanı yaxşılaşdırın"),
    ("WATER_CROPS", "Bitkiləri suvarın"),
    ("TREAT_WHITEFLIES", "Ağ milçəklərə qarşı dərmanlayın"),
    ("TREAT_THRIPS", "Tripslərə qarşı dərmanlayın"),
    ("TREAT_APHIDS", "Yarpaq bitlərinə qarşı dərmanlayın"),
    ("APPLY_FUNGICIDE", "Funqisid tətbiq edin"),
    ("TREAT_BACTERIAL_DISEASE", "Bakterial xəstəliyi müalicə edin"),
    ("REMOVE_INFECTED_PLANTS", "Yoluxmuş bitkiləri çıxarın"),
    ("TRANSPLANT_SEEDLINGS", "Şitilləri köçürün"),
    ("CHECK_NUTRIENT_LEVELS", "Qida maddələrini yoxlayın"),
];

const MIXED_LABELS_AZ: Table = &[
    ("IRRIGATE_CROPS", "Bitkiləri suvarın"),
    ("IRRIGATE_CROPS_URGENT", "Bitkiləri təcili suvarın"),
    ("FEED_ANIMALS_URGENT", "Heyvanları təcili yemləyin"),
    ("ORDER_FEED_MIXED", "Yem sifariş edin"),
    ("WATER_ANIMALS_URGENT", "Heyvanlara təcili su verin"),
    ("CHECK_SICK_ANIMALS", "Xəstə heyvanları yoxlayın"),
    ("TREAT_CROP_PESTS", "Zərərvericilərə qarşı dərmanlayın"),
    ("MONITOR_PEST_LEVELS", "Zərərverici səviyyəsini izləyin"),
    ("HARVEST_CROPS", "Məhsulu yığın"),
    ("PRIORITIZE_TASKS", "Tapşırıqları prioritetləşdirin"),
    ("SECURE_EMERGENCY_FUNDS", "Təcili maliyyə təmin edin"),
    ("DELAY_IRRIGATION_RAIN", "Suvarmanı yağışa görə gecikdirin"),
    ("APPLY_FERTILIZER", "Gübrə tətbiq edin"),
];

const LABELS: &[(&str, &str, Table)] = &[
    ("wheat", "az", WHEAT_LABELS_AZ),
    ("wheat", "en", WHEAT_LABELS_EN),
    ("livestock", "az", LIVESTOCK_LABELS_AZ),
    ("orchard", "az", ORCHARD_LABELS_AZ),
    ("greenhouse", "az", GREENHOUSE_LABELS_AZ),
    ("mixed", "az", MIXED_LABELS_AZ),
];

/// Bucket and tier value translations.
const VALUES_AZ: Table = &[
    // Moisture/feed/water levels and priority tiers
    ("low", "aşağı"),
    ("adequate", "kafi"),
    ("medium", "orta"),
    ("high", "yüksək"),
    ("critical", "kritik"),
    ("good", "yaxşı"),
    ("warning", "xəbərdarlıq"),
    // Temperature levels
    ("hot", "çox isti"),
    ("warm", "isti"),
    ("mild", "mülayim"),
    // Crop stages
    ("tillering", "kolların çoxalması"),
    ("flowering", "çiçəkləmə"),
    ("fruit_development", "meyvə inkişafı"),
    ("early_growth", "erkən böyümə"),
    ("harvest_ready", "yığıma hazır"),
];

const VALUE_TABLES: &[(&str, Table)] = &[("az", VALUES_AZ)];

const BOOL_STRINGS: &[(&str, (&str, &str))] = &[("az", ("bəli", "xeyr"))];

/// The reference language; complete for every farm type.
const REFERENCE_LANGUAGE: &str = "az";

/// Rendered (localized) form of one recommended action.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedRecommendation {
    pub code: String,
    pub label: String,
    pub priority: String,
    pub reasons: Vec<String>,
    pub reasons_structured: Vec<Reason>,
}

/// Rendered (localized) form of one disallowed action.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedAction {
    pub code: String,
    pub label: String,
    pub reasons: Vec<String>,
    pub reasons_structured: Vec<Reason>,
}

/// Localized model output returned to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedOutput {
    pub derived: BTreeMap<String, String>,
    pub recommendations: Vec<RenderedRecommendation>,
    pub not_recommended: Vec<RenderedAction>,
}

/// Entries keyed farm type, then language, then template/label key.
type FarmTables = HashMap<&'static str, HashMap<&'static str, HashMap<&'static str, &'static str>>>;

fn build_tables(source: &[(&'static str, &'static str, Table)]) -> FarmTables {
    let mut tables = FarmTables::new();
    for &(farm, lang, table) in source {
        tables
            .entry(farm)
            .or_default()
            .insert(lang, table.iter().copied().collect());
    }
    tables
}

/// Immutable template/label lookup built once at startup.
pub struct Localizer {
    templates: FarmTables,
    labels: FarmTables,
    values: HashMap<&'static str, HashMap<&'static str, &'static str>>,
    bools: HashMap<&'static str, (&'static str, &'static str)>,
}

impl Localizer {
    pub fn new() -> Self {
        let values = VALUE_TABLES
            .iter()
            .map(|&(lang, table)| (lang, table.iter().copied().collect()))
            .collect();
        Self {
            templates: build_tables(TEMPLATES),
            labels: build_tables(LABELS),
            values,
            bools: BOOL_STRINGS.iter().copied().collect(),
        }
    }

    /// Supported language codes, sorted.
    pub fn languages(&self) -> Vec<&'static str> {
        let langs: BTreeSet<&'static str> = self
            .templates
            .values()
            .flat_map(|langs| langs.keys().copied())
            .collect();
        langs.into_iter().collect()
    }

    fn lookup(
        tables: &FarmTables,
        farm_type: &str,
        language: &str,
        key: &str,
    ) -> Option<&'static str> {
        let langs = tables.get(farm_type)?;
        langs
            .get(language)
            .and_then(|t| t.get(key))
            .or_else(|| langs.get(REFERENCE_LANGUAGE).and_then(|t| t.get(key)))
            .copied()
    }

    /// Render a structured reason into a display string. Falls back to the
    /// reference language and then to a raw key/params rendering; always
    /// returns a non-empty string.
    pub fn render(&self, reason: &Reason, farm_type: &str, language: &str) -> String {
        match Self::lookup(&self.templates, farm_type, language, &reason.key) {
            Some(template) => self.interpolate(template, reason, language),
            None => {
                tracing::warn!(
                    farm_type,
                    language,
                    key = %reason.key,
                    "no template for reason key"
                );
                self.fallback(reason, language)
            }
        }
    }

    /// Human-readable display name for an action code.
    pub fn label(&self, code: &str, farm_type: &str, language: &str) -> String {
        match Self::lookup(&self.labels, farm_type, language, code) {
            Some(label) => label.to_string(),
            None => {
                tracing::warn!(farm_type, language, code, "no label for action code");
                code.to_string()
            }
        }
    }

    /// Localized priority tier name ("high" becomes "yüksək" in az).
    pub fn priority_label(&self, priority: Priority, language: &str) -> String {
        self.translate_value(priority.as_str(), language)
    }

    /// Localize a full model output for the presentation layer.
    pub fn render_output(
        &self,
        output: &ModelOutput,
        farm_type: &str,
        language: &str,
    ) -> RenderedOutput {
        RenderedOutput {
            derived: output.derived.display_map(),
            recommendations: output
                .recommendations
                .iter()
                .map(|(action, priority)| RenderedRecommendation {
                    code: action.code.clone(),
                    label: self.label(&action.code, farm_type, language),
                    priority: self.priority_label(*priority, language),
                    reasons: self.render_all(action, farm_type, language),
                    reasons_structured: action.reasons.clone(),
                })
                .collect(),
            not_recommended: output
                .not_recommended
                .iter()
                .map(|action| RenderedAction {
                    code: action.code.clone(),
                    label: self.label(&action.code, farm_type, language),
                    reasons: self.render_all(action, farm_type, language),
                    reasons_structured: action.reasons.clone(),
                })
                .collect(),
        }
    }

    fn render_all(&self, action: &Action, farm_type: &str, language: &str) -> Vec<String> {
        action
            .reasons
            .iter()
            .map(|r| self.render(r, farm_type, language))
            .collect()
    }

    fn interpolate(&self, template: &str, reason: &Reason, language: &str) -> String {
        let mut out = String::with_capacity(template.len() + 16);
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match reason.params.get(name) {
                        Some(value) => out.push_str(&self.render_param(value, language)),
                        // Unknown placeholder stays as-is, like an
                        // untranslated gap; the string is still usable.
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn render_param(&self, value: &ParamValue, language: &str) -> String {
        match value {
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Float(n) => format!("{n:.1}"),
            ParamValue::Flag(b) => match self.bools.get(language) {
                Some((yes, no)) => if *b { *yes } else { *no }.to_string(),
                None => b.to_string(),
            },
            ParamValue::Text(s) => self.translate_value(s, language),
        }
    }

    fn translate_value(&self, value: &str, language: &str) -> String {
        self.values
            .get(language)
            .and_then(|t| t.get(value))
            .map_or_else(|| value.to_string(), |v| (*v).to_string())
    }

    fn fallback(&self, reason: &Reason, language: &str) -> String {
        if reason.params.is_empty() {
            return reason.key.clone();
        }
        let params: Vec<String> = reason
            .params
            .iter()
            .map(|(name, value)| format!("{name}={}", self.render_param(value, language)))
            .collect();
        format!("{} ({})", reason.key, params.join(", "))
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_known_key_with_params() {
        let localizer = Localizer::new();
        let reason = Reason::new("soil_moisture_low").with_pct("sm", 16.0);
        assert_eq!(
            localizer.render(&reason, "wheat", "az"),
            "Torpaq rütubəti aşağıdır (16%)."
        );
        assert_eq!(
            localizer.render(&reason, "wheat", "en"),
            "Soil moisture is low (16%)."
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let localizer = Localizer::new();
        let reason = Reason::new("dry_conditions")
            .with("rain24", 0_i64)
            .with_pct("humidity", 25.0);
        let first = localizer.render(&reason, "wheat", "az");
        let second = localizer.render(&reason, "wheat", "az");
        assert_eq!(first, second);
        assert_eq!(first, "Quru şərait var (son 24 saat yağış=0 mm, rütubət=25%).");
    }

    #[test]
    fn float_params_render_one_decimal() {
        let localizer = Localizer::new();
        let reason = Reason::new("weather_suitable")
            .with("tmax", 28.0)
            .with_pct("humidity", 60.0);
        assert_eq!(
            localizer.render(&reason, "wheat", "az"),
            "Hava şəraiti uyğundur (maks. temp=28.0 C, rütubət=60%)."
        );
    }

    #[test]
    fn bools_and_bucket_values_are_translated() {
        let localizer = Localizer::new();
        let reason = Reason::new("irrigation_not_possible")
            .with("irrigation_possible", false)
            .with("water_available", true);
        let rendered = localizer.render(&reason, "wheat", "az");
        assert!(rendered.contains("xeyr"));
        assert!(rendered.contains("bəli"));

        let reason = Reason::new("soil_moisture_level")
            .with("moisture_bucket", "high")
            .with_pct("sm", 40.0);
        assert!(localizer.render(&reason, "wheat", "az").contains("yüksək"));
    }

    #[test]
    fn unknown_language_falls_back_to_reference() {
        let localizer = Localizer::new();
        let reason = Reason::new("dehydration_risk");
        // Livestock has no English templates; az is the fallback.
        assert_eq!(
            localizer.render(&reason, "livestock", "en"),
            "Susuzlaşma riski var."
        );
    }

    #[test]
    fn unknown_key_renders_non_empty_fallback() {
        let localizer = Localizer::new();
        let reason = Reason::new("made_up_key").with("sm", 16_i64);
        let rendered = localizer.render(&reason, "wheat", "az");
        assert_eq!(rendered, "made_up_key (sm=16)");
        assert!(!localizer
            .render(&Reason::new("other_key"), "wheat", "az")
            .is_empty());
    }

    #[test]
    fn labels_resolve_with_fallbacks() {
        let localizer = Localizer::new();
        assert_eq!(
            localizer.label("IRRIGATE_TODAY", "wheat", "az"),
            "Bu gün suvarın"
        );
        assert_eq!(
            localizer.label("IRRIGATE_TODAY", "wheat", "en"),
            "Irrigate today"
        );
        // Missing label falls back to the code itself
        assert_eq!(
            localizer.label("UNLISTED_CODE", "wheat", "az"),
            "UNLISTED_CODE"
        );
    }

    #[test]
    fn priority_labels() {
        let localizer = Localizer::new();
        assert_eq!(localizer.priority_label(Priority::High, "az"), "yüksək");
        assert_eq!(localizer.priority_label(Priority::Medium, "az"), "orta");
        assert_eq!(localizer.priority_label(Priority::Low, "az"), "aşağı");
        // No English value table; tier names pass through untranslated
        assert_eq!(localizer.priority_label(Priority::High, "en"), "high");
    }

    #[test]
    fn languages_are_enumerable() {
        let localizer = Localizer::new();
        assert_eq!(localizer.languages(), ["az", "en"]);
    }
}
