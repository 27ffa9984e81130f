use serde::Serialize;
use std::collections::BTreeMap;

/// Interpolation parameter carried by a [`Reason`].
///
/// The variant fixes the rendering convention: `Int` renders as a whole
/// number (percentages, counts, millimetres), `Float` renders with one
/// decimal (temperatures, litres, kilograms per head), `Flag` and `Text`
/// go through the localizer's translation tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Flag(bool),
    Text(String),
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Flag(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Language-independent justification for a fired rule: a template key plus
/// named interpolation parameters. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reason {
    pub key: String,
    pub params: BTreeMap<String, ParamValue>,
}

impl Reason {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            params: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Percentage parameter; truncated to a whole number by convention.
    pub fn with_pct(self, name: &str, value: f64) -> Self {
        self.with(name, value.trunc() as i64)
    }
}

/// A recommendable or disallowable activity, identified by a stable code.
/// The code is the join key for conflict resolution; reasons accumulate in
/// rule-evaluation order when several rules fire for the same code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub code: String,
    pub reasons: Vec<Reason>,
}

impl Action {
    pub fn new(code: &str, reasons: Vec<Reason>) -> Self {
        Self {
            code: code.to_string(),
            reasons,
        }
    }
}

/// Urgency tier assigned to surviving recommendations. Ordered so that
/// `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal artifact of one model run: derived buckets, prioritized
/// recommendations sorted by descending tier, and disallowed actions in
/// rule-evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOutput {
    pub derived: super::DerivedBuckets,
    pub recommendations: Vec<(Action, Priority)>,
    pub not_recommended: Vec<Action>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(Priority::High.as_str(), "high");
    }

    #[test]
    fn reason_builder_collects_params() {
        let reason = Reason::new("soil_moisture_low").with_pct("sm", 16.7);
        assert_eq!(reason.key, "soil_moisture_low");
        assert_eq!(reason.params["sm"], ParamValue::Int(16));
    }

    #[test]
    fn param_conversions() {
        assert_eq!(ParamValue::from(3_i64), ParamValue::Int(3));
        assert_eq!(ParamValue::from(35.5), ParamValue::Float(35.5));
        assert_eq!(ParamValue::from(true), ParamValue::Flag(true));
        assert_eq!(
            ParamValue::from("tillering"),
            ParamValue::Text("tillering".into())
        );
    }
}
