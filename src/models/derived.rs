use crate::error::{FarmOpsError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// A single derived bucket value.
///
/// Most buckets are categorical labels drawn from a small per-farm
/// vocabulary; a few are boolean flags or rounded numeric aggregates
/// (e.g. feed per animal) that downstream rules and reports reuse.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BucketValue {
    Label(&'static str),
    Flag(bool),
    Value(f64),
}

impl BucketValue {
    pub fn display(&self) -> String {
        match self {
            BucketValue::Label(s) => (*s).to_string(),
            BucketValue::Flag(b) => b.to_string(),
            BucketValue::Value(n) => format!("{n}"),
        }
    }
}

/// Buckets computed once from raw inputs by a farm model's bucketizer.
/// Read-only after construction; ordering is deterministic for output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedBuckets(BTreeMap<String, BucketValue>);

impl DerivedBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_label(mut self, name: &str, label: &'static str) -> Self {
        self.0.insert(name.to_string(), BucketValue::Label(label));
        self
    }

    pub fn set_flag(mut self, name: &str, flag: bool) -> Self {
        self.0.insert(name.to_string(), BucketValue::Flag(flag));
        self
    }

    pub fn set_value(mut self, name: &str, value: f64) -> Self {
        self.0.insert(name.to_string(), BucketValue::Value(value));
        self
    }

    fn get(&self, name: &str) -> Result<&BucketValue> {
        self.0.get(name).ok_or_else(|| {
            FarmOpsError::InvalidInput(format!("missing derived bucket '{name}'"))
        })
    }

    /// Categorical bucket label, for context construction.
    pub fn label(&self, name: &str) -> Result<&'static str> {
        match self.get(name)? {
            BucketValue::Label(s) => Ok(s),
            other => Err(FarmOpsError::InvalidInput(format!(
                "derived bucket '{name}' is not a label: {other:?}"
            ))),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            BucketValue::Flag(b) => Ok(*b),
            other => Err(FarmOpsError::InvalidInput(format!(
                "derived bucket '{name}' is not a flag: {other:?}"
            ))),
        }
    }

    pub fn value(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            BucketValue::Value(n) => Ok(*n),
            other => Err(FarmOpsError::InvalidInput(format!(
                "derived bucket '{name}' is not numeric: {other:?}"
            ))),
        }
    }

    /// Stringified view for the rendered output.
    pub fn display_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.display()))
            .collect()
    }
}

/// Round to one decimal, the convention for derived per-head aggregates.
pub fn round1(n: f64) -> f64 {
    (n * 10.0).round() / 10.0
}
