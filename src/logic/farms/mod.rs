//! Per-farm-type decision models.
//!
//! Each module owns one farm type end to end: its bucket vocabulary, its
//! typed rule context, its rules and its priority ranking. Models are
//! registered in [`crate::logic::registry::Registry`].

mod greenhouse;
mod livestock;
mod mixed;
mod orchard;
mod wheat;

pub use greenhouse::GreenhouseModel;
pub use livestock::LivestockModel;
pub use mixed::MixedModel;
pub use orchard::OrchardModel;
pub use wheat::WheatModel;

use crate::error::{FarmOpsError, Result};

/// Soil moisture bucket shared by the open-field models, which use the
/// same agronomic thresholds: below 20% is low, up to 32% is adequate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilMoisture {
    Low,
    Adequate,
    High,
}

impl SoilMoisture {
    pub fn from_pct(sm: f64) -> Self {
        if sm < 20.0 {
            Self::Low
        } else if sm <= 32.0 {
            Self::Adequate
        } else {
            Self::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Adequate => "adequate",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Self::Low),
            "adequate" => Ok(Self::Adequate),
            "high" => Ok(Self::High),
            other => Err(FarmOpsError::InvalidInput(format!(
                "unknown soil moisture bucket '{other}'"
            ))),
        }
    }
}
