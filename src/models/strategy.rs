use crate::error::EtlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy for fields lacking a valid value before validation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    /// Remove any row with at least one missing value
    #[default]
    Drop,
    /// Replace missing numeric values with 0
    FillZero,
    /// Replace missing numeric values with the column mean
    FillMean,
}

impl MissingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingStrategy::Drop => "drop",
            MissingStrategy::FillZero => "fill_zero",
            MissingStrategy::FillMean => "fill_mean",
        }
    }
}

impl FromStr for MissingStrategy {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(MissingStrategy::Drop),
            "fill_zero" => Ok(MissingStrategy::FillZero),
            "fill_mean" => Ok(MissingStrategy::FillMean),
            other => Err(EtlError::Config(format!(
                "Unknown missing-value strategy: '{}' (expected drop, fill_zero or fill_mean)",
                other
            ))),
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
