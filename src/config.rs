//! Configuration for lossless-metrics

use crate::error::CompressError;
use crate::golomb::RemainderCode;
use crate::lzw::LzwCostModel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Golomb divisor `m`, must be at least 1.
    pub golomb_m: u64,
    pub golomb_remainder: RemainderCode,
    pub lzw_cost: LzwCostModel,
    pub max_input_len: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            golomb_m: 4,
            golomb_remainder: RemainderCode::Fixed,
            lzw_cost: LzwCostModel::VariableWidth,
            max_input_len: 1_000_000,
        }
    }
}

impl EstimatorConfig {
    /// Load a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CompressError> {
        Ok(serde_json::from_str(json)?)
    }
}
