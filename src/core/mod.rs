//! Statistical Feedback engine primitives (bins, tables, weighting, search).

pub mod bins;
pub mod conventions;
pub mod drive;
pub mod engine;
pub mod lookup;
pub mod selection;
pub mod weighting;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while configuring an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatFeedError {
    /// A configuration dimension is below the minimum of 2.
    #[error("{name} must be at least 2 (got {value})")]
    InvalidDimension { name: &'static str, value: usize },
    /// A shared weight table was built for different dimensions.
    #[error(
        "weight table is {table_increments}x{table_exponent}, engine needs {increments}x{exponent}"
    )]
    TableMismatch {
        table_increments: usize,
        table_exponent: usize,
        increments: usize,
        exponent: usize,
    },
}

/// Fixed engine dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the bin population.
    #[serde(default = "EngineConfig::default_max_bins")]
    pub max_bins: usize,
    /// Quantization ceiling of the exponent axis.
    #[serde(default = "EngineConfig::default_max_exponent")]
    pub max_exponent: usize,
    /// Saturation ceiling of a bin count and quantization of the value axis.
    #[serde(default = "EngineConfig::default_num_possible_increments")]
    pub num_possible_increments: usize,
}

impl EngineConfig {
    fn default_max_bins() -> usize {
        1000
    }
    fn default_max_exponent() -> usize {
        1000
    }
    fn default_num_possible_increments() -> usize {
        1000
    }

    pub fn new(max_bins: usize, max_exponent: usize, num_possible_increments: usize) -> Self {
        Self {
            max_bins,
            max_exponent,
            num_possible_increments,
        }
    }

    /// Check every dimension before anything is allocated.
    pub fn validate(&self) -> Result<(), StatFeedError> {
        for (name, value) in [
            ("max_bins", self.max_bins),
            ("max_exponent", self.max_exponent),
            ("num_possible_increments", self.num_possible_increments),
        ] {
            if value < 2 {
                return Err(StatFeedError::InvalidDimension { name, value });
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_bins: Self::default_max_bins(),
            max_exponent: Self::default_max_exponent(),
            num_possible_increments: Self::default_num_possible_increments(),
        }
    }
}
