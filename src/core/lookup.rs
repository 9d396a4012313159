//! Quantized weight tables for the audio-rate weighting stage.
//! low[i][j] = (i/N)^(j/E), high[i][j] = (i/N)^j

use crate::core::{EngineConfig, StatFeedError};

/// Row-major rectangular grid of f32 values, sized once.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Grid {
    fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Bounds-checked lookup.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Unchecked-shape lookup; callers keep both indices in range.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        debug_assert!(row < self.rows, "row {row} >= {}", self.rows);
        debug_assert!(col < self.cols, "col {col} >= {}", self.cols);
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }
}

/// Pair of precomputed exponent tables.
///
/// Rows index the normalized bin value `i / N` for `i in 0..N`. The high
/// table has `E` columns (integer exponents `0..E`). The low table is
/// addressed with `trunc((N - 1) * exponent)` for exponents below 1. f32
/// rounding can lift that product to `N - 1` for exponents just under 1, so
/// the low table carries `max(E, N)` columns.
///
/// `0^0` evaluates to 1, matching floating-point `pow`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    num_possible_increments: usize,
    max_exponent: usize,
    low: Grid,
    high: Grid,
}

impl WeightTable {
    pub fn build(num_possible_increments: usize, max_exponent: usize) -> Result<Self, StatFeedError> {
        if num_possible_increments < 2 {
            return Err(StatFeedError::InvalidDimension {
                name: "num_possible_increments",
                value: num_possible_increments,
            });
        }
        if max_exponent < 2 {
            return Err(StatFeedError::InvalidDimension {
                name: "max_exponent",
                value: max_exponent,
            });
        }

        let n = num_possible_increments as f64;
        let e = max_exponent as f64;
        let low_cols = max_exponent.max(num_possible_increments);

        let low = Grid::from_fn(num_possible_increments, low_cols, |i, j| {
            (i as f64 / n).powf(j as f64 / e) as f32
        });
        let high = Grid::from_fn(num_possible_increments, max_exponent, |i, j| {
            (i as f64 / n).powf(j as f64) as f32
        });

        Ok(Self {
            num_possible_increments,
            max_exponent,
            low,
            high,
        })
    }

    pub fn for_config(config: &EngineConfig) -> Result<Self, StatFeedError> {
        Self::build(config.num_possible_increments, config.max_exponent)
    }

    pub fn num_possible_increments(&self) -> usize {
        self.num_possible_increments
    }

    pub fn max_exponent(&self) -> usize {
        self.max_exponent
    }

    /// Table used for exponents below 1.
    pub fn low(&self) -> &Grid {
        &self.low
    }

    /// Table used for exponents at or above 1.
    pub fn high(&self) -> &Grid {
        &self.high
    }

    /// Whether this table was built for `config`.
    pub fn matches(&self, config: &EngineConfig) -> bool {
        self.num_possible_increments == config.num_possible_increments
            && self.max_exponent == config.max_exponent
    }

    /// Weight for a quantized bin row at `exponent`.
    ///
    /// The branch is chosen by the exponent value: below 1 the exponent is
    /// quantized relative to the increment range, at or above 1 it indexes
    /// integer exponent steps directly.
    ///
    /// `row` must be below `N` and `exponent` at most `E - 1`.
    #[inline]
    pub fn weight(&self, row: usize, exponent: f32) -> f32 {
        if exponent < 1.0 {
            let col = ((self.num_possible_increments - 1) as f32 * exponent) as usize;
            self.low.at(row, col)
        } else {
            self.high.at(row, exponent as usize)
        }
    }
}
