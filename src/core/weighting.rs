//! Weighting stage: counts -> weights -> cumulative weights.

use crate::core::conventions::Weighting;
use crate::core::lookup::WeightTable;

/// Per-evaluation scratch arrays, sized once to the bin capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedArrays {
    weight: Vec<f32>,
    cumulative: Vec<f32>,
    len: usize,
}

impl DerivedArrays {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            weight: vec![0.0; capacity],
            cumulative: vec![0.0; capacity],
            len: 0,
        }
    }

    /// Weights of the active prefix from the last evaluation.
    pub fn weights(&self) -> &[f32] {
        &self.weight[..self.len]
    }

    /// Running sum of `weights()`, non-decreasing.
    pub fn cumulative(&self) -> &[f32] {
        &self.cumulative[..self.len]
    }

    /// Last cumulative value, or 0 before the first evaluation.
    pub fn total(&self) -> f32 {
        self.cumulative().last().copied().unwrap_or(0.0)
    }

    /// Recompute both arrays from scratch for `counts`.
    pub fn compute(
        &mut self,
        counts: &[u32],
        local_max: u32,
        exponent: f32,
        weighting: Weighting,
        table: &WeightTable,
    ) {
        let len = counts.len().min(self.weight.len());
        let local_max = local_max.max(1) as f32;
        let steps = (table.num_possible_increments() - 1) as f32;

        for (w, &count) in self.weight[..len].iter_mut().zip(counts) {
            *w = match weighting {
                Weighting::Lookup => {
                    let row = (steps * (count as f32 / local_max)) as usize;
                    table.weight(row, exponent)
                }
                Weighting::Direct => direct_weight(count, local_max, exponent),
            };
        }

        let mut acc = 0.0f32;
        for (c, &w) in self.cumulative[..len].iter_mut().zip(&self.weight[..len]) {
            acc += w;
            *c = acc;
        }
        self.len = len;
    }
}

/// `(count / local_max)^exponent` without quantization. `0^0 = 1`.
#[inline]
pub fn direct_weight(count: u32, local_max: f32, exponent: f32) -> f32 {
    (count as f32 / local_max).powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> WeightTable {
        WeightTable::build(10, 10).unwrap()
    }

    #[test]
    fn cumulative_is_running_sum() {
        let mut d = DerivedArrays::with_capacity(8);
        d.compute(&[1, 3, 0, 2], 3, 1.0, Weighting::Lookup, &table());
        let w = d.weights().to_vec();
        assert_eq!(w.len(), 4);
        assert_eq!(d.cumulative()[0], w[0]);
        for i in 1..4 {
            assert_eq!(d.cumulative()[i], d.cumulative()[i - 1] + w[i]);
            assert!(d.cumulative()[i] >= d.cumulative()[i - 1]);
        }
        assert_eq!(d.total(), d.cumulative()[3]);
    }

    #[test]
    fn lookup_rows_use_truncated_normalized_count() {
        let mut d = DerivedArrays::with_capacity(4);
        // local max 3: rows trunc(9 * 1/3) = 3, trunc(9 * 3/3) = 9
        d.compute(&[1, 3], 3, 1.0, Weighting::Lookup, &table());
        assert_eq!(d.weights()[0], table().high().get(3, 1).unwrap());
        assert_eq!(d.weights()[1], table().high().get(9, 1).unwrap());
    }

    #[test]
    fn zero_exponent_gives_unit_weights_in_both_modes() {
        let mut d = DerivedArrays::with_capacity(5);
        for mode in [Weighting::Lookup, Weighting::Direct] {
            d.compute(&[0, 4, 2, 1, 4], 4, 0.0, mode, &table());
            assert!(d.weights().iter().all(|&w| w == 1.0), "{mode:?}");
        }
    }

    #[test]
    fn direct_weight_is_exact_power() {
        assert_eq!(direct_weight(2, 4.0, 2.0), 0.25);
        assert_eq!(direct_weight(0, 4.0, 0.0), 1.0);
        assert_eq!(direct_weight(0, 4.0, 1.5), 0.0);
    }

    #[test]
    fn shorter_recompute_hides_stale_tail() {
        let mut d = DerivedArrays::with_capacity(6);
        d.compute(&[1, 1, 1, 1, 1], 1, 1.0, Weighting::Lookup, &table());
        d.compute(&[1, 1], 1, 1.0, Weighting::Lookup, &table());
        assert_eq!(d.weights().len(), 2);
        assert_eq!(d.cumulative().len(), 2);
    }
}
