//! Selection stage: drive value -> target in cumulative space -> bin index.

use crate::core::conventions::SearchPolicy;

/// Replacement for a target of exactly zero.
pub const ZERO_TARGET_EPSILON: f32 = 0.001;

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Chosen bin, in `[0, bins_in_use - 1]`.
    pub index: usize,
    /// `index / (bins_in_use - 1) - 0.5`, in `[-0.5, 0.5]`.
    pub output: f32,
}

/// Clamp a drive sample to `[-1, 1]`. NaN drives the centre.
#[inline]
pub fn clamp_drive(drive: f32) -> f32 {
    if drive.is_nan() {
        0.0
    } else {
        drive.clamp(-1.0, 1.0)
    }
}

/// Map a drive sample onto `[0, total]`, substituting the epsilon for 0.
#[inline]
pub fn target_for(drive: f32, total: f32) -> f32 {
    let scaled = ((clamp_drive(drive) as f64 + 1.0) * 0.5 * total as f64) as f32;
    if scaled == 0.0 || scaled.is_nan() {
        ZERO_TARGET_EPSILON
    } else {
        scaled
    }
}

/// First index whose cumulative weight is `>= target`.
///
/// Falls back to the last index when no entry reaches the target (all-zero
/// weights with the epsilon target).
pub fn search(cumulative: &[f32], target: f32, policy: SearchPolicy) -> usize {
    debug_assert!(!cumulative.is_empty());
    let last = cumulative.len().saturating_sub(1);
    let found = match policy {
        SearchPolicy::Linear => linear_search(cumulative, target),
        SearchPolicy::Binary => binary_search(cumulative, target),
    };
    found.unwrap_or(last)
}

fn linear_search(cumulative: &[f32], target: f32) -> Option<usize> {
    if cumulative.first().is_some_and(|&c| c >= target) {
        return Some(0);
    }
    (1..cumulative.len()).find(|&i| cumulative[i] >= target && cumulative[i - 1] < target)
}

fn binary_search(cumulative: &[f32], target: f32) -> Option<usize> {
    let idx = cumulative.partition_point(|&c| c < target);
    (idx < cumulative.len()).then_some(idx)
}

/// Scale a chosen index into `[-0.5, 0.5]`.
#[inline]
pub fn index_to_output(index: usize, bins_in_use: usize) -> f32 {
    let span = bins_in_use.saturating_sub(1).max(1) as f32;
    index as f32 / span - 0.5
}
