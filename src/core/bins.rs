//! Bin population: per-bin counts, the active prefix, and the feedback update.

use crate::core::conventions::{ExponentRange, UpdateOrder};

/// Smallest usable active prefix.
pub const MIN_BINS_IN_USE: usize = 2;

/// Clamp a bins-in-use request.
///
/// Requests at or above `max_bins` keep one slot spare (`max_bins - 1`).
/// The result never drops below 2, so a two-slot population uses both.
pub fn clamp_bins_in_use(request: f32, max_bins: usize) -> usize {
    let n = if request.is_nan() || request < MIN_BINS_IN_USE as f32 {
        MIN_BINS_IN_USE
    } else if request >= max_bins as f32 {
        max_bins - 1
    } else {
        request as usize
    };
    n.clamp(MIN_BINS_IN_USE, max_bins)
}

/// Clamp an exponent request.
pub fn clamp_exponent(request: f32, max_exponent: usize, range: ExponentRange) -> f32 {
    if request.is_nan() || request < 0.0 {
        return 0.0;
    }
    match range {
        ExponentRange::Clamped => request.min((max_exponent - 1) as f32),
        ExponentRange::Unclamped => request,
    }
}

/// Fixed-capacity population of occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinPopulation {
    counts: Vec<u32>,
    ceiling: u32,
    in_use: usize,
}

impl BinPopulation {
    /// `capacity` slots, each saturating at `ceiling`, all set to `initial`.
    pub fn new(capacity: usize, ceiling: u32, initial: u32) -> Self {
        let in_use = MIN_BINS_IN_USE.min(capacity);
        Self {
            counts: vec![initial.min(ceiling); capacity],
            ceiling,
            in_use,
        }
    }

    pub fn capacity(&self) -> usize {
        self.counts.len()
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// All counts, including the inactive tail.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Counts of the active prefix.
    pub fn active(&self) -> &[u32] {
        &self.counts[..self.in_use]
    }

    /// Set the active prefix and zero everything past it.
    pub fn set_in_use(&mut self, in_use: usize) {
        self.in_use = in_use.clamp(MIN_BINS_IN_USE.min(self.capacity()), self.capacity());
        self.zero_inactive();
    }

    pub fn zero_inactive(&mut self) {
        for c in &mut self.counts[self.in_use..] {
            *c = 0;
        }
    }

    /// Largest active count, floored at 1.
    pub fn local_max(&self) -> u32 {
        self.active().iter().copied().max().unwrap_or(0).max(1)
    }

    /// Overwrite every slot with `value`.
    pub fn fill(&mut self, value: u32) {
        let value = value.min(self.ceiling);
        for c in &mut self.counts {
            *c = value;
        }
    }

    #[cfg(test)]
    fn set_count(&mut self, index: usize, value: u32) {
        if let Some(c) = self.counts.get_mut(index) {
            *c = value.min(self.ceiling);
        }
    }

    fn increment_active(&mut self) {
        let ceiling = self.ceiling;
        for c in &mut self.counts[..self.in_use] {
            *c = c.saturating_add(1).min(ceiling);
        }
    }

    /// Feedback update after `choice` was selected from the pre-update counts.
    pub fn feedback(&mut self, choice: usize, order: UpdateOrder) {
        debug_assert!(choice < self.in_use, "choice {choice} outside active prefix");
        match order {
            UpdateOrder::IncrementThenZero => {
                self.increment_active();
                self.counts[choice] = 0;
            }
            UpdateOrder::ZeroThenIncrement => {
                self.counts[choice] = 0;
                self.increment_active();
            }
        }
    }
}
