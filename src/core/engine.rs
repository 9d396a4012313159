//! Statistical Feedback engine.
//!
//! One evaluation runs `clamp -> weight -> cumulate -> select -> emit -> update`
//! on the counts left by the previous evaluation. Parameter setters only
//! record requests; they are clamped and applied at the start of the next
//! evaluation.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::bins::{BinPopulation, clamp_bins_in_use, clamp_exponent};
use crate::core::conventions::Conventions;
use crate::core::lookup::WeightTable;
use crate::core::selection::{Selection, index_to_output, search, target_for};
use crate::core::weighting::DerivedArrays;
use crate::core::{EngineConfig, StatFeedError};

/// Default bins-in-use request before the host sends one.
const DEFAULT_BINS_REQUEST: f32 = 2.0;

/// Engine capacities, reported on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    pub max_bins: usize,
    pub max_exponent: usize,
    pub num_possible_increments: usize,
}

#[derive(Debug, Clone)]
pub struct StatFeed {
    config: EngineConfig,
    conventions: Conventions,
    table: Arc<WeightTable>,
    bins: BinPopulation,
    derived: DerivedArrays,
    bins_request: f32,
    exponent_request: f32,
    exponent: f32,
    last: Option<Selection>,
}

impl StatFeed {
    /// Audio-rate engine with its own tables.
    pub fn new(config: EngineConfig) -> Result<Self, StatFeedError> {
        Self::with_conventions(config, Conventions::default())
    }

    pub fn with_conventions(
        config: EngineConfig,
        conventions: Conventions,
    ) -> Result<Self, StatFeedError> {
        config.validate()?;
        let table = Arc::new(WeightTable::for_config(&config)?);
        Self::with_table(config, conventions, table)
    }

    /// Engine reading a table shared with other engines of the same dimensions.
    pub fn with_table(
        config: EngineConfig,
        conventions: Conventions,
        table: Arc<WeightTable>,
    ) -> Result<Self, StatFeedError> {
        config.validate()?;
        if !table.matches(&config) {
            return Err(StatFeedError::TableMismatch {
                table_increments: table.num_possible_increments(),
                table_exponent: table.max_exponent(),
                increments: config.num_possible_increments,
                exponent: config.max_exponent,
            });
        }

        let ceiling = u32::try_from(config.num_possible_increments).unwrap_or(u32::MAX);
        // Every slot starts at the reset value; the inactive tail is zeroed
        // by the first evaluation.
        let bins = BinPopulation::new(config.max_bins, ceiling, conventions.reset.count());

        debug!(
            max_bins = config.max_bins,
            max_exponent = config.max_exponent,
            num_possible_increments = config.num_possible_increments,
            ?conventions,
            "statfeed engine configured"
        );

        Ok(Self {
            config,
            conventions,
            table,
            derived: DerivedArrays::with_capacity(config.max_bins),
            bins,
            bins_request: DEFAULT_BINS_REQUEST,
            exponent_request: 0.0,
            exponent: 0.0,
            last: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Shared handle to the lookup tables.
    pub fn table(&self) -> Arc<WeightTable> {
        Arc::clone(&self.table)
    }

    /// Record a bins-in-use request (clamped on the next evaluation).
    pub fn set_bins_in_use(&mut self, request: f32) {
        self.bins_request = request;
    }

    /// Record an exponent request (clamped on the next evaluation).
    pub fn set_exponent(&mut self, request: f32) {
        self.exponent_request = request;
    }

    /// Effective active count as of the last evaluation (or construction).
    pub fn bins_in_use(&self) -> usize {
        self.bins.in_use()
    }

    /// Effective exponent as of the last evaluation.
    pub fn exponent(&self) -> f32 {
        self.exponent
    }

    /// All bin counts, including the zeroed inactive tail.
    pub fn bins(&self) -> &[u32] {
        self.bins.counts()
    }

    /// Weights computed by the last evaluation.
    pub fn weights(&self) -> &[f32] {
        self.derived.weights()
    }

    /// Cumulative weights computed by the last evaluation.
    pub fn cumulative(&self) -> &[f32] {
        self.derived.cumulative()
    }

    pub fn last_selection(&self) -> Option<Selection> {
        self.last
    }

    /// Return every bin to the reset value, as on construction.
    pub fn reset(&mut self) {
        self.bins.fill(self.conventions.reset.count());
        self.last = None;
        debug!(value = self.conventions.reset.count(), "statfeed bins reset");
    }

    pub fn describe(&self) -> EngineStatus {
        EngineStatus {
            max_bins: self.config.max_bins,
            max_exponent: self.config.max_exponent,
            num_possible_increments: self.config.num_possible_increments,
        }
    }

    fn apply_parameters(&mut self) {
        let in_use = clamp_bins_in_use(self.bins_request, self.config.max_bins);
        if in_use != self.bins.in_use() {
            debug!(from = self.bins.in_use(), to = in_use, "bins in use changed");
        }
        self.bins.set_in_use(in_use);
        let exponent = clamp_exponent(
            self.exponent_request,
            self.config.max_exponent,
            self.conventions.effective_exponent_range(),
        );
        if exponent != self.exponent {
            debug!(from = self.exponent, to = exponent, "exponent changed");
        }
        self.exponent = exponent;
    }

    /// Run one evaluation and return the chosen bin with its output value.
    pub fn evaluate_selection(&mut self, drive: f32) -> Selection {
        self.apply_parameters();

        self.derived.compute(
            self.bins.active(),
            self.bins.local_max(),
            self.exponent,
            self.conventions.weighting,
            &self.table,
        );

        let target = target_for(drive, self.derived.total());
        let index = search(self.derived.cumulative(), target, self.conventions.search);
        let selection = Selection {
            index,
            output: index_to_output(index, self.bins.in_use()),
        };
        trace!(drive, target, index, "statfeed selection");

        self.bins.feedback(index, self.conventions.update_order);
        self.last = Some(selection);
        selection
    }

    /// Run one evaluation and return the output in `[-0.5, 0.5]`.
    pub fn evaluate(&mut self, drive: f32) -> f32 {
        self.evaluate_selection(drive).output
    }

    /// Audio-rate block: one evaluation per sample.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        for (o, &x) in output.iter_mut().zip(input) {
            *o = self.evaluate(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conventions::{ResetValue, SearchPolicy, UpdateOrder, Weighting};

    fn engine(n: usize) -> StatFeed {
        StatFeed::new(EngineConfig::new(10, 10, n)).unwrap()
    }

    #[test]
    fn rejects_invalid_config_before_building() {
        let err = StatFeed::new(EngineConfig::new(1, 10, 10)).unwrap_err();
        assert_eq!(
            err,
            StatFeedError::InvalidDimension {
                name: "max_bins",
                value: 1
            }
        );
    }

    #[test]
    fn mismatched_shared_table_is_rejected() {
        let table = Arc::new(WeightTable::build(8, 8).unwrap());
        let err = StatFeed::with_table(EngineConfig::new(10, 10, 10), Conventions::default(), table)
            .unwrap_err();
        assert!(matches!(err, StatFeedError::TableMismatch { .. }));
    }

    #[test]
    fn parameters_apply_on_evaluation() {
        let mut sf = engine(10);
        sf.set_bins_in_use(6.0);
        sf.set_exponent(50.0);
        assert_eq!(sf.bins_in_use(), 2);
        sf.evaluate(0.0);
        assert_eq!(sf.bins_in_use(), 6);
        assert_eq!(sf.exponent(), 9.0);
        assert_eq!(sf.weights().len(), 6);
    }

    #[test]
    fn selected_bin_is_zeroed() {
        let mut sf = engine(10);
        sf.set_bins_in_use(5.0);
        sf.set_exponent(1.0);
        for drive in [-0.9, 0.1, 0.7, -0.2, 0.99] {
            let sel = sf.evaluate_selection(drive);
            assert_eq!(sf.bins()[sel.index], 0);
        }
    }

    #[test]
    fn zero_then_increment_leaves_selected_at_one() {
        let conv = Conventions {
            update_order: UpdateOrder::ZeroThenIncrement,
            ..Conventions::default()
        };
        let mut sf = StatFeed::with_conventions(EngineConfig::new(10, 10, 10), conv).unwrap();
        sf.set_bins_in_use(4.0);
        let sel = sf.evaluate_selection(0.3);
        assert_eq!(sf.bins()[sel.index], 1);
    }

    #[test]
    fn reset_restores_configured_value() {
        let conv = Conventions {
            reset: ResetValue::Zero,
            ..Conventions::default()
        };
        let mut sf = StatFeed::with_conventions(EngineConfig::new(6, 10, 10), conv).unwrap();
        sf.set_bins_in_use(4.0);
        sf.evaluate(0.5);
        sf.reset();
        assert!(sf.bins().iter().all(|&c| c == 0));

        let mut sf = engine(10);
        sf.set_bins_in_use(4.0);
        sf.evaluate(0.5);
        sf.reset();
        assert_eq!(&sf.bins()[..2], &[1, 1]);
        assert!(sf.last_selection().is_none());
    }

    #[test]
    fn all_zero_counts_still_select_in_range() {
        let conv = Conventions {
            reset: ResetValue::Zero,
            ..Conventions::default()
        };
        let mut sf = StatFeed::with_conventions(EngineConfig::new(10, 10, 10), conv).unwrap();
        sf.set_bins_in_use(4.0);
        sf.set_exponent(2.0);
        let sel = sf.evaluate_selection(-1.0);
        assert!(sel.index < 4);
    }

    #[test]
    fn binary_search_engine_matches_linear_engine() {
        let cfg = EngineConfig::new(16, 12, 20);
        let binary = Conventions {
            search: SearchPolicy::Binary,
            ..Conventions::default()
        };
        let mut a = StatFeed::new(cfg).unwrap();
        let mut b = StatFeed::with_table(cfg, binary, a.table()).unwrap();
        let drives = crate::core::drive::Drive::new(crate::core::drive::DriveKind::White, 9);
        for (k, d) in drives.take(2000).enumerate() {
            let bins = 2.0 + (k % 14) as f32;
            let expo = (k % 37) as f32 * 0.3;
            a.set_bins_in_use(bins);
            b.set_bins_in_use(bins);
            a.set_exponent(expo);
            b.set_exponent(expo);
            assert_eq!(a.evaluate_selection(d), b.evaluate_selection(d));
        }
    }

    #[test]
    fn direct_weighting_honours_unclamped_exponent() {
        let mut sf =
            StatFeed::with_conventions(EngineConfig::new(10, 4, 10), Conventions::control_rate())
                .unwrap();
        sf.set_bins_in_use(3.0);
        sf.set_exponent(12.0);
        // [1, 1, 1] -> bin 0 -> [0, 2, 2] -> bin 1 -> [1, 0, 3]
        assert_eq!(sf.evaluate_selection(-1.0).index, 0);
        assert_eq!(sf.evaluate_selection(-1.0).index, 1);
        assert_eq!(&sf.bins()[..3], &[1, 0, 3]);

        sf.evaluate(-1.0);
        assert_eq!(sf.exponent(), 12.0);
        assert_eq!(sf.conventions().weighting, Weighting::Direct);
        let expected = [(1.0f32 / 3.0).powf(12.0), 0.0, 1.0];
        assert_eq!(sf.weights(), &expected);
        // The table ceiling (max_exponent - 1 = 3) would give a larger weight.
        assert!(sf.weights()[0] < (1.0f32 / 3.0).powf(3.0));
    }

    #[test]
    fn exponent_change_takes_effect_on_next_evaluation() {
        let mut sf = engine(10);
        sf.set_bins_in_use(3.0);
        sf.evaluate(-1.0);
        assert_eq!(sf.exponent(), 0.0);
        sf.set_exponent(2.0);
        assert_eq!(sf.exponent(), 0.0);
        sf.evaluate(-1.0);
        assert_eq!(sf.exponent(), 2.0);
        // Bin 0 was zeroed by the first evaluation.
        assert_eq!(sf.weights()[0], 0.0);
    }

    #[test]
    fn describe_reports_fixed_capacities() {
        let sf = StatFeed::new(EngineConfig::new(12, 7, 30)).unwrap();
        assert_eq!(
            sf.describe(),
            EngineStatus {
                max_bins: 12,
                max_exponent: 7,
                num_possible_increments: 30,
            }
        );
    }

    #[test]
    fn process_block_fills_output() {
        let mut sf = engine(10);
        sf.set_bins_in_use(8.0);
        sf.set_exponent(0.5);
        let input = [-1.0, -0.5, 0.0, 0.5, 1.0, 0.25];
        let mut out = [9.0f32; 6];
        sf.process_block(&input, &mut out);
        assert!(out.iter().all(|v| (-0.5..=0.5).contains(v)));
    }
}
