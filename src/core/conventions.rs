//! Switches between the behaviours of the control-rate and audio-rate objects.
//!
//! `Conventions::default()` is the audio-rate object: table lookup, one-based
//! reset, increment-then-zero feedback, clamped exponent.

use serde::{Deserialize, Serialize};

/// How bin counts become weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weighting {
    /// Quantized lookup in the precomputed tables (audio-rate).
    #[default]
    Lookup,
    /// `powf` on the normalized count (control-rate).
    Direct,
}

/// Search over the cumulative array. Both resolve to the first index whose
/// cumulative weight reaches the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchPolicy {
    #[default]
    Linear,
    Binary,
}

/// Count written to every bin on construction and `reset()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetValue {
    Zero,
    #[default]
    One,
}

impl ResetValue {
    pub fn count(self) -> u32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// Order of the two halves of the feedback update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateOrder {
    /// Selected bin ends the cycle at 0.
    #[default]
    IncrementThenZero,
    /// Selected bin ends the cycle at 1.
    ZeroThenIncrement,
}

/// Exponent range policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExponentRange {
    /// `[0, max_exponent - 1]`.
    #[default]
    Clamped,
    /// Only negative requests are lifted to 0. Honoured by direct weighting;
    /// table lookup always clamps.
    Unclamped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conventions {
    #[serde(default)]
    pub weighting: Weighting,
    #[serde(default)]
    pub search: SearchPolicy,
    #[serde(default)]
    pub reset: ResetValue,
    #[serde(default)]
    pub update_order: UpdateOrder,
    #[serde(default)]
    pub exponent: ExponentRange,
}

impl Conventions {
    /// The working control-rate object: direct exponentiation, unclamped
    /// exponent, one-based reset.
    pub fn control_rate() -> Self {
        Self {
            weighting: Weighting::Direct,
            exponent: ExponentRange::Unclamped,
            ..Self::default()
        }
    }

    /// Effective exponent policy once the weighting mode is taken into account.
    pub fn effective_exponent_range(&self) -> ExponentRange {
        match self.weighting {
            Weighting::Lookup => ExponentRange::Clamped,
            Weighting::Direct => self.exponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_forces_clamped_exponent() {
        let conv = Conventions {
            exponent: ExponentRange::Unclamped,
            ..Conventions::default()
        };
        assert_eq!(conv.effective_exponent_range(), ExponentRange::Clamped);
        assert_eq!(
            Conventions::control_rate().effective_exponent_range(),
            ExponentRange::Unclamped
        );
    }

    #[test]
    fn parses_kebab_case_toml() {
        let conv: Conventions = toml::from_str(
            "weighting = \"direct\"\nupdate_order = \"zero-then-increment\"\nreset = \"zero\"",
        )
        .unwrap();
        assert_eq!(conv.weighting, Weighting::Direct);
        assert_eq!(conv.update_order, UpdateOrder::ZeroThenIncrement);
        assert_eq!(conv.reset, ResetValue::Zero);
        assert_eq!(conv.search, SearchPolicy::Linear);
    }
}
