//! Completion percentage
//!
//! All progress values, manual or derived, are whole numbers in `[0, 100]`.

use serde::{Deserialize, Serialize};

/// Percentage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PercentError {
    /// Value above 100
    #[error("percentage out of range: {0} (expected 0..=100)")]
    OutOfRange(u32),
}

/// Whole-number percentage in `[0, 100]`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u8")]
pub struct Percent(u8);

impl Percent {
    /// 0%
    pub const ZERO: Self = Self(0);

    /// 100%
    pub const FULL: Self = Self(100);

    /// Create a percentage, rejecting values above 100
    ///
    /// # Errors
    /// Returns [`PercentError::OutOfRange`] if `value > 100`
    #[inline]
    pub fn new(value: u32) -> Result<Self, PercentError> {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Ok(Self(v)),
            _ => Err(PercentError::OutOfRange(value)),
        }
    }

    /// Create a percentage, clamping values above 100
    #[inline]
    #[must_use]
    pub fn saturating(value: u32) -> Self {
        Self(u8::try_from(value.min(100)).unwrap_or(100))
    }

    /// Get the numeric value
    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Round `sum / count` to the nearest whole percent, ties rounding up
    ///
    /// Uses integer arithmetic so that every formulation of an equal-weight
    /// mean lands on the same unit. An empty set averages to zero.
    #[must_use]
    pub fn round_mean(sum: u64, count: u64) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        let rounded = (2 * sum + count) / (2 * count);
        Self::saturating(u32::try_from(rounded).unwrap_or(u32::MAX))
    }

    /// Rounded unweighted mean of a sequence of percentages
    #[must_use]
    pub fn mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Percent>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), p| (sum + u64::from(p.0), count + 1));
        Self::round_mean(sum, count)
    }
}

impl TryFrom<u32> for Percent {
    type Error = PercentError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(p: Percent) -> Self {
        p.0
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_above_hundred() {
        assert_eq!(Percent::new(101), Err(PercentError::OutOfRange(101)));
        assert_eq!(Percent::new(100), Ok(Percent::FULL));
        assert_eq!(Percent::new(0), Ok(Percent::ZERO));
    }

    #[test]
    fn saturating_clamps() {
        assert_eq!(Percent::saturating(250).value(), 100);
        assert_eq!(Percent::saturating(37).value(), 37);
    }

    #[test]
    fn round_mean_ties_round_up() {
        // [50, 51] -> 50.5 -> 51
        assert_eq!(Percent::round_mean(101, 2).value(), 51);
        // [40, 70] -> 55
        assert_eq!(Percent::round_mean(110, 2).value(), 55);
        // 100 / 3 = 33.33 -> 33, 200 / 3 = 66.67 -> 67
        assert_eq!(Percent::round_mean(100, 3).value(), 33);
        assert_eq!(Percent::round_mean(200, 3).value(), 67);
    }

    #[test]
    fn round_mean_of_nothing_is_zero() {
        assert_eq!(Percent::round_mean(0, 0), Percent::ZERO);
        assert_eq!(Percent::mean(std::iter::empty()), Percent::ZERO);
    }

    #[test]
    fn deserialize_validates_range() {
        let ok: Percent = serde_json::from_str("42").unwrap();
        assert_eq!(ok.value(), 42);
        assert!(serde_json::from_str::<Percent>("120").is_err());
        assert!(serde_json::from_str::<Percent>("-3").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "42");
    }

    proptest! {
        #[test]
        fn round_mean_is_half_up(values in proptest::collection::vec(0u32..=100, 1..40)) {
            let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
            let count = values.len() as u64;
            // The first decimal digit decides the rounding direction
            let expected = ((sum * 10 / count) + 5) / 10;
            let got = u64::from(Percent::round_mean(sum, count).value());
            prop_assert_eq!(got, expected);
            prop_assert!(got <= 100);
        }
    }
}
