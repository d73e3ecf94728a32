//! [`Co2Savings`]-related definitions.

use std::{fmt, iter, ops, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Estimated CO₂ savings in kilograms.
///
/// Never negative.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(transparent)
)]
pub struct Co2Savings(Decimal);

impl Co2Savings {
    /// [`Co2Savings`] of zero kilograms.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Co2Savings`] if the given `kilograms` is not negative.
    #[must_use]
    pub fn new(kilograms: Decimal) -> Option<Self> {
        (!kilograms.is_sign_negative()).then_some(Self(kilograms))
    }

    /// Returns this [`Co2Savings`] in kilograms.
    #[must_use]
    pub fn kilograms(self) -> Decimal {
        self.0
    }

    /// Rounds this [`Co2Savings`] to whole kilograms, halves away from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl ops::Add for Co2Savings {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl iter::Sum for Co2Savings {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl fmt::Display for Co2Savings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(kilograms) = self;
        if kilograms.is_integer() {
            write!(f, "{}kg", kilograms.to_i128().expect("integer"))
        } else {
            write!(f, "{kilograms}kg")
        }
    }
}

impl FromStr for Co2Savings {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kilograms = s.strip_suffix("kg").unwrap_or(s);
        Decimal::from_str(kilograms)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Co2Savings`")
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Co2Savings;

    fn kg(s: &str) -> Co2Savings {
        Co2Savings::new(s.parse().unwrap()).unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(Co2Savings::from_str("15kg").unwrap(), kg("15"));
        assert_eq!(Co2Savings::from_str("0.5").unwrap(), kg("0.5"));

        assert!(Co2Savings::from_str("-3kg").is_err());
        assert!(Co2Savings::from_str("heavy").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(kg("15").to_string(), "15kg");
        assert_eq!(kg("15.0").to_string(), "15kg");
        assert_eq!(kg("0.5").to_string(), "0.5kg");
    }

    #[test]
    fn rounds_halves_away_from_zero() {
        assert_eq!(kg("2.5").round(), kg("3"));
        assert_eq!(kg("2.4").round(), kg("2"));
        assert_eq!(kg("3.5").round(), kg("4"));
    }

    #[test]
    fn sums() {
        let total: Co2Savings = [kg("5"), kg("0.5"), kg("14.5")]
            .into_iter()
            .sum();
        assert_eq!(total, kg("20"));
        assert_eq!(
            Vec::<Co2Savings>::new().into_iter().sum::<Co2Savings>(),
            Co2Savings::ZERO,
        );
    }

    #[test]
    fn rejects_negative() {
        assert!(Co2Savings::new(Decimal::from(-1)).is_none());
    }
}
