//! [`Price`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Listing price in US dollars.
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
pub struct Price(Decimal);

impl Price {
    /// [`Price`] of zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Highest representable [`Price`].
    pub const MAX: Self = Self(Decimal::MAX);

    /// Creates a new [`Price`] if the given `amount` is not negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative()).then_some(Self(amount))
    }

    /// Returns the amount of this [`Price`] in dollars.
    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(amount) = self;
        if amount.is_integer() {
            write!(f, "${}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "${amount}")
        }
    }
}

impl FromStr for Price {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s.strip_prefix('$').unwrap_or(s);
        Decimal::from_str(amount)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Price`")
    }
}
