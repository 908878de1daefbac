//! Swap fee expressed as an exact fraction.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::AmmError;
use crate::math::mul_div;

/// Fee charged on swap input, as `numerator / denominator`.
///
/// The fee is never paid out separately: the pool prices the trade with
/// the fee-reduced input and then credits the full input to its reserve,
/// so the fee compounds into every provider's pro-rata claim.
///
/// # Examples
///
/// ```
/// use hydra_liquidity::domain::{Amount, FeeRate};
///
/// let fee = FeeRate::DEFAULT; // 0.3%
/// assert_eq!(fee.amount_in_with_fee(Amount::new(1_000)), Ok(Amount::new(997)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeRate {
    numerator: u128,
    denominator: u128,
}

impl FeeRate {
    /// 0.3%, the classic constant-product fee.
    pub const DEFAULT: Self = Self {
        numerator: 3,
        denominator: 1_000,
    };

    /// No fee.
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    /// Creates a fee of `numerator / denominator`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the denominator is
    /// zero or the fee is 100% or more.
    pub fn new(numerator: u128, denominator: u128) -> Result<Self, AmmError> {
        let rate = Self {
            numerator,
            denominator,
        };
        rate.validate()?;
        Ok(rate)
    }

    /// Checks the fraction describes a fee below 100%.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] on a zero denominator or
    /// a numerator not strictly below the denominator.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.denominator == 0 {
            return Err(AmmError::InvalidConfiguration(
                "fee denominator must be positive".into(),
            ));
        }
        if self.numerator >= self.denominator {
            return Err(AmmError::InvalidConfiguration(format!(
                "fee {}/{} must be below 100%",
                self.numerator, self.denominator
            )));
        }
        Ok(())
    }

    /// Fee numerator.
    #[must_use]
    pub const fn numerator(&self) -> u128 {
        self.numerator
    }

    /// Fee denominator.
    #[must_use]
    pub const fn denominator(&self) -> u128 {
        self.denominator
    }

    /// Returns `true` when no fee is charged.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    /// Computes `floor(amount * (denominator - numerator) / denominator)`.
    ///
    /// The product is taken through [`mul_div`], so neither a large amount
    /// nor a large denominator can overflow it.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] for an unvalidated zero
    /// denominator and [`AmmError::Underflow`] if the numerator exceeds the
    /// denominator.
    pub fn amount_in_with_fee(&self, amount: Amount) -> Result<Amount, AmmError> {
        let keep = self
            .denominator
            .checked_sub(self.numerator)
            .ok_or(AmmError::Underflow("fee numerator exceeds denominator"))?;
        mul_div(amount.get(), keep, self.denominator, Rounding::Down).map(Amount::new)
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
