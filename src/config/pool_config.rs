//! Per-pool policy: fee and unbalanced-deposit handling.

use serde::{Deserialize, Serialize};

use crate::domain::FeeRate;
use crate::error::AmmError;

/// What an active pool does with the part of a deposit that exceeds the
/// current reserve ratio.
///
/// Shares are always minted from the limiting side; the policy only
/// decides how much of the non-limiting side is pulled from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcessPolicy {
    /// Pull only the amounts that back the minted shares; the excess
    /// never leaves the caller.
    #[default]
    RefundExcess,
    /// Pull the full offered amounts; the excess accrues to the reserves
    /// and so to every existing share.
    DonateExcess,
    /// Fail with [`AmmError::UnbalancedDeposit`] unless the offer matches
    /// the consumed amounts exactly.
    RejectUnbalanced,
}

/// Immutable parameters of one pool.
///
/// # Examples
///
/// ```
/// use hydra_liquidity::config::{ExcessPolicy, PoolConfig};
///
/// let cfg = PoolConfig::from_toml_str(r#"
///     excess_policy = "donate_excess"
///
///     [fee]
///     numerator = 1
///     denominator = 100
/// "#).expect("valid config");
/// assert_eq!(cfg.excess_policy(), ExcessPolicy::DonateExcess);
/// assert_eq!(cfg.fee().numerator(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    fee: FeeRate,
    excess_policy: ExcessPolicy,
}

impl PoolConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the fee is invalid.
    pub fn new(fee: FeeRate, excess_policy: ExcessPolicy) -> Result<Self, AmmError> {
        let config = Self { fee, excess_policy };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// Missing keys fall back to the defaults (0.3% fee, refund excess).
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] on malformed TOML or an
    /// invalid fee.
    pub fn from_toml_str(source: &str) -> Result<Self, AmmError> {
        let config: Self = toml::from_str(source)
            .map_err(|e| AmmError::InvalidConfiguration(e.message().to_owned()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the fee is invalid.
    pub fn validate(&self) -> Result<(), AmmError> {
        self.fee.validate()
    }

    /// The swap fee.
    #[must_use]
    pub const fn fee(&self) -> FeeRate {
        self.fee
    }

    /// The unbalanced-deposit policy.
    #[must_use]
    pub const fn excess_policy(&self) -> ExcessPolicy {
        self.excess_policy
    }

    /// Returns a copy with a different fee, validated.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the fee is invalid.
    pub fn with_fee(self, fee: FeeRate) -> Result<Self, AmmError> {
        Self::new(fee, self.excess_policy)
    }

    /// Returns a copy with a different excess policy.
    #[must_use]
    pub const fn with_excess_policy(self, excess_policy: ExcessPolicy) -> Self {
        Self {
            fee: self.fee,
            excess_policy,
        }
    }
}
