//! Liquidity management and share accounting.
//!
//! # Share Conservation
//!
//! The total reported by [`LiquidityPool::total_shares`] changes only
//! through [`LiquidityPool::add_liquidity`] and
//! [`LiquidityPool::remove_liquidity`], and always equals the sum of all
//! holder balances:
//!
//! ```text
//! S = Σ shares_of(holder)
//! S = 0  ⇔  reserve_a = 0 ∧ reserve_b = 0
//! ```

use super::SwapPool;
use crate::domain::{AccountId, Amount, Shares};
use crate::error::AmmError;

/// Result of a deposit: what was taken and what was minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityReceipt {
    /// Token-A amount pulled into reserves.
    pub amount_a: Amount,
    /// Token-B amount pulled into reserves.
    pub amount_b: Amount,
    /// Shares credited to the provider.
    pub shares: Shares,
}

/// Pools that accept deposits in exchange for ownership shares.
pub trait LiquidityPool: SwapPool {
    /// Deposits both assets for `provider` and mints shares.
    ///
    /// An empty pool takes both amounts as offered and mints
    /// `⌊√(amount_a × amount_b)⌋`.  An active pool mints from the limiting
    /// side; how much of the other side is taken depends on the pool's
    /// [`ExcessPolicy`](crate::config::ExcessPolicy).
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAmount`] if either amount is zero.
    /// - [`AmmError::InsufficientLiquidityMinted`] if no share would be minted.
    /// - [`AmmError::UnbalancedDeposit`] under `RejectUnbalanced` when the
    ///   offer does not match the ratio.
    /// - [`AmmError::TransferFailed`] if the ledger rejects either pull.
    fn add_liquidity(
        &self,
        provider: AccountId,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<LiquidityReceipt, AmmError>;

    /// Burns `shares` held by `provider` and pays out the pro-rata reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAmount`] if `shares` is zero.
    /// - [`AmmError::InsufficientShares`] if the provider holds fewer shares.
    /// - [`AmmError::InsufficientLiquidityBurned`] if both payouts round to zero.
    /// - [`AmmError::TransferFailed`] if the ledger rejects either release.
    fn remove_liquidity(
        &self,
        provider: AccountId,
        shares: Shares,
    ) -> Result<(Amount, Amount), AmmError>;

    /// Current `(reserve_a, reserve_b)`.
    #[must_use]
    fn reserves(&self) -> (Amount, Amount);

    /// Shares held by `holder`; zero if none.
    #[must_use]
    fn shares_of(&self, holder: &AccountId) -> Shares;

    /// Sum of all holder balances.
    #[must_use]
    fn total_shares(&self) -> Shares;
}
