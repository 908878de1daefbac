//! Swap surface of a pool.
//!
//! # Fee Invariant
//!
//! The fee is applied to the input only, as the factor `(d − n)/d` of a
//! [`FeeRate`] `n/d`, and the **full** input is credited to the input
//! reserve:
//!
//! ```text
//! out          = ⌊Rout · x·(d−n) / (Rin·d + x·(d−n))⌋
//! Rin'         = Rin + x
//! Rout'        = Rout − out
//! Rin' · Rout' ≥ Rin · Rout
//! ```

use crate::domain::{AccountId, Amount, FeeRate, TokenAddress, TokenPair};
use crate::error::AmmError;

/// Priced outcome of a prospective swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Full input, fee included.
    pub amount_in: Amount,
    /// Input after the fee factor, floored; informational.
    pub amount_in_with_fee: Amount,
    /// Output the trader would receive.
    pub amount_out: Amount,
}

impl SwapQuote {
    /// The part of the input retained as fee.
    #[must_use]
    pub fn fee(&self) -> Amount {
        self.amount_in
            .checked_sub(&self.amount_in_with_fee)
            .unwrap_or(Amount::ZERO)
    }
}

/// Exact-input swaps between the two assets of a pool.
pub trait SwapPool {
    /// Sells `amount_in` of `token_in` for the other asset on behalf of
    /// `trader` and returns the output amount.
    ///
    /// The input is pulled from the trader before the output is released,
    /// and either both transfers and the reserve update happen or none
    /// does.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidTokenForPool`] if `token_in` is not in the pair.
    /// - [`AmmError::ZeroAmount`] if `amount_in` is zero.
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    /// - [`AmmError::InsufficientOutputAmount`] if the output rounds to zero.
    /// - [`AmmError::TransferFailed`] if the ledger rejects either leg.
    fn swap(
        &self,
        trader: AccountId,
        token_in: TokenAddress,
        amount_in: Amount,
    ) -> Result<Amount, AmmError>;

    /// Prices a swap against the current reserves without executing it.
    ///
    /// # Errors
    ///
    /// Same as [`swap`](Self::swap) except for transfer failures.
    fn quote(&self, token_in: TokenAddress, amount_in: Amount) -> Result<SwapQuote, AmmError>;

    /// The canonical pair traded by this pool.
    #[must_use]
    fn token_pair(&self) -> &TokenPair;

    /// The fee charged on swap input.
    #[must_use]
    fn fee_rate(&self) -> FeeRate;
}
