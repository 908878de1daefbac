//! Token-transfer capability consumed by pools.
//!
//! The engine never owns token balances.  Pools move assets through a
//! [`TokenLedger`], which models an ERC-20 style ledger: a pool pulls
//! deposits with [`transfer_from`](TokenLedger::transfer_from) against an
//! allowance and releases assets from its custody account with
//! [`transfer`](TokenLedger::transfer).
//!
//! Every transfer returns a [`TransferReceipt`].  A [`Settlement`] keeps
//! the receipts of one pool operation and hands them back to
//! [`revert`](TokenLedger::revert) if the operation fails part-way, so a
//! failed operation leaves balances exactly as it found them.

mod memory;
mod settlement;

pub use memory::InMemoryLedger;
pub use settlement::Settlement;

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, TokenAddress};
use crate::error::AmmError;

/// Record of one completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Asset moved.
    pub token: TokenAddress,
    /// Debited account.
    pub from: AccountId,
    /// Credited account.
    pub to: AccountId,
    /// Quantity moved.
    pub amount: Amount,
    /// Account whose allowance was spent, for `transfer_from` legs.
    pub spender: Option<AccountId>,
}

/// External ledger of token balances.
///
/// Implementations must be atomic per call and fail loudly: a call that
/// returns `Err` moved nothing.  Methods take `&self` so one ledger can be
/// shared by every pool; implementations synchronise internally.
pub trait TokenLedger: Send + Sync {
    /// Moves `amount` of `token` from `owner` to `to`, spending the
    /// allowance `owner` granted to `spender`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if the allowance or balance is
    /// insufficient or the ledger rejects the transfer.
    fn transfer_from(
        &self,
        token: TokenAddress,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<TransferReceipt, AmmError>;

    /// Moves `amount` of `token` from `from` (the caller's own account) to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if the balance is insufficient
    /// or the ledger rejects the transfer.
    fn transfer(
        &self,
        token: TokenAddress,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<TransferReceipt, AmmError>;

    /// Current balance of `holder` in `token`.
    fn balance_of(&self, token: TokenAddress, holder: AccountId) -> Amount;

    /// Undoes a transfer made earlier in the same operation, restoring
    /// both balances and any spent allowance.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if the credited account no
    /// longer holds the amount.
    fn revert(&self, receipt: &TransferReceipt) -> Result<(), AmmError>;
}
