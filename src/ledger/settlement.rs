//! Scoped, all-or-nothing token movement for one pool operation.

use tracing::{error, warn};

use super::{TokenLedger, TransferReceipt};
use crate::domain::{AccountId, Amount, TokenAddress};
use crate::error::AmmError;

/// Collects the transfers of a single pool operation.
///
/// Legs execute immediately against the ledger and their receipts are
/// kept.  [`commit`](Self::commit) ends the scope and keeps the
/// transfers.  Dropping the settlement without committing (an early
/// return through `?`, for instance) reverts every executed leg in
/// reverse order, so the ledger ends where it started.
///
/// Zero-amount legs are skipped.
///
/// # Examples
///
/// ```
/// use hydra_liquidity::domain::{AccountId, Amount, TokenAddress};
/// use hydra_liquidity::ledger::{InMemoryLedger, Settlement, TokenLedger};
///
/// let ledger = InMemoryLedger::new();
/// let token = TokenAddress::from_low_u64(1);
/// let owner = AccountId::from_low_u64(1);
/// let custody = AccountId::from_low_u64(99);
/// ledger.mint(token, owner, Amount::new(10)).expect("mint");
/// ledger.approve(token, owner, custody, Amount::new(10));
///
/// {
///     let mut settlement = Settlement::new(&ledger, custody);
///     settlement.pull(token, owner, Amount::new(10)).expect("pull");
///     // dropped without commit
/// }
/// assert_eq!(ledger.balance_of(token, owner), Amount::new(10));
/// ```
#[must_use = "an uncommitted settlement reverts its transfers when dropped"]
pub struct Settlement<'a> {
    ledger: &'a dyn TokenLedger,
    custody: AccountId,
    legs: Vec<TransferReceipt>,
    committed: bool,
}

impl<'a> Settlement<'a> {
    /// Opens a settlement for the pool whose reserves sit in `custody`.
    pub fn new(ledger: &'a dyn TokenLedger, custody: AccountId) -> Self {
        Self {
            ledger,
            custody,
            legs: Vec::with_capacity(2),
            committed: false,
        }
    }

    /// Pulls `amount` of `token` from `owner` into custody.
    ///
    /// # Errors
    ///
    /// Propagates [`AmmError::TransferFailed`] from the ledger.
    pub fn pull(&mut self, token: TokenAddress, owner: AccountId, amount: Amount) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let receipt = self
            .ledger
            .transfer_from(token, self.custody, owner, self.custody, amount)
            .inspect_err(|e| warn!(%token, %owner, %amount, error = %e, "pull failed"))?;
        self.legs.push(receipt);
        Ok(())
    }

    /// Releases `amount` of `token` from custody to `to`.
    ///
    /// # Errors
    ///
    /// Propagates [`AmmError::TransferFailed`] from the ledger.
    pub fn release(&mut self, token: TokenAddress, to: AccountId, amount: Amount) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let receipt = self
            .ledger
            .transfer(token, self.custody, to, amount)
            .inspect_err(|e| warn!(%token, %to, %amount, error = %e, "release failed"))?;
        self.legs.push(receipt);
        Ok(())
    }

    /// Number of executed legs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Returns `true` if no leg has executed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Keeps every executed transfer and returns their receipts.
    #[must_use = "the receipts are the only record of the committed legs"]
    pub fn commit(mut self) -> Vec<TransferReceipt> {
        self.committed = true;
        core::mem::take(&mut self.legs)
    }
}

impl Drop for Settlement<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        while let Some(leg) = self.legs.pop() {
            if let Err(e) = self.ledger.revert(&leg) {
                error!(
                    token = %leg.token,
                    from = %leg.from,
                    to = %leg.to,
                    amount = %leg.amount,
                    error = %e,
                    "failed to revert transfer leg"
                );
            }
        }
    }
}
