//! In-process token ledger.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use tracing::debug;

use super::{TokenLedger, TransferReceipt};
use crate::domain::{AccountId, Amount, TokenAddress};
use crate::error::AmmError;

#[derive(Debug, Default)]
struct Book {
    balances: HashMap<(TokenAddress, AccountId), Amount>,
    allowances: HashMap<(TokenAddress, AccountId, AccountId), Amount>,
    halted: HashSet<TokenAddress>,
}

impl Book {
    fn balance(&self, token: TokenAddress, holder: AccountId) -> Amount {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn set_balance(&mut self, token: TokenAddress, holder: AccountId, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&(token, holder));
        } else {
            self.balances.insert((token, holder), amount);
        }
    }

    fn ensure_live(&self, token: TokenAddress) -> Result<(), AmmError> {
        if self.halted.contains(&token) {
            return Err(AmmError::TransferFailed(format!(
                "transfers of {token} are halted"
            )));
        }
        Ok(())
    }

    /// Debits `from` and credits `to`, checking both sides before writing.
    fn move_funds(
        &mut self,
        token: TokenAddress,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let from_balance = self.balance(token, from);
        let debited = from_balance.checked_sub(&amount).ok_or_else(|| {
            AmmError::TransferFailed(format!(
                "insufficient balance: {from} holds {from_balance}, needs {amount}"
            ))
        })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(token, to)
            .checked_add(&amount)
            .ok_or_else(|| AmmError::TransferFailed("recipient balance overflow".into()))?;
        self.set_balance(token, from, debited);
        self.set_balance(token, to, credited);
        Ok(())
    }
}

/// A thread-safe, in-memory [`TokenLedger`] with ERC-20 style allowances.
///
/// Used by tests and simulations.  [`halt`](Self::halt) makes every
/// transfer of one token fail, which is how callers exercise the
/// rollback path of a pool operation.
///
/// # Examples
///
/// ```
/// use hydra_liquidity::domain::{AccountId, Amount, TokenAddress};
/// use hydra_liquidity::ledger::{InMemoryLedger, TokenLedger};
///
/// let ledger = InMemoryLedger::new();
/// let token = TokenAddress::from_low_u64(1);
/// let alice = AccountId::from_low_u64(10);
/// let bob = AccountId::from_low_u64(11);
///
/// ledger.mint(token, alice, Amount::new(500)).expect("mint");
/// ledger.transfer(token, alice, bob, Amount::new(200)).expect("transfer");
/// assert_eq!(ledger.balance_of(token, bob), Amount::new(200));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    book: RwLock<Book>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits newly created tokens to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance would overflow.
    pub fn mint(&self, token: TokenAddress, to: AccountId, amount: Amount) -> Result<(), AmmError> {
        let mut book = self.book.write();
        let balance = book
            .balance(token, to)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("mint overflow"))?;
        book.set_balance(token, to, balance);
        Ok(())
    }

    /// Sets the allowance `owner` grants `spender`, replacing any previous value.
    pub fn approve(&self, token: TokenAddress, owner: AccountId, spender: AccountId, amount: Amount) {
        let mut book = self.book.write();
        if amount.is_zero() {
            book.allowances.remove(&(token, owner, spender));
        } else {
            book.allowances.insert((token, owner, spender), amount);
        }
    }

    /// Remaining allowance `owner` grants `spender`.
    #[must_use]
    pub fn allowance(&self, token: TokenAddress, owner: AccountId, spender: AccountId) -> Amount {
        self.book
            .read()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Makes every subsequent transfer of `token` fail.
    pub fn halt(&self, token: TokenAddress) {
        self.book.write().halted.insert(token);
    }

    /// Re-enables transfers of `token`.
    pub fn resume(&self, token: TokenAddress) {
        self.book.write().halted.remove(&token);
    }
}

impl TokenLedger for InMemoryLedger {
    fn transfer_from(
        &self,
        token: TokenAddress,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<TransferReceipt, AmmError> {
        let mut book = self.book.write();
        book.ensure_live(token)?;
        let key = (token, owner, spender);
        let allowed = book.allowances.get(&key).copied().unwrap_or(Amount::ZERO);
        let remaining = allowed.checked_sub(&amount).ok_or_else(|| {
            AmmError::TransferFailed(format!(
                "insufficient allowance: {spender} may spend {allowed} of {owner}, needs {amount}"
            ))
        })?;
        book.move_funds(token, owner, to, amount)?;
        if remaining.is_zero() {
            book.allowances.remove(&key);
        } else {
            book.allowances.insert(key, remaining);
        }
        debug!(%token, %owner, %to, %amount, "transfer_from");
        Ok(TransferReceipt {
            token,
            from: owner,
            to,
            amount,
            spender: Some(spender),
        })
    }

    fn transfer(
        &self,
        token: TokenAddress,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<TransferReceipt, AmmError> {
        let mut book = self.book.write();
        book.ensure_live(token)?;
        book.move_funds(token, from, to, amount)?;
        debug!(%token, %from, %to, %amount, "transfer");
        Ok(TransferReceipt {
            token,
            from,
            to,
            amount,
            spender: None,
        })
    }

    fn balance_of(&self, token: TokenAddress, holder: AccountId) -> Amount {
        self.book.read().balance(token, holder)
    }

    fn revert(&self, receipt: &TransferReceipt) -> Result<(), AmmError> {
        let mut book = self.book.write();
        book.move_funds(receipt.token, receipt.to, receipt.from, receipt.amount)?;
        if let Some(spender) = receipt.spender {
            let key = (receipt.token, receipt.from, spender);
            let restored = book
                .allowances
                .get(&key)
                .copied()
                .unwrap_or(Amount::ZERO)
                .checked_add(&receipt.amount)
                .ok_or(AmmError::Overflow("allowance restore overflow"))?;
            book.allowances.insert(key, restored);
        }
        debug!(token = %receipt.token, amount = %receipt.amount, "reverted transfer");
        Ok(())
    }
}
