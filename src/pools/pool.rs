//! Constant-product pool with a share ledger.
//!
//! The pricing invariant is `x × y = k`.  The fee is taken from the input
//! **before** pricing, and the full input is added to the reserve, so `k`
//! grows with every swap and the growth belongs to the share holders.
//!
//! # Swap Algorithm (Token A → Token B)
//!
//! 1. `x' = amount_in × (d − n) / d` for fee `n/d` (kept scaled)
//! 2. `amount_out = ⌊reserve_b × x' / (reserve_a + x')⌋`
//! 3. pull `amount_in` of A from the trader
//! 4. release `amount_out` of B to the trader
//! 5. `reserve_a += amount_in`, `reserve_b −= amount_out`
//!
//! # Atomicity
//!
//! Each operation holds the pool mutex from the first reserve read to
//! the last write.  All arithmetic runs first against a snapshot; the
//! token legs then run inside a [`Settlement`], and the new state is
//! written only after every leg succeeded.  Any error before that point
//! drops the settlement, which reverts the legs already executed.

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::{ExcessPolicy, PoolConfig};
use crate::domain::{
    AccountId, Amount, FeeRate, PoolId, Rounding, Shares, Side, TokenAddress, TokenPair,
};
use crate::error::AmmError;
use crate::events::{EventSink, PoolEvent};
use crate::ledger::{Settlement, TokenLedger};
use crate::math::reserve_math::{
    amount_out, consumed_amount, ensure_product_non_decreasing, initial_shares,
    proportional_shares, withdrawal_amounts,
};
use crate::math::{mul_div, CheckedArithmetic};
use crate::traits::{LiquidityPool, LiquidityReceipt, SwapPool, SwapQuote};

/// Whether a pool currently holds liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolState {
    /// No shares outstanding and both reserves zero.
    Empty,
    /// Shares outstanding and both reserves positive.
    Active,
}

#[derive(Debug, Clone, Default)]
struct Book {
    reserve_a: Amount,
    reserve_b: Amount,
    total_shares: Shares,
    holders: HashMap<AccountId, Shares>,
}

impl Book {
    fn state(&self) -> PoolState {
        if self.total_shares.is_zero() {
            PoolState::Empty
        } else {
            PoolState::Active
        }
    }

    fn held(&self, holder: &AccountId) -> Shares {
        self.holders.get(holder).copied().unwrap_or(Shares::ZERO)
    }

    fn set_held(&mut self, holder: AccountId, shares: Shares) {
        if shares.is_zero() {
            self.holders.remove(&holder);
        } else {
            self.holders.insert(holder, shares);
        }
    }

    fn reserve(&self, side: Side) -> Amount {
        match side {
            Side::A => self.reserve_a,
            Side::B => self.reserve_b,
        }
    }
}

/// Staged outcome of a deposit, computed before any token moves.
struct DepositPlan {
    take_a: Amount,
    take_b: Amount,
    minted: Shares,
}

/// A two-asset constant-product pool.
///
/// Pools are created by the [`PoolRegistry`](crate::factory::PoolRegistry)
/// and shared as [`PoolHandle`](super::PoolHandle)s.  Operations on one
/// pool are serialised; different pools share no lock.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use hydra_liquidity::config::PoolConfig;
/// use hydra_liquidity::domain::{AccountId, Amount, PoolId, TokenAddress, TokenPair};
/// use hydra_liquidity::events::NoopSink;
/// use hydra_liquidity::ledger::InMemoryLedger;
/// use hydra_liquidity::pools::Pool;
/// use hydra_liquidity::traits::{LiquidityPool, SwapPool};
///
/// let (tok_a, tok_b) = (TokenAddress::from_low_u64(1), TokenAddress::from_low_u64(2));
/// let alice = AccountId::from_low_u64(7);
/// let ledger = Arc::new(InMemoryLedger::new());
/// let pool = Pool::new(
///     PoolId::new(1),
///     TokenPair::new(tok_a, tok_b).expect("distinct"),
///     PoolConfig::default(),
///     ledger.clone(),
///     Arc::new(NoopSink),
/// );
///
/// for token in [tok_a, tok_b] {
///     ledger.mint(token, alice, Amount::new(10_000)).expect("mint");
///     ledger.approve(token, alice, pool.custody_account(), Amount::new(10_000));
/// }
///
/// let receipt = pool.add_liquidity(alice, Amount::new(1_000), Amount::new(1_000)).expect("deposit");
/// assert_eq!(receipt.shares.get(), 1_000);
///
/// let out = pool.swap(alice, tok_a, Amount::new(100)).expect("swap");
/// assert_eq!(out, Amount::new(90));
/// assert_eq!(pool.reserves(), (Amount::new(1_100), Amount::new(910)));
/// ```
pub struct Pool {
    id: PoolId,
    pair: TokenPair,
    config: PoolConfig,
    custody: AccountId,
    ledger: Arc<dyn TokenLedger>,
    sink: Arc<dyn EventSink>,
    book: Mutex<Book>,
}

impl Pool {
    /// Creates an empty pool for `pair`.
    ///
    /// The pool's reserves live in [`PoolId::custody_account`] on `ledger`.
    pub fn new(
        id: PoolId,
        pair: TokenPair,
        config: PoolConfig,
        ledger: Arc<dyn TokenLedger>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            id,
            pair,
            config,
            custody: id.custody_account(),
            ledger,
            sink,
            book: Mutex::new(Book::default()),
        }
    }

    /// Registry-assigned id.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Lower-ordered token.
    #[must_use]
    pub const fn token_a(&self) -> TokenAddress {
        self.pair.token_a()
    }

    /// Higher-ordered token.
    #[must_use]
    pub const fn token_b(&self) -> TokenAddress {
        self.pair.token_b()
    }

    /// Account holding this pool's reserves on the ledger.
    #[must_use]
    pub const fn custody_account(&self) -> AccountId {
        self.custody
    }

    /// Fee and deposit policy.
    #[must_use]
    pub const fn config(&self) -> PoolConfig {
        self.config
    }

    /// `Empty` or `Active`.
    #[must_use]
    pub fn state(&self) -> PoolState {
        self.book.lock().state()
    }

    /// Reserves `holder` could withdraw right now by burning all their shares.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] only on an internal arithmetic bug.
    pub fn entitlement(&self, holder: &AccountId) -> Result<(Amount, Amount), AmmError> {
        let book = self.book.lock();
        let held = book.held(holder);
        if held.is_zero() {
            return Ok((Amount::ZERO, Amount::ZERO));
        }
        let total = book.total_shares.get();
        let a = mul_div(book.reserve_a.get(), held.get(), total, Rounding::Down)?;
        let b = mul_div(book.reserve_b.get(), held.get(), total, Rounding::Down)?;
        Ok((Amount::new(a), Amount::new(b)))
    }

    /// Checks share conservation, the empty/reserve equivalence and that
    /// the custody account holds at least the recorded reserves.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let book = self.book.lock();
        let sum = book
            .holders
            .values()
            .try_fold(Shares::ZERO, |acc, s| acc.checked_add(s));
        let conserved = sum == Some(book.total_shares);
        let empty_iff_drained = book.total_shares.is_zero()
            == (book.reserve_a.is_zero() && book.reserve_b.is_zero());
        let backed = self.ledger.balance_of(self.token_a(), self.custody) >= book.reserve_a
            && self.ledger.balance_of(self.token_b(), self.custody) >= book.reserve_b;
        conserved && empty_iff_drained && backed
    }

    fn publish(&self, event: PoolEvent) {
        info!(pool = %self.id, ?event, "pool event");
        self.sink.emit(&event);
    }

    fn plan_deposit(
        &self,
        book: &Book,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<DepositPlan, AmmError> {
        if book.state() == PoolState::Empty {
            let minted = initial_shares(amount_a, amount_b)?;
            return Ok(DepositPlan {
                take_a: amount_a,
                take_b: amount_b,
                minted,
            });
        }

        let total = book.total_shares;
        let minted = proportional_shares(amount_a, amount_b, book.reserve_a, book.reserve_b, total)?;
        let need_a = consumed_amount(minted, book.reserve_a, total)?;
        let need_b = consumed_amount(minted, book.reserve_b, total)?;

        let (take_a, take_b) = match self.config.excess_policy() {
            ExcessPolicy::RefundExcess => (need_a, need_b),
            ExcessPolicy::DonateExcess => (amount_a, amount_b),
            ExcessPolicy::RejectUnbalanced => {
                if need_a != amount_a || need_b != amount_b {
                    return Err(AmmError::UnbalancedDeposit);
                }
                (amount_a, amount_b)
            }
        };
        Ok(DepositPlan {
            take_a,
            take_b,
            minted,
        })
    }

    fn quote_locked(
        &self,
        book: &Book,
        token_in: TokenAddress,
        amount_in: Amount,
    ) -> Result<(Side, SwapQuote), AmmError> {
        let side = self.pair.side_of(&token_in)?;
        if amount_in.is_zero() {
            return Err(AmmError::ZeroAmount);
        }
        if book.state() == PoolState::Empty {
            return Err(AmmError::InsufficientLiquidity);
        }
        let fee = self.config.fee();
        let out = amount_out(
            amount_in,
            book.reserve(side),
            book.reserve(side.flip()),
            fee,
        )?;
        Ok((
            side,
            SwapQuote {
                amount_in,
                amount_in_with_fee: fee.amount_in_with_fee(amount_in)?,
                amount_out: out,
            },
        ))
    }

    fn add_liquidity_locked(
        &self,
        provider: AccountId,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<LiquidityReceipt, AmmError> {
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(AmmError::ZeroAmount);
        }

        let mut book = self.book.lock();
        let plan = self.plan_deposit(&book, amount_a, amount_b)?;

        let reserve_a = book.reserve_a.safe_add(&plan.take_a)?;
        let reserve_b = book.reserve_b.safe_add(&plan.take_b)?;
        let total_shares = book.total_shares.safe_add(&plan.minted)?;
        let held = book.held(&provider).safe_add(&plan.minted)?;

        let mut settlement = Settlement::new(self.ledger.as_ref(), self.custody);
        settlement.pull(self.token_a(), provider, plan.take_a)?;
        settlement.pull(self.token_b(), provider, plan.take_b)?;

        book.reserve_a = reserve_a;
        book.reserve_b = reserve_b;
        book.total_shares = total_shares;
        book.set_held(provider, held);
        let legs = settlement.commit();
        debug!(pool = %self.id, ?legs, "settled");
        drop(book);

        self.publish(PoolEvent::LiquidityAdded {
            pool_id: self.id,
            provider,
            amount_a: plan.take_a,
            amount_b: plan.take_b,
            shares_minted: plan.minted,
        });
        Ok(LiquidityReceipt {
            amount_a: plan.take_a,
            amount_b: plan.take_b,
            shares: plan.minted,
        })
    }

    fn remove_liquidity_locked(
        &self,
        provider: AccountId,
        shares: Shares,
    ) -> Result<(Amount, Amount), AmmError> {
        if shares.is_zero() {
            return Err(AmmError::ZeroAmount);
        }

        let mut book = self.book.lock();
        let held = book.held(&provider);
        if shares > held {
            return Err(AmmError::InsufficientShares {
                held: held.get(),
                requested: shares.get(),
            });
        }

        let (out_a, out_b) =
            withdrawal_amounts(shares, book.reserve_a, book.reserve_b, book.total_shares)?;
        let reserve_a = book.reserve_a.safe_sub(&out_a)?;
        let reserve_b = book.reserve_b.safe_sub(&out_b)?;
        let total_shares = book.total_shares.safe_sub(&shares)?;
        let remaining = held.safe_sub(&shares)?;

        let mut settlement = Settlement::new(self.ledger.as_ref(), self.custody);
        settlement.release(self.token_a(), provider, out_a)?;
        settlement.release(self.token_b(), provider, out_b)?;

        book.reserve_a = reserve_a;
        book.reserve_b = reserve_b;
        book.total_shares = total_shares;
        book.set_held(provider, remaining);
        let legs = settlement.commit();
        debug!(pool = %self.id, ?legs, "settled");
        drop(book);

        self.publish(PoolEvent::LiquidityRemoved {
            pool_id: self.id,
            provider,
            amount_a: out_a,
            amount_b: out_b,
            shares_burned: shares,
        });
        Ok((out_a, out_b))
    }

    fn swap_locked(
        &self,
        trader: AccountId,
        token_in: TokenAddress,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        let mut book = self.book.lock();
        let (side, quote) = self.quote_locked(&book, token_in, amount_in)?;

        let reserve_in = book.reserve(side);
        let reserve_out = book.reserve(side.flip());
        let new_in = reserve_in.safe_add(&amount_in)?;
        let new_out = reserve_out.safe_sub(&quote.amount_out)?;
        ensure_product_non_decreasing((reserve_in, reserve_out), (new_in, new_out))?;

        let mut settlement = Settlement::new(self.ledger.as_ref(), self.custody);
        settlement.pull(token_in, trader, amount_in)?;
        settlement.release(self.pair.token(side.flip()), trader, quote.amount_out)?;

        match side {
            Side::A => {
                book.reserve_a = new_in;
                book.reserve_b = new_out;
            }
            Side::B => {
                book.reserve_b = new_in;
                book.reserve_a = new_out;
            }
        }
        let legs = settlement.commit();
        debug!(pool = %self.id, ?legs, "settled");
        drop(book);

        self.publish(PoolEvent::Swap {
            pool_id: self.id,
            trader,
            token_in,
            amount_in,
            amount_out: quote.amount_out,
        });
        Ok(quote.amount_out)
    }
}

impl SwapPool for Pool {
    fn swap(
        &self,
        trader: AccountId,
        token_in: TokenAddress,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        self.swap_locked(trader, token_in, amount_in)
            .inspect_err(|e| warn!(pool = %self.id, %trader, %token_in, %amount_in, error = %e, "swap rejected"))
    }

    fn quote(&self, token_in: TokenAddress, amount_in: Amount) -> Result<SwapQuote, AmmError> {
        let book = self.book.lock();
        self.quote_locked(&book, token_in, amount_in)
            .map(|(_, quote)| quote)
    }

    fn token_pair(&self) -> &TokenPair {
        &self.pair
    }

    fn fee_rate(&self) -> FeeRate {
        self.config.fee()
    }
}

impl LiquidityPool for Pool {
    fn add_liquidity(
        &self,
        provider: AccountId,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<LiquidityReceipt, AmmError> {
        self.add_liquidity_locked(provider, amount_a, amount_b)
            .inspect_err(|e| warn!(pool = %self.id, %provider, %amount_a, %amount_b, error = %e, "deposit rejected"))
    }

    fn remove_liquidity(
        &self,
        provider: AccountId,
        shares: Shares,
    ) -> Result<(Amount, Amount), AmmError> {
        self.remove_liquidity_locked(provider, shares)
            .inspect_err(|e| warn!(pool = %self.id, %provider, %shares, error = %e, "withdrawal rejected"))
    }

    fn reserves(&self) -> (Amount, Amount) {
        let book = self.book.lock();
        (book.reserve_a, book.reserve_b)
    }

    fn shares_of(&self, holder: &AccountId) -> Shares {
        self.book.lock().held(holder)
    }

    fn total_shares(&self) -> Shares {
        self.book.lock().total_shares
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = self.book.lock();
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("pair", &self.pair)
            .field("config", &self.config)
            .field("reserve_a", &book.reserve_a)
            .field("reserve_b", &book.reserve_b)
            .field("total_shares", &book.total_shares)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::ledger::InMemoryLedger;

    // -- helpers --------------------------------------------------------------

    const FUNDING: u128 = 1_000_000;

    fn tok_a() -> TokenAddress {
        TokenAddress::from_low_u64(1)
    }

    fn tok_b() -> TokenAddress {
        TokenAddress::from_low_u64(2)
    }

    fn alice() -> AccountId {
        AccountId::from_low_u64(100)
    }

    fn bob() -> AccountId {
        AccountId::from_low_u64(101)
    }

    struct Fixture {
        ledger: Arc<InMemoryLedger>,
        sink: Arc<RecordingSink>,
        pool: Pool,
    }

    fn fixture_with(config: PoolConfig) -> Fixture {
        let ledger = Arc::new(InMemoryLedger::new());
        let sink = Arc::new(RecordingSink::new());
        let Ok(pair) = TokenPair::new(tok_b(), tok_a()) else {
            panic!("valid pair");
        };
        let pool = Pool::new(PoolId::new(1), pair, config, ledger.clone(), sink.clone());
        for who in [alice(), bob()] {
            for token in [tok_a(), tok_b()] {
                let Ok(()) = ledger.mint(token, who, Amount::new(FUNDING)) else {
                    panic!("mint");
                };
                ledger.approve(token, who, pool.custody_account(), Amount::new(FUNDING));
            }
        }
        Fixture { ledger, sink, pool }
    }

    fn fixture() -> Fixture {
        fixture_with(PoolConfig::default())
    }

    fn seeded(config: PoolConfig) -> Fixture {
        let fx = fixture_with(config);
        let Ok(_) = fx.pool.add_liquidity(alice(), Amount::new(1_000), Amount::new(1_000)) else {
            panic!("seed deposit");
        };
        fx
    }

    fn amt(v: u128) -> Amount {
        Amount::new(v)
    }

    // -- add_liquidity --------------------------------------------------------

    #[test]
    fn first_deposit_sets_reserves_and_mints_sqrt() {
        let fx = fixture();
        assert_eq!(fx.pool.state(), PoolState::Empty);
        let Ok(receipt) = fx.pool.add_liquidity(alice(), amt(1_000), amt(1_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.shares, Shares::new(1_000));
        assert_eq!(fx.pool.reserves(), (amt(1_000), amt(1_000)));
        assert_eq!(fx.pool.total_shares(), Shares::new(1_000));
        assert_eq!(fx.pool.shares_of(&alice()), Shares::new(1_000));
        assert_eq!(fx.pool.state(), PoolState::Active);
        assert_eq!(fx.ledger.balance_of(tok_a(), alice()), amt(FUNDING - 1_000));
        assert!(fx.pool.invariants_hold());
    }

    #[test]
    fn deposit_rejects_zero_side() {
        let fx = fixture();
        assert_eq!(
            fx.pool.add_liquidity(alice(), amt(0), amt(10)),
            Err(AmmError::ZeroAmount)
        );
        assert_eq!(fx.pool.state(), PoolState::Empty);
    }

    #[test]
    fn proportional_deposit_mints_pro_rata() {
        let fx = seeded(PoolConfig::default());
        let Ok(receipt) = fx.pool.add_liquidity(bob(), amt(500), amt(500)) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.shares, Shares::new(500));
        assert_eq!(fx.pool.reserves(), (amt(1_500), amt(1_500)));
        assert_eq!(fx.pool.total_shares(), Shares::new(1_500));
    }

    #[test]
    fn refund_policy_pulls_only_consumed_amounts() {
        let fx = seeded(PoolConfig::default());
        let Ok(receipt) = fx.pool.add_liquidity(bob(), amt(100), amt(400)) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.shares, Shares::new(100));
        assert_eq!((receipt.amount_a, receipt.amount_b), (amt(100), amt(100)));
        assert_eq!(fx.ledger.balance_of(tok_b(), bob()), amt(FUNDING - 100));
        assert_eq!(fx.pool.reserves(), (amt(1_100), amt(1_100)));
        assert!(fx.pool.invariants_hold());
    }

    #[test]
    fn donate_policy_pulls_full_offer() {
        let fx = seeded(PoolConfig::default().with_excess_policy(ExcessPolicy::DonateExcess));
        let Ok(receipt) = fx.pool.add_liquidity(bob(), amt(100), amt(400)) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.shares, Shares::new(100));
        assert_eq!(fx.pool.reserves(), (amt(1_100), amt(1_400)));
        // alice now owns 1000/1100 of a larger B reserve
        let Ok((_, b)) = fx.pool.entitlement(&alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(b, amt(1_272));
    }

    #[test]
    fn reject_policy_refuses_unbalanced_offer() {
        let fx = seeded(PoolConfig::default().with_excess_policy(ExcessPolicy::RejectUnbalanced));
        assert_eq!(
            fx.pool.add_liquidity(bob(), amt(100), amt(400)),
            Err(AmmError::UnbalancedDeposit)
        );
        assert_eq!(fx.pool.reserves(), (amt(1_000), amt(1_000)));
        let Ok(receipt) = fx.pool.add_liquidity(bob(), amt(100), amt(100)) else {
            panic!("balanced offer accepted");
        };
        assert_eq!(receipt.shares, Shares::new(100));
    }

    #[test]
    fn dust_deposit_mints_nothing() {
        let fx = fixture();
        let Ok(_) = fx.pool.add_liquidity(alice(), amt(100_000), amt(100_000)) else {
            panic!("seed");
        };
        let Ok(_) = fx.pool.swap(bob(), tok_a(), amt(50_000)) else {
            panic!("swap");
        };
        // reserve_b is now below 100_000 but reserve_a far above; one unit of A mints 0
        assert_eq!(
            fx.pool.add_liquidity(bob(), amt(1), amt(1)),
            Err(AmmError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn failed_pull_leaves_no_trace() {
        let fx = fixture();
        fx.ledger.halt(tok_b());
        let Err(AmmError::TransferFailed(_)) =
            fx.pool.add_liquidity(alice(), amt(1_000), amt(1_000))
        else {
            panic!("expected TransferFailed");
        };
        assert_eq!(fx.pool.state(), PoolState::Empty);
        assert_eq!(fx.ledger.balance_of(tok_a(), alice()), amt(FUNDING));
        assert_eq!(fx.ledger.balance_of(tok_a(), fx.pool.custody_account()), amt(0));
        assert!(fx.sink.is_empty());
    }

    // -- remove_liquidity -----------------------------------------------------

    #[test]
    fn full_withdrawal_returns_pool_to_empty() {
        let fx = seeded(PoolConfig::default());
        let Ok((a, b)) = fx.pool.remove_liquidity(alice(), Shares::new(1_000)) else {
            panic!("expected Ok");
        };
        assert_eq!((a, b), (amt(1_000), amt(1_000)));
        assert_eq!(fx.pool.state(), PoolState::Empty);
        assert_eq!(fx.pool.reserves(), (Amount::ZERO, Amount::ZERO));
        assert_eq!(fx.pool.shares_of(&alice()), Shares::ZERO);
        assert!(fx.pool.invariants_hold());

        // and it can be reactivated at a new ratio
        let Ok(receipt) = fx.pool.add_liquidity(bob(), amt(400), amt(100)) else {
            panic!("reactivation");
        };
        assert_eq!(receipt.shares, Shares::new(200));
    }

    #[test]
    fn withdrawal_beyond_balance_is_rejected_before_mutation() {
        let fx = seeded(PoolConfig::default());
        assert_eq!(
            fx.pool.remove_liquidity(alice(), Shares::new(1_001)),
            Err(AmmError::InsufficientShares {
                held: 1_000,
                requested: 1_001
            })
        );
        assert_eq!(
            fx.pool.remove_liquidity(bob(), Shares::new(1)),
            Err(AmmError::InsufficientShares {
                held: 0,
                requested: 1
            })
        );
        assert_eq!(fx.pool.reserves(), (amt(1_000), amt(1_000)));
        assert_eq!(fx.pool.total_shares(), Shares::new(1_000));
    }

    #[test]
    fn zero_share_withdrawal_is_rejected() {
        let fx = seeded(PoolConfig::default());
        assert_eq!(
            fx.pool.remove_liquidity(alice(), Shares::ZERO),
            Err(AmmError::ZeroAmount)
        );
    }

    #[test]
    fn failed_release_restores_everything() {
        let fx = seeded(PoolConfig::default());
        fx.ledger.halt(tok_b());
        let Err(AmmError::TransferFailed(_)) = fx.pool.remove_liquidity(alice(), Shares::new(500))
        else {
            panic!("expected TransferFailed");
        };
        assert_eq!(fx.pool.shares_of(&alice()), Shares::new(1_000));
        assert_eq!(fx.pool.reserves(), (amt(1_000), amt(1_000)));
        assert_eq!(fx.ledger.balance_of(tok_a(), fx.pool.custody_account()), amt(1_000));
        assert!(fx.pool.invariants_hold());
    }

    // -- swap -----------------------------------------------------------------

    #[test]
    fn swap_credits_full_input_to_reserve() {
        let fx = seeded(PoolConfig::default());
        let Ok(out) = fx.pool.swap(bob(), tok_a(), amt(100)) else {
            panic!("expected Ok");
        };
        assert_eq!(out, amt(90));
        assert_eq!(fx.pool.reserves(), (amt(1_100), amt(910)));
        assert_eq!(fx.ledger.balance_of(tok_b(), bob()), amt(FUNDING + 90));
        assert!(fx.pool.invariants_hold());
    }

    #[test]
    fn swap_b_for_a() {
        let fx = seeded(PoolConfig::default());
        let Ok(out) = fx.pool.swap(bob(), tok_b(), amt(100)) else {
            panic!("expected Ok");
        };
        assert_eq!(out, amt(90));
        assert_eq!(fx.pool.reserves(), (amt(910), amt(1_100)));
    }

    #[test]
    fn swap_rejects_foreign_token() {
        let fx = seeded(PoolConfig::default());
        assert_eq!(
            fx.pool.swap(bob(), TokenAddress::from_low_u64(3), amt(100)),
            Err(AmmError::InvalidTokenForPool)
        );
        assert_eq!(fx.pool.reserves(), (amt(1_000), amt(1_000)));
    }

    #[test]
    fn swap_rejects_zero_and_empty() {
        let fx = fixture();
        assert_eq!(
            fx.pool.swap(bob(), tok_a(), amt(0)),
            Err(AmmError::ZeroAmount)
        );
        assert_eq!(
            fx.pool.swap(bob(), tok_a(), amt(10)),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn swap_with_dust_output_fails() {
        let fx = seeded(PoolConfig::default());
        assert_eq!(
            fx.pool.swap(bob(), tok_a(), amt(1)),
            Err(AmmError::InsufficientOutputAmount)
        );
    }

    #[test]
    fn swap_output_failure_unwinds_input() {
        let fx = seeded(PoolConfig::default());
        fx.ledger.halt(tok_b());
        let Err(AmmError::TransferFailed(_)) = fx.pool.swap(bob(), tok_a(), amt(100)) else {
            panic!("expected TransferFailed");
        };
        assert_eq!(fx.ledger.balance_of(tok_a(), bob()), amt(FUNDING));
        assert_eq!(fx.pool.reserves(), (amt(1_000), amt(1_000)));
        assert!(fx.pool.invariants_hold());
    }

    #[test]
    fn fees_compound_into_withdrawals() {
        let fx = seeded(PoolConfig::default());
        for _ in 0..5 {
            let Ok(out) = fx.pool.swap(bob(), tok_a(), amt(100)) else {
                panic!("swap a");
            };
            let Ok(_) = fx.pool.swap(bob(), tok_b(), out) else {
                panic!("swap b");
            };
        }
        let (ra, rb) = fx.pool.reserves();
        assert!(ra.get() * rb.get() > 1_000_000);
        let Ok((a, b)) = fx.pool.remove_liquidity(alice(), Shares::new(1_000)) else {
            panic!("withdraw");
        };
        assert!(a.get() + b.get() > 2_000);
    }

    #[test]
    fn swap_with_wide_fee_denominator() {
        const E20: u128 = 100_000_000_000_000_000_000;
        const E24: u128 = 1_000_000_000_000_000_000_000_000;
        let Ok(fee) = FeeRate::new(3 * E20 / 1_000, E20) else {
            panic!("valid fee");
        };
        let Ok(config) = PoolConfig::default().with_fee(fee) else {
            panic!("valid config");
        };
        let fx = fixture_with(config);
        for who in [alice(), bob()] {
            for token in [tok_a(), tok_b()] {
                let Ok(()) = fx.ledger.mint(token, who, amt(2 * E24)) else {
                    panic!("mint");
                };
                fx.ledger
                    .approve(token, who, fx.pool.custody_account(), amt(2 * E24));
            }
        }
        let Ok(_) = fx.pool.add_liquidity(alice(), amt(E24), amt(E24)) else {
            panic!("seed deposit");
        };

        let amount_in = amt(E20 - 1);
        let Ok(quote) = fx.pool.quote(tok_a(), amount_in) else {
            panic!("expected Ok");
        };
        assert_eq!(quote.amount_in_with_fee, amt(99_699_999_999_999_999_999));
        let Ok(out) = fx.pool.swap(bob(), tok_a(), amount_in) else {
            panic!("expected Ok");
        };
        assert_eq!(out, quote.amount_out);
        assert_eq!(out, amt(99_690_060_900_928_177_459));
        assert!(fx.pool.invariants_hold());
    }

    // -- queries --------------------------------------------------------------

    #[test]
    fn quote_matches_swap_without_mutating() {
        let fx = seeded(PoolConfig::default());
        let Ok(quote) = fx.pool.quote(tok_a(), amt(100)) else {
            panic!("expected Ok");
        };
        assert_eq!(quote.amount_out, amt(90));
        assert_eq!(quote.amount_in_with_fee, amt(99));
        assert_eq!(quote.fee(), amt(1));
        assert_eq!(fx.pool.reserves(), (amt(1_000), amt(1_000)));
        assert_eq!(fx.pool.swap(bob(), tok_a(), amt(100)), Ok(quote.amount_out));
    }

    #[test]
    fn entitlement_of_stranger_is_zero() {
        let fx = seeded(PoolConfig::default());
        assert_eq!(fx.pool.entitlement(&bob()), Ok((Amount::ZERO, Amount::ZERO)));
        assert_eq!(fx.pool.entitlement(&alice()), Ok((amt(1_000), amt(1_000))));
    }

    #[test]
    fn accessors_reflect_canonical_order() {
        let fx = fixture();
        assert_eq!(fx.pool.token_a(), tok_a());
        assert_eq!(fx.pool.token_b(), tok_b());
        assert_eq!(fx.pool.fee_rate(), FeeRate::DEFAULT);
        assert_eq!(fx.pool.id(), PoolId::new(1));
        assert!(format!("{:?}", fx.pool).contains("Pool"));
    }

    #[test]
    fn events_follow_committed_operations() {
        let fx = seeded(PoolConfig::default());
        let Ok(_) = fx.pool.swap(bob(), tok_a(), amt(100)) else {
            panic!("swap");
        };
        let _ = fx.pool.swap(bob(), tok_a(), amt(0));
        let events = fx.sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            PoolEvent::Swap {
                pool_id: PoolId::new(1),
                trader: bob(),
                token_in: tok_a(),
                amount_in: amt(100),
                amount_out: amt(90),
            }
        );
    }
}
