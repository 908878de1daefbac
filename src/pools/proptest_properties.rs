//! Property-based tests for pool invariants.
//!
//! 1. **Swap reversibility**: round-trip A→B→A returns ≤ original.
//! 2. **Product growth**: `reserve_a × reserve_b` never decreases on a swap,
//!    and strictly grows on a swap that charges a fee.
//! 3. **Quote fidelity**: `quote` predicts `swap` exactly.
//! 4. **No free value**: deposit then full withdrawal returns ≤ deposit.
//! 5. **Share conservation**: any deposit sequence keeps `Σ held = total`.
//! 6. **Failure atomicity**: a rejected leg leaves balances and reserves intact.

use std::sync::Arc;

use proptest::prelude::*;

use super::Pool;
use crate::config::{ExcessPolicy, PoolConfig};
use crate::domain::{AccountId, Amount, FeeRate, PoolId, Shares, TokenAddress, TokenPair};
use crate::events::NoopSink;
use crate::ledger::{InMemoryLedger, TokenLedger};
use crate::traits::{LiquidityPool, SwapPool};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const FUNDING: u128 = 1_000_000_000_000;

fn tok_a() -> TokenAddress {
    TokenAddress::from_low_u64(1)
}

fn tok_b() -> TokenAddress {
    TokenAddress::from_low_u64(2)
}

fn account(n: u64) -> AccountId {
    AccountId::from_low_u64(1_000 + n)
}

fn make_pool(fee: FeeRate, policy: ExcessPolicy) -> (Arc<InMemoryLedger>, Pool) {
    let ledger = Arc::new(InMemoryLedger::new());
    let Ok(pair) = TokenPair::new(tok_a(), tok_b()) else {
        panic!("valid pair");
    };
    let Ok(config) = PoolConfig::new(fee, policy) else {
        panic!("valid config");
    };
    let pool = Pool::new(PoolId::new(1), pair, config, ledger.clone(), Arc::new(NoopSink));
    for n in 0..4 {
        for token in [tok_a(), tok_b()] {
            let Ok(()) = ledger.mint(token, account(n), Amount::new(FUNDING)) else {
                panic!("mint");
            };
            ledger.approve(token, account(n), pool.custody_account(), Amount::new(FUNDING));
        }
    }
    (ledger, pool)
}

fn seeded_pool(ra: u128, rb: u128) -> (Arc<InMemoryLedger>, Pool) {
    let (ledger, pool) = make_pool(FeeRate::DEFAULT, ExcessPolicy::RefundExcess);
    let Ok(_) = pool.add_liquidity(account(0), Amount::new(ra), Amount::new(rb)) else {
        panic!("seed deposit");
    };
    (ledger, pool)
}

fn k(pool: &Pool) -> u128 {
    let (a, b) = pool.reserves();
    a.get() * b.get()
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in range [10_000, 10_000_000] to avoid extremes.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000u128
}

/// Swap input as a per-mille fraction of the input reserve.
fn fraction_strategy() -> impl Strategy<Value = u128> {
    1u128..=500u128
}

/// Fee numerators over 1000, from free to 10%.
fn fee_strategy() -> impl Strategy<Value = FeeRate> {
    (0u128..=100u128).prop_map(|n| FeeRate::new(n, 1_000).unwrap_or(FeeRate::DEFAULT))
}

// ---------------------------------------------------------------------------
// Swaps
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_reversibility(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let (_, pool) = seeded_pool(ra, rb);
        let swap_in = (ra * frac / 1_000).max(1);

        let Ok(received_b) = pool.swap(account(1), tok_a(), Amount::new(swap_in)) else {
            return Ok(());
        };
        let Ok(final_a) = pool.swap(account(1), tok_b(), received_b) else {
            return Ok(());
        };

        prop_assert!(
            final_a.get() <= swap_in,
            "round-trip should lose value: final={} > original={}",
            final_a.get(), swap_in
        );
    }

    #[test]
    fn prop_product_never_decreases(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        fee in fee_strategy(),
        fracs in prop::collection::vec((fraction_strategy(), any::<bool>()), 1..8),
    ) {
        let (_, pool) = make_pool(fee, ExcessPolicy::RefundExcess);
        let Ok(_) = pool.add_liquidity(account(0), Amount::new(ra), Amount::new(rb)) else {
            panic!("seed deposit");
        };

        for (frac, a_to_b) in fracs {
            let before = k(&pool);
            let (ra_now, rb_now) = pool.reserves();
            let (token, reserve) = if a_to_b { (tok_a(), ra_now) } else { (tok_b(), rb_now) };
            let amount = (reserve.get() * frac / 1_000).max(1);
            let swapped = pool.swap(account(1), token, Amount::new(amount)).is_ok();
            if swapped && !fee.is_zero() {
                prop_assert!(k(&pool) > before, "fee-bearing swap must grow k");
            } else {
                prop_assert!(k(&pool) >= before);
            }
            prop_assert!(pool.invariants_hold());
        }
    }

    #[test]
    fn prop_quote_matches_swap(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let (_, pool) = seeded_pool(ra, rb);
        let amount = Amount::new((rb * frac / 1_000).max(1));
        let quoted = pool.quote(tok_b(), amount).map(|q| q.amount_out);
        prop_assert_eq!(pool.swap(account(2), tok_b(), amount), quoted);
    }
}

// ---------------------------------------------------------------------------
// Liquidity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deposit_then_withdraw_returns_at_most_deposit(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        da in reserve_strategy(),
        db in reserve_strategy(),
    ) {
        let (_, pool) = seeded_pool(ra, rb);
        let Ok(receipt) = pool.add_liquidity(account(1), Amount::new(da), Amount::new(db)) else {
            return Ok(());
        };
        prop_assert!(receipt.amount_a.get() <= da);
        prop_assert!(receipt.amount_b.get() <= db);

        let Ok((out_a, out_b)) = pool.remove_liquidity(account(1), receipt.shares) else {
            return Ok(());
        };
        prop_assert!(out_a <= receipt.amount_a);
        prop_assert!(out_b <= receipt.amount_b);
        prop_assert!(pool.invariants_hold());
    }

    #[test]
    fn prop_share_conservation(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        deposits in prop::collection::vec((1u64..4, reserve_strategy(), reserve_strategy()), 1..6),
        policy in prop_oneof![
            Just(ExcessPolicy::RefundExcess),
            Just(ExcessPolicy::DonateExcess),
        ],
    ) {
        let (_, pool) = make_pool(FeeRate::DEFAULT, policy);
        let Ok(_) = pool.add_liquidity(account(0), Amount::new(ra), Amount::new(rb)) else {
            panic!("seed deposit");
        };
        for (who, da, db) in deposits {
            let _ = pool.add_liquidity(account(who), Amount::new(da), Amount::new(db));
        }

        let held = (0..4)
            .map(|n| pool.shares_of(&account(n)).get())
            .sum::<u128>();
        prop_assert_eq!(Shares::new(held), pool.total_shares());
        prop_assert!(pool.invariants_hold());
    }

    #[test]
    fn prop_failed_swap_is_atomic(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let (ledger, pool) = seeded_pool(ra, rb);
        ledger.halt(tok_b());
        let reserves = pool.reserves();
        let trader_a = ledger.balance_of(tok_a(), account(1));

        let amount = Amount::new((ra * frac / 1_000).max(1));
        prop_assert!(pool.swap(account(1), tok_a(), amount).is_err());
        prop_assert_eq!(pool.reserves(), reserves);
        prop_assert_eq!(ledger.balance_of(tok_a(), account(1)), trader_a);
        prop_assert!(pool.invariants_hold());
    }
}
