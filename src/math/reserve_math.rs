//! Pure constant-product pricing and share accounting.
//!
//! These functions hold no state and never touch a ledger; a pool calls
//! them with a snapshot of its reserves and applies the results.  All
//! division floors unless stated otherwise, and every rounding choice
//! leaves dust inside the pool rather than handing it to the caller.
//!
//! # Formulas
//!
//! | Operation | Result |
//! |-----------|--------|
//! | first deposit | `shares = ⌊√(a × b)⌋` |
//! | later deposit | `shares = min(⌊S·a/Ra⌋, ⌊S·b/Rb⌋)` |
//! | consumed deposit | `⌈shares·R/S⌉` per side (never above the offer) |
//! | withdrawal | `⌊R·shares/S⌋` per side |
//! | swap | `out = ⌊Rout·x·(d−n) / (Rin·d + x·(d−n))⌋` for fee `n/d` |

use tracing::debug;

use super::wide::{isqrt_product, mul_div, narrow, product, U256};
use crate::domain::{Amount, FeeRate, Rounding, Shares};
use crate::error::AmmError;

/// Shares minted by the deposit that activates an empty pool.
///
/// # Errors
///
/// Returns [`AmmError::InsufficientLiquidityMinted`] if the geometric mean
/// rounds to zero.
pub fn initial_shares(amount_a: Amount, amount_b: Amount) -> Result<Shares, AmmError> {
    let minted = isqrt_product(amount_a.get(), amount_b.get());
    if minted == 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    Ok(Shares::new(minted))
}

/// Shares minted by a deposit into an active pool.
///
/// The smaller of the two per-side candidates wins, so the side offered
/// in excess of the pool ratio never earns extra shares.
///
/// # Errors
///
/// - [`AmmError::InsufficientLiquidityMinted`] if the result is zero.
/// - [`AmmError::DivisionByZero`] if a reserve is zero.
/// - [`AmmError::Overflow`] if a candidate does not fit in `u128`.
pub fn proportional_shares(
    amount_a: Amount,
    amount_b: Amount,
    reserve_a: Amount,
    reserve_b: Amount,
    total: Shares,
) -> Result<Shares, AmmError> {
    let by_a = mul_div(total.get(), amount_a.get(), reserve_a.get(), Rounding::Down)?;
    let by_b = mul_div(total.get(), amount_b.get(), reserve_b.get(), Rounding::Down)?;
    let minted = by_a.min(by_b);
    debug!(by_a, by_b, minted, "proportional share candidates");
    if minted == 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    Ok(Shares::new(minted))
}

/// Amount of one asset a deposit must contribute to back `minted` shares.
///
/// Rounds up so the new shares are never under-collateralised.  Because
/// `minted ≤ S·offered/R`, the result never exceeds the amount offered on
/// that side.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `total` is zero.
/// - [`AmmError::Overflow`] if the result does not fit in `u128`.
pub fn consumed_amount(minted: Shares, reserve: Amount, total: Shares) -> Result<Amount, AmmError> {
    mul_div(minted.get(), reserve.get(), total.get(), Rounding::Up).map(Amount::new)
}

/// Assets returned for burning `shares` out of `total`.
///
/// # Errors
///
/// - [`AmmError::InsufficientLiquidityBurned`] if both amounts floor to zero.
/// - [`AmmError::DivisionByZero`] if `total` is zero.
pub fn withdrawal_amounts(
    shares: Shares,
    reserve_a: Amount,
    reserve_b: Amount,
    total: Shares,
) -> Result<(Amount, Amount), AmmError> {
    let out_a = mul_div(reserve_a.get(), shares.get(), total.get(), Rounding::Down)?;
    let out_b = mul_div(reserve_b.get(), shares.get(), total.get(), Rounding::Down)?;
    if out_a == 0 && out_b == 0 {
        return Err(AmmError::InsufficientLiquidityBurned);
    }
    Ok((Amount::new(out_a), Amount::new(out_b)))
}

/// Output of an exact-input swap against `reserve_in`/`reserve_out`.
///
/// The fee is applied as the fixed-point factor `(d − n)/d` on the input
/// and kept scaled through the solve, so the only rounding is the final
/// floor on the output.
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if the output floors to zero.
/// - [`AmmError::InsufficientLiquidity`] if the output reaches the whole
///   output reserve (a numeric bug; the formula cannot produce it).
/// - [`AmmError::DivisionByZero`] if both the reserve and input are zero.
/// - [`AmmError::Overflow`] if an intermediate exceeds 256 bits.
pub fn amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeRate,
) -> Result<Amount, AmmError> {
    let keep = fee
        .denominator()
        .checked_sub(fee.numerator())
        .ok_or(AmmError::Underflow("fee numerator exceeds denominator"))?;

    let scaled_in = U256::from(amount_in.get()) * U256::from(keep);
    let numerator = scaled_in
        .checked_mul(U256::from(reserve_out.get()))
        .ok_or(AmmError::Overflow("swap numerator overflow"))?;
    let denominator = (U256::from(reserve_in.get()) * U256::from(fee.denominator()))
        .checked_add(scaled_in)
        .ok_or(AmmError::Overflow("swap denominator overflow"))?;
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }

    let out = narrow(numerator / denominator, "swap output exceeds u128")?;
    debug!(
        amount_in = amount_in.get(),
        reserve_in = reserve_in.get(),
        reserve_out = reserve_out.get(),
        out,
        "constant-product solve"
    );

    if out == 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if out >= reserve_out.get() {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(Amount::new(out))
}

/// Checks that a reserve update did not shrink `reserve_a × reserve_b`.
///
/// # Errors
///
/// Returns [`AmmError::InsufficientLiquidity`] if the product decreased.
pub fn ensure_product_non_decreasing(
    before: (Amount, Amount),
    after: (Amount, Amount),
) -> Result<(), AmmError> {
    let k_before = product(before.0.get(), before.1.get());
    let k_after = product(after.0.get(), after.1.get());
    if k_after < k_before {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(())
}
