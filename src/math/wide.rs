//! 256-bit intermediates for products of two `u128` values.
//!
//! Reserves of 18-decimal tokens routinely exceed `2^64`, so a product
//! such as `reserve_a × reserve_b` overflows `u128` long before the
//! quotient would.  Every multiply-then-divide in the engine goes through
//! [`mul_div`], which multiplies in [`U256`] and only narrows the final
//! quotient.

use crate::domain::Rounding;
use crate::error::AmmError;

#[allow(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs
)]
mod u256 {
    uint::construct_uint! {
        /// Unsigned 256-bit integer for intermediate products.
        pub struct U256(4);
    }
}

pub use u256::U256;

/// Narrows a `U256` to `u128`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] with `context` if `value` needs more
/// than 128 bits.
pub fn narrow(value: U256, context: &'static str) -> Result<u128, AmmError> {
    if value.bits() > 128 {
        return Err(AmmError::Overflow(context));
    }
    Ok(value.low_u128())
}

/// Computes `a × b / d` with a 256-bit intermediate.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `d` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use hydra_liquidity::domain::Rounding;
/// use hydra_liquidity::math::mul_div;
///
/// // (10^30 × 10^30) / 10^30 overflows u128 in the product but not here.
/// let e30 = 10u128.pow(30);
/// assert_eq!(mul_div(e30, e30, e30, Rounding::Down), Ok(e30));
/// assert_eq!(mul_div(10, 1, 3, Rounding::Up), Ok(4));
/// ```
pub fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Result<u128, AmmError> {
    if d == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let divisor = U256::from(d);
    let mut quotient = product / divisor;
    if rounding == Rounding::Up && !(product % divisor).is_zero() {
        quotient = quotient + U256::one();
    }
    narrow(quotient, "mul_div quotient exceeds u128")
}

/// The constant-product value `a × b`, exact.
#[must_use]
pub fn product(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}

/// `floor(sqrt(a × b))`, the geometric mean of two amounts.
///
/// The root of a value below `2^256` is below `2^128`, so the result
/// always fits.
#[must_use]
pub fn isqrt_product(a: u128, b: u128) -> u128 {
    product(a, b).integer_sqrt().low_u128()
}
