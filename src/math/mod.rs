//! Arithmetic for reserve and share accounting.
//!
//! - [`CheckedArithmetic`]: `Result`-returning add/sub on domain types.
//! - [`mul_div`] and friends: multiply-then-divide through a 256-bit
//!   intermediate.
//! - [`reserve_math`]: the pure pricing and share functions pools call.

mod checked;
pub mod reserve_math;
mod wide;

pub use checked::{safe_div, CheckedArithmetic};
pub use wide::{isqrt_product, mul_div, narrow, product, U256};
