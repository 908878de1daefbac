//! Core trait abstractions for pool operations.
//!
//! [`SwapPool`] covers pricing and exact-input swaps; [`LiquidityPool`]
//! extends it with deposits, withdrawals and share queries.

mod liquidity_pool;
mod swap_pool;

pub use liquidity_pool::{LiquidityPool, LiquidityReceipt};
pub use swap_pool::{SwapPool, SwapQuote};
