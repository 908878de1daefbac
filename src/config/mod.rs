//! Pool configuration.
//!
//! A [`PoolConfig`] fixes the fee and the [`ExcessPolicy`] of a pool for
//! its whole lifetime.  The registry hands its default configuration to
//! every pool it creates unless the caller supplies one.

mod pool_config;

pub use pool_config::{ExcessPolicy, PoolConfig};
