//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_liquidity::prelude::*;
//! ```

pub use crate::config::{ExcessPolicy, PoolConfig};
pub use crate::domain::{AccountId, Amount, FeeRate, PoolId, Shares, TokenAddress, TokenPair};
pub use crate::error::{AmmError, Result};
pub use crate::events::{EventSink, NoopSink, PoolEvent, RecordingSink};
pub use crate::factory::PoolRegistry;
pub use crate::ledger::{InMemoryLedger, TokenLedger};
pub use crate::math::CheckedArithmetic;
pub use crate::pools::{Pool, PoolHandle, PoolState};
pub use crate::traits::{LiquidityPool, LiquidityReceipt, SwapPool, SwapQuote};
